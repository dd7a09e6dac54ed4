use serde::{Deserialize, Serialize};

/// 精度降级使用的网格大小（度），约1公里
pub const COARSEN_GRID_DEG: f64 = 0.01;

// 公共数据结构
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl MapLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// 校验经纬度是否在合法范围内
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// 吸附到约0.01度网格的中心，用于降低对外共享的坐标精度
    /// 单向变换，降级后的坐标不会写回存储
    pub fn coarsened(&self) -> Self {
        Self {
            latitude: coarsen_component(self.latitude).clamp(-90.0, 90.0),
            longitude: coarsen_component(self.longitude).clamp(-180.0, 180.0),
        }
    }
}

fn coarsen_component(value: f64) -> f64 {
    (value / COARSEN_GRID_DEG).floor() * COARSEN_GRID_DEG + COARSEN_GRID_DEG / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_coordinate_ranges() {
        assert!(MapLocation::new(49.1951, 16.6068).is_valid());
        assert!(MapLocation::new(-90.0, 180.0).is_valid());
        assert!(!MapLocation::new(91.0, 0.0).is_valid());
        assert!(!MapLocation::new(0.0, -180.5).is_valid());
        assert!(!MapLocation::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn coarsened_position_differs_from_raw() {
        let raw = MapLocation::new(49.19512, 16.60683);
        let coarse = raw.coarsened();
        assert_ne!(coarse.latitude, raw.latitude);
        assert_ne!(coarse.longitude, raw.longitude);
        // 网格中心与原始坐标的偏差不超过一个网格
        assert!((coarse.latitude - raw.latitude).abs() <= COARSEN_GRID_DEG);
        assert!((coarse.longitude - raw.longitude).abs() <= COARSEN_GRID_DEG);
    }

    #[test]
    fn coarsened_position_stays_in_range() {
        let edge = MapLocation::new(90.0, 180.0);
        assert!(edge.coarsened().is_valid());
    }
}
