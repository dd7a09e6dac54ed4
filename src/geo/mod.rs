// 地理计算
// 纯函数：球面距离与经纬度边界盒，供存储与查询模块复用

use crate::common::MapLocation;

/// 地球平均半径（千米）
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// 1度纬度约111km
pub const KM_PER_DEGREE: f64 = 111.0;
/// 计算经度跨度时对 cos(纬度) 的下限保护，极点附近不除零
const MIN_COS_LAT: f64 = 1e-6;

/// 经纬度边界盒，作为精确距离过滤前的粗筛
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// 坐标是否落在盒内
    pub fn contains(&self, p: &MapLocation) -> bool {
        p.latitude >= self.lat_min
            && p.latitude <= self.lat_max
            && p.longitude >= self.lon_min
            && p.longitude <= self.lon_max
    }
}

/// 使用Haversine公式计算两点间的大圆距离（千米）
pub fn distance_km(a: &MapLocation, b: &MapLocation) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// 以中心点和半径（千米）生成近似的经纬度边界盒
/// 经度跨度随 cos(纬度) 趋近0而变大，极点附近会退化为近乎全球范围，
/// 调用方必须再用 distance_km 做精确过滤
pub fn bounding_box(center: &MapLocation, radius_km: f64) -> BoundingBox {
    let lat_range = radius_km / KM_PER_DEGREE;
    let cos_lat = center.latitude.to_radians().cos().max(MIN_COS_LAT);
    let lon_range = radius_km / (KM_PER_DEGREE * cos_lat);

    BoundingBox {
        lat_min: center.latitude - lat_range,
        lat_max: center.latitude + lat_range,
        lon_min: center.longitude - lon_range,
        lon_max: center.longitude + lon_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let brno = MapLocation::new(49.1951, 16.6068);
        assert_eq!(distance_km(&brno, &brno), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = MapLocation::new(49.1951, 16.6068);
        let b = MapLocation::new(50.0755, 14.4378);
        assert_eq!(distance_km(&a, &b), distance_km(&b, &a));
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = MapLocation::new(49.0, 16.0);
        let b = MapLocation::new(50.0, 16.0);
        let d = distance_km(&a, &b);
        assert!(d > 110.0 && d < 112.0, "distance was {}", d);
    }

    #[test]
    fn bounding_box_contains_center_and_scales_with_latitude() {
        let center = MapLocation::new(60.0, 10.0);
        let bbox = bounding_box(&center, 5.0);
        assert!(bbox.contains(&center));
        // 高纬度的经度跨度大于纬度跨度
        assert!(bbox.lon_max - bbox.lon_min > bbox.lat_max - bbox.lat_min);
    }

    #[test]
    fn bounding_box_near_pole_does_not_panic() {
        let pole = MapLocation::new(90.0, 0.0);
        let bbox = bounding_box(&pole, 10.0);
        assert!(bbox.lon_min.is_finite());
        assert!(bbox.lon_max.is_finite());
        // 退化为极宽的经度范围，由精确过滤兜底
        assert!(bbox.lon_max - bbox.lon_min >= 360.0);
    }

    #[test]
    fn bounding_box_admits_corner_false_positives() {
        let center = MapLocation::new(0.0, 0.0);
        let bbox = bounding_box(&center, 10.0);
        let corner = MapLocation::new(bbox.lat_max, bbox.lon_max);
        assert!(bbox.contains(&corner));
        // 角落点在盒内但真实距离超出半径
        assert!(distance_km(&center, &corner) > 10.0);
    }
}
