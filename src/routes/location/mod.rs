pub mod handler;
pub mod model;

pub use handler::{get_own_location, get_visible, report_position, update_sharing};
