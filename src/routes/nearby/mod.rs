pub mod handler;
pub mod model;

pub use handler::{nearby_events, nearby_users};
