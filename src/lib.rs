use std::sync::Arc;

use config::Config;
use engine::LocationEngine;
use infrastructure::memory::InMemorySharingSettings;

pub mod common;
pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod infrastructure;
pub mod middleware;
pub mod proximity;
pub mod result;
pub mod routes;
pub mod store;
pub mod tracker;
pub mod utils;
pub mod visibility;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<LocationEngine>,
    pub config: Config,
    pub sharing: Arc<InMemorySharingSettings>,
}
