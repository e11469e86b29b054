pub mod banner;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

pub use banner::print_banner;
pub use config::{Config, Environment};
pub use db::create_pool;
pub use error::{TrackerError, TrackerResult};
pub use services::{ClassifyOutcome, FetchSummary, FetchTrigger, Pipeline};
pub use state::AppState;
