use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            _ => Self::Dev,
        }
    }

    /// Returns the default data path for this environment
    pub fn default_data_path(&self) -> PathBuf {
        match self {
            Self::Dev => PathBuf::from("./data"),
            Self::Prod => PathBuf::from("/data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub env: Environment,
    pub data_path: PathBuf,
    pub database_url: String,
    pub max_connections: u32,
    /// Feeds the scheduler re-fetches periodically.
    pub feed_urls: Vec<String>,
    /// Remote classifier endpoint; the keyword tier is used when unset.
    pub inference_url: Option<String>,
    /// Interval between scheduled feed refreshes.
    pub fetch_interval: Duration,
    /// Background workers draining the job queue.
    pub workers: usize,
}

impl Config {
    pub fn new(env: Environment, data_path: impl AsRef<Path>) -> Self {
        let data_path = data_path.as_ref().to_path_buf();
        let database_url = format!("sqlite:{}?mode=rwc", data_path.join("sonar.db").display());
        Self {
            env,
            data_path,
            database_url,
            max_connections: 5,
            feed_urls: Vec::new(),
            inference_url: None,
            fetch_interval: Duration::from_secs(900),
            workers: 4,
        }
    }
}
