// Configuration module: everything the client needs from the environment.
// Only the backend base URL is configurable today.

use anyhow::{Context, Result};
use envconfig::Envconfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Envconfig, Debug, Clone)]
pub struct Config {
    /// Base URL of the grading backend, without the endpoint path.
    #[envconfig(from = "GRADER_API_URL", default = "http://localhost:8000")]
    pub api_url: String,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn load() -> Result<Self> {
        Config::init_from_env().context("Failed to load config")
    }
}
