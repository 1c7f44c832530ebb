use crate::error::{StatsError, StatsResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Connection settings for the analyzer backend.
///
/// Doubles as a set of global CLI flags and as a JSON config file. Values given
/// explicitly on the command line win over the file.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    #[arg(global = true, long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(global = true, long, default_value_t = 30)]
    pub timeout_secs: u64,

    // 0 keeps the "fail once, show the error" behaviour
    #[arg(global = true, long, default_value_t = 0)]
    pub max_retries: u32,
    #[arg(global = true, long, default_value_t = 200)]
    pub retry_base_ms: u64,
    #[arg(global = true, long, default_value_t = 5_000)]
    pub retry_max_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            max_retries: 0,
            retry_base_ms: 200,
            retry_max_ms: 5_000,
        }
    }
}

impl ClientSettings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> StatsResult<Self> {
        let content = fs::read_to_string(path)?;
        let settings: ClientSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> StatsResult<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(StatsError::Url(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(StatsError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without trailing slashes, ready for `{base}/metrics/` joins.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn merge_from_cli(&mut self, cli: &ClientSettings, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(api_url, "api_url");
        update_if_present!(timeout_secs, "timeout_secs");
        update_if_present!(max_retries, "max_retries");
        update_if_present!(retry_base_ms, "retry_base_ms");
        update_if_present!(retry_max_ms, "retry_max_ms");
    }
}
