//! Configuration options for the conversion run

use chrono::Local;

/// Timestamp layout embedded in output artifact names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Conversion configuration options
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Maximum number of diagnostics collected before row processing
    /// stops early
    pub max_errors: usize,
    /// Fixed run timestamp for the output artifact name; `None` samples
    /// the local clock once at the start of the run
    pub timestamp: Option<String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_errors: 100,
            timestamp: None,
        }
    }
}

impl ConversionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diagnostic cap
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Pin the run timestamp (reproducible output names)
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.max_errors == 0 {
            return Err("Maximum error count must be at least 1".to_string());
        }
        Ok(())
    }

    /// The timestamp used for this run's artifact name
    pub fn run_timestamp(&self) -> String {
        self.timestamp
            .clone()
            .unwrap_or_else(|| Local::now().format(TIMESTAMP_FORMAT).to_string())
    }
}
