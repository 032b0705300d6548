use super::{AnalyzerConfig, ConfigError};

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Bounded modes need room for at least one candidate per tracker
        for (name, cap) in [
            ("max_unique_ips", self.max_unique_ips),
            ("max_unique_urls", self.max_unique_urls),
            ("max_unique_minutes", self.max_unique_minutes),
        ] {
            if cap < 2 {
                return Err(ConfigError::InvalidConfig(format!(
                    "{name} must be at least 2 (got {cap})"
                )));
            }
        }

        if self.small_file_threshold_mb >= self.medium_file_threshold_mb {
            return Err(ConfigError::InvalidConfig(format!(
                "small_file_threshold_mb ({}) must be below medium_file_threshold_mb ({})",
                self.small_file_threshold_mb, self.medium_file_threshold_mb
            )));
        }

        for (name, percent) in [
            ("balanced_prune_percent", self.balanced_prune_percent),
            ("aggressive_prune_percent", self.aggressive_prune_percent),
        ] {
            if !(1..=100).contains(&percent) {
                return Err(ConfigError::InvalidConfig(format!(
                    "{name} must be between 1 and 100 (got {percent})"
                )));
            }
        }

        if self.top_n_results == 0 {
            return Err(ConfigError::InvalidConfig(
                "top_n_results must be greater than 0".to_string(),
            ));
        }

        if self.read_buffer_bytes == 0 {
            return Err(ConfigError::InvalidConfig(
                "read_buffer_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
