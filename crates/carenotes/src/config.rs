use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the patients table (default: "PatientsTable")
    pub table_name: String,
    /// AWS region (default: "us-east-1")
    pub aws_region: String,
    /// Custom DynamoDB endpoint, e.g. a local DynamoDB (default: none)
    pub aws_endpoint_url: Option<String>,
    /// Per-request timeout of the HTTP adapter in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PATIENTS_TABLE` - Table name (default: "PatientsTable")
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `AWS_ENDPOINT_URL` - Custom endpoint URL (optional)
    /// - `REQUEST_TIMEOUT_SECONDS` - HTTP request timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, applying the same defaults as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: lookup("PATIENTS_TABLE").unwrap_or_else(|| "PatientsTable".to_string()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            aws_endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|v| !v.is_empty()),
            request_timeout_seconds: lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_request_timeout_conversion() {
        let config = config_from(&[("REQUEST_TIMEOUT_SECONDS", "30")]);

        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.table_name, "PatientsTable");
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.aws_endpoint_url, None);
        assert_eq!(config.request_timeout_seconds, 10);
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("PATIENTS_TABLE", "Records"),
            ("AWS_REGION", "eu-west-1"),
            ("AWS_ENDPOINT_URL", "http://localhost:8000"),
        ]);

        assert_eq!(config.table_name, "Records");
        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.aws_endpoint_url.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn test_blank_endpoint_and_bad_timeout_fall_back() {
        let config = config_from(&[
            ("AWS_ENDPOINT_URL", ""),
            ("REQUEST_TIMEOUT_SECONDS", "soon"),
        ]);

        assert_eq!(config.aws_endpoint_url, None);
        assert_eq!(config.request_timeout_seconds, 10);
    }
}
