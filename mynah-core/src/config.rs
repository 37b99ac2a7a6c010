use serde::{Deserialize, Serialize};

/// Connection settings for the remote service. Everything is explicit and
/// injectable so tests can point the client at a local mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request deadline. Generous because chat answers can take the
    /// server a while; a timeout is reported as an ordinary connectivity
    /// failure, never retried.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_connect_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,

    /// Preferred input device name; `None` means the system default.
    #[serde(default)]
    pub microphone_device: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.base_url, "http://localhost:8000");
        assert_eq!(cfg.request_timeout_secs, 120);
        assert_eq!(cfg.connect_timeout_secs, 10);
    }

    #[test]
    fn partial_app_config_parses() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"client":{"base_url":"http://10.0.0.2:9000"}}"#).unwrap();
        assert_eq!(cfg.client.base_url, "http://10.0.0.2:9000");
        assert_eq!(cfg.client.request_timeout_secs, 120);
        assert!(cfg.microphone_device.is_none());
    }
}
