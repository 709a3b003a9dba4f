//! Client configuration.
//!
//! Settings come from the environment (optionally seeded from a `.env`
//! file) and can be overridden from the command line.

use headwins::{Username, connection::DEFAULT_URL};

/// Environment variable naming the server endpoint.
pub const SERVER_URL_VAR: &str = "HW_SERVER_URL";
/// Environment variable naming the display name to join with.
pub const USERNAME_VAR: &str = "HW_USERNAME";

/// Everything the client needs to connect and join.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint, e.g. `ws://localhost:8000/ws`
    pub server_url: String,
    /// Name sent with `join` and every attributed action
    pub username: Username,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `server_override` - Optional endpoint override (from CLI args)
    /// * `username_override` - Optional display name override (from CLI args)
    ///
    /// Without a configured name, a random `Player N` name is drawn.
    pub fn from_env(server_override: Option<String>, username_override: Option<String>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), server_override, username_override)
    }

    /// Same as [`ClientConfig::from_env`] with the environment replaced by
    /// `lookup`.
    pub fn from_lookup<F>(
        lookup: F,
        server_override: Option<String>,
        username_override: Option<String>,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = server_override
            .or_else(|| lookup(SERVER_URL_VAR))
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        let username = username_override
            .or_else(|| lookup(USERNAME_VAR))
            .map(Username::from)
            .unwrap_or_else(Username::random);

        Self {
            server_url,
            username,
        }
    }

    /// Validate configuration after loading
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the endpoint isn't a WebSocket
    /// URL or the name is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(rest) = ["ws://", "wss://"]
            .iter()
            .find_map(|scheme| self.server_url.strip_prefix(scheme))
        else {
            return Err(ConfigError::Invalid {
                var: SERVER_URL_VAR.to_string(),
                reason: format!("'{}' must start with ws:// or wss://", self.server_url),
            });
        };
        if rest.is_empty() || rest.starts_with('/') {
            return Err(ConfigError::Invalid {
                var: SERVER_URL_VAR.to_string(),
                reason: "Missing host".to_string(),
            });
        }

        if self.username.as_str().trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: USERNAME_VAR.to_string(),
                reason: "Must not be blank".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}
