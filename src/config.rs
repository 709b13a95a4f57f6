//! Client configuration from environment variables

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Display name; the user id is learned from the first matching snapshot
    pub user_name: String,
    pub session_id: String,
    /// Ask the authority to make this client the session creator (and moderator)
    pub creator: bool,
}

impl ClientConfig {
    /// Load config from environment variables
    /// POKER_USER_NAME and POKER_SESSION_ID must both be set
    pub fn from_env() -> Result<Self, ConfigError> {
        let user_name = required("POKER_USER_NAME")?;
        let session_id = required("POKER_SESSION_ID")?;

        let creator = std::env::var("POKER_CREATOR")
            .map(|v| v != "0" && v.to_lowercase() != "false")
            .unwrap_or(false);

        tracing::info!(%session_id, %user_name, creator, "Client config loaded");

        Ok(Self {
            user_name,
            session_id,
            creator,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for key in ["POKER_USER_NAME", "POKER_SESSION_ID", "POKER_CREATOR"] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear();
        std::env::set_var("POKER_USER_NAME", "  Bob ");
        std::env::set_var("POKER_SESSION_ID", "ABC123");

        let config = ClientConfig::from_env().unwrap();

        assert_eq!(config.user_name, "Bob");
        assert_eq!(config.session_id, "ABC123");
        assert!(!config.creator);
        clear();
    }

    #[test]
    #[serial]
    fn test_creator_flag() {
        clear();
        std::env::set_var("POKER_USER_NAME", "Alice");
        std::env::set_var("POKER_SESSION_ID", "ABC123");

        std::env::set_var("POKER_CREATOR", "true");
        assert!(ClientConfig::from_env().unwrap().creator);

        std::env::set_var("POKER_CREATOR", "FALSE");
        assert!(!ClientConfig::from_env().unwrap().creator);

        std::env::set_var("POKER_CREATOR", "0");
        assert!(!ClientConfig::from_env().unwrap().creator);
        clear();
    }

    #[test]
    #[serial]
    fn test_missing_values() {
        clear();
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ConfigError::Missing("POKER_USER_NAME"))
        ));

        std::env::set_var("POKER_USER_NAME", "Bob");
        std::env::set_var("POKER_SESSION_ID", "   ");
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ConfigError::Missing("POKER_SESSION_ID"))
        ));
        clear();
    }
}
