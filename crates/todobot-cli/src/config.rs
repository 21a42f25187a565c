use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use todobot_channels::DEFAULT_API_BASE_URL;
use todobot_core::{TodoError, TodoResult};
use todobot_gateway::router::{DEFAULT_MAX_DICE, DEFAULT_START_MESSAGE};
use todobot_gateway::{conversation::DEFAULT_MENU_PROMPT, RouterSettings};

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "TOKEN";

/// Runtime configuration. Every field except the token has a default, so the
/// config file is optional.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub token: String,
    pub api_base_url: String,
    pub poll_timeout_secs: u64,
    pub poll_backoff_secs: u64,
    pub event_buffer: usize,
    pub max_dice: u32,
    pub start_message: String,
    pub menu_prompt: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_timeout_secs: 30,
            poll_backoff_secs: 5,
            event_buffer: 100,
            max_dice: DEFAULT_MAX_DICE,
            start_message: DEFAULT_START_MESSAGE.to_string(),
            menu_prompt: DEFAULT_MENU_PROMPT.to_string(),
        }
    }
}

// Never print the token.
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_base_url", &self.api_base_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("poll_backoff_secs", &self.poll_backoff_secs)
            .field("event_buffer", &self.event_buffer)
            .field("max_dice", &self.max_dice)
            .field("start_message", &self.start_message)
            .field("menu_prompt", &self.menu_prompt)
            .finish()
    }
}

impl BotConfig {
    /// Load the optional TOML file, then let `$TOKEN` override the token.
    pub async fn load(path: Option<&Path>) -> TodoResult<Self> {
        let config = match path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                    TodoError::Config(format!(
                        "Failed to read config file '{}': {e}",
                        path.display()
                    ))
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };

        config
            .with_token_override(std::env::var(TOKEN_ENV).ok())
            .validated()
    }

    pub fn from_toml_str(raw: &str) -> TodoResult<Self> {
        toml::from_str(raw).map_err(|e| TodoError::Config(format!("Invalid config: {e}")))
    }

    /// Replace the token when `token` is present and non-blank.
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = token.trim().to_string();
        }
        self
    }

    pub fn validated(self) -> TodoResult<Self> {
        if self.token.trim().is_empty() {
            return Err(TodoError::Config(format!(
                "No bot token: set ${TOKEN_ENV} or `token` in the config file"
            )));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(TodoError::Config("api_base_url must not be empty".to_string()));
        }
        if self.event_buffer == 0 {
            return Err(TodoError::Config("event_buffer must be at least 1".to_string()));
        }
        Ok(self)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn poll_backoff(&self) -> Duration {
        Duration::from_secs(self.poll_backoff_secs)
    }

    pub fn router_settings(&self) -> RouterSettings {
        RouterSettings {
            start_message: self.start_message.clone(),
            menu_prompt: self.menu_prompt.clone(),
            max_dice: self.max_dice,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.api_base_url, "https://api.telegram.org");
        assert_eq!(config.poll_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_dice, 10);
        assert_eq!(config.start_message, "I love Qv2ray!");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BotConfig::from_toml_str(
            r#"
            max_dice = 3
            menu_prompt = "TBD"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_dice, 3);
        assert_eq!(config.menu_prompt, "TBD");
        assert_eq!(config.event_buffer, 100);
        assert!(config.token.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = BotConfig::from_toml_str("max_dice = \"many\"").unwrap_err();
        assert!(matches!(err, TodoError::Config(_)));
    }

    #[test]
    fn test_missing_token_rejected() {
        let err = BotConfig::default().validated().unwrap_err();
        assert!(err.to_string().contains("TOKEN"));

        let err = BotConfig::default()
            .with_token_override(Some("   ".to_string()))
            .validated()
            .unwrap_err();
        assert!(matches!(err, TodoError::Config(_)));
    }

    #[test]
    fn test_env_token_overrides_file() {
        let config = BotConfig::from_toml_str("token = \"from-file\"")
            .unwrap()
            .with_token_override(Some(" from-env \n".to_string()))
            .validated()
            .unwrap();
        assert_eq!(config.token, "from-env");

        let config = BotConfig::from_toml_str("token = \"from-file\"")
            .unwrap()
            .with_token_override(None)
            .validated()
            .unwrap();
        assert_eq!(config.token, "from-file");
    }

    #[test]
    fn test_zero_event_buffer_rejected() {
        let config = BotConfig {
            token: "t".to_string(),
            event_buffer: 0,
            ..Default::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = BotConfig {
            token: "123:secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_router_settings_mapping() {
        let config = BotConfig {
            max_dice: 4,
            start_message: "hi".to_string(),
            ..Default::default()
        };
        let settings = config.router_settings();
        assert_eq!(settings.max_dice, 4);
        assert_eq!(settings.start_message, "hi");
        assert_eq!(settings.menu_prompt, DEFAULT_MENU_PROMPT);
    }

    #[tokio::test]
    async fn test_load_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("todobot.toml");
        std::fs::write(&path, "token = \"abc\"\npoll_timeout_secs = 10\n").unwrap();

        let config = BotConfig::load(Some(&path)).await.unwrap();
        assert_eq!(config.poll_timeout_secs, 10);
        assert!(!config.token.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_config_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = BotConfig::load(Some(&tmp.path().join("nope.toml")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
