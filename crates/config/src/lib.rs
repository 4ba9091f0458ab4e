//! Homework bot configuration
use std::time::Duration;

use clap::{Parser, ValueEnum};
use url::Url;

/// Default Practicum homework statuses endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// How an empty `homeworks` list is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EmptyHomeworksPolicy {
    /// Nothing new to report, the cycle ends normally.
    #[default]
    Ignore,
    /// The cycle fails with a "no homeworks" error.
    Fail,
}

/// How a status outside the verdict table is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum UnknownStatusPolicy {
    /// The cycle fails and nothing is sent.
    #[default]
    Fail,
    /// Notify with the "rejected" verdict.
    Rejected,
}

/// What the poll loop does after a failed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Log the failure and poll again after the retry interval.
    #[default]
    KeepPolling,
    /// Log the failure and stop the loop with the error.
    Exit,
}

/// When the `from_date` cursor moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CursorPolicy {
    /// After every fetch attempt, failed or not.
    #[default]
    Always,
    /// Only after a cycle that completed without error.
    OnSuccess,
}

/// Credentials read from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Practicum OAuth token
    pub endpoint_token: String,
    /// Telegram bot token
    pub bot_token: String,
    /// Telegram chat receiving the notifications
    pub chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint_token", &"***")
            .field("bot_token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Returned when one or more credentials are absent or blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required environment variables: {}", .0.join(", "))]
pub struct MissingCredentials(pub Vec<&'static str>);

/// Credential options
#[derive(Debug, Clone, Default, Parser)]
pub struct CredentialOpts {
    /// Practicum API OAuth token
    #[clap(long, env = "PRACTICUM_TOKEN", hide_env_values = true)]
    pub practicum_token: Option<String>,
    /// Telegram bot token
    #[clap(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: Option<String>,
    /// Telegram chat ID to notify
    #[clap(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,
}

impl CredentialOpts {
    /// Check that every credential is present and non-blank.
    ///
    /// The error lists all missing variables, not just the first one.
    pub fn check(&self) -> Result<Credentials, MissingCredentials> {
        fn present(value: Option<&String>) -> Option<String> {
            value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_owned)
        }

        let endpoint_token = present(self.practicum_token.as_ref());
        let bot_token = present(self.telegram_token.as_ref());
        let chat_id = present(self.telegram_chat_id.as_ref());

        match (endpoint_token, bot_token, chat_id) {
            (Some(endpoint_token), Some(bot_token), Some(chat_id)) => {
                Ok(Credentials { endpoint_token, bot_token, chat_id })
            }
            (endpoint_token, bot_token, chat_id) => {
                let mut missing = Vec::new();
                if endpoint_token.is_none() {
                    missing.push("PRACTICUM_TOKEN");
                }
                if bot_token.is_none() {
                    missing.push("TELEGRAM_TOKEN");
                }
                if chat_id.is_none() {
                    missing.push("TELEGRAM_CHAT_ID");
                }
                Err(MissingCredentials(missing))
            }
        }
    }

    /// Same as [`Self::check`], but substitutes empty strings for missing values.
    pub fn lenient(&self) -> Credentials {
        Credentials {
            endpoint_token: self.practicum_token.clone().unwrap_or_default(),
            bot_token: self.telegram_token.clone().unwrap_or_default(),
            chat_id: self.telegram_chat_id.clone().unwrap_or_default(),
        }
    }
}

/// Poll loop options
#[derive(Debug, Clone, Parser)]
pub struct PollOpts {
    /// Homework statuses endpoint
    #[clap(long, env = "PRACTICUM_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: Url,
    /// Telegram Bot API base URL
    #[clap(long, env = "TELEGRAM_API_URL", default_value = DEFAULT_TELEGRAM_API_URL)]
    pub telegram_api_url: Url,
    /// Seconds to sleep between polling cycles
    #[clap(long, env = "RETRY_INTERVAL_SECS", default_value = "600")]
    pub retry_interval_secs: u64,
    /// Timeout in seconds for each outgoing HTTP request
    #[clap(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,
    /// Treatment of an empty homeworks list
    #[clap(long, env = "EMPTY_HOMEWORKS", value_enum, default_value_t)]
    pub empty_homeworks: EmptyHomeworksPolicy,
    /// Treatment of an unrecognized homework status
    #[clap(long, env = "UNKNOWN_STATUS", value_enum, default_value_t)]
    pub unknown_status: UnknownStatusPolicy,
    /// Behaviour after a failed polling cycle
    #[clap(long, env = "ON_CYCLE_FAILURE", value_enum, default_value_t)]
    pub on_cycle_failure: FailurePolicy,
    /// When to advance the `from_date` cursor
    #[clap(long, env = "ADVANCE_CURSOR", value_enum, default_value_t)]
    pub advance_cursor: CursorPolicy,
}

impl PollOpts {
    /// Sleep between cycles.
    pub const fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    /// Per-request HTTP timeout.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// CLI options for the homework bot
#[derive(Debug, Clone, Parser)]
pub struct Opts {
    /// Credentials
    #[clap(flatten)]
    pub credentials: CredentialOpts,

    /// Poll loop configuration
    #[clap(flatten)]
    pub poll: PollOpts,

    /// Log missing credentials and keep running instead of refusing to start
    #[clap(long, env = "ALLOW_MISSING_CREDENTIALS")]
    pub allow_missing_credentials: bool,
}
