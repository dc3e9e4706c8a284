//! Application-level configuration loading, including settlement reward amounts.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DEVWARS_BACK_CONFIG_PATH";
/// Environment variable holding the shared secret accepted from bot callers.
const BOT_SECRET_ENV: &str = "DEVWARS_BOT_SECRET";
/// Environment variable holding the outbound mail webhook endpoint.
const MAIL_WEBHOOK_ENV: &str = "DEVWARS_MAIL_WEBHOOK";

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Experience amounts credited when a game settles.
    pub rewards: SettlementRewards,
    /// Shared secret accepted from bot callers, when configured.
    pub bot_secret: Option<String>,
    /// Webhook URL for outbound mail notifications, when configured.
    pub mail_webhook: Option<String>,
}

/// Experience amounts applied by settlement.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SettlementRewards {
    /// Experience credited to each player on the winning team.
    pub win_xp: i64,
    /// Experience debited from each player on the losing team.
    pub loss_xp: i64,
    /// Experience credited to every seated player of a settled game.
    pub participation_xp: i64,
}

impl Default for SettlementRewards {
    fn default() -> Self {
        Self {
            win_xp: 4000,
            loss_xp: 2400,
            participation_xp: 800,
        }
    }
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// built-in reward amounts.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let rewards = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let rewards = raw.rewards.unwrap_or_default();
                    info!(path = %path.display(), "loaded settlement rewards from config");
                    rewards
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    SettlementRewards::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                SettlementRewards::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                SettlementRewards::default()
            }
        };

        Self {
            rewards,
            bot_secret: non_empty_env(BOT_SECRET_ENV),
            mail_webhook: non_empty_env(MAIL_WEBHOOK_ENV),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rewards: SettlementRewards::default(),
            bot_secret: None,
            mail_webhook: None,
        }
    }
}

/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
#[derive(Debug, Deserialize)]
struct RawConfig {
    rewards: Option<SettlementRewards>,
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
