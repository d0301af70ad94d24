use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Segundos de cola vacía antes de que el player se destruya solo.
    pub idle_timeout_secs: u64,

    /// Retraso opcional antes del anuncio de "now playing", en ms
    /// (0 = desactivado).
    pub now_playing_debounce_ms: u64,
}

impl SchedulerConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            idle_timeout_secs: std::env::var("IDLE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,
            now_playing_debounce_ms: std::env::var("NOW_PLAYING_DEBOUNCE_MS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validates configuration values for correctness.
    ///
    /// # Validation Rules
    ///
    /// - Idle timeout must be greater than zero
    /// - The notification debounce must stay well below the idle timeout
    pub fn validate(&self) -> Result<()> {
        if self.idle_timeout_secs == 0 {
            anyhow::bail!("Idle timeout must be greater than 0 seconds");
        }

        if self.now_playing_debounce_ms >= self.idle_timeout_secs * 1000 {
            anyhow::bail!(
                "Now-playing debounce ({}ms) must be below the idle timeout ({}s)",
                self.now_playing_debounce_ms,
                self.idle_timeout_secs
            );
        }

        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn now_playing_debounce(&self) -> Duration {
        Duration::from_millis(self.now_playing_debounce_ms)
    }

    /// Returns a summary of the current configuration for logging.
    pub fn summary(&self) -> String {
        format!(
            "Scheduler: idle timeout {}, now-playing debounce {}",
            humantime::format_duration(self.idle_timeout()),
            humantime::format_duration(self.now_playing_debounce()),
        )
    }
}

/// Default configuration values.
///
/// The 100 second idle timeout matches the behavior users already expect
/// from the bot: roughly a minute and a half of silence before it leaves
/// the voice channel.
impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 100,
            now_playing_debounce_ms: 0,
        }
    }
}
