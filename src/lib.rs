//! # Playback Scheduler
//!
//! Per-guild media playback scheduling for a Discord announcement bot.
//!
//! The bot's command layer resolves searches into [`MediaItem`]s and
//! enqueues them here; each guild gets its own [`Player`] task that
//! consumes its queue strictly in order, drives the injected
//! [`VoiceTransport`], and tears itself down after a configurable idle
//! period. Registration is handled by [`PlayerRegistry`], which
//! guarantees at most one live player per guild.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use playback_scheduler::{Player, PlayerRegistry, SchedulerConfig};
//! # use playback_scheduler::{MediaItem, NotificationSink, PresenceSink, VoiceTransport};
//! # fn deps() -> (Arc<dyn VoiceTransport>, Arc<dyn NotificationSink>, Arc<dyn PresenceSink>) { unimplemented!() }
//! # fn resolved_item() -> MediaItem { unimplemented!() }
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = SchedulerConfig::load()?;
//! let registry = PlayerRegistry::new();
//!
//! let guild_id = serenity::model::id::GuildId::new(123456789);
//! let (transport, notifications, presence) = deps();
//! let teardown = registry.teardown_handle();
//! let player = registry.get_or_create(guild_id, || {
//!     Player::spawn(guild_id, &config, transport, notifications, presence, teardown)
//! });
//!
//! player.enqueue(resolved_item());
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod config;
pub mod error;

pub use audio::{
    item::{MediaItem, SourceHandle},
    player::{Player, PlayerState, TeardownFn},
    queue::PlaybackQueue,
    registry::PlayerRegistry,
    signal::CompletionSignal,
    tasks::TaskRegistry,
    transport::{NotificationSink, OnComplete, PresenceSink, VoiceTransport},
};
pub use config::SchedulerConfig;
pub use error::{PlayerError, TransportError};
