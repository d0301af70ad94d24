//! Crate error types.

use serenity::model::id::GuildId;
use thiserror::Error;

/// Errors reported by a [`VoiceTransport`](crate::audio::transport::VoiceTransport)
/// implementation.
///
/// `Clone` because the same error travels through the completion callback,
/// the signal slot and the notification sink.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The guild has no live voice connection.
    #[error("no hay conexión de voz activa")]
    NotConnected,

    /// Joining or moving to a voice channel failed.
    #[error("error de conexión de voz: {0}")]
    Connection(String),

    /// Starting or finishing a playback failed.
    #[error("error de reproducción: {0}")]
    Playback(String),

    /// Releasing a finished item's resources failed.
    #[error("error liberando recursos: {0}")]
    Cleanup(String),
}

/// Errors surfaced by the scheduler's own command surface.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The player already tore itself down; callers should build a fresh
    /// one through the registry.
    #[error("el player del guild {0} ya fue destruido")]
    Destroyed(GuildId),
}
