//! Collaborator seams of the scheduler.
//!
//! The player never talks to Discord directly: the voice connection, the
//! outward status messages and the bot presence all sit behind the traits
//! in this module, injected at player construction.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::model::id::ChannelId;

use crate::{audio::item::MediaItem, error::TransportError};

/// Callback de fin de reproducción.
///
/// A [`VoiceTransport`] must invoke it exactly once per accepted `play`,
/// never before `play` returns, with `Some(error)` when playback failed.
/// It may be invoked from any thread.
pub type OnComplete = Arc<dyn Fn(Option<TransportError>) + Send + Sync>;

/// Conexión de voz de un guild, vista como caja negra.
///
/// One transport instance belongs to exactly one player; the registry's
/// uniqueness invariant is what enforces that exclusivity.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Se une al canal de voz dado (o se mueve, si ya estaba conectado).
    async fn connect(&self, channel: ChannelId) -> Result<(), TransportError>;

    /// Arranca la reproducción de `item` y retorna en seguida.
    ///
    /// On `Ok`, `on_complete` fires later (exactly once). On `Err`, it
    /// must never fire: the player treats the item as already finished.
    async fn play(&self, item: &MediaItem, on_complete: OnComplete) -> Result<(), TransportError>;

    /// Detiene el item en curso; el fin llega por `on_complete`, como
    /// cualquier otra terminación.
    async fn stop(&self) -> Result<(), TransportError>;

    /// Pausa el item en curso sin sacarlo de vuelo.
    async fn pause(&self) -> Result<(), TransportError>;

    /// Reanuda un item pausado.
    async fn resume(&self) -> Result<(), TransportError>;

    /// Libera los recursos del lado del transporte de un item terminado.
    async fn release(&self, item: &MediaItem) -> Result<(), TransportError>;

    /// Cierra la conexión de voz.
    async fn disconnect(&self) -> Result<(), TransportError>;
}

/// Anuncios hacia afuera (mensajes de estado). Best-effort: las fallas se
/// loguean dentro de la implementación, nunca llegan al loop.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn now_playing(&self, item: &MediaItem);

    async fn playback_error(&self, item: &MediaItem, error: &TransportError);
}

/// Actualización cosmética de presencia del bot. Best-effort.
#[async_trait]
pub trait PresenceSink: Send + Sync {
    async fn set_listening(&self, item: &MediaItem);

    async fn clear(&self);
}
