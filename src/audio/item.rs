use std::{any::Any, fmt, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serenity::model::id::UserId;

/// Payload opaco producido por el resolver y consumido por el transporte.
///
/// The scheduler never looks inside; a transport implementation downcasts
/// back to whatever concrete input type its resolver produced.
#[derive(Clone)]
pub struct SourceHandle(Arc<dyn Any + Send + Sync>);

impl SourceHandle {
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self(Arc::new(payload))
    }

    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SourceHandle(..)")
    }
}

/// Unidad reproducible ya resuelta, con sus metadatos.
///
/// Owned by the queue until dequeued, by the player while in flight.
#[derive(Debug, Clone)]
pub struct MediaItem {
    pub title: String,
    pub duration: Option<Duration>,
    pub uploader: Option<String>,
    pub uploader_url: Option<String>,
    pub thumbnail: Option<String>,
    /// Página de origen (webpage_url del resolver).
    pub webpage_url: String,
    pub requested_by: UserId,
    pub enqueued_at: DateTime<Utc>,
    pub handle: SourceHandle,
}

impl MediaItem {
    pub fn new(
        title: impl Into<String>,
        webpage_url: impl Into<String>,
        requested_by: UserId,
        handle: SourceHandle,
    ) -> Self {
        Self {
            title: title.into(),
            duration: None,
            uploader: None,
            uploader_url: None,
            thumbnail: None,
            webpage_url: webpage_url.into(),
            requested_by,
            enqueued_at: Utc::now(),
            handle,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_uploader(
        mut self,
        uploader: impl Into<String>,
        uploader_url: Option<String>,
    ) -> Self {
        self.uploader = Some(uploader.into());
        self.uploader_url = uploader_url;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Duración legible para logs y listados ("3m 20s", o "?" si no se conoce).
    pub fn duration_display(&self) -> String {
        match self.duration {
            Some(duration) => humantime::format_duration(duration).to_string(),
            None => "?".to_string(),
        }
    }
}
