use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serenity::model::id::{ChannelId, GuildId};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    audio::{
        item::MediaItem,
        queue::PlaybackQueue,
        signal::CompletionSignal,
        tasks::TaskRegistry,
        transport::{NotificationSink, OnComplete, PresenceSink, VoiceTransport},
    },
    config::SchedulerConfig,
    error::{PlayerError, TransportError},
};

/// Callback de desregistro inyectado al crear el player.
///
/// Runs once, when the loop exits; the registry hands one out so a dying
/// player removes its own mapping without holding a back-pointer.
pub type TeardownFn = Arc<dyn Fn(GuildId) + Send + Sync>;

/// Estado observable del loop del player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Esperando el próximo item (con timeout de inactividad).
    WaitQueue,
    /// Arrancando la reproducción de un item.
    Playing,
    /// Item en vuelo, esperando el callback de fin.
    WaitCompletion,
    /// Terminal: el loop salió y el player no se reutiliza.
    Destroyed,
}

/// Player de un guild: consume su cola en orden y maneja una sola
/// reproducción en vuelo a la vez.
///
/// Created through [`PlayerRegistry`](crate::audio::registry::PlayerRegistry)
/// on the first playback request; destroys itself after
/// `idle_timeout` of empty queue, on explicit [`destroy`](Self::destroy),
/// or when the transport has no connection to play over.
pub struct Player {
    guild_id: GuildId,
    queue: PlaybackQueue,
    signal: Arc<CompletionSignal>,
    transport: Arc<dyn VoiceTransport>,
    notifications: Arc<dyn NotificationSink>,
    presence: Arc<dyn PresenceSink>,
    tasks: TaskRegistry,
    teardown: TeardownFn,
    idle_timeout: Duration,
    now_playing_debounce: Duration,
    state: Mutex<PlayerState>,
    channel: Mutex<Option<ChannelId>>,
    current: Mutex<Option<MediaItem>>,
    shutdown: CancellationToken,
    done: CancellationToken,
}

impl Player {
    /// Construye el player y lanza su loop como tarea propia.
    pub fn spawn(
        guild_id: GuildId,
        config: &SchedulerConfig,
        transport: Arc<dyn VoiceTransport>,
        notifications: Arc<dyn NotificationSink>,
        presence: Arc<dyn PresenceSink>,
        teardown: TeardownFn,
    ) -> Arc<Self> {
        let player = Arc::new(Self {
            guild_id,
            queue: PlaybackQueue::new(),
            signal: Arc::new(CompletionSignal::new()),
            transport,
            notifications,
            presence,
            tasks: TaskRegistry::new(),
            teardown,
            idle_timeout: config.idle_timeout(),
            now_playing_debounce: config.now_playing_debounce(),
            state: Mutex::new(PlayerState::WaitQueue),
            channel: Mutex::new(None),
            current: Mutex::new(None),
            shutdown: CancellationToken::new(),
            done: CancellationToken::new(),
        });

        let looped = player.clone();
        tokio::spawn(async move { looped.run().await });

        player
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn state(&self) -> PlayerState {
        *self.state.lock()
    }

    /// Canal de voz registrado por el último `connect`, si hubo.
    pub fn channel(&self) -> Option<ChannelId> {
        *self.channel.lock()
    }

    /// Item actualmente en vuelo, si hay.
    pub fn now_playing(&self) -> Option<MediaItem> {
        self.current.lock().clone()
    }

    /// Encola un item ya resuelto. Nunca bloquea.
    ///
    /// A destroyed player drops the item; the caller gets a fresh player
    /// from the registry instead.
    pub fn enqueue(&self, item: MediaItem) {
        if self.state() == PlayerState::Destroyed {
            warn!(
                "player del guild {} ya destruido, {} descartado",
                self.guild_id, item.title
            );
            return;
        }
        info!(
            "➕ {} en cola del guild {} (pedido por {})",
            item.title, self.guild_id, item.requested_by
        );
        self.queue.enqueue(item);
    }

    /// Listado no destructivo de la cola pendiente.
    pub fn queue_snapshot(&self) -> Vec<MediaItem> {
        self.queue.snapshot()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Conecta (o mueve) el transporte al canal dado.
    ///
    /// Connection errors propagate to the caller; queue and loop state
    /// are unaffected by a failed connect.
    pub async fn connect(&self, channel: ChannelId) -> Result<(), PlayerError> {
        if self.state() == PlayerState::Destroyed {
            return Err(PlayerError::Destroyed(self.guild_id));
        }
        self.transport.connect(channel).await?;
        *self.channel.lock() = Some(channel);
        info!("📻 guild {} conectado al canal {}", self.guild_id, channel);
        Ok(())
    }

    /// Salta el item en vuelo deteniéndolo en el transporte.
    ///
    /// Advancement still happens through the normal completion path, so
    /// the no-overlap invariant holds.
    pub async fn skip(&self) -> Result<(), PlayerError> {
        self.transport.stop().await?;
        Ok(())
    }

    /// Pausa el item en vuelo (sigue contando como en vuelo).
    pub async fn pause(&self) -> Result<(), PlayerError> {
        self.transport.pause().await?;
        Ok(())
    }

    /// Reanuda un item pausado.
    pub async fn resume(&self) -> Result<(), PlayerError> {
        self.transport.resume().await?;
        Ok(())
    }

    /// Destrucción explícita (comando stop).
    ///
    /// Cancels the loop and stops the in-flight item through the
    /// transport, so a play in progress still winds down via its own
    /// completion instead of being killed mid-transition. Idempotent.
    pub async fn destroy(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        info!("⏹️ destrucción pedida para el player del guild {}", self.guild_id);
        self.shutdown.cancel();
        if let Err(e) = self.transport.stop().await {
            debug!("stop durante destroy falló (ignorado): {}", e);
        }
    }

    /// Se resuelve cuando el loop terminó su teardown por completo.
    pub async fn until_destroyed(&self) {
        self.done.cancelled().await;
    }

    fn set_state(&self, state: PlayerState) {
        *self.state.lock() = state;
    }

    fn completion_callback(&self) -> OnComplete {
        let signal = self.signal.clone();
        let guild_id = self.guild_id;
        Arc::new(move |error: Option<TransportError>| {
            if let Some(ref e) = error {
                warn!("⚠️ reproducción en guild {} terminó con error: {}", guild_id, e);
            }
            signal.signal(error);
        })
    }

    /// Loop principal: WAIT_QUEUE → PLAYING → WAIT_COMPLETION → WAIT_QUEUE,
    /// hasta timeout de inactividad o destrucción explícita.
    async fn run(self: Arc<Self>) {
        info!("🎧 player del guild {} arrancado", self.guild_id);

        loop {
            // señales viejas de la reproducción anterior se descartan acá
            self.signal.reset();
            self.set_state(PlayerState::WaitQueue);

            let item = tokio::select! {
                // el shutdown gana siempre, aunque la cola tenga items listos
                biased;
                _ = self.shutdown.cancelled() => break,
                dequeued = time::timeout(self.idle_timeout, self.queue.dequeue()) => {
                    match dequeued {
                        Ok(item) => item,
                        Err(_) => {
                            info!(
                                "💤 guild {} inactivo por {}, cerrando player",
                                self.guild_id,
                                humantime::format_duration(self.idle_timeout)
                            );
                            break;
                        }
                    }
                }
            };

            self.set_state(PlayerState::Playing);
            *self.current.lock() = Some(item.clone());

            if let Err(e) = self.transport.play(&item, self.completion_callback()).await {
                *self.current.lock() = None;
                match e {
                    TransportError::NotConnected => {
                        warn!(
                            "🔌 guild {} sin conexión de voz, cerrando player",
                            self.guild_id
                        );
                        break;
                    }
                    other => {
                        // sin reintento: se loguea y sigue el próximo item
                        warn!(
                            "⚠️ no se pudo arrancar {} en guild {}: {}",
                            item.title, self.guild_id, other
                        );
                        continue;
                    }
                }
            }

            info!(
                "🎵 reproduciendo {} ({}) en guild {}",
                item.title,
                item.duration_display(),
                self.guild_id
            );

            if !self.now_playing_debounce.is_zero() {
                time::sleep(self.now_playing_debounce).await;
            }
            self.notifications.now_playing(&item).await;
            self.presence.set_listening(&item).await;

            self.set_state(PlayerState::WaitCompletion);
            let playback_error = self.signal.wait().await;

            if let Some(error) = playback_error {
                self.notifications.playback_error(&item, &error).await;
                let presence = self.presence.clone();
                self.tasks.spawn(async move { presence.clear().await });
            }

            if let Err(e) = self.transport.release(&item).await {
                warn!(
                    "🧹 no se pudieron liberar los recursos de {}: {}",
                    item.title, e
                );
            }
            *self.current.lock() = None;
        }

        self.teardown_inner().await;
    }

    /// Salida única del loop: desconecta, desregistra y corta las tareas.
    async fn teardown_inner(&self) {
        self.set_state(PlayerState::Destroyed);
        *self.current.lock() = None;

        if let Err(e) = self.transport.disconnect().await {
            warn!("error desconectando el transporte del guild {}: {}", self.guild_id, e);
        }
        self.presence.clear().await;

        (self.teardown)(self.guild_id);
        self.tasks.cancel_all().await;

        info!("🛑 player del guild {} destruido", self.guild_id);
        self.done.cancel();
    }
}
