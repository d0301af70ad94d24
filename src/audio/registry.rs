use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use serenity::model::id::GuildId;
use tracing::{debug, info};

use crate::audio::player::{Player, PlayerState, TeardownFn};

/// Mapa guild → player. A lo sumo un player vivo por guild.
///
/// Get-or-create and remove for one key run under the same dashmap shard
/// lock, so concurrent creation requests yield exactly one instance and a
/// racing remove can never leave two players alive for one guild.
pub struct PlayerRegistry {
    players: DashMap<GuildId, Arc<Player>>,
}

impl PlayerRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            players: DashMap::new(),
        })
    }

    /// Devuelve el player del guild, o lo construye atómicamente.
    ///
    /// The factory runs inside the key's critical section. A leftover
    /// destroyed player (its teardown not yet deregistered) is replaced,
    /// never reused.
    pub fn get_or_create<F>(&self, guild_id: GuildId, factory: F) -> Arc<Player>
    where
        F: FnOnce() -> Arc<Player>,
    {
        match self.players.entry(guild_id) {
            Entry::Occupied(mut entry) => {
                if entry.get().state() == PlayerState::Destroyed {
                    debug!("player destruido del guild {} reemplazado", guild_id);
                    entry.insert(factory());
                }
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                info!("🆕 creando player para el guild {}", guild_id);
                entry.insert(factory()).clone()
            }
        }
    }

    pub fn get(&self, guild_id: GuildId) -> Option<Arc<Player>> {
        self.players.get(&guild_id).map(|entry| entry.clone())
    }

    /// Saca el mapping; no-op si no existe.
    pub fn remove(&self, guild_id: GuildId) -> Option<Arc<Player>> {
        let removed = self.players.remove(&guild_id).map(|(_, player)| player);
        if removed.is_some() {
            debug!("player del guild {} desregistrado", guild_id);
        }
        removed
    }

    /// Callback de desregistro para inyectar en los players que este
    /// registro crea.
    ///
    /// Holds a weak reference, so the registry can drop while loops are
    /// still winding down. The removal is conditional on the mapped
    /// player being destroyed: a dying player whose entry was already
    /// replaced by `get_or_create` must not deregister its live
    /// replacement.
    pub fn teardown_handle(self: &Arc<Self>) -> TeardownFn {
        let registry = Arc::downgrade(self);
        Arc::new(move |guild_id: GuildId| {
            if let Some(registry) = registry.upgrade() {
                let removed = registry
                    .players
                    .remove_if(&guild_id, |_, player| {
                        player.state() == PlayerState::Destroyed
                    })
                    .is_some();
                if removed {
                    debug!("player del guild {} desregistrado", guild_id);
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
