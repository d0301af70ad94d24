//! # Audio Module
//!
//! Per-guild playback scheduling core.
//!
//! This module provides the playback machinery of the bot:
//! - Ordered per-guild queues of resolved media items
//! - A per-guild player loop that never overlaps two plays
//! - Cross-thread bridging of the transport's completion callback
//! - Tracked background tasks and race-free player registration
//!
//! ## Architecture
//!
//! The scheduler is built around six pieces, leaf first:
//!
//! ### [`item`] - Media Items
//! - Resolved, playable units with their metadata
//! - Opaque source handles the transport downcasts back
//!
//! ### [`queue`] - Playback Queue
//! - Strict FIFO, unbounded, one producer / one consumer
//! - Suspending dequeue and non-destructive snapshots
//!
//! ### [`signal`] - Completion Signal
//! - Single-slot, thread-safe "this play finished" bridge
//! - Idempotent per play, cleared atomically on consumption
//!
//! ### [`tasks`] - Task Registry
//! - Owns every background task a player spawns
//! - Guarantees nothing outlives guild teardown
//!
//! ### [`player`] - Player Loop
//! - The per-guild state machine consuming the queue
//! - Idle-timeout self-destruction and explicit stop
//!
//! ### [`registry`] - Player Registry
//! - Atomic guild → player get-or-create and remove
//!
//! The voice connection itself, outward status messages and presence
//! updates live behind the collaborator traits in [`transport`].

pub mod item;
pub mod player;
pub mod queue;
pub mod registry;
pub mod signal;
pub mod tasks;
pub mod transport;
