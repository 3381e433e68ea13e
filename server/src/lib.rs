//! # Game Server Library
//!
//! Authoritative simulation for the multiplayer arena. The server owns the
//! canonical world: it accepts TCP connections, queues one-byte client
//! commands, advances the world on a fixed 20 ms tick and broadcasts a
//! full snapshot to every connected client after each tick.
//!
//! ## Module Organization
//!
//! - [`map`]: obstacle definitions, `map.json` loading and the implicit
//!   boundary walls around the field.
//! - [`physics`]: the sub-step motion integrator with axis-zeroing
//!   collision response.
//! - [`game`]: world state (players, projectiles, obstacles), command
//!   application and the per-tick simulation pass.
//! - [`network`]: listener, per-connection reader/writer tasks, the tick
//!   scheduler and snapshot fan-out.
//!
//! ## Concurrency Model
//!
//! The simulation is single-writer: only the tick scheduler mutates world
//! state. Connection registration, teardown and command enqueueing share
//! one mutex with the scheduler, held only long enough to touch the maps
//! and never across stream I/O. Each connection gets a reader task
//! (socket → command queue) and a writer task (bounded snapshot channel →
//! socket); a transport error on either side tears down just that
//! connection.

pub mod game;
pub mod map;
pub mod network;
pub mod physics;
