//! # Game Client Library
//!
//! Thin protocol client for the arena server. The load-bearing part is
//! [`network`]: the 4-byte handshake, the per-tick snapshot decoding and
//! the one-byte command writes. On top of that sits a small terminal
//! view: [`game`] keeps the latest authoritative snapshot and composes a
//! text frame, [`rendering`] pushes frames to the terminal via crossterm,
//! and [`input`] turns keypresses into commands on a background thread.
//!
//! The client predicts nothing and reconciles nothing; it renders exactly
//! what the server last said. World space has Y growing upward, so the
//! frame composer emits rows top-down in reverse world order.

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
