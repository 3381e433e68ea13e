//! Binary wire protocol between server and client.
//!
//! All integers are big-endian. The server sends a 4-byte handshake
//! (the assigned player id) once per connection, then one snapshot per
//! simulation tick:
//!
//! ```text
//! u8   player_count
//! player_count × 20 bytes: u32 id, u32 direction, u32 x, u32 y, u32 hp
//! u8   projectile_count
//! projectile_count × 16 bytes: u32 id, u32 glyph, u32 x, u32 y
//! ```
//!
//! Positions are rounded to the nearest integer before transmission.
//! The single-byte counts cap a snapshot at 255 players and 255
//! projectiles; the encoder drops whole overflow records and never
//! truncates mid-record. The client sends one command byte per input
//! (see [`crate::Command`]); there is no framing in that direction.

use crate::Direction;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read};

/// Ceiling imposed by the single-byte record counts.
pub const MAX_RECORDS: usize = u8::MAX as usize;

/// One player record as it appears in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub id: u32,
    pub direction: Direction,
    pub x: u32,
    pub y: u32,
    pub hp: u32,
}

impl PlayerState {
    /// Encoded size of one record.
    pub const ENCODED_LEN: usize = 20;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.extend_from_slice(&self.direction.code().to_be_bytes());
        buf.extend_from_slice(&self.x.to_be_bytes());
        buf.extend_from_slice(&self.y.to_be_bytes());
        buf.extend_from_slice(&self.hp.to_be_bytes());
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<PlayerState> {
        let id = reader.read_u32::<BigEndian>()?;
        let code = reader.read_u32::<BigEndian>()?;
        let direction = Direction::from_code(code).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid view direction code {code}"),
            )
        })?;
        let x = reader.read_u32::<BigEndian>()?;
        let y = reader.read_u32::<BigEndian>()?;
        let hp = reader.read_u32::<BigEndian>()?;
        Ok(PlayerState {
            id,
            direction,
            x,
            y,
            hp,
        })
    }
}

/// One projectile record as it appears in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectileState {
    pub id: u32,
    pub glyph: char,
    pub x: u32,
    pub y: u32,
}

impl ProjectileState {
    /// Encoded size of one record.
    pub const ENCODED_LEN: usize = 16;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.extend_from_slice(&(self.glyph as u32).to_be_bytes());
        buf.extend_from_slice(&self.x.to_be_bytes());
        buf.extend_from_slice(&self.y.to_be_bytes());
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<ProjectileState> {
        let id = reader.read_u32::<BigEndian>()?;
        let code_point = reader.read_u32::<BigEndian>()?;
        let glyph = char::from_u32(code_point).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid glyph code point {code_point:#x}"),
            )
        })?;
        let x = reader.read_u32::<BigEndian>()?;
        let y = reader.read_u32::<BigEndian>()?;
        Ok(ProjectileState { id, glyph, x, y })
    }
}

/// Authoritative world state as broadcast at the end of a tick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub players: Vec<PlayerState>,
    pub projectiles: Vec<ProjectileState>,
}

impl Snapshot {
    /// Encodes the snapshot. Records beyond [`MAX_RECORDS`] per kind are
    /// dropped whole; callers that care should check before encoding.
    pub fn encode(&self) -> Vec<u8> {
        let players = &self.players[..self.players.len().min(MAX_RECORDS)];
        let projectiles = &self.projectiles[..self.projectiles.len().min(MAX_RECORDS)];

        let mut buf = Vec::with_capacity(
            2 + players.len() * PlayerState::ENCODED_LEN
                + projectiles.len() * ProjectileState::ENCODED_LEN,
        );

        buf.push(players.len() as u8);
        for player in players {
            player.encode_into(&mut buf);
        }
        buf.push(projectiles.len() as u8);
        for projectile in projectiles {
            projectile.encode_into(&mut buf);
        }
        buf
    }

    pub fn decode<R: Read>(reader: &mut R) -> io::Result<Snapshot> {
        let player_count = reader.read_u8()?;
        let mut players = Vec::with_capacity(player_count as usize);
        for _ in 0..player_count {
            players.push(PlayerState::read_from(reader)?);
        }

        let projectile_count = reader.read_u8()?;
        let mut projectiles = Vec::with_capacity(projectile_count as usize);
        for _ in 0..projectile_count {
            projectiles.push(ProjectileState::read_from(reader)?);
        }

        Ok(Snapshot {
            players,
            projectiles,
        })
    }
}

/// Encodes the once-per-connection handshake carrying the assigned id.
pub fn encode_handshake(player_id: u32) -> [u8; 4] {
    player_id.to_be_bytes()
}

pub fn read_handshake<R: Read>(reader: &mut R) -> io::Result<u32> {
    reader.read_u32::<BigEndian>()
}
