//! # Shared Game Library
//!
//! Data structures, constants and the wire codec used by both the game
//! client and the authoritative server.
//!
//! The world is a fixed 500×500 field with Y growing upward. The server
//! simulates it on a fixed 20 ms tick and broadcasts a full snapshot to
//! every client each tick; clients send one command byte per keypress.
//! Both sides must agree on the constants and the byte layout defined
//! here, so they live in this crate rather than in either binary.

use std::time::Duration;

pub mod geometry;
pub mod protocol;

pub use geometry::{CollisionArea, CollisionBox, Vec2};
pub use protocol::{PlayerState, ProjectileState, Snapshot};

/// Horizontal extent of the playable field.
pub const FIELD_MAX_X: f64 = 500.0;

/// Vertical extent of the playable field.
pub const FIELD_MAX_Y: f64 = 500.0;

/// Fixed simulation period. One snapshot is broadcast per tick.
pub const TICK: Duration = Duration::from_millis(20);

/// Quadratic friction coefficient for the X axis.
pub const X_SLOW: f64 = 0.2;

/// Quadratic friction coefficient for the Y axis.
pub const Y_SLOW: f64 = 0.2;

/// Horizontal speed above which LEFT/RIGHT commands stop adding impulse.
///
/// The check is per-command: the command that pushes the speed past the
/// cap still applies, the next one does not.
pub const MAX_X_SPEED: f64 = 2.3;

/// Below this horizontal speed a grounded player snaps to a standstill.
pub const FRICTION_BOUNDARY: f64 = 0.7;

/// Horizontal impulse added by one LEFT/RIGHT command.
pub const PLAYER_X_SPEED_INC: f64 = 2.3;

/// Vertical impulse added by one UP/DOWN command.
pub const PLAYER_Y_SPEED_INC: f64 = 4.0;

/// Downward speed added to every player at the start of each tick.
pub const GRAVITY_SPEED_INC: f64 = 0.7;

/// Side length of a player's collision box.
pub const PLAYER_SIZE: f64 = 0.9;

/// Hit points a freshly spawned player starts with.
pub const PLAYER_START_HP: u32 = 5;

/// Side length of a projectile's collision box.
pub const PROJECTILE_SIZE: f64 = 1.0;

/// Glyph rendered for projectiles; transmitted as its code point.
pub const PROJECTILE_GLYPH: char = '•';

/// Projectiles travel at this multiple of the shooter's view direction.
pub const PROJECTILE_SPEED: f64 = 2.0;

/// Facing of a player; doubles as the aim for SHOOT.
///
/// Encoded on the wire as a `u32` (0=Up, 1=Down, 2=Left, 3=Right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn code(self) -> u32 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn from_code(code: u32) -> Option<Direction> {
        match code {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit vector pointing along this direction in world space (Y up).
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// A single client command, one byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Shoot,
}

impl Command {
    /// Decodes a command byte. Unknown bytes yield `None` and are ignored
    /// by the server.
    pub fn from_byte(byte: u8) -> Option<Command> {
        match byte {
            0x01 => Some(Command::Up),
            0x02 => Some(Command::Down),
            0x03 => Some(Command::Left),
            0x04 => Some(Command::Right),
            0x05 => Some(Command::Shoot),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Command::Up => 0x01,
            Command::Down => 0x02,
            Command::Left => 0x03,
            Command::Right => 0x04,
            Command::Shoot => 0x05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_byte_round_trip() {
        for cmd in [
            Command::Up,
            Command::Down,
            Command::Left,
            Command::Right,
            Command::Shoot,
        ] {
            assert_eq!(Command::from_byte(cmd.as_byte()), Some(cmd));
        }
    }

    #[test]
    fn test_unknown_command_bytes_ignored() {
        assert_eq!(Command::from_byte(0x00), None);
        assert_eq!(Command::from_byte(0x06), None);
        assert_eq!(Command::from_byte(0xff), None);
    }

    #[test]
    fn test_direction_codes() {
        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(Direction::from_code(dir.code()), Some(dir));
        }
        assert_eq!(Direction::from_code(4), None);
    }

    #[test]
    fn test_direction_vectors_are_unit() {
        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(dir.vector().length(), 1.0);
        }
    }
}
