//! Client-side view of the authoritative world.

use shared::{Direction, PlayerState, Snapshot, FIELD_MAX_X, FIELD_MAX_Y};
use std::collections::HashMap;

/// Glyph a player renders as; doubles as a facing indicator.
pub fn direction_glyph(direction: Direction) -> char {
    match direction {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

/// Holds the latest snapshot and composes terminal frames from it.
pub struct ClientGame {
    player_id: u32,
    snapshot: Snapshot,
}

impl ClientGame {
    pub fn new(player_id: u32) -> Self {
        ClientGame {
            player_id,
            snapshot: Snapshot::default(),
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
    }

    /// This client's own record in the latest snapshot, if still alive.
    pub fn me(&self) -> Option<&PlayerState> {
        self.snapshot
            .players
            .iter()
            .find(|player| player.id == self.player_id)
    }

    pub fn status_line(&self) -> String {
        match self.me() {
            Some(me) => format!(
                "player {}  hp {}  pos ({}, {})  [q] quit",
                me.id, me.hp, me.x, me.y
            ),
            None => format!("player {}  (gone)  [q] quit", self.player_id),
        }
    }

    /// Composes a `width`×`height` viewport centred on this player (field
    /// centre when the player is gone). World Y grows upward, terminal
    /// rows grow downward, so rows come out in reverse world order.
    pub fn compose_frame(&self, width: u16, height: u16) -> Vec<String> {
        let (center_x, center_y) = match self.me() {
            Some(me) => (me.x as i64, me.y as i64),
            None => ((FIELD_MAX_X / 2.0) as i64, (FIELD_MAX_Y / 2.0) as i64),
        };

        let width = width as i64;
        let height = height as i64;
        let left = center_x - width / 2;
        let top = center_y + height / 2;

        let mut cells: HashMap<(i64, i64), char> = HashMap::new();
        for projectile in &self.snapshot.projectiles {
            cells.insert((projectile.x as i64, projectile.y as i64), projectile.glyph);
        }
        // Players draw over projectiles sharing a cell.
        for player in &self.snapshot.players {
            cells.insert(
                (player.x as i64, player.y as i64),
                direction_glyph(player.direction),
            );
        }

        (0..height)
            .map(|row| {
                let y = top - row;
                (0..width)
                    .map(|col| {
                        let x = left + col;
                        cells.get(&(x, y)).copied().unwrap_or_else(|| {
                            let in_field = (0..FIELD_MAX_X as i64).contains(&x)
                                && (0..FIELD_MAX_Y as i64).contains(&y);
                            if in_field {
                                '.'
                            } else {
                                ' '
                            }
                        })
                    })
                    .collect()
            })
            .collect()
    }
}
