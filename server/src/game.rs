//! Authoritative world state and the per-tick simulation pass.

use crate::map::MapObject;
use crate::physics::{self, Collider, Hit};
use log::{debug, info};
use shared::{
    CollisionArea, CollisionBox, Command, Direction, PlayerState, ProjectileState, Snapshot, Vec2,
    FIELD_MAX_X, FRICTION_BOUNDARY, GRAVITY_SPEED_INC, MAX_X_SPEED, PLAYER_SIZE, PLAYER_START_HP,
    PLAYER_X_SPEED_INC, PLAYER_Y_SPEED_INC, PROJECTILE_GLYPH, PROJECTILE_SIZE, PROJECTILE_SPEED,
    X_SLOW, Y_SLOW,
};
use std::collections::HashMap;

/// A connected player's simulated body.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub position: Vec2,
    pub collision_area: CollisionArea,
    pub speed: Vec2,
    pub is_airborn: bool,
    pub view_direction: Direction,
    pub hp: u32,
}

impl Player {
    fn new(id: u32, position: Vec2) -> Self {
        Player {
            id,
            position,
            collision_area: CollisionArea::new(PLAYER_SIZE, PLAYER_SIZE),
            speed: Vec2::ZERO,
            is_airborn: false,
            view_direction: Direction::default(),
            hp: PLAYER_START_HP,
        }
    }

    pub fn collision_box(&self) -> CollisionBox {
        CollisionBox::from_area(self.position, self.collision_area, true)
    }
}

/// A projectile in flight. Removed on its first collision.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub glyph: char,
    pub position: Vec2,
    pub speed: Vec2,
    pub collision_area: CollisionArea,
}

impl Projectile {
    fn new(id: u32, position: Vec2, speed: Vec2) -> Self {
        Projectile {
            id,
            glyph: PROJECTILE_GLYPH,
            position,
            speed,
            collision_area: CollisionArea::new(PROJECTILE_SIZE, PROJECTILE_SIZE),
        }
    }

    pub fn collision_box(&self) -> CollisionBox {
        // Not rigid: players never collide against projectiles.
        CollisionBox::from_area(self.position, self.collision_area, false)
    }
}

/// One command pulled off the wire, tagged with its sender.
#[derive(Debug, Clone, Copy)]
pub struct QueuedCommand {
    pub player_id: u32,
    pub command: Command,
}

/// The authoritative world. Mutated only by the tick scheduler.
#[derive(Debug)]
pub struct GameState {
    pub players: HashMap<u32, Player>,
    pub projectiles: HashMap<u32, Projectile>,
    pub map_objects: Vec<MapObject>,
    next_player_id: u32,
    next_projectile_id: u32,
}

impl GameState {
    pub fn new(map_objects: Vec<MapObject>) -> Self {
        GameState {
            players: HashMap::new(),
            projectiles: HashMap::new(),
            map_objects,
            next_player_id: 1,
            next_projectile_id: 1,
        }
    }

    /// Adds a new player at a deterministic scatter position and returns
    /// its id. Ids are never reused within a server run.
    pub fn add_player(&mut self) -> u32 {
        let id = self.next_player_id;
        self.next_player_id += 1;

        let spawn_x = 10.0 + (id as f64 * 20.0) % (FIELD_MAX_X - 20.0);
        let player = Player::new(id, Vec2::new(spawn_x, 10.0));
        info!(
            "Added player {} at ({}, {})",
            id, player.position.x, player.position.y
        );
        self.players.insert(id, player);
        id
    }

    pub fn remove_player(&mut self, id: u32) -> bool {
        if self.players.remove(&id).is_some() {
            info!("Removed player {}", id);
            true
        } else {
            false
        }
    }

    /// Applies one command to its sender. Commands addressed to departed
    /// players are dropped.
    pub fn apply_command(&mut self, player_id: u32, command: Command) {
        let Some(player) = self.players.get_mut(&player_id) else {
            debug!("Dropping command for unknown player {}", player_id);
            return;
        };

        match command {
            Command::Up => {
                player.speed.y += PLAYER_Y_SPEED_INC;
                player.view_direction = Direction::Up;
            }
            Command::Down => {
                player.speed.y -= PLAYER_Y_SPEED_INC;
                player.view_direction = Direction::Down;
            }
            Command::Left => {
                if player.speed.x >= -MAX_X_SPEED {
                    player.speed.x -= PLAYER_X_SPEED_INC;
                }
                player.view_direction = Direction::Left;
            }
            Command::Right => {
                if player.speed.x <= MAX_X_SPEED {
                    player.speed.x += PLAYER_X_SPEED_INC;
                }
                player.view_direction = Direction::Right;
            }
            Command::Shoot => {
                let direction = player.view_direction.vector();
                let position = player.position + direction;
                let id = self.next_projectile_id;
                self.next_projectile_id += 1;
                self.projectiles
                    .insert(id, Projectile::new(id, position, direction * PROJECTILE_SPEED));
            }
        }
    }

    /// Advances the world by one tick: apply `commands` in receipt order,
    /// integrate players, then projectiles. Returns the ids of players
    /// removed this tick so their connections can be torn down.
    pub fn step<I>(&mut self, commands: I) -> Vec<u32>
    where
        I: IntoIterator<Item = QueuedCommand>,
    {
        for queued in commands {
            self.apply_command(queued.player_id, queued.command);
        }

        let mut removed = self.integrate_players();
        removed.extend(self.integrate_projectiles());
        removed
    }

    /// Colliders every moving object is tested against: rigid map objects
    /// plus all live players except `exclude`.
    fn colliders(&self, exclude: Option<u32>) -> Vec<Collider> {
        let mut colliders: Vec<Collider> = self
            .map_objects
            .iter()
            .map(|object| Collider {
                bounds: object.collision_box(),
                hit: Hit::Obstacle,
            })
            .collect();

        colliders.extend(
            self.players
                .values()
                .filter(|player| Some(player.id) != exclude)
                .map(|player| Collider {
                    bounds: player.collision_box(),
                    hit: Hit::Player(player.id),
                }),
        );
        colliders
    }

    fn integrate_players(&mut self) -> Vec<u32> {
        let mut dead = Vec::new();
        let ids: Vec<u32> = self.players.keys().copied().collect();

        for id in ids {
            let Some(player) = self.players.get(&id) else {
                continue;
            };

            let mut speed = player.speed;
            speed.y -= GRAVITY_SPEED_INC;

            let colliders = self.colliders(Some(id));
            let motion = physics::integrate(player.collision_box(), speed, &colliders);
            let landed = CollisionBox::from_area(motion.position, player.collision_area, true);
            let airborne = !physics::grounded(landed, &colliders);

            if let Some(player) = self.players.get_mut(&id) {
                player.position = motion.position;
                player.speed = motion.speed;
                player.is_airborn = airborne;

                if player.hp == 0 {
                    dead.push(id);
                } else {
                    player.speed = apply_friction(player.speed, airborne);
                }
            }
        }

        for &id in &dead {
            self.remove_player(id);
        }
        dead
    }

    fn integrate_projectiles(&mut self) -> Vec<u32> {
        let mut killed = Vec::new();
        let ids: Vec<u32> = self.projectiles.keys().copied().collect();

        for id in ids {
            let Some(projectile) = self.projectiles.get(&id) else {
                continue;
            };

            let colliders = self.colliders(None);
            let motion =
                physics::integrate(projectile.collision_box(), projectile.speed, &colliders);

            match motion.hit {
                Some(hit) => {
                    if let Hit::Player(target) = hit {
                        if let Some(death) = self.damage_player(target) {
                            killed.push(death);
                        }
                    }
                    self.projectiles.remove(&id);
                }
                None => {
                    if let Some(projectile) = self.projectiles.get_mut(&id) {
                        projectile.position = motion.position;
                        projectile.speed = motion.speed;
                    }
                }
            }
        }
        killed
    }

    /// Decrements a player's hit points; a player reaching zero is removed
    /// in the same tick. Returns the id when that happens.
    fn damage_player(&mut self, id: u32) -> Option<u32> {
        let player = self.players.get_mut(&id)?;
        player.hp = player.hp.saturating_sub(1);
        debug!("Player {} hit, hp now {}", id, player.hp);

        if player.hp == 0 {
            self.remove_player(id);
            Some(id)
        } else {
            None
        }
    }

    /// Extracts the wire-format view of the world, positions rounded to
    /// the nearest integer. Record order follows ascending ids.
    pub fn snapshot(&self) -> Snapshot {
        let mut players: Vec<PlayerState> = self
            .players
            .values()
            .map(|player| PlayerState {
                id: player.id,
                direction: player.view_direction,
                x: player.position.x.round() as u32,
                y: player.position.y.round() as u32,
                hp: player.hp,
            })
            .collect();
        players.sort_by_key(|state| state.id);

        let mut projectiles: Vec<ProjectileState> = self
            .projectiles
            .values()
            .map(|projectile| ProjectileState {
                id: projectile.id,
                glyph: projectile.glyph,
                x: projectile.position.x.round() as u32,
                y: projectile.position.y.round() as u32,
            })
            .collect();
        projectiles.sort_by_key(|state| state.id);

        Snapshot {
            players,
            projectiles,
        }
    }
}

/// Quadratic friction, each axis independent. Grounded players below the
/// friction boundary snap to a horizontal standstill.
fn apply_friction(speed: Vec2, airborne: bool) -> Vec2 {
    let x = if speed.x.abs() < FRICTION_BOUNDARY && !airborne {
        0.0
    } else {
        speed.x - speed.x.signum() * speed.x * speed.x * X_SLOW
    };
    let y = speed.y - speed.y.signum() * speed.y * speed.y * Y_SLOW;
    Vec2::new(x, y)
}
