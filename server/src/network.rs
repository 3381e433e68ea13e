//! Listener, per-connection tasks and the tick scheduler.
//!
//! One mutex guards the whole shared world: game state, the connection
//! registry and the command queue. Reader tasks append commands under it,
//! the scheduler drains them, registration and teardown mutate the maps
//! under it. Nothing holds it across stream I/O; snapshots leave the
//! scheduler through bounded per-connection channels and are written to
//! the sockets by dedicated writer tasks.

use crate::game::{GameState, QueuedCommand};
use crate::map::MapObject;
use log::{debug, info, warn};
use shared::protocol::{self, MAX_RECORDS};
use shared::{Command, TICK};
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;
use tokio::time::{self, interval, MissedTickBehavior};

/// Everything behind the registration mutex.
struct World {
    game: GameState,
    conns: HashMap<u32, mpsc::Sender<Vec<u8>>>,
    commands: Vec<QueuedCommand>,
}

/// The listening server: accepts connections and drives the tick loop.
pub struct GameServer {
    listener: TcpListener,
    world: Arc<Mutex<World>>,
}

impl GameServer {
    /// Binds the listener and wraps the initial world state.
    pub async fn bind(addr: &str, map_objects: Vec<MapObject>) -> io::Result<GameServer> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", addr);

        Ok(GameServer {
            listener,
            world: Arc::new(Mutex::new(World {
                game: GameState::new(map_objects),
                conns: HashMap::new(),
                commands: Vec::new(),
            })),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs forever: spawns the tick scheduler, then accepts connections,
    /// one reader/writer task pair each.
    pub async fn run(self) -> io::Result<()> {
        let world = Arc::clone(&self.world);
        tokio::spawn(run_tick_loop(world));

        loop {
            let (stream, addr) = self.listener.accept().await?;
            info!("New connection from {}", addr);
            let world = Arc::clone(&self.world);
            tokio::spawn(handle_connection(stream, world));
        }
    }
}

/// The single world mutator. Fixed 20 ms cadence; an overrunning tick
/// delays the next one instead of bursting to catch up.
async fn run_tick_loop(world: Arc<Mutex<World>>) {
    let mut ticker = interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let mut world = world.lock().await;

        let commands = std::mem::take(&mut world.commands);
        for id in world.game.step(commands) {
            // Died this tick; closing the channel ends its writer task.
            world.conns.remove(&id);
        }

        let snapshot = world.game.snapshot();
        if snapshot.players.len() > MAX_RECORDS || snapshot.projectiles.len() > MAX_RECORDS {
            warn!(
                "Snapshot overflow: {} players / {} projectiles, dropping records beyond {}",
                snapshot.players.len(),
                snapshot.projectiles.len(),
                MAX_RECORDS
            );
        }
        let encoded = snapshot.encode();

        let mut stale = Vec::new();
        for (&id, sender) in &world.conns {
            match sender.try_send(encoded.clone()) {
                Ok(()) => {}
                // Writer still busy with the previous snapshot: the slow
                // client skips this tick.
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Closed(_)) => stale.push(id),
            }
        }
        for id in stale {
            world.conns.remove(&id);
            world.game.remove_player(id);
        }
    }
}

/// Registers a player, performs the handshake, then splits the stream
/// into a writer task and the reader loop.
async fn handle_connection(mut stream: TcpStream, world: Arc<Mutex<World>>) {
    let (sender, mut receiver) = mpsc::channel::<Vec<u8>>(1);

    let player_id = {
        let mut world = world.lock().await;
        let id = world.game.add_player();
        world.conns.insert(id, sender);
        id
    };

    if let Err(e) = stream
        .write_all(&protocol::encode_handshake(player_id))
        .await
    {
        warn!("Handshake to player {} failed: {}", player_id, e);
        disconnect(&world, player_id).await;
        return;
    }

    let (mut reader, mut writer) = stream.into_split();

    let writer_world = Arc::clone(&world);
    tokio::spawn(async move {
        while let Some(frame) = receiver.recv().await {
            if let Err(e) = writer.write_all(&frame).await {
                debug!("Write to player {} failed: {}", player_id, e);
                disconnect(&writer_world, player_id).await;
                break;
            }
        }
    });

    loop {
        match reader.read_u8().await {
            Ok(byte) => {
                // Unknown bytes are silently ignored.
                if let Some(command) = Command::from_byte(byte) {
                    let mut world = world.lock().await;
                    if !world.conns.contains_key(&player_id) {
                        break; // torn down elsewhere
                    }
                    world.commands.push(QueuedCommand { player_id, command });
                }
            }
            // EOF means no command this turn; a half-closed stream can
            // still receive snapshots, so keep the connection. EOF
            // re-reports immediately, so pace the retries to the tick.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                if !world.lock().await.conns.contains_key(&player_id) {
                    break;
                }
                time::sleep(TICK).await;
            }
            Err(e) => {
                debug!("Read from player {} ended: {}", player_id, e);
                break;
            }
        }
    }

    disconnect(&world, player_id).await;
}

/// Idempotent teardown: drops the player and its snapshot channel.
async fn disconnect(world: &Arc<Mutex<World>>, player_id: u32) {
    let mut world = world.lock().await;
    world.conns.remove(&player_id);
    world.game.remove_player(player_id);
}
