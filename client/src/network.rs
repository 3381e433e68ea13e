//! Protocol connection to the game server.

use log::info;
use shared::protocol::{PlayerState, ProjectileState};
use shared::{Command, Snapshot};
use std::io::{self, Cursor};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// A freshly established connection, handshake already consumed.
pub struct Connection {
    player_id: u32,
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
}

impl Connection {
    /// Dials `addr` (`host:port`) and reads the 4-byte handshake carrying
    /// the id the server assigned to this client.
    pub async fn connect(addr: &str) -> io::Result<Connection> {
        let stream = TcpStream::connect(addr).await?;
        let (mut reader, writer) = stream.into_split();

        let mut handshake = [0u8; 4];
        reader.read_exact(&mut handshake).await?;
        let player_id = u32::from_be_bytes(handshake);
        info!("Connected as player {}", player_id);

        Ok(Connection {
            player_id,
            reader,
            writer,
        })
    }

    pub fn player_id(&self) -> u32 {
        self.player_id
    }

    /// Splits into the two independently owned directions.
    pub fn into_split(self) -> (SnapshotStream, CommandSink) {
        (
            SnapshotStream {
                reader: self.reader,
            },
            CommandSink {
                writer: self.writer,
            },
        )
    }
}

/// Server → client direction: one snapshot per server tick.
pub struct SnapshotStream {
    reader: OwnedReadHalf,
}

impl SnapshotStream {
    /// Reads the next snapshot: two count-prefixed record runs.
    pub async fn next(&mut self) -> io::Result<Snapshot> {
        let player_count = self.reader.read_u8().await? as usize;
        let mut buf = vec![0u8; player_count * PlayerState::ENCODED_LEN];
        self.reader.read_exact(&mut buf).await?;
        let mut records = Cursor::new(&buf[..]);
        let mut players = Vec::with_capacity(player_count);
        for _ in 0..player_count {
            players.push(PlayerState::read_from(&mut records)?);
        }

        let projectile_count = self.reader.read_u8().await? as usize;
        let mut buf = vec![0u8; projectile_count * ProjectileState::ENCODED_LEN];
        self.reader.read_exact(&mut buf).await?;
        let mut records = Cursor::new(&buf[..]);
        let mut projectiles = Vec::with_capacity(projectile_count);
        for _ in 0..projectile_count {
            projectiles.push(ProjectileState::read_from(&mut records)?);
        }

        Ok(Snapshot {
            players,
            projectiles,
        })
    }
}

/// Client → server direction: one byte per command.
pub struct CommandSink {
    writer: OwnedWriteHalf,
}

impl CommandSink {
    pub async fn send(&mut self, command: Command) -> io::Result<()> {
        self.writer.write_all(&[command.as_byte()]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::encode_handshake;
    use shared::Direction;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_reads_handshake_and_snapshots() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let snapshot = Snapshot {
            players: vec![PlayerState {
                id: 7,
                direction: Direction::Left,
                x: 12,
                y: 34,
                hp: 5,
            }],
            projectiles: vec![ProjectileState {
                id: 1,
                glyph: '•',
                x: 11,
                y: 34,
            }],
        };

        let served = snapshot.clone();
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(&encode_handshake(7)).await.unwrap();
            stream.write_all(&served.encode()).await.unwrap();

            // Expect exactly one command byte back.
            let mut byte = [0u8; 1];
            stream.read_exact(&mut byte).await.unwrap();
            byte[0]
        });

        let connection = Connection::connect(&addr.to_string()).await.unwrap();
        assert_eq!(connection.player_id(), 7);

        let (mut snapshots, mut commands) = connection.into_split();
        let received = snapshots.next().await.unwrap();
        assert_eq!(received, snapshot);

        commands.send(Command::Shoot).await.unwrap();
        assert_eq!(server.await.unwrap(), Command::Shoot.as_byte());
    }

    #[tokio::test]
    async fn test_empty_snapshot() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(&encode_handshake(1)).await.unwrap();
            stream.write_all(&Snapshot::default().encode()).await.unwrap();
        });

        let connection = Connection::connect(&addr.to_string()).await.unwrap();
        let (mut snapshots, _commands) = connection.into_split();
        let received = snapshots.next().await.unwrap();
        assert!(received.players.is_empty());
        assert!(received.projectiles.is_empty());
    }
}
