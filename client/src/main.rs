use clap::Parser;
use client::game::ClientGame;
use client::input::{self, InputAction};
use client::network::Connection;
use client::rendering::Renderer;
use log::debug;
use tokio::sync::mpsc;

/// Terminal client for the game server.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server address as host:port
    #[clap(default_value = "localhost:8000")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let connection = Connection::connect(&args.addr).await?;
    let player_id = connection.player_id();
    let (mut snapshots, mut commands) = connection.into_split();

    // Snapshots decode on their own task so a mid-frame read never races
    // the input arm of the select below.
    let (snapshot_tx, mut snapshot_rx) = mpsc::channel(1);
    tokio::spawn(async move {
        loop {
            match snapshots.next().await {
                Ok(snapshot) => {
                    if snapshot_tx.send(snapshot).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!("Snapshot stream ended: {}", e);
                    break;
                }
            }
        }
    });

    let mut game = ClientGame::new(player_id);
    let mut renderer = Renderer::new()?;
    let mut input_rx = input::spawn_input_thread();

    loop {
        tokio::select! {
            snapshot = snapshot_rx.recv() => {
                let Some(snapshot) = snapshot else {
                    break; // server went away
                };
                game.apply_snapshot(snapshot);
                let (width, height) = renderer.frame_size()?;
                let rows = game.compose_frame(width, height);
                renderer.draw(&rows, &game.status_line())?;
            }
            action = input_rx.recv() => match action {
                Some(InputAction::Command(command)) => commands.send(command).await?,
                Some(InputAction::Quit) | None => break,
            }
        }
    }

    Ok(())
}
