use clap::Parser;
use log::info;
use server::map;
use server::network::GameServer;
use std::path::Path;

/// Authoritative game server.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// TCP port to listen on
    #[clap(default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Warning: RUST_LOG environment variable not set. Set it to display logs!");
        eprintln!("Recommended: RUST_LOG=info cargo run");
    }

    let args = Args::parse();

    // A missing or malformed map is fatal before any connection is accepted.
    let map_objects = map::load_map(Path::new("map.json"))?;
    info!("Loaded map with {} objects", map_objects.len());

    let server = GameServer::bind(&format!("0.0.0.0:{}", args.port), map_objects).await?;
    server.run().await?;

    Ok(())
}
