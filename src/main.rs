//! Cardweb main entry point

use cardweb_api::start_server;
use cardweb_config::Config;
use cardweb_core::{EditorSession, TvStore};
use cardweb_services::PlexSearchClient;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "cardweb")]
#[command(author = "Cardweb Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight web interface for editing title card series configuration", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let rt = Runtime::new()?;

    rt.block_on(async {
        let config = Config::load(args.config.clone())
            .expect("Failed to load configuration");

        log::info!(
            "Config loaded: tv file={}, font directory={}",
            config.data.tv_file.display(),
            config.data.font_directory.display()
        );

        let store = Arc::new(TvStore::new(config.data.tv_file.clone()));
        let mut session = EditorSession::default();

        if config.data.tv_file.exists() {
            log::info!("Series file found, loading...");
            match store.load() {
                Ok(payload) => {
                    session.replace(payload);
                    log::info!("Loaded {} series entries", session.entries().len());
                }
                Err(e) => log::error!("Failed to load series file: {e}"),
            }
        } else {
            log::warn!("Series file not found: {}", config.data.tv_file.display());
        }

        let search = Arc::new(PlexSearchClient::new(config.plex.clone()));
        let session = Arc::new(RwLock::new(session));

        start_server(config, session, store, search).await
    });

    Ok(())
}
