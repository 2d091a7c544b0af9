use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_app::Services;
use folio_kernel::settings::Settings;

/// Folio books catalog and ordering service
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Override the catalog file from configuration
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Override the orders file from configuration
    #[arg(long, global = true)]
    orders: Option<PathBuf>,

    /// Override the API clients file from configuration
    #[arg(long, global = true)]
    clients: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the listen port from configuration
        #[arg(long)]
        port: Option<u16>,
    },
    /// Load every data file and print its record count
    Check,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(path) = &self.catalog {
            settings.storage.catalog_path = path.clone();
        }
        if let Some(path) = &self.orders {
            settings.storage.orders_path = path.clone();
        }
        if let Some(path) = &self.clients {
            settings.storage.clients_path = path.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load folio settings")?;
    cli.apply(&mut settings);
    folio_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            tracing::info!(env = ?settings.environment, "folio serve");
            folio_app::run(settings).await
        }
        Command::Check => {
            let services = Services::from_storage(&settings.storage).await?;
            let report = services.report().await?;
            println!("books:   {}", report.books);
            println!("clients: {}", report.clients);
            println!("orders:  {}", report.orders);
            Ok(())
        }
    }
}
