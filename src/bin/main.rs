use clap::Parser;
use moviedb_rs::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG: &str = "moviedb-server.yaml";

#[derive(Parser, Debug)]
#[command(name = "moviedb-server")]
#[command(about = "Read-only JSON API over a SQLite movies table", long_about = None)]
struct Args {
    /// Config file; when omitted, moviedb-server.yaml is used if present
    #[arg(short, long)]
    config: Option<String>,

    /// Listen port, overrides the config file and $PORT
    #[arg(short, long)]
    port: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "moviedb_rs=info,moviedb_server=info,tower_http=info".into());
    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::from_file_or_default(DEFAULT_CONFIG),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    config.apply_port_override(args.port, std::env::var("PORT").ok());

    if let Err(e) = moviedb_rs::run(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
