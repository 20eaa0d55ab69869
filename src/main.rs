use actix_web::HttpServer;
use clap::{Parser, Subcommand};

use catalog_api::{build_app, config::AppConfig, db, fixtures, logging, AppState};

#[derive(Parser)]
#[command(name = "catalog-api", about = "Product / client / user catalog REST API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Démarre le serveur HTTP (par défaut)
    Serve,
    /// Charge les données de démo puis quitte
    Seed,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    logging::init_logging(&config.log_level).map_err(std::io::Error::other)?;

    tracing::info!("Connecting to database...");
    let connection = db::establish_connection(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    db::create_schema(&connection)
        .await
        .map_err(std::io::Error::other)?;
    tracing::info!("Database connected");

    let state = AppState::new(connection, &config);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Seed => {
            let summary = fixtures::load_fixtures(&state.db, &state.hasher, config.fixtures_seed)
                .await
                .map_err(std::io::Error::other)?;
            tracing::info!(
                clients = summary.clients,
                users = summary.users,
                products = summary.products,
                "seed complete"
            );
            Ok(())
        }
        Command::Serve => {
            let (host, port) = config.bind_address();
            tracing::info!("Starting server on http://{}:{}", host, port);

            HttpServer::new(move || build_app(state.clone()))
                .bind((host, port))?
                .run()
                .await
        }
    }
}
