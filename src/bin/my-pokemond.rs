use std::sync::Arc;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use my_pokemon::{
    InMemoryPokemonStore, PgPokemonStore, PokemonStore, RandomSource, SeededRandom,
    create_pokemon_router, sql,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Args {
    #[arrrg(optional, "PostgreSQL database URL (falls back to DATABASE_URL)")]
    database_url: Option<String>,
    #[arrrg(optional, "Host to bind the HTTP server")]
    host: Option<String>,
    #[arrrg(optional, "Port to bind the HTTP server")]
    port: Option<u16>,
    #[arrrg(optional, "Seed for the catch and release draws")]
    seed: Option<u64>,
    #[arrrg(flag, "Run database migrations before serving")]
    migrate: bool,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

const HELP_TEXT: &str = r#"my-pokemond - catch, rename and release pokemon over HTTP

USAGE:
    my-pokemond [OPTIONS]

OPTIONS:
    --database-url <URL> PostgreSQL database URL [default: $DATABASE_URL, else in-memory]
    --host <HOST>        Host to bind the HTTP server [default: 127.0.0.1]
    --port <PORT>        Port to bind the HTTP server [default: 8989]
    --seed <SEED>        Seed for the catch and release draws [default: OS entropy]
    --migrate            Run database migrations before serving
    --verbose            Enable verbose logging

API ENDPOINTS:
    GET    /api/v1/my-pokemon       List owned pokemon
    POST   /api/v1/catch            Try to catch a pokemon
    PUT    /api/v1/rename           Rename an owned pokemon
    DELETE /api/v1/release/{id}     Try to release an owned pokemon

The server supports graceful shutdown via Ctrl+C."#;

struct ServerConfig {
    database_url: Option<String>,
    host: String,
    port: u16,
    seed: Option<u64>,
    migrate: bool,
    verbose: bool,
}

impl ServerConfig {
    fn from_args(args: Args) -> Self {
        Self {
            database_url: args
                .database_url
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .filter(|url| !url.is_empty()),
            host: args.host.unwrap_or_else(|| "127.0.0.1".to_string()),
            port: args.port.unwrap_or(8989),
            seed: args.seed,
            migrate: args.migrate,
            verbose: args.verbose,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "my_pokemon=debug,my_pokemond=debug"
    } else {
        "my_pokemon=info,my_pokemond=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line("USAGE: my-pokemond [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    let config = ServerConfig::from_args(args);
    init_tracing(config.verbose);

    let store: Arc<dyn PokemonStore> = match &config.database_url {
        Some(database_url) => {
            let store = PgPokemonStore::connect(database_url).await?;
            if config.migrate {
                tracing::info!("running database migrations");
                sql::migrate(store.pool()).await?;
            }
            tracing::info!("using PostgreSQL store");
            Arc::new(store)
        }
        None => {
            if config.migrate {
                tracing::warn!("--migrate ignored without a database URL");
            }
            tracing::warn!("no database URL configured; pokemon are kept in memory");
            Arc::new(InMemoryPokemonStore::new())
        }
    };

    let rng: Arc<dyn RandomSource> = match config.seed {
        Some(seed) => {
            tracing::info!(seed, "seeding random draws");
            Arc::new(SeededRandom::from_seed(seed))
        }
        None => Arc::new(SeededRandom::from_entropy()),
    };

    let app = Router::new().nest("/api/v1", create_pokemon_router(store, rng));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(address = %addr, "my-pokemond listening");

    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "server error");
                std::process::exit(1);
            }
        }
        () = shutdown_signal => {
            tracing::info!("shutdown signal received, stopping server");
        }
    }

    Ok(())
}
