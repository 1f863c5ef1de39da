use clap::Parser;
use contactbook::cli::{run_list, run_seed, Cli, Commands, ServeArgs};
use contactbook::config::Config;
use contactbook::db::Database;
use contactbook::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        None => {
            // No subcommand provided - serve with defaults
            serve(cli.db, ServeArgs::default()).await?;
        }
        Some(Commands::Serve(args)) => {
            serve(cli.db, args).await?;
        }
        Some(Commands::Seed(args)) => {
            let config = Config::resolve(cli.db, None)?;
            let db = Database::open_at(&config.db_path)?;
            run_seed(&db, args.force)?;
        }
        Some(Commands::List(args)) => {
            let config = Config::resolve(cli.db, None)?;
            let db = Database::open_at(&config.db_path)?;
            run_list(&db, args.query.as_deref())?;
        }
    }

    Ok(())
}

async fn serve(db_path: Option<std::path::PathBuf>, args: ServeArgs) -> anyhow::Result<()> {
    let config = Config::resolve(db_path, args.addr)?;
    let db = Database::open_at(&config.db_path)?;
    tracing::info!(
        path = %config.db_path.display(),
        contacts = db.count_contacts()?,
        "database ready"
    );
    server::serve(db, &config.addr).await
}
