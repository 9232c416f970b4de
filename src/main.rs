use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use libris::app::AppContext;
use libris::cli::{commands, Cli, Commands};
use libris::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it only logs when RUST_LOG asks for it.
    let quiet = matches!(cli.command, Commands::Tui) && std::env::var_os("RUST_LOG").is_none();
    if !quiet {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }

    let mut config = Config::load()?;
    if let Some(workers) = cli.workers {
        config.feed.enrich_workers = workers.max(1);
    }
    if let Some(page_size) = cli.page_size {
        config.feed.page_size = page_size.max(1);
    }
    if cli.no_bots {
        config.feed.include_bots = false;
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Search { query, from, to } => {
            commands::search(&ctx, &query, from.as_deref(), to.as_deref()).await?;
        }
        Commands::Authors { query } => {
            commands::authors(&ctx, &query).await?;
        }
        Commands::Subject {
            name,
            sort,
            limit,
            overview,
        } => {
            commands::subject(&ctx, &name, sort, limit, overview).await?;
        }
        Commands::Book { key } => {
            commands::book(&ctx, &key).await?;
        }
        Commands::Author { key } => {
            commands::author(&ctx, &key).await?;
        }
        Commands::Changes {
            limit,
            offset,
            pages,
        } => {
            commands::changes(&ctx, limit, offset, pages).await?;
        }
        Commands::History { key } => {
            commands::history(&ctx, &key).await?;
        }
        Commands::Inside { identifier, query } => {
            commands::inside(&ctx, &identifier, &query).await?;
        }
        Commands::Read { kind, value } => {
            commands::read(&ctx, kind, &value).await?;
        }
        Commands::Lists { query } => {
            commands::lists(&ctx, &query).await?;
        }
        Commands::List { key } => {
            commands::list(&ctx, &key).await?;
        }
        Commands::Shelf { user, shelf } => {
            commands::shelf(&ctx, &user, shelf).await?;
        }
        Commands::Cover {
            isbn,
            olid,
            id,
            size,
            author,
        } => {
            commands::cover(&ctx, isbn.as_deref(), olid.as_deref(), id, size, author);
        }
        Commands::Tui => {
            libris::tui::run(Arc::new(ctx)).await?;
        }
    }

    Ok(())
}
