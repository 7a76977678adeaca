use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tienda_application::{CatalogRefresher, ShopService, UserAction};
use tienda_core::catalog::CatalogStore;
use tienda_core::config::ShopConfig;
use tienda_core::engine::ReasoningEngine;
use tienda_core::secret::SecretService;
use tienda_core::TiendaError;
use tienda_infrastructure::{ConfigService, SecretServiceImpl, catalog_feed_for};
use tienda_interaction::GeminiApiEngine;

mod commands;
mod helper;
mod render;

use commands::Command;
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "tienda")]
#[command(about = "Terminal storefront with a sales assistant", long_about = None)]
struct Cli {
    /// Path to config.toml (default: <config dir>/tienda/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog feed URL or CSV path, overriding the config file
    #[arg(long)]
    feed: Option<String>,

    /// Path to secret.json (default: <config dir>/tienda/secret.json)
    #[arg(long)]
    secrets: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // ===== Configuration =====
    let mut config = ConfigService::new(cli.config)
        .load()
        .context("Failed to load configuration")?;
    if let Some(feed) = cli.feed {
        config.feed.url = Some(feed);
    }
    let feed_url = config.feed_url()?.to_string();

    let engine = reasoning_engine(&config, SecretServiceImpl::new(cli.secrets)).await;

    // ===== Backend Initialization =====
    let feed = catalog_feed_for(&feed_url)?;
    let store = Arc::new(CatalogStore::new(
        feed,
        config.feed.columns.clone(),
        config.feed.refresh_interval(),
    ));
    let service = ShopService::new(Arc::clone(&store), engine, &config)?;

    let refresher = CatalogRefresher::new(Arc::clone(&store));
    let refresher_token = refresher.token();
    let refresher_handle = refresher.spawn();

    let session = service.sessions().create().await;

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!(
        "{}",
        format!("=== {} ===", config.assistant.store_name)
            .bright_magenta()
            .bold()
    );
    println!(
        "{}",
        "Escribí /ayuda para ver los comandos, o 'quit' para salir.".bright_black()
    );
    println!();

    let view = service
        .dispatch(&session, UserAction::Search(String::new()))
        .await;
    render::print_view(&view);
    // Row numbers typed by the user refer to the last listing printed.
    let mut listed_generation = view.catalog.as_ref().map(|page| page.generation);
    println!();
    render::print_transcript(&view);
    if !view.chat_enabled {
        println!(
            "{}",
            "El chat está desactivado: falta la clave de Gemini (GOOGLE_API_KEY o secret.json)."
                .red()
        );
    }

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match commands::parse(trimmed) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", message.yellow());
                        continue;
                    }
                };

                match command {
                    Command::Quit => {
                        println!("{}", "¡Gracias por tu visita!".bright_green());
                        break;
                    }
                    Command::Help => println!("{}", commands::HELP.bright_black()),
                    Command::ShowCart => render::print_cart(&service.render(&session).cart),
                    Command::Add { row } => {
                        let Some(generation) = listed_generation else {
                            println!("{}", "Primero buscá productos con /buscar.".yellow());
                            continue;
                        };
                        let view = service
                            .dispatch(&session, UserAction::Add { row, generation })
                            .await;
                        render::print_view(&view);
                        render::print_cart(&view.cart);
                    }
                    Command::Action(action) => {
                        let is_chat = matches!(action, UserAction::SendMessage(_));
                        let is_cart_change = matches!(action, UserAction::ClearCart);
                        let is_checkout = matches!(action, UserAction::Checkout);
                        if is_chat {
                            println!("{}", "Lucho está escribiendo...".bright_black());
                        }

                        let view = service.dispatch(&session, action).await;

                        if let Some(page) = &view.catalog {
                            listed_generation = Some(page.generation);
                        }
                        render::print_view(&view);
                        if is_cart_change || is_checkout {
                            render::print_cart(&view.cart);
                        }
                        if is_checkout {
                            render::print_handoff(&view.cart);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detectado. Escribí 'quit' para salir.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detectado. Saliendo...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    // ===== Shutdown =====
    service.sessions().end(session.id()).await;
    refresher_token.cancel();
    let _ = refresher_handle.await;

    Ok(())
}

/// Builds the Gemini engine, or the reason chat is unavailable.
///
/// A missing credential is not fatal: the shop runs with chat disabled.
async fn reasoning_engine(
    config: &ShopConfig,
    secrets: impl SecretService,
) -> std::result::Result<Arc<dyn ReasoningEngine>, TiendaError> {
    let credentials = match secrets.gemini_credentials().await {
        Ok(credentials) => credentials,
        Err(err) => {
            tracing::warn!("Chat disabled: {}", err);
            return Err(err);
        }
    };
    let timeout = Duration::from_secs(config.assistant.request_timeout_secs);
    let engine = GeminiApiEngine::from_config(&credentials, &config.assistant.model, timeout)?;
    tracing::info!(engine = %engine.describe(), "Reasoning engine ready");
    Ok(Arc::new(engine))
}
