use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;

use feast::contract::model::Language;
use feast::domain::ports::ChangeSource;
use feast::infra::{InMemoryBackend, RestBackend};
use feast::{DomainError, Feast, FeastConfig};
use runtime::{AppConfig, CliArgs};

mod commands;
mod console;
mod render;
mod session;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Feast - restaurant storefront and admin console
#[derive(Parser)]
#[command(name = "feast-cli")]
#[command(about = "Feast - restaurant storefront and admin console")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Menu language: en, ar or fr (overrides config)
    #[arg(long, global = true)]
    lang: Option<Language>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use an in-memory backend with a demo menu instead of the REST API
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session: browse, fill a cart, order, book, administer
    Shell,
    /// Print the menu and exit
    Menu,
    /// Print the admin dashboard (asks for the admin password)
    Dashboard,
    /// Follow the orders list and reprint it on every change (asks for the admin password)
    WatchOrders,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        base_url: cli.base_url.clone(),
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.app.home_dir));
    tracing::info!(mock = args.mock, "feast-cli starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let mut feast_config: FeastConfig = config.module_config("feast")?;
    if let Some(lang) = cli.lang {
        feast_config.language = lang;
    }

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Check => check_config(&config, &feast_config),
        command => {
            let feast = build(&config, &args, feast_config)?;
            match command {
                Commands::Menu => print_menu(&feast).await,
                Commands::Dashboard => print_dashboard(&feast).await,
                Commands::WatchOrders => watch_orders(&feast).await,
                _ => run_shell(feast).await,
            }
        }
    }
}

/// Wire the chosen backend into the storefront and admin components.
fn build(config: &AppConfig, args: &CliArgs, feast_config: FeastConfig) -> Result<Feast> {
    let notifier = Arc::new(console::ConsoleNotifier);
    if args.mock {
        tracing::info!("using in-memory backend");
        let backend = Arc::new(InMemoryBackend::demo()?);
        return Ok(Feast::new(backend, notifier, feast_config));
    }

    let base = config.backend.url()?;
    tracing::info!(base_url = %base, "using REST backend");
    let backend = RestBackend::connect(
        base,
        config.backend.api_token.clone(),
        Duration::from_secs(config.backend.timeout_sec),
    )?;
    Ok(Feast::new(Arc::new(backend), notifier, feast_config))
}

async fn print_menu(feast: &Feast) -> Result<()> {
    let catalog = feast.load_catalog().await?;
    print!("{}", render::menu(&catalog, feast.config().language));
    Ok(())
}

async fn print_dashboard(feast: &Feast) -> Result<()> {
    let mut gate = feast.admin_gate();
    console::unlock_on_stdin(&mut gate)?;
    let dashboard = feast.dashboard().await?;
    print!("{}", render::dashboard(&dashboard));
    Ok(())
}

async fn watch_orders(feast: &Feast) -> Result<()> {
    let mut gate = feast.admin_gate();
    console::unlock_on_stdin(&mut gate)?;

    let mut panel = feast.orders_panel();
    panel.load().await?;
    print!("{}", render::orders(&panel.visible()));

    let cancel = CancellationToken::new();
    let poller = feast.watch_orders(cancel.clone());
    let changes = poller.changes();
    println!("Watching orders, press Ctrl-C to stop");

    tokio::select! {
        _ = panel.follow(changes, |p| {
            print!("{}", render::status_counts(&p.status_counts()));
            print!("{}", render::orders(&p.visible()));
        }) => {}
        res = tokio::signal::ctrl_c() => {
            res.context("Failed to listen for Ctrl-C")?;
            tracing::info!("interrupted");
        }
    }
    poller.stop().await;
    Ok(())
}

async fn run_shell(feast: Feast) -> Result<()> {
    let mut session = session::Session::new(feast);
    session.start().await;

    loop {
        let Some(line) = console::read_line(&session.prompt())? else {
            println!();
            break;
        };
        let cmd = match commands::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                eprintln!("{msg}");
                continue;
            }
        };
        match session.execute(cmd).await {
            Ok(session::Flow::Quit) => break,
            Ok(session::Flow::Continue) => {}
            Err(e) => match e.downcast_ref::<DomainError>() {
                Some(err) if session::is_reported(err) => {
                    tracing::debug!(error = %err, "command failed");
                }
                _ => eprintln!("error: {e:#}"),
            },
        }
    }
    tracing::info!("session ended");
    Ok(())
}

fn check_config(config: &AppConfig, feast_config: &FeastConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir
    config.backend.url()?;
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Backend: {}", config.backend.base_url);
    println!(
        "Language: {}, order transitions: {:?}",
        feast_config.language, feast_config.transition_policy
    );
    println!("{}", config.to_yaml()?);

    Ok(())
}
