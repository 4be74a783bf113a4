mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{orders, phone, serve, templates, Context};
use crate::error::{exit_code_for, report_error};
use deercheck_config as config;
use deercheck_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "deercheck", version, about = "deercheck reorder lookup")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the public reorder API
    Serve(serve::ServeArgs),
    /// Show the reorder view of an order by id
    #[command(name = "previous-order")]
    PreviousOrder(orders::PreviousOrderArgs),
    /// Show the reorder view of the latest order matching a phone number
    #[command(name = "find-order")]
    FindOrder(orders::FindOrderArgs),
    /// Import an order document
    #[command(name = "check-in")]
    CheckIn(orders::CheckInArgs),
    #[command(subcommand)]
    Phone(phone::PhoneCommand),
    #[command(name = "render-template")]
    RenderTemplate(templates::RenderTemplateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let serving = matches!(cli.command, Command::Serve(_));
    init_logging(verbose, serving);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Phone(cmd) = command {
        return phone::run(cmd, json);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    if verbose {
        debug!(path = %db_path.display(), "database path resolved");
    }

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    if let Command::Serve(args) = command {
        return serve::launch(store, &app_config, args);
    }

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::PreviousOrder(args) => orders::previous_order(&ctx, args),
        Command::FindOrder(args) => orders::find_order(&ctx, args),
        Command::CheckIn(args) => orders::check_in(&ctx, args),
        Command::RenderTemplate(args) => templates::render_template(&ctx, args),
        Command::Serve(_) => unreachable!("serve handled before context creation"),
        Command::Phone(_) => unreachable!("phone commands handled before store initialization"),
    }
}

fn init_logging(verbose: bool, serving: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = match (verbose, serving) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
