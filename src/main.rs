//! Loiter - presence simulation bot.
//!
//! Standalone CLI surface: `loiter run <hint>` starts the presence loop
//! over the local workspace and Ctrl-C stops it, reverting any pending
//! edit on the way out.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;

use loiter::{BotConfig, BotController, CommandRegistry, LocalHost, LoiterError};

#[derive(Parser)]
#[command(name = "loiter")]
#[command(version = "0.1.0")]
#[command(about = "Presence simulation bot - keeps an idle workstation looking busy", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the presence loop for files sharing the hint's extension
    Run {
        /// File whose extension selects the candidate set (e.g. src/a.txt)
        hint: PathBuf,

        /// Workspace directory to enumerate
        #[arg(short, long, default_value = ".")]
        workspace: PathBuf,

        /// Also perform the reversible blank-line edit each iteration
        #[arg(long)]
        edit: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "loiter=debug,info"
    } else {
        "loiter=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            hint,
            workspace,
            edit,
        } => run_bot(hint, workspace, edit).await,
    }
}

async fn run_bot(hint: PathBuf, workspace: PathBuf, edit: bool) -> anyhow::Result<()> {
    let workspace = workspace.canonicalize().unwrap_or(workspace);
    if !workspace.exists() {
        eprintln!(
            "{} Workspace directory does not exist: {}",
            "Error:".red().bold(),
            workspace.display()
        );
        std::process::exit(1);
    }

    let host = Arc::new(LocalHost::new(workspace));
    let config = BotConfig::default().with_edit_enabled(edit);
    let bot = Arc::new(BotController::new(config, host)?);
    let mut flags = bot.flags();

    // The two user-invocable commands, registered once at init and
    // unregistered when the guards drop at shutdown.
    let registry = CommandRegistry::new();
    let start_bot = Arc::clone(&bot);
    let _start_guard = registry.register(
        "bot.start",
        Arc::new(move |arg| {
            let bot = Arc::clone(&start_bot);
            Box::pin(async move {
                let hint = arg.map(PathBuf::from);
                bot.start(hint.as_deref()).await
            })
        }),
    )?;
    let stop_bot = Arc::clone(&bot);
    let _stop_guard = registry.register(
        "bot.stop",
        Arc::new(move |_| {
            let bot = Arc::clone(&stop_bot);
            Box::pin(async move { bot.stop().await })
        }),
    )?;

    if let Err(e) = registry
        .dispatch("bot.start", Some(hint.display().to_string()))
        .await
    {
        return Err(report(e));
    }

    let extension = flags
        .borrow()
        .extension
        .clone()
        .unwrap_or_default();
    println!(
        "{} Bot started for files with extension {}. Press Ctrl-C to stop.",
        "OK".green().bold(),
        format!(".{extension}").cyan()
    );

    // Wait for Ctrl-C or for the loop to end on its own.
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            println!();
            if let Err(e) = registry.dispatch("bot.stop", None).await {
                if e.is_notice() {
                    warn!("{e}");
                } else {
                    return Err(report(e));
                }
            }
            println!("{} Bot stopped by user", "OK".green().bold());
        }
        () = wait_until_idle(&mut flags) => {
            println!(
                "{} Bot stopped: the file corpus became unusable",
                "Warning:".yellow().bold()
            );
        }
    }

    Ok(())
}

async fn wait_until_idle(flags: &mut tokio::sync::watch::Receiver<loiter::ContextFlags>) {
    while flags.changed().await.is_ok() {
        if !flags.borrow().running {
            return;
        }
    }
    // Sender dropped: the controller is gone, nothing left to watch.
    std::future::pending::<()>().await;
}

/// Print a start/stop failure the way the user expects and convert
/// notices into a clean exit.
fn report(e: LoiterError) -> anyhow::Error {
    if e.is_notice() {
        println!("{} {e}", "Warning:".yellow().bold());
        std::process::exit(0);
    }
    eprintln!("{} {e}", "Error:".red().bold());
    std::process::exit(e.exit_code());
}
