//! SmartHealth CLI entry point.
//!
//! Drives the session core from the command line: each invocation rehydrates
//! the persisted session, performs one action, and exits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use smarthealth::config::{self, runtime_paths};
use smarthealth::identity::Identity;
use smarthealth::logging;
use smarthealth::routes::{Resolution, RouteTable};
use smarthealth::session::{FileStorage, IdentityStore, Session, SessionOptions, SessionState};

/// SmartHealth — role-aware client for the health-surveillance platform.
#[derive(Parser)]
#[command(name = "smarthealth", version, about)]
struct Cli {
    /// Runtime root directory (defaults to $SMARTHEALTH_HOME or ~/.smarthealth).
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Config file path (defaults to <root>/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Sign in with the identity payload returned by the authentication service.
    Login {
        /// Payload JSON.
        #[arg(long, conflicts_with = "payload_file", required_unless_present = "payload_file")]
        payload: Option<String>,
        /// File containing the payload JSON.
        #[arg(long)]
        payload_file: Option<PathBuf>,
        /// Guarded path that was attempted before login.
        #[arg(long)]
        from: Option<String>,
    },
    /// Sign out and remove the persisted session.
    Logout,
    /// Show the signed-in identity.
    Whoami,
    /// Resolve navigation to a path.
    Open {
        /// Path to navigate to.
        path: String,
    },
    /// List menu entries for the signed-in role.
    Menu {
        /// Current path, to mark the active entry.
        #[arg(long)]
        current: Option<String>,
    },
    /// Show paths, configuration, and session state.
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut paths = runtime_paths(cli.home.as_deref())?;
    if let Some(config_path) = cli.config {
        paths.config_toml = config_path;
    }
    let config = config::load(&paths)
        .with_context(|| format!("failed to load {}", paths.config_toml.display()))?;

    let _logging_guard = if config.logging.file {
        Some(logging::init_file(&paths.logs_dir, &config.logging.level)?)
    } else {
        logging::init_cli(&config.logging.level);
        None
    };

    let storage = FileStorage::new(&paths.session_dir);
    let store = IdentityStore::initialize_with_key(Box::new(storage), &config.session.storage_key);
    let mut session = Session::with_routes(
        store,
        RouteTable::standard(),
        SessionOptions {
            resume_after_login: config.session.resume_after_login,
        },
    );

    match cli.command {
        Command::Login {
            payload,
            payload_file,
            from,
        } => handle_login(&mut session, payload, payload_file, from),
        Command::Logout => {
            anyhow::ensure!(
                session.logout(),
                "could not clear the stored session at {}",
                paths.session_dir.display()
            );
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            handle_whoami(&session);
            Ok(())
        }
        Command::Open { path } => {
            print_resolution(&session.navigate(&path));
            Ok(())
        }
        Command::Menu { current } => {
            handle_menu(&session, current.as_deref());
            Ok(())
        }
        Command::Status => {
            println!("root: {}", paths.root.display());
            println!("config: {}", paths.config_toml.display());
            println!("storage key: {}", config.session.storage_key);
            println!("api: {}", config.api.base_url);
            match session.state() {
                SessionState::Authenticated(role) => println!("session: authenticated ({role})"),
                SessionState::Unauthenticated => println!("session: unauthenticated"),
            }
            Ok(())
        }
    }
}

fn handle_login(
    session: &mut Session,
    payload: Option<String>,
    payload_file: Option<PathBuf>,
    from: Option<String>,
) -> anyhow::Result<()> {
    let raw = match (payload, payload_file) {
        (Some(raw), _) => raw,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read payload at {}", path.display()))?,
        (None, None) => anyhow::bail!("either --payload or --payload-file is required"),
    };
    let identity = Identity::from_auth_payload(&raw).context("invalid authentication payload")?;

    if session.is_authenticated() {
        // The login below overwrites the record either way.
        let _replaced = session.logout();
    }
    if let Some(from) = from {
        session.navigate(&from);
    }

    let next = session
        .login(identity)
        .ok_or_else(|| anyhow::anyhow!("failed to persist session"))?;
    if let Some(identity) = session.identity() {
        println!("signed in as {} ({})", identity.name(), identity.role());
    }
    println!("next: {next}");
    Ok(())
}

fn handle_whoami(session: &Session) {
    match session.view().identity() {
        Some(identity) => {
            println!("id: {}", identity.id());
            println!("name: {}", identity.name());
            println!("email: {}", identity.email());
            println!("role: {} ({})", identity.role(), identity.role().label());
        }
        None => println!("not signed in"),
    }
}

fn handle_menu(session: &Session, current: Option<&str>) {
    for entry in session.view().menu() {
        let marker = match current {
            Some(path) if entry.is_active(path) => "*",
            _ => " ",
        };
        println!("{marker} {}\t{}\t{}", entry.label, entry.path, entry.icon);
    }
}

fn print_resolution(resolution: &Resolution) {
    match resolution {
        Resolution::Render { path, screen } if screen.is_placeholder() => {
            println!("render {} at {path} (coming soon)", screen.title());
        }
        Resolution::Render { path, screen } => println!("render {} at {path}", screen.title()),
        Resolution::RedirectToLogin { .. }
        | Resolution::RedirectToUnauthorized
        | Resolution::RedirectToLanding { .. } => println!("redirect {}", resolution.target()),
    }
}
