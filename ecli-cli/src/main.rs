//! ecli — component sync CLI.
//!
//! # Usage
//!
//! ```text
//! ecli init
//! ecli sync [--force] [--dry-run]
//! ecli apply <name> [--dry-run]
//! ecli validate <name> [--type basic|comfy_workflow|fetch_api]
//! ecli status [--json]
//! ecli component add <name> [--type ...]
//! ecli component remove <name>
//! ```
//!
//! Global flags: `--components-dir <path>`, `--verbose`.
//!
//! # Exit status
//!
//! | code | meaning |
//! |---|---|
//! | 0 | every changed component applied (or would apply) |
//! | 1 | configuration or I/O error before any component was processed |
//! | 2 | at least one component failed |
//! | 3 | nothing to do |

mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    apply::ApplyArgs, component::ComponentCommand, init::InitArgs, status::StatusArgs,
    sync::SyncArgs, validate::ValidateArgs, Globals,
};
use ecli_core::ComponentType;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ecli",
    version,
    about = "Validate and sync workflow components to the remote service",
    long_about = None,
)]
struct Cli {
    /// Components root (overrides `componentsDir` from ~/.ecli/config.json).
    #[arg(long, global = true, value_name = "PATH")]
    components_dir: Option<PathBuf>,

    /// Log applied components and skip decisions to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the default config to ~/.ecli/config.json.
    Init(InitArgs),

    /// Push every component that changed since its last sync.
    Sync(SyncArgs),

    /// Validate and push one component regardless of its fingerprints.
    Apply(ApplyArgs),

    /// Validate one component locally without pushing.
    Validate(ValidateArgs),

    /// Show the change classification of every component.
    Status(StatusArgs),

    /// Manage component directories.
    Component {
        #[command(subcommand)]
        command: ComponentCommand,
    },
}

// ---------------------------------------------------------------------------
// Shared ComponentType argument — parsed from CLI strings, converts to core type
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `ComponentType` from CLI args.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentTypeArg(pub ComponentType);

impl FromStr for ComponentTypeArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        normalized.parse::<ComponentType>().map(Self).map_err(|_| {
            let expected: Vec<String> =
                ComponentType::all().iter().map(|t| t.to_string()).collect();
            format!(
                "unknown component type '{s}'; expected: {}",
                expected.join(", ")
            )
        })
    }
}

impl fmt::Display for ComponentTypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<ComponentTypeArg> for ComponentType {
    fn from(t: ComponentTypeArg) -> Self {
        t.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let globals = Globals {
        components_dir: cli.components_dir,
    };
    match dispatch(cli.command, &globals) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn dispatch(command: Commands, globals: &Globals) -> Result<ExitCode> {
    match command {
        Commands::Init(args) => args.run(),
        Commands::Sync(args) => args.run(globals),
        Commands::Apply(args) => args.run(globals),
        Commands::Validate(args) => args.run(globals),
        Commands::Status(args) => args.run(globals),
        Commands::Component { command } => commands::component::run(command, globals),
    }
}

/// Logs go to stderr; stdout carries the report.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
