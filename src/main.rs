mod commands;
mod config;
mod diagnostics;
mod encapsulation;
mod error;
mod info;
mod logger;
mod namespace;
mod namespace_cmd;
mod paths;
mod placeholder;
mod resolver;
mod rewrite;
mod scanner;
mod types;
mod watch;
mod workspace;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Command-line interface.
#[derive(Parser)]
#[command(name = "colonlink", about = "Resolve shorthand link targets in markdown", version)]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Print debug output to stderr.
    #[arg(long, global = true)]
    verbose: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve every link and report targets missing on disk
    Check,
    /// Show the shorthand grammar, configuration, and current state
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every link under the current directory with its resolution
    Links {
        /// Markdown documents to scan instead of the whole tree
        documents: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage namespaces
    Namespace {
        /// Namespace subcommand.
        #[command(subcommand)]
        action: NamespaceAction,
    },
    /// Print a markdown document with link targets rewritten to site-rooted paths
    Render {
        /// Markdown document, relative to the current directory
        document: String,
    },
    /// Resolve one shorthand target as if written in DOCUMENT
    Resolve {
        /// Return the absolute location
        #[arg(long, conflicts_with = "workspace_relative")]
        absolute: bool,
        /// Document containing the link (need not exist)
        document: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Shorthand target; omit for an empty target
        #[arg(default_value = "")]
        target: String,
        /// Link label
        #[arg(long, short, default_value = "")]
        text: String,
        /// Format relative to the workspace root instead of the document
        #[arg(long)]
        workspace_relative: bool,
    },
    /// Check, then re-check whenever markdown changes
    Watch,
}

/// `namespace` subcommands.
#[derive(Subcommand)]
enum NamespaceAction {
    /// Add a namespace mapping to .colonlink.toml
    Add {
        /// Namespace name (prefix before the colon)
        name: String,
        /// Default root directory for the namespace
        path: String,
    },
    /// List built-in and configured namespaces
    List,
    /// Remove a namespace from .colonlink.toml
    Remove {
        /// Remove even if links still use the prefix
        #[arg(long)]
        force: bool,
        /// Namespace name
        name: String,
    },
    /// Rename a namespace in .colonlink.toml and in markdown link targets
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::set_verbose(cli.verbose);

    let result = match cli.command {
        Commands::Check => commands::check(),
        Commands::Info { json } => {
            commands::info(json);
            Ok(ExitCode::SUCCESS)
        },
        Commands::Links { documents, json } => commands::links(&documents, json).map(|()| return ExitCode::SUCCESS),
        Commands::Namespace { action } => run_namespace(action).map(|()| return ExitCode::SUCCESS),
        Commands::Render { document } => commands::render(&document).map(|()| return ExitCode::SUCCESS),
        Commands::Resolve {
            absolute,
            document,
            json,
            target,
            text,
            workspace_relative,
        } => {
            let args = commands::ResolveArgs {
                absolute,
                document: &document,
                json,
                target: &target,
                text: &text,
                workspace_relative,
            };
            commands::resolve(&args).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Watch => watch::run(),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(3_u8)
        },
    };
}

/// Dispatch a `namespace` subcommand.
///
/// # Errors
///
/// Returns errors from the namespace command.
fn run_namespace(action: NamespaceAction) -> Result<(), error::Error> {
    return match action {
        NamespaceAction::Add { name, path } => namespace_cmd::cmd_add(&name, &path),
        NamespaceAction::List => namespace_cmd::cmd_list(),
        NamespaceAction::Remove { force, name } => namespace_cmd::cmd_remove(&name, force),
        NamespaceAction::Rename { old, new } => namespace_cmd::cmd_rename(&old, &new),
    };
}
