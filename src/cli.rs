//! Command-line interface implementation for Pilot.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for Pilot.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pilot: scaffold projects from YAML templates",
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a YAML template file into the local store
    Create {
        /// Name to store the template under
        name: String,

        /// Path to the YAML template file
        #[arg(short, long)]
        path: PathBuf,

        /// Overwrite if the template already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Create a project from a stored template
    Init {
        name: String,

        /// Output directory (defaults to the `default_output_dir` setting)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate into a non-empty directory, overwriting declared files
        #[arg(short, long)]
        force: bool,

        /// Override a template variable
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
    },

    /// List stored templates
    List {
        /// List archived templates instead of active ones
        #[arg(short, long, conflicts_with = "all")]
        archived: bool,

        /// List both active and archived templates
        #[arg(long)]
        all: bool,
    },

    /// Print the YAML source of a template
    Source {
        name: String,

        /// Look in the archive
        #[arg(short, long)]
        archived: bool,
    },

    /// Open a template in an editor and re-validate it afterwards
    Edit {
        name: String,

        /// Editor to use instead of the `editor` setting
        #[arg(short, long)]
        editor: Option<String>,
    },

    /// Write a template to an external YAML file
    Export {
        name: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Copy a template under a new name
    Duplicate {
        source: String,
        new_name: String,

        /// Overwrite if the new name already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a template permanently
    Delete {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,

        /// Delete from the archive instead of the active templates
        #[arg(short, long)]
        archived: bool,
    },

    /// Move a template to the archive, or back with --restore
    Archive {
        name: String,

        /// Restore from the archive instead
        #[arg(short, long)]
        restore: bool,
    },

    /// Read or change user settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective value of a setting
    Get { key: String },
    /// Store a setting in the user config file
    Set { key: String, value: String },
    /// Remove a setting from the user config file
    Unset { key: String },
    /// Print all effective settings
    List,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
