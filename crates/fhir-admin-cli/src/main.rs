//! fhir-admin CLI
//!
//! Command-line interface for administering FHIR locations and teams

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use fhir_admin_core::{Result, init_tracing_with};
use std::io;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "fhir-admin")]
#[command(about = "fhir-admin: manage FHIR location hierarchies and teams")]
#[command(version = fhir_admin_core::VERSION)]
#[command(
    long_about = "fhir-admin edits Location and team (Organization) resources on a FHIR R4 server.\n\
\n\
Examples:\n  \
fhir-admin location form 303          # Show form values for Location/303\n  \
fhir-admin location tree --exclude 303 # Parent options, 303 and its subtree disabled\n  \
fhir-admin location save ward.json    # Validate and create/update a location\n  \
fhir-admin team show team-1           # Show a team and its practitioners\n  \
fhir-admin count Location -f status=active"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.fhir-admin.json/.fhir-admin.toml/fhir-admin.yaml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Location form values, parent options and submission
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Team details and submission
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },

    /// Count resources matching search filters
    Count {
        /// Resource type, e.g. Location or PractitionerRole
        resource_type: String,

        /// Search filter (can be used multiple times)
        #[arg(short, long = "filter", value_parser = parse_filter, help = "Search filter as key=value")]
        filters: Vec<(String, String)>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum LocationAction {
    /// Print initial form values (create defaults when no id is given)
    Form {
        /// Location id
        id: Option<String>,

        /// Treat the location as a structure rather than a jurisdiction
        #[arg(long)]
        structure: bool,

        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },

    /// Print selectable parent locations
    Tree {
        /// Disable this location and its descendants
        #[arg(long)]
        exclude: Option<String>,

        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },

    /// Validate a form file and create or update the location
    Save {
        /// JSON file with form values
        file: PathBuf,

        /// Parent location id (defaults to the form's parentId)
        #[arg(long)]
        parent: Option<String>,

        /// Print the payload without submitting it
        #[arg(long)]
        dry_run: bool,

        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum TeamAction {
    /// Print a team's form values and members
    Show {
        /// Organization id
        id: String,

        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },

    /// Create or update a team from a form file
    Save {
        /// JSON file with team form values
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Configuration file format
        #[arg(long, default_value = "json", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Show current configuration
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON for programmatic consumption
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

/// Parse a search filter in the format key=value
fn parse_filter(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!(
            "Invalid filter format '{}'. Expected 'key=value'",
            s
        )),
    }
}

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return Ok(());
    }

    colored::control::set_override(!cli.no_color && std::env::var("NO_COLOR").is_err());

    let log_level = match cli.verbose {
        0 => "fhir_admin=error",
        1 => "fhir_admin=warn",
        2 => "fhir_admin=info",
        3 => "fhir_admin=debug",
        _ => "fhir_admin=trace",
    };
    init_tracing_with(log_level);

    match run_command(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{}", e);
            std::process::exit(if e.is_user_error() { 2 } else { 1 });
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

async fn run_command(cli: Cli) -> Result<()> {
    let config_path = cli.config;

    match cli.command {
        Some(Commands::Location { action }) => match action {
            LocationAction::Form {
                id,
                structure,
                format,
            } => commands::location::form_command(id, structure, format, config_path).await,
            LocationAction::Tree { exclude, format } => {
                commands::location::tree_command(exclude, format, config_path).await
            }
            LocationAction::Save {
                file,
                parent,
                dry_run,
                format,
            } => {
                commands::location::save_command(file, parent, dry_run, format, config_path).await
            }
        },

        Some(Commands::Team { action }) => match action {
            TeamAction::Show { id, format } => {
                commands::team::show_command(id, format, config_path).await
            }
            TeamAction::Save { file } => commands::team::save_command(file, config_path).await,
        },

        Some(Commands::Count {
            resource_type,
            filters,
        }) => commands::count_command(resource_type, filters, config_path).await,

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => {
                commands::config::init_command(format, force).await
            }
            ConfigAction::Show => commands::config::show_command(config_path).await,
        },

        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
