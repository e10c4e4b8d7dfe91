use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use styledit::backend::RestBackend;
use styledit::common;
use styledit::config::EditorConfig;
use styledit::cql::{self, FilterRow};
use styledit::editor::{classify, TracingNotifier, VectorEditor};
use styledit::palette;
use styledit::session::{EditSession, SaveOutcome};
use styledit::style::Style;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(short, long, global = true, default_value = "styledit.yaml")]
    config: String,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Print the breakpoints of a palette over a value range
    Palette {
        #[clap(short, long)]
        index: u32,
        #[clap(long, allow_hyphen_values = true)]
        min: String,
        #[clap(long, allow_hyphen_values = true)]
        max: String,
        #[clap(long)]
        inverse: bool,
    },
    Filter {
        #[clap(subcommand)]
        command: FilterCommands,
    },
    Style {
        #[clap(subcommand)]
        command: StyleCommands,
    },
}

#[derive(Subcommand)]
enum FilterCommands {
    /// Build a CQL predicate from a JSON file of filter rows
    ToCql {
        #[clap(short, long)]
        rows: String,
    },
    /// Project a CQL predicate onto filter rows
    FromCql { cql: String },
}

#[derive(Subcommand)]
enum StyleCommands {
    /// Print the raster editing mode inferred for each rule
    Classify {
        #[clap(short, long)]
        style: String,
    },
    /// Send a style to the backend
    Push {
        #[clap(short, long)]
        style: String,
        /// Create the style instead of updating it
        #[clap(long)]
        create: bool,
    },
}

#[derive(Serialize)]
struct RuleMode<'a> {
    rule: &'a str,
    mode: styledit::editor::RasterMode,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Init => {
            info!("Writing default configuration to {}", args.config);
            let yaml = EditorConfig::default().to_yaml()?;
            common::write_string_to_file(&args.config, &yaml)?;
        }
        Commands::Palette {
            index,
            min,
            max,
            inverse,
        } => match palette::generate_from_inputs(index, &min, &max, inverse) {
            Some(points) => print_json(&points?)?,
            None => bail!("Palette bounds must be numbers, got '{}' and '{}'", min, max),
        },
        Commands::Filter { command } => match command {
            FilterCommands::ToCql { rows } => {
                let rows: Vec<FilterRow> = common::read_json_file(&rows)?;
                println!("{}", cql::rows_to_cql(&rows));
            }
            FilterCommands::FromCql { cql: expression } => print_json(&cql::read_cql(&expression))?,
        },
        Commands::Style { command } => match command {
            StyleCommands::Classify { style } => {
                let style: Style = common::read_json_file(&style)?;
                let modes: Vec<RuleMode> = style
                    .rules
                    .iter()
                    .map(|rule| RuleMode {
                        rule: &rule.name,
                        mode: classify(&rule.symbolizers),
                    })
                    .collect();
                print_json(&modes)?;
            }
            StyleCommands::Push { style, create } => {
                let config = EditorConfig::load_or_default(&args.config)?;
                let style: Style = common::read_json_file(&style)?;
                let backend = RestBackend::new(&config.backend)?;
                let editor = VectorEditor::new(style, Arc::new(|_: &str| true))
                    .with_max_scale(config.default_max_scale);
                let mut session =
                    EditSession::new(editor, Arc::new(backend), Arc::new(TracingNotifier))
                        .persisted(!create);

                match session.save().await {
                    SaveOutcome::Applied => print_json(session.style())?,
                    SaveOutcome::Invalid(flags) => bail!("Style is invalid: {:?}", flags),
                    SaveOutcome::Stale => bail!("Response was superseded"),
                    SaveOutcome::Failed => bail!("Backend rejected the style"),
                }
            }
        },
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("reqwest=off,hyper=off,{}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
