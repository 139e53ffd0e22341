use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use curate_cli::commands::{self, Assignment};
use curate_cli::config::{self, CurateConfig, LogFormat};
use eyre::Result;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "curate",
    about = "Inspect, validate and score gene-disease evidence against a curation schema",
    version
)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log output format, overriding the config file
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show how the schema arranges its fields, with placement diagnostics
    Layout(SchemaArgs),
    /// Validate an evidence file with the schema's rules
    Validate(EvidenceArgs),
    /// Summarise score calculations against the schema's thresholds
    Score {
        #[command(flatten)]
        schema: SchemaArgs,
        /// Score calculations JSON (key → number)
        #[arg(long)]
        scores: Option<PathBuf>,
    },
    /// Render the form tree for an evidence file
    Render {
        #[command(flatten)]
        evidence: EvidenceArgs,
        #[arg(long)]
        scores: Option<PathBuf>,
    },
    /// Apply PATH=VALUE edits to an evidence file as a curator would type them
    Edit {
        #[command(flatten)]
        evidence: EvidenceArgs,
        /// Edit to apply; repeatable
        #[arg(long = "set", required = true)]
        edits: Vec<Assignment>,
        /// Write the edited evidence here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also keep the result as a draft
        #[arg(long)]
        save_draft: bool,
    },
    /// Show the most recent draft saved for a schema
    Draft(SchemaArgs),
    /// Show the effective configuration, or write it out
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Schema JSON in the backend wire shape
    #[arg(long)]
    schema: PathBuf,
}

#[derive(Args, Debug)]
struct EvidenceArgs {
    #[command(flatten)]
    schema: SchemaArgs,
    /// Evidence JSON object
    #[arg(long)]
    evidence: Option<PathBuf>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_evidence(args: &EvidenceArgs) -> Result<(Arc<curate_core::Schema>, curate_core::EvidenceValue)> {
    let schema = Arc::new(commands::read_schema(&args.schema.schema)?);
    let evidence = match &args.evidence {
        Some(path) => commands::read_evidence(path)?,
        None => curate_core::EvidenceValue::object(),
    };
    Ok((schema, evidence))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let mut config = config::load_config_logged(
        &config_path,
        cli.log_format.unwrap_or_default(),
        env_filter(),
        std::io::stderr,
    )?;
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    init_tracing(config.log_format);

    run(cli.command, &config, &config_path).await
}

async fn run(command: Command, config: &CurateConfig, config_path: &Path) -> Result<()> {
    match command {
        Command::Layout(args) => {
            let schema = commands::read_schema(&args.schema)?;
            print(&commands::layout_report(&schema))
        }
        Command::Validate(args) => {
            let (schema, evidence) = load_evidence(&args)?;
            let result = commands::validate_evidence(&schema, &evidence);
            print(&result)?;
            if !result.is_valid {
                eyre::bail!("{} field(s) failed validation", result.field_errors.len());
            }
            Ok(())
        }
        Command::Score { schema, scores } => {
            let schema = commands::read_schema(&schema.schema)?;
            let scores = scores.as_deref().map(commands::read_scores).transpose()?;
            print(&commands::score_summary(&schema, scores.as_ref()))
        }
        Command::Render { evidence, scores } => {
            let (schema, data) = load_evidence(&evidence)?;
            let scores = scores.as_deref().map(commands::read_scores).transpose()?;
            let mut session = commands::open_session(schema, data, scores);
            print(&commands::render_report(&mut session))
        }
        Command::Edit {
            evidence,
            edits,
            out,
            save_draft,
        } => {
            let (schema, data) = load_evidence(&evidence)?;
            let mut session = commands::open_session(schema, data, None);
            commands::apply_edits(&mut session, &edits);

            let validation = session.validation().clone();
            for (path, message) in &validation.field_errors {
                tracing::warn!(path = %path, message = %message, "field fails validation");
            }

            if save_draft {
                let path = commands::save_draft(&session, &config.drafts_dir()?).await?;
                tracing::info!(path = %path.display(), "draft saved");
            }

            match out {
                Some(path) => {
                    let json = serde_json::to_string_pretty(session.data())?;
                    std::fs::write(&path, json)?;
                    tracing::info!(path = %path.display(), edits = edits.len(), "evidence written");
                    Ok(())
                }
                None => print(session.data()),
            }
        }
        Command::Draft(args) => {
            let schema = commands::read_schema(&args.schema)?;
            let dir = config.drafts_dir()?;
            match commands::latest_draft(&schema, &dir)? {
                Some(draft) => print(&draft),
                None => eyre::bail!("no draft found in {}", dir.display()),
            }
        }
        Command::Config { save } => {
            if save {
                config::save_config(config, config_path)?;
            }
            print(config)
        }
    }
}
