use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use serde::Serialize;

use anamnesis_cli::{commands, config, init_logging};

#[derive(Parser)]
#[command(name = "anamnesis", version, about = "Adaptive questionnaire engine and insight derivation")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a template for structural errors and dependency cycles
    Validate { template: PathBuf },
    /// Select the next question to present
    Next { template: PathBuf, answers: PathBuf },
    /// Print the content hash of an answer set
    Hash { template: PathBuf, answers: PathBuf },
    /// Derive (or reuse) the insight for a completed session
    Derive {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        session: String,
        template: PathBuf,
        answers: PathBuf,
    },
    /// Write the effective config to the config path
    InitConfig,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.log_json || config::log_json_hint(cli.config.as_deref()));
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Validate { template } => {
            let schema = commands::load_template(&template)?;
            print_json(&commands::validate(&schema)?)
        }
        Command::Next { template, answers } => {
            let schema = commands::load_template(&template)?;
            let answers = commands::load_answers(&answers)?;
            print_json(&commands::next(&schema, &answers)?)
        }
        Command::Hash { template, answers } => {
            let schema = commands::load_template(&template)?;
            let answers = commands::load_answers(&answers)?;
            println!("{}", commands::hash(&schema, &answers));
            Ok(())
        }
        Command::Derive {
            tenant,
            session,
            template,
            answers,
        } => {
            let schema = commands::load_template(&template)?;
            let answers = commands::load_answers(&answers)?;
            let pipeline = commands::build_pipeline(&config).await;
            let derivation =
                commands::derive(&pipeline, &tenant, &session, &schema, &answers).await?;
            print_json(&derivation)
        }
        Command::InitConfig => {
            let path = match cli.config {
                Some(path) => path,
                None => config::default_config_path()?,
            };
            config::save_config(&config, &path)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
