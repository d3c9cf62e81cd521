use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use interaction_core::{units::validate_contact, ContactSubmitter, HttpSubmitter, LoggingSubmitter};
use shared::tokens::DESIGN_TOKENS;
use tracing::info;

mod config;
mod replay;

use config::load_settings;
use replay::{load_page, load_script, run_replay};

#[derive(Parser, Debug)]
#[command(name = "folio-tools", about = "Offline tooling for the portfolio page interactions")]
struct Cli {
    /// Settings file; defaults to ./folio.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted visit against a page fixture and print the final state.
    Replay {
        #[arg(long)]
        page: PathBuf,
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Check a contact form submission the way the page does.
    Validate {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Export the design tokens.
    Tokens {
        #[arg(long, value_enum, default_value_t = TokenFormat::Css)]
        format: TokenFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TokenFormat {
    Css,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Replay { page, script, json } => {
            let page = load_page(&page)?;
            let script = load_script(&script)?;
            let submitter: Box<dyn ContactSubmitter> = match &settings.submit_endpoint {
                Some(endpoint) => {
                    info!(%endpoint, "submitting contact forms over HTTP");
                    Box::new(HttpSubmitter::new(endpoint.clone()))
                }
                None => {
                    // Nothing leaves the process, so waits can run on virtual time.
                    tokio::time::pause();
                    Box::new(LoggingSubmitter)
                }
            };
            let report = run_replay(&page, &script, &settings.controller, submitter).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        Command::Validate {
            name,
            email,
            message,
        } => match validate_contact(Some(name), Some(email), Some(message)) {
            Ok(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
            Err(error) => bail!("{error}"),
        },
        Command::Tokens { format } => match format {
            TokenFormat::Css => print!("{}", DESIGN_TOKENS.to_css_variables()),
            TokenFormat::Json => println!("{}", serde_json::to_string_pretty(&DESIGN_TOKENS)?),
        },
    }

    Ok(())
}
