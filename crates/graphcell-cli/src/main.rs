mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand};
use graphcell::{Addressing, Config};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "graphcell", version, about = "Read and write single Excel cells through Microsoft Graph")]
struct Args {
    /// JSON config file (default: ~/.graphcell/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

/// Settings that override the config file and environment.
#[derive(ClapArgs, Debug, Default)]
struct Overrides {
    /// Worksheet name
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// by-id-under-user | by-id-under-self | by-path-under-user | by-id-under-site
    #[arg(long, global = true)]
    addressing: Option<Addressing>,

    #[arg(long, global = true)]
    user_id: Option<String>,

    #[arg(long, global = true)]
    file_id: Option<String>,

    #[arg(long, global = true)]
    file_name: Option<String>,

    #[arg(long, global = true)]
    file_path: Option<String>,
}

impl Overrides {
    fn into_config(self) -> Config {
        Config {
            sheet_name: self.sheet,
            addressing: self.addressing,
            user_id: self.user_id,
            file_id: self.file_id,
            file_name: self.file_name,
            file_path: self.file_path,
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read one cell and print its value
    Read {
        /// A1-style range, e.g. A1:A1
        range: String,
    },
    /// Write one cell
    Write { range: String, value: String },
    /// Search the configured drive for a file by name
    FindFile { name: String },
    /// Acquire a token and print its expiry
    Token,
    /// Write a value, read it back and report pass/fail
    Smoke {
        #[arg(long, default_value = "A1:A1")]
        range: String,
        #[arg(long, default_value = "PUNTO")]
        value: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("graphcell: {:#}", err);
            let code = err
                .downcast_ref::<graphcell::Error>()
                .map(|e| e.code().exit_code())
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::load(args.config.as_deref()).map_err(graphcell::Error::from)?;
    config.merge(args.overrides.into_config());
    tracing::debug!("Effective config: {:?}", config);

    match args.command {
        Command::Read { range } => commands::read(&config, &range).await,
        Command::Write { range, value } => commands::write(&config, &range, value).await,
        Command::FindFile { name } => commands::find_file(&config, &name).await,
        Command::Token => commands::token(&config).await,
        Command::Smoke { range, value } => commands::smoke(&config, &range, value).await,
    }
}
