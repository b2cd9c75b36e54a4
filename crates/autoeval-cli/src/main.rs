//! autoeval CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "autoeval",
    version,
    about = "Volunteer assessment composer and grader"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate question bank or template TOML files
    Validate {
        /// Path to a bank/template .toml file or a directory of banks
        #[arg(long)]
        path: PathBuf,
    },

    /// Randomly compose a template from a question bank
    Compose {
        /// Question bank TOML file
        #[arg(long)]
        bank: PathBuf,

        /// Per-area question counts, e.g. "language=3,math=2"
        #[arg(long)]
        quota: String,

        /// Template title
        #[arg(long, default_value = "Autoevaluación")]
        title: String,

        /// RNG seed for reproducible composition
        #[arg(long)]
        seed: Option<u64>,

        /// Output template TOML file
        #[arg(long)]
        output: PathBuf,
    },

    /// Grade a submitted answer set against a template
    Grade {
        /// Template TOML file
        #[arg(long)]
        template: PathBuf,

        /// Answers JSON file ({"respondent_id": ..., "answers": [...]})
        #[arg(long)]
        answers: PathBuf,

        /// Where to save the session report JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: table, json, markdown
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Create a starter bank and example answers file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("autoeval=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { path } => commands::validate::execute(path),
        Commands::Compose {
            bank,
            quota,
            title,
            seed,
            output,
        } => commands::compose::execute(bank, quota, title, seed, output),
        Commands::Grade {
            template,
            answers,
            output,
            format,
        } => commands::grade::execute(template, answers, output, format).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
