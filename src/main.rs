use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use coachlens::{
    AnalysisExport, AnthropicClient, AnthropicConfig, QueryOrchestrator, QueryRequest,
    TranscriptStatistics, load_transcript_file,
};

#[derive(Parser)]
#[command(name = "coachlens")]
#[command(author, version, about = "Weekly analysis of health-coaching conversation transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the weeks found in a transcript (JSON)
    Weeks {
        /// Transcript text file
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print transcript statistics without calling the model
    Stats {
        /// Transcript text file
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run an analytical query against the transcript (JSON)
    Query {
        /// Transcript text file
        #[arg(short, long)]
        input: PathBuf,

        /// Query kind
        #[arg(short, long, value_enum, default_value = "profile")]
        kind: KindArg,

        /// Week number to focus on (required for summary)
        #[arg(short, long)]
        week: Option<u32>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Export weeks plus overall profile and decisions to a JSON file
    Export {
        /// Transcript text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Profile,
    Decisions,
    Summary,
    Progress,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Weeks { input, verbose } => {
            setup_logging(verbose);
            list_weeks(input)
        }
        Commands::Stats { input, verbose } => {
            setup_logging(verbose);
            print_statistics(input)
        }
        Commands::Query {
            input,
            kind,
            week,
            model,
            verbose,
        } => {
            setup_logging(verbose);
            run_query(input, kind, week, model).await
        }
        Commands::Export {
            input,
            output,
            model,
            verbose,
        } => {
            setup_logging(verbose);
            export_analysis(input, output, model).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_orchestrator(input: PathBuf, model: Option<String>) -> Result<QueryOrchestrator> {
    let index = load_transcript_file(&input).context("Failed to load transcript")?;

    let mut config = AnthropicConfig::from_env()?;
    if let Some(model) = model {
        config.model = model;
    }
    let client = AnthropicClient::new(config);
    info!("Using model {}", client.model());

    Ok(QueryOrchestrator::new(index, Arc::new(client)))
}

fn list_weeks(input: PathBuf) -> Result<()> {
    let index = load_transcript_file(&input).context("Failed to load transcript")?;
    println!("{}", serde_json::to_string_pretty(index.weeks())?);
    Ok(())
}

fn print_statistics(input: PathBuf) -> Result<()> {
    let index = load_transcript_file(&input).context("Failed to load transcript")?;
    print!("{}", TranscriptStatistics::from_index(&index).format());
    Ok(())
}

async fn run_query(
    input: PathBuf,
    kind: KindArg,
    week_number: Option<u32>,
    model: Option<String>,
) -> Result<()> {
    let request = match kind {
        KindArg::Profile => QueryRequest::Profile { week_number },
        KindArg::Decisions => QueryRequest::Decisions { week_number },
        KindArg::Summary => QueryRequest::Summary { week_number },
        KindArg::Progress => QueryRequest::Progress,
    };

    let orchestrator = build_orchestrator(input, model)?;
    let response = orchestrator.run(request).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn export_analysis(input: PathBuf, output: PathBuf, model: Option<String>) -> Result<()> {
    let orchestrator = build_orchestrator(input, model)?;

    info!("Querying overall profile and decisions...");
    let (profile, decisions) = tokio::join!(
        orchestrator.query_member_profile(None),
        orchestrator.query_decisions(None)
    );

    let export = AnalysisExport::new(orchestrator.get_weeks(), profile, decisions);
    export.write_json(&output)?;

    info!(
        "Analysis for {} weeks written to {:?}",
        export.total_weeks, output
    );
    Ok(())
}
