//! Command-line caller surface for the pre-mortem signal engine.

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use premortem_core::{EngineResult, ResultConfidence, StartupContext};
use premortem_engine::{run_signal_engine, EngineParams};
use premortem_llm::OpenAiClient;
use premortem_reddit::RedditClient;

#[derive(Debug, Parser)]
#[command(name = "premortem")]
#[command(about = "Market-signal pre-mortem for startup ideas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the agentic Reddit signal engine against a startup idea.
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// One-line startup idea.
    #[arg(long)]
    idea: String,

    /// The problem being solved.
    #[arg(long, default_value = "")]
    problem: String,

    /// How the product solves it.
    #[arg(long, default_value = "")]
    solution: String,

    /// Technical details, features, target platform, etc.
    #[arg(long = "specs", default_value = "")]
    product_specs: String,

    /// Override the configured max feedback-loop iterations.
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Print the full result as JSON instead of a human-readable summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = premortem_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => analyze(&config, args).await,
    }
}

async fn analyze(config: &premortem_core::AppConfig, args: AnalyzeArgs) -> anyhow::Result<()> {
    let generator = OpenAiClient::new(config)?;
    let source = RedditClient::new(config)?;

    let context = StartupContext {
        idea: args.idea,
        problem: args.problem,
        solution: args.solution,
        product_specs: args.product_specs,
    };
    let mut params = EngineParams::from(config);
    if let Some(max_iterations) = args.max_iterations {
        params.max_iterations = max_iterations;
    }

    // Drain progress events onto stderr so the report stays pipeable.
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<premortem_engine::StatusUpdate>();
    let progress_task = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            eprintln!("[{}] {}", update.stage, update.detail);
        }
    });

    let result = run_signal_engine(&generator, &source, &context, params, Some(tx)).await?;
    let _ = progress_task.await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }
    Ok(())
}

fn print_summary(result: &EngineResult) {
    println!("{}", result.report);
    println!();
    println!("--- Scores ---");
    println!("demand_score:                {}", result.scores.demand_score);
    println!("pain_validation:             {}", result.scores.pain_validation);
    println!("competition_risk:            {}", result.scores.competition_risk);
    println!(
        "overall_failure_probability: {}",
        result.scores.overall_failure_probability
    );
    println!();
    println!(
        "{} signals across {} iterations in {}s ({} queries)",
        result.threads.len(),
        result.iterations,
        result.elapsed_seconds,
        result.queries_used.len()
    );
    if result.confidence == ResultConfidence::InsufficientEvidence {
        println!("NOTE: no usable signals were found; treat this run as inconclusive.");
    }
    if result.coverage.has_gaps {
        println!("Coverage gaps: {}", result.coverage.gaps.join("; "));
    }
}
