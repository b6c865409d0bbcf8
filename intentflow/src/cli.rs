use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use intentflow::approval::{AutoApprove, Confirmer, PromptConfirmer};
use intentflow::cancellation::CancellationToken;
use intentflow::config::EngineConfig;
use intentflow::context::RunContext;
use intentflow::errors::IntentflowError;
use intentflow::scenarios::{self, Scenario};
use intentflow::{ConfirmationPolicy, IntentEngine};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::console::{self, ConsoleEventSink};

const INTERRUPTED: &str = "interrupted by user";

#[derive(Debug, Parser)]
#[command(
    name = "intentflow",
    version,
    about = "Turn a plain-language request into a video processing workflow"
)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read requests from the terminal and run them without confirmation
    Interactive,
    /// Run a list of scenarios, confirming each plan
    Batch(BatchArgs),
    /// Run a single request
    Run(RunArgs),
    /// Print the plan for a request without running it
    Plan(PlanArgs),
    /// List the available tools
    Capabilities,
}

#[derive(Debug, Args, Clone)]
struct BatchArgs {
    /// JSON file holding `[{"name": ..., "request": ...}]`; built-in scenarios otherwise
    #[arg(long)]
    file: Option<PathBuf>,
    /// Approve every plan without asking
    #[arg(long)]
    yes: bool,
}

#[derive(Debug, Args, Clone)]
struct RunArgs {
    /// Ask before running the plan
    #[arg(long)]
    confirm: bool,
    #[arg(value_name = "REQUEST", required = true)]
    request: Vec<String>,
}

#[derive(Debug, Args, Clone)]
struct PlanArgs {
    #[arg(value_name = "REQUEST", required = true)]
    request: Vec<String>,
}

impl Cli {
    /// Runs the selected command. Request failures are reported on the
    /// console and turned into a failing exit code rather than an error.
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut config = EngineConfig::load(self.config.as_deref())
            .context("failed to load configuration")?;
        if self.verbose {
            config.log_level = "debug".to_string();
        }
        init_tracing(&config.log_level);

        match self.command {
            None | Some(Command::Interactive) => run_interactive(&config).await?,
            Some(Command::Batch(args)) => run_batch(&config, args).await?,
            Some(Command::Run(args)) => {
                return Ok(run_once(&config, &args.request.join(" "), args.confirm).await);
            }
            Some(Command::Plan(args)) => {
                let engine = IntentEngine::from_config(&config);
                let plan = engine.plan(&args.request.join(" "));
                println!("{}", serde_json::to_string_pretty(&plan)?);
            }
            Some(Command::Capabilities) => {
                console::print_capabilities(&IntentEngine::from_config(&config).capabilities());
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn init_tracing(level: &str) {
    let fallback = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn request_context(config: &EngineConfig, token: Arc<CancellationToken>) -> RunContext {
    RunContext::new()
        .with_token(token)
        .with_timeout(config.request_timeout())
        .with_event_sink(Arc::new(ConsoleEventSink))
}

/// Runs one request, cancelling it if Ctrl-C arrives first.
async fn process_cancellable(
    engine: &IntentEngine,
    config: &EngineConfig,
    request: &str,
    policy: ConfirmationPolicy,
) -> Result<intentflow::RequestOutcome, IntentflowError> {
    let token = Arc::new(CancellationToken::new());
    let ctx = request_context(config, token.clone());

    let work = engine.process(&ctx, request, policy);
    tokio::pin!(work);

    tokio::select! {
        result = &mut work => result,
        _ = tokio::signal::ctrl_c() => {
            token.cancel(INTERRUPTED);
            work.await
        }
    }
}

async fn run_interactive(config: &EngineConfig) -> anyhow::Result<()> {
    let engine = IntentEngine::from_config(config);
    console::print_welcome();
    console::print_capabilities(&engine.capabilities());
    println!("\nInteractive mode ('quit' or 'exit' to leave, 'help' for help)");
    println!("{}", console::rule('-'));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\nWhat would you like to do? ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!("\n\nInterrupted, exiting.");
                return Ok(());
            }
        };
        let Some(line) = line else {
            println!();
            return Ok(());
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye!");
                return Ok(());
            }
            "help" | "h" => {
                console::print_help();
                continue;
            }
            "clear" | "cls" => {
                console::clear_screen();
                continue;
            }
            "capabilities" | "cap" => {
                console::print_capabilities(&engine.capabilities());
                continue;
            }
            _ => {}
        }

        println!("\n{}", console::rule('-'));
        let result = process_cancellable(&engine, config, input, ConfirmationPolicy::Skip).await;
        console::print_outcome(&result);
        println!("{}", console::rule('-'));
    }
}

async fn run_batch(config: &EngineConfig, args: BatchArgs) -> anyhow::Result<()> {
    let scenarios: Vec<Scenario> = match &args.file {
        Some(path) => scenarios::load(path)?,
        None => scenarios::builtin_scenarios(),
    };
    let confirmer: Arc<dyn Confirmer> = if args.yes {
        Arc::new(AutoApprove)
    } else {
        Arc::new(PromptConfirmer::stdio().with_plan_listing(false))
    };
    let engine = IntentEngine::from_config(config).with_confirmer(confirmer);
    info!(count = scenarios.len(), "Running batch");

    for (i, scenario) in scenarios.iter().enumerate() {
        println!("Scenario {}: {}", i + 1, scenario.name);
        println!("{}", console::rule('-'));
        println!("Request: {}\n", scenario.request);

        let result =
            process_cancellable(&engine, config, &scenario.request, ConfirmationPolicy::Required)
                .await;
        console::print_outcome(&result);
        if matches!(&result, Err(err) if err.is_cancellation()) {
            println!("Batch stopped.");
            break;
        }

        if i + 1 < scenarios.len() {
            println!("\n{}\n", console::rule('='));
            tokio::time::sleep(config.scenario_pause()).await;
        }
    }
    Ok(())
}

async fn run_once(config: &EngineConfig, request: &str, confirm: bool) -> ExitCode {
    let policy = if confirm {
        ConfirmationPolicy::Required
    } else {
        ConfirmationPolicy::Skip
    };
    let engine = IntentEngine::from_config(config)
        .with_confirmer(Arc::new(PromptConfirmer::stdio().with_plan_listing(false)));

    let result = process_cancellable(&engine, config, request, policy).await;
    console::print_outcome(&result);
    exit_code(&result)
}

fn exit_code(result: &Result<intentflow::RequestOutcome, IntentflowError>) -> ExitCode {
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
