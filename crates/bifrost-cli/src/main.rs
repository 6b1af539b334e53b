//! Bifrost host simulator.
//!
//! Starts a loopback engine, opens two page containers and walks them
//! through the lifecycle protocol, printing every host and engine event in
//! order.
//!
//! # Configuration
//!
//! Loaded with the usual priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`BIFROST_*`)
//! 3. Project config (`.bifrost/config.toml` under `--project`)
//! 4. Global config (`~/.bifrost/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `BIFROST_DEBUG`: Enable debug mode (`true`/`false`)
//! - `BIFROST_ENTRYPOINT`: Entry point run on start
//! - `BIFROST_CAN_POP_TIMEOUT_MS`: Upper bound on a `canPop` round trip

use anyhow::{Context, Result};
use bifrost_event::{MethodCall, Reply};
use bifrost_runtime::channel::MethodCallHandler;
use bifrost_runtime::page::PageOptions;
use bifrost_runtime::testing::{CanPopAnswer, FakeEngine, FakeRuntime, Journal, RecordingHost};
use bifrost_runtime::{Bifrost, BifrostConfig, ConfigLoader};
use clap::{Parser, ValueEnum};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Bifrost host simulator
#[derive(Parser, Debug)]
#[command(name = "bifrost")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Route of the first page
    #[arg(long, default_value = "/greetings")]
    route: String,

    /// How the simulated engine answers `canPop`
    #[arg(long, value_enum, default_value_t = Answer::Yes)]
    can_pop: Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Answer {
    Yes,
    No,
    Error,
    Drop,
    /// Never answer; the host falls back after the configured timeout
    Hold,
}

impl From<Answer> for CanPopAnswer {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Yes => Self::Yes,
            Answer::No => Self::No,
            Answer::Error => Self::Error,
            Answer::Drop => Self::Drop,
            Answer::Hold => Self::Hold,
        }
    }
}

fn resolve_config(args: &Args) -> Result<BifrostConfig> {
    let project_root = match &args.project {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let mut config = ConfigLoader::new()
        .with_project_root(project_root)
        .load()
        .context("config error")?;

    if args.debug {
        config.debug = true;
    }
    Ok(config)
}

fn init_tracing(args: &Args, config: &BifrostConfig) {
    // --debug > --verbose > RUST_LOG > "warn"
    let filter = if args.debug || config.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn common_handler() -> Arc<dyn MethodCallHandler> {
    Arc::new(|call: MethodCall, reply: Reply| match call.method.as_str() {
        "platformVersion" => reply.success(json!(env!("CARGO_PKG_VERSION"))),
        _ => reply.not_implemented(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    init_tracing(&args, &config);

    println!("Bifrost simulator v{}", env!("CARGO_PKG_VERSION"));

    let runtime = FakeRuntime::new();
    let journal = Journal::new();
    let fake = FakeEngine::attach(&runtime.messenger(), &journal);
    fake.set_can_pop(args.can_pop.into());

    let bifrost = Bifrost::new(config);
    bifrost.register_notification("greeting", |arguments: &Value| {
        info!(%arguments, "greeting from engine");
    });
    bifrost
        .start(Arc::new(runtime), Some(common_handler()))
        .context("engine failed to start")?;

    let first = bifrost.create_page(
        PageOptions::new(args.route.clone()).with_arguments(json!({"from": "simulator"})),
        RecordingHost::new("first", &journal),
    )?;
    first.on_appear();

    let handled = fake.notify("greeting", json!("hello")).wait(None).await?;
    println!("notification handled: {handled}");

    let outcome = first.back_pressed().await;
    println!("back press on {}: {outcome:?}", first.id());

    let second = bifrost.create_page(
        PageOptions::new("/details"),
        RecordingHost::new("second", &journal),
    )?;
    second.on_appear();
    first.on_disappear();

    fake.pop_view_controller().wait(None).await?;

    second.teardown();
    drop(first);

    println!();
    for entry in journal.entries() {
        println!("  {entry}");
    }
    Ok(())
}
