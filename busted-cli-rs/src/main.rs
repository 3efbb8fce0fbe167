// busted-cli-rs/src/main.rs
// Command-line front end: reads code, runs a similarity check, prints the verdict

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use busted_sdk::config::{ClientConfig, CompositeConfigProvider, EnvConfigProvider, ENV_PREFIX};
use busted_sdk::{
    CheckOutcome, CheckState, ClientBuilder, Method, RequestDescriptor, ResponseBody,
    SimilarityCheckController, SimilarityService,
};
use clap::Parser;
use log::{debug, info};

mod cli;
mod report;

use cli::{Args, CallArgs, CheckArgs, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    logger_from_environment(None).init();

    let args = Args::parse();

    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(report::EXIT_ERROR)
        }
    }
}

/// Load `.env` (from `dotenv_path`, or the working directory), then build the
/// logger so a RUST_LOG set there applies
fn logger_from_environment(dotenv_path: Option<&Path>) -> env_logger::Builder {
    match dotenv_path {
        Some(path) => dotenv::from_path(path).ok(),
        None => dotenv::dotenv().ok().map(|_| ()),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
}

async fn run(args: Args) -> anyhow::Result<u8> {
    // Flags win over GIT_BUSTED_* variables
    let provider = CompositeConfigProvider::new()
        .with_provider(args.config_overrides())
        .with_provider(EnvConfigProvider::new().with_prefix(ENV_PREFIX));
    let config = ClientConfig::from_provider(&provider).context("Invalid configuration")?;
    info!(
        "Using backend {} (auth: {})",
        config.base_url,
        if config.has_api_key() { "bearer" } else { "none" }
    );

    match args.command {
        Command::Check(check) => run_check(config, check).await,
        Command::Call(call) => run_call(config, call).await,
    }
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    let mut code = String::new();
    match file {
        Some(path) if path != Path::new("-") => {
            code = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
        }
        _ => {
            std::io::stdin()
                .read_to_string(&mut code)
                .context("Failed to read code from stdin")?;
        }
    }
    Ok(code)
}

async fn run_check(config: ClientConfig, args: CheckArgs) -> anyhow::Result<u8> {
    let code = read_input(args.file.as_deref())?;
    debug!("Read {} bytes of code", code.len());

    let client = ClientBuilder::from_config(config).build()?;
    let controller = SimilarityCheckController::new(SimilarityService::new(client))
        .with_parameters(args.top_k, args.min_score);

    let mut rx = controller.subscribe();
    let progress = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            if rx.borrow_and_update().is_checking() {
                eprintln!("Checking...");
            }
        }
    });

    let outcome = controller.check_code(&code).await;
    progress.abort();

    let state = match outcome {
        CheckOutcome::Applied(state) => state,
        CheckOutcome::Superseded => bail!("Check was superseded"),
    };

    match (&state, args.json) {
        (CheckState::Success(result), true) => {
            println!("{}", report::render_json(result)?);
        }
        (CheckState::Error(_), _) => eprint!("{}", report::render_state(&state)),
        _ => print!("{}", report::render_state(&state)),
    }

    Ok(report::exit_code(&state))
}

async fn run_call(config: ClientConfig, args: CallArgs) -> anyhow::Result<u8> {
    let method: Method = args.method.parse()?;
    let mut descriptor = RequestDescriptor::new(method, args.path);

    if let Some(ref data) = args.data {
        let body: serde_json::Value =
            serde_json::from_str(data).context("--data must be valid JSON")?;
        descriptor = descriptor.with_body(body);
    }
    if !args.query.is_empty() {
        if method != Method::Get {
            bail!("--query is only supported with GET");
        }
        let query: HashMap<String, String> = args.query.into_iter().collect();
        descriptor = descriptor.with_query(query);
    }

    let client = ClientBuilder::from_config(config).build()?;
    match client.send(descriptor).await {
        Ok(ResponseBody::Json(value)) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(report::EXIT_NORMAL)
        }
        Ok(ResponseBody::Text(text)) => {
            println!("{}", text);
            Ok(report::EXIT_NORMAL)
        }
        Err(err) => {
            match err.http_status() {
                Some(status) => eprintln!("Error: {} (status {})", err.message(), status),
                None => eprintln!("Error: {}", err.message()),
            }
            Ok(report::EXIT_ERROR)
        }
    }
}
