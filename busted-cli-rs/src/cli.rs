use std::path::PathBuf;

use busted_sdk::config::{keys, MemoryConfigProvider};
use busted_sdk::services::similarity::{DEFAULT_MIN_SCORE, DEFAULT_TOP_K};
use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "git-busted",
    version,
    about = "Check a code snippet against the git-busted similarity service"
)]
pub(crate) struct Args {
    /// Base URL of the detection backend (overrides GIT_BUSTED_API_URL)
    #[arg(long, global = true)]
    pub(crate) api_url: Option<String>,
    /// Bearer token (overrides GIT_BUSTED_API_KEY)
    #[arg(long, global = true)]
    pub(crate) api_key: Option<String>,
    /// Request timeout in seconds (overrides GIT_BUSTED_TIMEOUT_SECONDS)
    #[arg(long, global = true)]
    pub(crate) timeout_secs: Option<u64>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Check code read from FILE, or from stdin when FILE is absent or "-"
    Check(CheckArgs),
    /// Send a raw request to the backend and print the response
    Call(CallArgs),
}

#[derive(ClapArgs, Debug)]
pub(crate) struct CheckArgs {
    pub(crate) file: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub(crate) top_k: u32,
    #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
    pub(crate) min_score: f64,
    /// Print the backend's result as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(ClapArgs, Debug)]
pub(crate) struct CallArgs {
    /// GET, POST, PUT, PATCH or DELETE
    pub(crate) method: String,
    /// Path relative to the base URL
    pub(crate) path: String,
    /// JSON request body
    #[arg(long)]
    pub(crate) data: Option<String>,
    /// Query parameter as key=value, repeatable
    #[arg(long = "query", value_parser = parse_key_val)]
    pub(crate) query: Vec<(String, String)>,
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

impl Args {
    /// Command-line settings, layered over the environment
    pub(crate) fn config_overrides(&self) -> MemoryConfigProvider {
        let mut provider = MemoryConfigProvider::new();
        if let Some(ref url) = self.api_url {
            provider.set(keys::API_URL, url);
        }
        if let Some(ref key) = self.api_key {
            provider.set(keys::API_KEY, key);
        }
        if let Some(secs) = self.timeout_secs {
            provider.set(keys::TIMEOUT_SECONDS, secs);
        }
        provider
    }
}
