//! Similarity Check Example
//!
//! Sends a small snippet to the detection backend and prints the verdict.
//!
//! To run this example:
//! ```
//! GIT_BUSTED_API_URL=http://localhost:8000 cargo run --example detect_similarity
//! ```

use busted_sdk::{similarity_controller, CheckState, ClientConfig};

const SNIPPET: &str = r#"def fib(n):
    return n if n < 2 else fib(n - 1) + fib(n - 2)
"#;

#[tokio::main]
async fn main() -> busted_sdk::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Reads GIT_BUSTED_API_URL, GIT_BUSTED_API_KEY and GIT_BUSTED_TIMEOUT_SECONDS
    let config = ClientConfig::from_env()?;
    println!("Checking snippet against {}", config.base_url);

    let controller = similarity_controller(config)?;
    controller.check_code(SNIPPET).await;

    match controller.state() {
        CheckState::Success(result) => {
            println!("\nStatus: {}", result.status_label());
            if let Some(ref score) = result.similarity_score {
                println!("Similarity score: {}", score);
            }
            for (i, m) in result.matches().iter().enumerate() {
                println!(
                    "  {}. {} ({})",
                    i + 1,
                    m.score,
                    m.language.as_deref().unwrap_or("unknown")
                );
            }
            if let Some(message) = &result.message {
                println!("\n{}", message);
            }
        }
        CheckState::Error(message) => eprintln!("Error: {}", message),
        other => eprintln!("Unexpected state: {:?}", other),
    }

    Ok(())
}
