//! Plain-text rendering of check results

use std::fmt;

use busted_sdk::{CheckState, SimilarityResult};

/// Exit code for a check that found no strong match
pub(crate) const EXIT_NORMAL: u8 = 0;
/// Exit code for any error
pub(crate) const EXIT_ERROR: u8 = 1;
/// Exit code for a check with status "Busted"
pub(crate) const EXIT_BUSTED: u8 = 2;

/// Placeholder for fields the backend did not send
const NO_DATA: &str = "no data";

struct Report<'a>(&'a SimilarityResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let score = result
            .similarity_score
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| NO_DATA.to_string());

        if result.is_busted() {
            writeln!(f, "BUSTED!")?;
            if let Some(ref message) = result.message {
                writeln!(f, "{}", message)?;
            }
            return writeln!(f, "Similarity Score: {}", score);
        }

        writeln!(f, "Status: {}", result.status_label())?;
        writeln!(f, "Similarity Score: {}", score)?;

        let matches = result.matches();
        if !matches.is_empty() {
            writeln!(f, "Top Matches:")?;
            for (rank, m) in matches.iter().enumerate() {
                write!(f, "  {}. Score: {}", rank + 1, m.score)?;
                if let Some(ref language) = m.language {
                    write!(f, "  Language: {}", language)?;
                }
                writeln!(f)?;
            }
        }

        if let Some(ref message) = result.message {
            writeln!(f, "{}", message)?;
        }
        Ok(())
    }
}

pub(crate) fn render_result(result: &SimilarityResult) -> String {
    Report(result).to_string()
}

/// The result as the backend sent it, pretty-printed
pub(crate) fn render_json(result: &SimilarityResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Text for a settled controller state
pub(crate) fn render_state(state: &CheckState) -> String {
    match state {
        CheckState::Success(result) => render_result(result),
        CheckState::Error(message) => format!("Error: {}\n", message),
        CheckState::Checking => "Checking...\n".to_string(),
        CheckState::Idle => String::new(),
    }
}

pub(crate) fn exit_code(state: &CheckState) -> u8 {
    match state {
        CheckState::Success(result) if result.is_busted() => EXIT_BUSTED,
        CheckState::Success(_) => EXIT_NORMAL,
        _ => EXIT_ERROR,
    }
}
