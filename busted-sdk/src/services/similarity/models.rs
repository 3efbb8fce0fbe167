//! Similarity detection data models
//!
//! Request and response types of the `/detect_similarity` endpoint. The
//! backend is loose about its response: scores arrive as numeric strings,
//! and a "no strong match" answer carries nothing but a message, so every
//! response field is optional and unknown fields are kept.

use std::fmt;

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{ClientError, Result};

/// Number of matches requested by default
pub const DEFAULT_TOP_K: u32 = 10;

/// Minimum score a match must reach by default
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

/// Body of a similarity check request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRequest {
    /// The submitted code, untrimmed
    pub query: String,

    /// Maximum number of matches to return
    pub top_k: u32,

    /// Lowest score a match may have, in [0, 1]
    pub min_score: f64,
}

impl SimilarityRequest {
    /// Request with the default `top_k` and `min_score`
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(ClientError::request("query must not be empty"));
        }
        if self.top_k == 0 {
            return Err(ClientError::request("top_k must be a positive integer"));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(ClientError::request(format!(
                "min_score must be within [0, 1], got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// Status reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Confirmed high-similarity match
    Busted,
    Normal,
    /// Any other status text, kept verbatim
    Other(String),
}

impl CheckStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CheckStatus::Busted => "Busted",
            CheckStatus::Normal => "Normal",
            CheckStatus::Other(text) => text,
        }
    }
}

impl From<&str> for CheckStatus {
    fn from(text: &str) -> Self {
        match text {
            "Busted" => CheckStatus::Busted,
            "Normal" => CheckStatus::Normal,
            other => CheckStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CheckStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CheckStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(CheckStatus::from(text.as_str()))
    }
}

/// A similarity score as the backend sent it: a JSON number or a numeric
/// string. Serializes back in the same form.
#[derive(Debug, Clone, PartialEq)]
pub enum Score {
    Number(Number),
    Text(String),
}

impl Score {
    pub fn value(&self) -> f64 {
        match self {
            Score::Number(n) => n.as_f64().unwrap_or_default(),
            Score::Text(text) => text.trim().parse().unwrap_or_default(),
        }
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(Score::Number)
            .unwrap_or_else(|| Score::Text(value.to_string()))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Score::Number(n) => n.serialize(serializer),
            Score::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(Score::Number(n)),
            Value::String(text) if text.trim().parse::<f64>().is_ok() => Ok(Score::Text(text)),
            other => Err(de::Error::custom(format!("invalid score: {}", other))),
        }
    }
}

/// One corpus entry that matched the submitted code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub score: Score,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Fields this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How the view should read a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Positive plagiarism signal
    Busted,
    NoStrongMatch,
}

/// Response of a similarity check
///
/// A decoded result keeps the object it was decoded from and serializes
/// back to exactly that object, explicit nulls and string scores included.
/// Typed fields only fill in keys the object does not have.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimilarityResult {
    pub status: Option<CheckStatus>,
    pub message: Option<String>,
    pub similarity_score: Option<Score>,
    pub results: Option<Vec<Match>>,
    raw: Map<String, Value>,
}

#[derive(Deserialize)]
struct ResultFields {
    #[serde(default)]
    status: Option<CheckStatus>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    similarity_score: Option<Score>,
    #[serde(default)]
    results: Option<Vec<Match>>,
}

impl<'de> Deserialize<'de> for SimilarityResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let fields: ResultFields = serde_json::from_value(Value::Object(raw.clone()))
            .map_err(<D::Error as de::Error>::custom)?;

        Ok(Self {
            status: fields.status,
            message: fields.message,
            similarity_score: fields.similarity_score,
            results: fields.results,
            raw,
        })
    }
}

impl Serialize for SimilarityResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut object = self.raw.clone();
        let typed = [
            ("status", self.status.as_ref().map(|s| Value::from(s.as_str()))),
            ("message", self.message.clone().map(Value::from)),
            (
                "similarity_score",
                self.similarity_score
                    .as_ref()
                    .map(serde_json::to_value)
                    .transpose()
                    .map_err(<S::Error as ser::Error>::custom)?,
            ),
            (
                "results",
                self.results
                    .as_ref()
                    .map(serde_json::to_value)
                    .transpose()
                    .map_err(<S::Error as ser::Error>::custom)?,
            ),
        ];
        for (key, value) in typed {
            if let Some(value) = value {
                object.entry(key).or_insert(value);
            }
        }
        object.serialize(serializer)
    }
}

impl SimilarityResult {
    /// Only the literal status "Busted" is a positive signal
    pub fn verdict(&self) -> Verdict {
        match self.status {
            Some(CheckStatus::Busted) => Verdict::Busted,
            _ => Verdict::NoStrongMatch,
        }
    }

    pub fn is_busted(&self) -> bool {
        self.verdict() == Verdict::Busted
    }

    /// Status text, "Normal" when the backend sent none
    pub fn status_label(&self) -> &str {
        self.status
            .as_ref()
            .map(CheckStatus::as_str)
            .unwrap_or("Normal")
    }

    /// Matches in backend order; empty when absent
    pub fn matches(&self) -> &[Match] {
        self.results.as_deref().unwrap_or(&[])
    }

    /// The response object as received; empty for results built in code
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_busted_response() {
        let result: SimilarityResult = serde_json::from_value(json!({
            "status": "Busted",
            "similarity_score": "0.92",
            "message": "High similarity detected - possible copy-paste!"
        }))
        .unwrap();

        assert!(result.is_busted());
        assert_eq!(result.similarity_score, Some(Score::Text("0.92".to_string())));
        assert_eq!(result.similarity_score.as_ref().map(Score::value), Some(0.92));
        assert!(result.matches().is_empty());
    }

    #[test]
    fn test_lowercase_normal_is_kept_and_not_busted() {
        let result: SimilarityResult = serde_json::from_value(json!({
            "status": "normal",
            "similarity_score": 0.61,
            "results": [{"score": "0.61", "language": "Python"}, {"score": 0.55}]
        }))
        .unwrap();

        assert_eq!(result.verdict(), Verdict::NoStrongMatch);
        assert_eq!(result.status_label(), "normal");
        assert_eq!(result.matches().len(), 2);
        assert_eq!(result.matches()[0].language.as_deref(), Some("Python"));
        assert_eq!(result.matches()[1].language, None);
    }

    #[test]
    fn test_message_only_response() {
        let result: SimilarityResult =
            serde_json::from_value(json!({"message": "No matches found"})).unwrap();

        assert_eq!(result.status, None);
        assert_eq!(result.status_label(), "Normal");
        assert_eq!(result.similarity_score, None);
        assert!(!result.is_busted());
    }

    #[test]
    fn test_busted_is_case_sensitive() {
        let result: SimilarityResult = serde_json::from_value(json!({"status": "busted"})).unwrap();
        assert!(!result.is_busted());
    }

    #[test]
    fn test_unknown_fields_survive() {
        let body = json!({"status": "Busted", "similarity_score": 0.9, "repo": "octo/cat"});
        let result: SimilarityResult = serde_json::from_value(body).unwrap();

        assert_eq!(result.raw().get("repo"), Some(&json!("octo/cat")));
        assert_eq!(serde_json::to_value(&result).unwrap()["repo"], json!("octo/cat"));
    }

    #[test]
    fn test_backend_response_encodes_unchanged() {
        let body = json!({
            "status": "normal",
            "similarity_score": "0.61",
            "message": null,
            "results": [
                {"score": "0.61", "language": "Python"},
                {"score": 0.55, "language": null, "path": "src/a.py"}
            ]
        });
        let result: SimilarityResult = serde_json::from_value(body.clone()).unwrap();

        assert_eq!(result.message, None);
        assert_eq!(result.matches()[1].score.value(), 0.55);
        assert_eq!(serde_json::to_value(&result).unwrap(), body);
    }

    #[test]
    fn test_built_result_serializes_typed_fields() {
        let result = SimilarityResult {
            status: Some(CheckStatus::Busted),
            similarity_score: Some(Score::from(0.9)),
            ..Default::default()
        };

        assert!(result.raw().is_empty());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"status": "Busted", "similarity_score": 0.9})
        );
    }

    #[test]
    fn test_score_keeps_its_form() {
        let text: Score = serde_json::from_value(json!("0.70")).unwrap();
        let number: Score = serde_json::from_value(json!(0.7)).unwrap();

        assert_eq!(text.value(), number.value());
        assert_eq!(text.to_string(), "0.70");
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("0.70"));
        assert_eq!(serde_json::to_value(&number).unwrap(), json!(0.7));
        assert!(serde_json::from_value::<Score>(json!(null)).is_err());
    }

    #[test]
    fn test_bad_score_is_rejected() {
        let result = serde_json::from_value::<SimilarityResult>(json!({"similarity_score": "high"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_request_validation() {
        assert!(SimilarityRequest::new("print('hi')").validate().is_ok());
        assert!(SimilarityRequest::new("  \n").validate().is_err());
        assert!(SimilarityRequest::new("x").with_top_k(0).validate().is_err());
        assert!(SimilarityRequest::new("x").with_min_score(1.5).validate().is_err());
    }
}
