//! Protocol Messages
//!
//! JSON bodies for the leaderboard HTTP API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// =============================================================================
// SCORE VALUE
// =============================================================================

/// A submitted score.
///
/// Scores are arbitrary non-negative numbers. Integral values serialize as
/// JSON integers (`30`, not `30.0`).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Score(pub f64);

impl Score {
    /// Largest float that still converts to an integer exactly.
    const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

    /// Raw value.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.fract() == 0.0 && v.abs() <= Self::MAX_EXACT_INT {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Score)
    }
}

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

/// Body of `POST /api/score`.
///
/// Parsed leniently from arbitrary JSON: missing or wrongly typed fields
/// become `None`, and the service decides whether that is an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitScoreRequest {
    /// Numeric score, if one could be read
    pub score: Option<f64>,
    /// Claimed user id
    pub fid: Option<u64>,
    /// Claimed display name
    pub username: Option<String>,
}

impl SubmitScoreRequest {
    /// Parse from a JSON body. An empty body is an empty object.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from_value(&value))
    }

    /// Extract fields from an already parsed JSON value.
    pub fn from_value(value: &Value) -> Self {
        Self {
            score: value.get("score").and_then(coerce_number),
            fid: value.get("fid").and_then(Value::as_u64),
            username: value
                .get("username")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Read a JSON number, or a string holding one.
///
/// `null`, booleans, empty strings, arrays and objects give `None`.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

// =============================================================================
// STORED RECORDS
// =============================================================================

/// One stored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Claimed user id
    pub fid: Option<u64>,
    /// Claimed display name
    pub username: Option<String>,
    /// Submitted score
    pub score: Score,
    /// Server receive time
    #[serde(rename = "createdAt", serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2026-10-16T10:31:00.000Z`.
fn serialize_timestamp<S: Serializer>(
    ts: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

/// Echo of an accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedScore {
    /// Claimed user id
    pub fid: Option<u64>,
    /// Claimed display name
    pub username: Option<String>,
    /// Accepted score
    pub score: Score,
}

/// `POST /api/score` success body.
#[derive(Debug, Serialize)]
pub struct SubmitScoreResponse {
    /// Always true
    pub ok: bool,
    /// What was stored
    pub saved: SavedScore,
}

impl SubmitScoreResponse {
    /// Wrap a saved score.
    pub fn new(saved: SavedScore) -> Self {
        Self { ok: true, saved }
    }
}

/// `GET /api/leaderboard` body.
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    /// Always true
    pub ok: bool,
    /// Highest scores first
    pub top: Vec<ScoreRecord>,
    /// Number of stored records
    pub total: usize,
}

impl LeaderboardResponse {
    /// Build from a ranked slice and total count.
    pub fn new(top: Vec<ScoreRecord>, total: usize) -> Self {
        Self { ok: true, top, total }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false
    pub ok: bool,
    /// Short machine-readable reason
    pub error: String,
}

impl ErrorResponse {
    /// Build an error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_full_request() {
        let req = SubmitScoreRequest::from_json(br#"{"score": 30, "fid": 1, "username": "alice"}"#)
            .unwrap();
        assert_eq!(req.score, Some(30.0));
        assert_eq!(req.fid, Some(1));
        assert_eq!(req.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_parse_lenient_fields() {
        let body = br#"{"score": " 12.5 ", "fid": null, "username": 5}"#;
        let req = SubmitScoreRequest::from_json(body).unwrap();
        assert_eq!(req.score, Some(12.5));
        assert_eq!(req.fid, None);
        assert_eq!(req.username, None);

        let req = SubmitScoreRequest::from_json(br#"{"score": true}"#).unwrap();
        assert_eq!(req.score, None);

        let req = SubmitScoreRequest::from_json(br#"{"score": ""}"#).unwrap();
        assert_eq!(req.score, None);

        let req = SubmitScoreRequest::from_json(br#"{"score": "Infinity"}"#).unwrap();
        assert_eq!(req.score, Some(f64::INFINITY));
    }

    #[test]
    fn test_parse_empty_and_invalid() {
        assert_eq!(SubmitScoreRequest::from_json(b"").unwrap(), SubmitScoreRequest::default());
        assert_eq!(SubmitScoreRequest::from_json(b"  \n").unwrap(), SubmitScoreRequest::default());
        assert!(SubmitScoreRequest::from_json(b"{not json").is_err());

        // Non-object JSON has no fields
        assert_eq!(SubmitScoreRequest::from_json(b"[1,2]").unwrap(), SubmitScoreRequest::default());
    }

    #[test]
    fn test_score_serialization() {
        assert_eq!(serde_json::to_string(&Score(30.0)).unwrap(), "30");
        assert_eq!(serde_json::to_string(&Score(12.5)).unwrap(), "12.5");
        assert_eq!(serde_json::to_string(&Score(0.0)).unwrap(), "0");
        assert_eq!(serde_json::from_str::<Score>("7").unwrap(), Score(7.0));
    }

    #[test]
    fn test_record_json_shape() {
        let record = ScoreRecord {
            fid: Some(2),
            username: None,
            score: Score(50.0),
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 10, 31, 0).unwrap(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"fid":2,"username":null,"score":50,"createdAt":"2026-10-16T10:31:00.000Z"}"#
        );

        let back: ScoreRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_string(&ErrorResponse::new("invalid score")).unwrap();
        assert_eq!(json, r#"{"ok":false,"error":"invalid score"}"#);
    }
}
