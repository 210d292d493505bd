use serde_json::Value;
use thiserror::Error;

/// Failure of a single upstream call.
///
/// State holders never expose this type; they render it into their `error`
/// string with `to_string()`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Unexpected {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

const MAX_MESSAGE_CHARS: usize = 200;

/// Pull a human readable message out of an upstream error body.
///
/// TMDb answers with `status_message`, Google with `error.message`, Spotify with
/// either `error.message` or the OAuth `error_description`.
pub fn upstream_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let candidates = [
            value.get("status_message"),
            value.get("error").and_then(|e| e.get("message")),
            value.get("error_description"),
            value.get("message"),
            value.get("error"),
        ];
        if let Some(msg) = candidates
            .into_iter()
            .flatten()
            .find_map(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
        {
            return msg.trim().to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    trimmed.chars().take(MAX_MESSAGE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_tmdb_status_message() {
        let body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;
        assert_eq!(
            upstream_message(body),
            "Invalid API key: You must be granted a valid key."
        );
    }

    #[test]
    fn extracts_nested_google_and_spotify_messages() {
        let google = r#"{"error":{"code":400,"message":"Missing query.","errors":[]}}"#;
        assert_eq!(upstream_message(google), "Missing query.");

        let spotify = r#"{"error":{"status":401,"message":"The access token expired"}}"#;
        assert_eq!(upstream_message(spotify), "The access token expired");
    }

    #[test]
    fn oauth_error_prefers_description() {
        let body = r#"{"error":"invalid_client","error_description":"Invalid client secret"}"#;
        assert_eq!(upstream_message(body), "Invalid client secret");
    }

    #[test]
    fn falls_back_to_truncated_plain_text() {
        assert_eq!(upstream_message("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(upstream_message(""), "no response body");
        let long = "x".repeat(500);
        assert_eq!(upstream_message(&long).len(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn status_error_reads_like_a_sentence() {
        let err = ApiError::Status {
            service: "TMDb",
            status: 404,
            message: "The resource you requested could not be found.".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "TMDb returned HTTP 404: The resource you requested could not be found."
        );
    }
}
