//! Request and response bodies of Solr's JSON update API.

use serde::{Deserialize, Serialize};

use solr_sink_shared::Document;

/// `{"add": {"doc": {...}}}`
#[derive(Debug, Serialize)]
pub(crate) struct AddCommand<'a> {
    pub add: AddDocument<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddDocument<'a> {
    pub doc: &'a Document,
}

impl<'a> AddCommand<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            add: AddDocument { doc },
        }
    }
}

/// `{"commit": {}}`
#[derive(Debug, Serialize)]
pub(crate) struct CommitCommand {
    pub commit: CommitOptions,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct CommitOptions {}

impl CommitCommand {
    pub fn new() -> Self {
        Self {
            commit: CommitOptions::default(),
        }
    }
}

/// Header present on every Solr response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponseHeader {
    /// Zero on success.
    pub status: i32,
    /// Server-side processing time in milliseconds.
    #[serde(rename = "QTime", default)]
    pub qtime: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(rename = "responseHeader")]
    response_header: ResponseHeader,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PingResponse {
    status: String,
}

/// Parse the header of an update response.
pub(crate) fn parse_update_response(body: &str) -> Result<ResponseHeader, serde_json::Error> {
    serde_json::from_str::<UpdateResponse>(body).map(|r| r.response_header)
}

/// Extract `error.msg` from a Solr error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.error.msg)
}

/// Whether a ping response reports `"status": "OK"`.
pub(crate) fn ping_ok(body: &str) -> bool {
    serde_json::from_str::<PingResponse>(body)
        .map(|r| r.status.eq_ignore_ascii_case("ok"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_command_shape() {
        let mut doc = Document::new();
        doc.add_field("doc_title", "A");

        let json = serde_json::to_string(&AddCommand::new(&doc)).unwrap();

        assert_eq!(json, r#"{"add":{"doc":{"doc_title":"A"}}}"#);
    }

    #[test]
    fn test_commit_command_shape() {
        let json = serde_json::to_string(&CommitCommand::new()).unwrap();
        assert_eq!(json, r#"{"commit":{}}"#);
    }

    #[test]
    fn test_parse_update_response() {
        let header =
            parse_update_response(r#"{"responseHeader":{"status":0,"QTime":7}}"#).unwrap();
        assert_eq!(header.status, 0);
        assert_eq!(header.qtime, Some(7));
    }

    #[test]
    fn test_parse_update_response_missing_header() {
        assert!(parse_update_response(r#"{"ok":true}"#).is_err());
        assert!(parse_update_response("").is_err());
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"responseHeader":{"status":400},"error":{"msg":"unknown field 'x'","code":400}}"#;
        assert_eq!(error_message(body), Some("unknown field 'x'".to_string()));
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn test_ping_ok() {
        assert!(ping_ok(r#"{"responseHeader":{"status":0},"status":"OK"}"#));
        assert!(!ping_ok(r#"{"status":"FAIL"}"#));
        assert!(!ping_ok("garbage"));
    }
}
