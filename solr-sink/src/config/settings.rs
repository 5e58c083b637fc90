//! Settings read from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::IndexingError;
use solr_sink_pipeline::config::{DEFAULT_BATCH_SIZE, DEFAULT_FEEDBACK_INTERVAL};
use solr_sink_pipeline::SinkConfig;
use solr_sink_repository::config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CONNECTIONS_PER_HOST, DEFAULT_MAX_TOTAL_CONNECTIONS,
    DEFAULT_REQUEST_TIMEOUT,
};
use solr_sink_repository::ClientConfig;
use solr_sink_shared::FieldMapping;

/// Default size of the channel between the CSV reader and the sink.
const DEFAULT_CHANNEL_BUFFER_SIZE: usize = 1000;

/// Default CSV field delimiter.
const DEFAULT_CSV_DELIMITER: u8 = b',';

/// Everything the sink process needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Sink and client settings.
    pub sink: SinkConfig,
    /// Check the Solr ping handler before reading any row.
    pub ping_on_start: bool,
    /// CSV input file; stdin when unset.
    pub input: Option<PathBuf>,
    /// JSON-lines output file; stdout when unset.
    pub output: Option<PathBuf>,
    /// CSV field delimiter.
    pub csv_delimiter: u8,
    /// Rows buffered between the reader and the sink.
    pub channel_buffer_size: usize,
}

impl AppConfig {
    /// Load settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SOLR_URL`: Update handler URL (required)
    /// - `SOLR_FIELD_MAPPINGS`: `source:target` pairs, comma separated (required)
    /// - `SOLR_BATCH_SIZE`: Documents per commit (default: 1000)
    /// - `SOLR_COMMIT_ON_END`: Commit the partial batch at end of input (default: false)
    /// - `SOLR_CONNECT_TIMEOUT_SECS`: Connect timeout (default: 5)
    /// - `SOLR_REQUEST_TIMEOUT_SECS`: Request timeout (default: 30)
    /// - `SOLR_MAX_CONNECTIONS_PER_HOST`: Idle pool size per host (default: 100)
    /// - `SOLR_MAX_TOTAL_CONNECTIONS`: Requests in flight (default: 100)
    /// - `SOLR_PING_ON_START`: Health check before running (default: false)
    /// - `SINK_STATUS_FIELD`: Marker column appended to forwarded rows (default: none)
    /// - `SINK_FEEDBACK_INTERVAL`: Rows between progress logs, 0 disables (default: 50000)
    /// - `SINK_INPUT`: CSV input path (default: stdin)
    /// - `SINK_OUTPUT`: JSON-lines output path (default: stdout)
    /// - `SINK_CSV_DELIMITER`: Single-byte CSV delimiter (default: `,`)
    /// - `SINK_CHANNEL_BUFFER_SIZE`: Rows buffered from the reader (default: 1000)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = required(&lookup, "SOLR_URL")?;
        let mappings = parse_mappings(&required(&lookup, "SOLR_FIELD_MAPPINGS")?)?;

        let client = ClientConfig::default()
            .with_connect_timeout(Duration::from_secs(parse_or(
                &lookup,
                "SOLR_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT.as_secs(),
            )?))
            .with_request_timeout(Duration::from_secs(parse_or(
                &lookup,
                "SOLR_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT.as_secs(),
            )?))
            .with_connection_limits(
                parse_or(
                    &lookup,
                    "SOLR_MAX_CONNECTIONS_PER_HOST",
                    DEFAULT_MAX_CONNECTIONS_PER_HOST,
                )?,
                parse_or(
                    &lookup,
                    "SOLR_MAX_TOTAL_CONNECTIONS",
                    DEFAULT_MAX_TOTAL_CONNECTIONS,
                )?,
            );

        let mut sink = SinkConfig::new(endpoint, mappings)
            .with_batch_size(parse_or(&lookup, "SOLR_BATCH_SIZE", DEFAULT_BATCH_SIZE)?)
            .with_commit_on_end(parse_bool(&lookup, "SOLR_COMMIT_ON_END", false)?)
            .with_feedback_interval(parse_or(
                &lookup,
                "SINK_FEEDBACK_INTERVAL",
                DEFAULT_FEEDBACK_INTERVAL,
            )?)
            .with_client_config(client);
        if let Some(field) = optional(&lookup, "SINK_STATUS_FIELD") {
            sink = sink.with_status_field(field);
        }
        sink.validate()?;

        let channel_buffer_size =
            parse_or(&lookup, "SINK_CHANNEL_BUFFER_SIZE", DEFAULT_CHANNEL_BUFFER_SIZE)?;
        if channel_buffer_size == 0 {
            return Err(IndexingError::config(
                "SINK_CHANNEL_BUFFER_SIZE must be positive",
            ));
        }

        Ok(Self {
            sink,
            ping_on_start: parse_bool(&lookup, "SOLR_PING_ON_START", false)?,
            input: optional(&lookup, "SINK_INPUT").map(PathBuf::from),
            output: optional(&lookup, "SINK_OUTPUT").map(PathBuf::from),
            csv_delimiter: parse_delimiter(&lookup)?,
            channel_buffer_size,
        })
    }
}

/// Parse `source:target` pairs. A bare name maps a field to itself.
fn parse_mappings(raw: &str) -> Result<Vec<FieldMapping>, IndexingError> {
    let mut mappings = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (source, target) = match entry.split_once(':') {
            Some((source, target)) => (source.trim(), target.trim()),
            None => (entry, entry),
        };
        if source.is_empty() || target.is_empty() {
            return Err(IndexingError::config(format!(
                "invalid field mapping [{}], expected source:target",
                entry
            )));
        }
        mappings.push(FieldMapping::new(source, target));
    }

    if mappings.is_empty() {
        return Err(IndexingError::config(
            "SOLR_FIELD_MAPPINGS must contain at least one mapping",
        ));
    }
    Ok(mappings)
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String, IndexingError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| IndexingError::config(format!("{} is required", key)))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, IndexingError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(lookup, key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| IndexingError::config(format!("invalid {} [{}]: {}", key, raw, e))),
        None => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> Result<bool, IndexingError>
where
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, key).map(|v| v.to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(IndexingError::config(format!(
                "invalid {} [{}], expected true or false",
                key, v
            ))),
        },
    }
}

fn parse_delimiter<F>(lookup: &F) -> Result<u8, IndexingError>
where
    F: Fn(&str) -> Option<String>,
{
    // not trimmed: a tab delimiter is whitespace
    match lookup("SINK_CSV_DELIMITER").filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_CSV_DELIMITER),
        Some(raw) if raw.len() == 1 => Ok(raw.as_bytes()[0]),
        Some(raw) => Err(IndexingError::config(format!(
            "SINK_CSV_DELIMITER must be a single byte, got [{}]",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, IndexingError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SOLR_URL", "http://idx.example/update"),
            ("SOLR_FIELD_MAPPINGS", "title:doc_title, body:doc_body"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = load(&base()).unwrap();

        assert_eq!(config.sink.endpoint, "http://idx.example/update");
        assert_eq!(
            config.sink.mappings,
            vec![
                FieldMapping::new("title", "doc_title"),
                FieldMapping::new("body", "doc_body"),
            ]
        );
        assert_eq!(config.sink.batch_size, 1000);
        assert!(!config.sink.commit_on_end);
        assert_eq!(config.sink.client, ClientConfig::default());
        assert!(!config.ping_on_start);
        assert!(config.input.is_none());
        assert_eq!(config.csv_delimiter, b',');
    }

    #[test]
    fn test_overrides() {
        let mut vars = base();
        vars.extend([
            ("SOLR_BATCH_SIZE", "2"),
            ("SOLR_COMMIT_ON_END", "yes"),
            ("SOLR_CONNECT_TIMEOUT_SECS", "10"),
            ("SOLR_MAX_TOTAL_CONNECTIONS", "8"),
            ("SINK_STATUS_FIELD", "result"),
            ("SINK_INPUT", "/tmp/rows.csv"),
            ("SINK_CSV_DELIMITER", ";"),
        ]);

        let config = load(&vars).unwrap();

        assert_eq!(config.sink.batch_size, 2);
        assert!(config.sink.commit_on_end);
        assert_eq!(config.sink.client.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.sink.client.max_total_connections, 8);
        assert_eq!(config.sink.status_field.as_deref(), Some("result"));
        assert_eq!(config.input, Some(PathBuf::from("/tmp/rows.csv")));
        assert_eq!(config.csv_delimiter, b';');
    }

    #[test]
    fn test_missing_url() {
        let err = load(&[("SOLR_FIELD_MAPPINGS", "title")]).unwrap_err();
        assert!(err.to_string().contains("SOLR_URL"));
    }

    #[test]
    fn test_bare_mapping_maps_to_itself() {
        let mappings = parse_mappings("id, title:doc_title").unwrap();
        assert_eq!(mappings[0], FieldMapping::new("id", "id"));
        assert_eq!(mappings[1], FieldMapping::new("title", "doc_title"));
    }

    #[test]
    fn test_invalid_mappings() {
        assert!(parse_mappings("").is_err());
        assert!(parse_mappings("title:").is_err());
        assert!(parse_mappings(":doc_title").is_err());
    }

    #[test]
    fn test_invalid_numbers() {
        let mut vars = base();
        vars.push(("SOLR_BATCH_SIZE", "lots"));
        assert!(matches!(load(&vars), Err(IndexingError::ConfigError(_))));

        let mut vars = base();
        vars.push(("SOLR_BATCH_SIZE", "0"));
        assert!(matches!(load(&vars), Err(IndexingError::SinkError(_))));
    }

    #[test]
    fn test_invalid_bool() {
        let mut vars = base();
        vars.push(("SOLR_COMMIT_ON_END", "maybe"));
        assert!(load(&vars).is_err());
    }
}
