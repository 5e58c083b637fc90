//! Configuration types for the index client.

use std::time::Duration;

use crate::errors::IndexError;

/// Default time allowed to establish a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default time allowed for a whole request, including the response body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default size of the idle connection pool per host.
pub const DEFAULT_MAX_CONNECTIONS_PER_HOST: usize = 100;

/// Default cap on requests in flight across all hosts.
pub const DEFAULT_MAX_TOTAL_CONNECTIONS: usize = 100;

/// Connection settings for the index client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
    /// Time allowed for a whole request.
    pub request_timeout: Duration,
    /// Maximum idle connections kept per host.
    pub max_connections_per_host: usize,
    /// Maximum number of requests in flight at once.
    pub max_total_connections: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_connections_per_host: DEFAULT_MAX_CONNECTIONS_PER_HOST,
            max_total_connections: DEFAULT_MAX_TOTAL_CONNECTIONS,
        }
    }
}

impl ClientConfig {
    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the per-host and total connection limits.
    pub fn with_connection_limits(mut self, per_host: usize, total: usize) -> Self {
        self.max_connections_per_host = per_host;
        self.max_total_connections = total;
        self
    }

    /// Reject zero timeouts and zero-sized pools.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.connect_timeout.is_zero() {
            return Err(IndexError::invalid_config("connect timeout must be positive"));
        }
        if self.request_timeout.is_zero() {
            return Err(IndexError::invalid_config("request timeout must be positive"));
        }
        if self.max_connections_per_host == 0 {
            return Err(IndexError::invalid_config(
                "max connections per host must be positive",
            ));
        }
        if self.max_total_connections == 0 {
            return Err(IndexError::invalid_config(
                "max total connections must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.max_connections_per_host, 100);
        assert_eq!(config.max_total_connections, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let config = ClientConfig::default().with_connection_limits(0, 10);
        assert!(matches!(
            config.validate(),
            Err(IndexError::InvalidConfig(_))
        ));

        let config = ClientConfig::default().with_connect_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
