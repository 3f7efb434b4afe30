use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::net::TcpStream;

use crate::domain::{DestinationCatalog, DestinationData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTestResult {
    pub success: bool,
    pub message: Option<String>,
}

impl ConnectionTestResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Checks whether a destination is reachable with its current connection
/// properties. Failures are reported in the result, never as an error: a
/// strict check must always resolve so the caller can record the outcome.
#[async_trait]
pub trait ConnectivityCheck: Send + Sync {
    async fn test_connection(&self, draft: &DestinationData, strict: bool) -> ConnectionTestResult;
}

/// Opens a TCP connection to the host/port named by the destination type's
/// probe description.
#[derive(Debug, Clone)]
pub struct TcpConnectivityCheck {
    catalog: Arc<DestinationCatalog>,
    timeout: Duration,
}

impl TcpConnectivityCheck {
    pub fn new(catalog: Arc<DestinationCatalog>) -> Self {
        Self {
            catalog,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ConnectivityCheck for TcpConnectivityCheck {
    async fn test_connection(&self, draft: &DestinationData, strict: bool) -> ConnectionTestResult {
        let Some(reference) = self.catalog.get(&draft.kind) else {
            return ConnectionTestResult::failed(format!(
                "Unknown destination type '{}'",
                draft.kind
            ));
        };
        let Some(probe) = reference.probe.as_ref() else {
            if strict {
                return ConnectionTestResult::failed(format!(
                    "Connectivity probe is not available for {}",
                    reference.display_name
                ));
            }
            return ConnectionTestResult::ok();
        };

        let Some(host) = draft
            .form_data
            .get(&probe.host_field)
            .and_then(Value::as_str)
            .filter(|host| !host.trim().is_empty())
        else {
            return ConnectionTestResult::failed("Host is not configured");
        };
        let port = match draft.form_data.get(&probe.port_field) {
            None | Some(Value::Null) => probe.default_port,
            Some(value) => match port_from_value(value) {
                Some(port) => port,
                None => return ConnectionTestResult::failed(format!("Invalid port {value}")),
            },
        };

        tracing::debug!(host, port, strict, "probing destination");
        match tokio::time::timeout(self.timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(_stream)) => ConnectionTestResult::ok(),
            Ok(Err(err)) => {
                ConnectionTestResult::failed(format!("Connection to {host}:{port} failed: {err}"))
            }
            Err(_) => ConnectionTestResult::failed(format!(
                "Connection to {host}:{port} timed out after {} ms",
                self.timeout.as_millis()
            )),
        }
    }
}

fn port_from_value(value: &Value) -> Option<u16> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|port| u16::try_from(port).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Always answers with the same result.
#[derive(Debug, Clone)]
pub struct StaticConnectivityCheck {
    result: ConnectionTestResult,
}

impl StaticConnectivityCheck {
    pub fn new(result: ConnectionTestResult) -> Self {
        Self { result }
    }
}

#[async_trait]
impl ConnectivityCheck for StaticConnectivityCheck {
    async fn test_connection(&self, _draft: &DestinationData, _strict: bool) -> ConnectionTestResult {
        self.result.clone()
    }
}
