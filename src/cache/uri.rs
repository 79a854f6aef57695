//! Connection URI Builder
//!
//! Turns the configured cluster node list into one connection URI per node.
//! Pure: no network access happens here.

use std::fmt;

use tracing::debug;

use crate::error::{InspectionError, Result};

/// URI scheme of the cache cluster.
pub const URI_SCHEME: &str = "redis";

/// Fixed credential principal embedded in every URI.
pub const CREDENTIAL_PRINCIPAL: &str = "default";

// == Cluster Endpoint ==
/// A single `host:port` cluster node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterEndpoint {
    pub host: String,
    pub port: u16,
}

impl ClusterEndpoint {
    /// Parses a `host:port` entry. The entry must hold exactly one `:`.
    pub fn parse(entry: &str) -> Result<Self> {
        let entry = entry.trim();
        let invalid =
            || InspectionError::Configuration(format!("Invalid cluster node format: {:?}", entry));

        if entry.matches(':').count() != 1 {
            return Err(invalid());
        }
        let (host, port) = entry.split_once(':').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for ClusterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parses a comma-separated node list, preserving order.
///
/// Trailing empty entries (`"a:1,"`) are dropped; any other malformed entry
/// rejects the whole list.
pub fn parse_cluster_nodes(nodes: &str) -> Result<Vec<ClusterEndpoint>> {
    let nodes = nodes.trim_end_matches(',');
    if nodes.trim().is_empty() {
        return Err(InspectionError::Configuration(
            "Cluster nodes are not configured".to_string(),
        ));
    }
    nodes.split(',').map(ClusterEndpoint::parse).collect()
}

// == Build Cluster URIs ==
/// Builds `redis://default:<encoded password>@host:port?clientName=<name>`
/// for every node, in node order.
///
/// The password is RFC 3986 percent-encoded (a space becomes `%20`, `~` is
/// kept, `*` becomes `%2A`), so URIs differ from form-encoded ones for such
/// passwords.
///
/// # Errors
/// `Configuration` if `nodes` is empty, `password` is `None`, `client_name`
/// is empty, or any node is not a `host:port` pair.
pub fn build_cluster_uris(
    nodes: &str,
    password: Option<&str>,
    client_name: &str,
) -> Result<Vec<String>> {
    let password = password.ok_or_else(|| {
        InspectionError::Configuration("Cluster password is not configured".to_string())
    })?;
    if client_name.is_empty() {
        return Err(InspectionError::Configuration(
            "Client name is not configured".to_string(),
        ));
    }
    let endpoints = parse_cluster_nodes(nodes)?;

    let encoded_password = urlencoding::encode(password);
    let uris: Vec<String> = endpoints
        .iter()
        .map(|endpoint| {
            format!(
                "{}://{}:{}@{}?clientName={}",
                URI_SCHEME, CREDENTIAL_PRINCIPAL, encoded_password, endpoint, client_name
            )
        })
        .collect();

    debug!(nodes = uris.len(), client = client_name, "Built cluster URIs");
    Ok(uris)
}

/// Joins per-node URIs into the single connection string handed to the backend.
pub fn connection_string(uris: &[String]) -> String {
    uris.join(",")
}
