//! Configuration Module
//!
//! Property lookup through a [`ConfigurationSource`] and the typed [`Config`]
//! built from it.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{InspectionError, Result};

// == Property Keys ==
pub const CLUSTER_NODES_KEY: &str = "im.redis.cluster.nodes";
pub const CLUSTER_PASSWORD_KEY: &str = "im.redis.password";
pub const CLIENT_NAME_KEY: &str = "im.redis.client-name";
pub const DEFAULT_MAX_SIZE_KEY: &str = "cache.default.max-size";
pub const DEFAULT_EXPIRE_KEY: &str = "cache.default.expire";
pub const COMPARE_PROPERTIES_KEY: &str = "inspect.properties.compare";
pub const COMPUTE_PROPERTIES_KEY: &str = "inspect.properties.compute";
pub const TEMPLATE_FILE_KEY: &str = "inspect.templates.file";
pub const SERVER_PORT_KEY: &str = "server.port";
pub const CLEANUP_INTERVAL_KEY: &str = "cache.cleanup.interval";

// == Configuration Source ==
/// Key/value property lookup.
///
/// `get_property` returns the configured value or `default` when the key is
/// absent. `lookup` distinguishes "absent" from "empty".
pub trait ConfigurationSource: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;

    fn get_property(&self, key: &str, default: &str) -> String {
        self.lookup(key).unwrap_or_else(|| default.to_string())
    }
}

/// Reads properties from environment variables.
///
/// `im.redis.cluster.nodes` is read from `IM_REDIS_CLUSTER_NODES`.
#[derive(Debug, Default, Clone)]
pub struct EnvSource;

impl EnvSource {
    pub fn variable_name(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl ConfigurationSource for EnvSource {
    fn lookup(&self, key: &str) -> Option<String> {
        env::var(Self::variable_name(key)).ok()
    }
}

/// In-memory property map, used for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct MapSource {
    properties: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl ConfigurationSource for MapSource {
    fn lookup(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }
}

// == Config ==
/// Service configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Comma-separated `host:port` list of cluster nodes
    pub cluster_nodes: String,
    /// Cluster password; `None` when not configured
    pub cluster_password: Option<String>,
    /// Client identity sent on every connection
    pub client_name: String,
    /// Capacity of the ignore-flag cache
    pub default_max_entries: usize,
    /// TTL of the ignore-flag cache
    pub default_ttl: Duration,
    /// Properties compared textually; empty means every property
    pub compare_properties: Vec<String>,
    /// Properties compared numerically
    pub compute_properties: Vec<String>,
    /// Optional JSON file holding template records
    pub template_file: Option<PathBuf>,
    /// HTTP server port
    pub server_port: u16,
    /// Local cache sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&EnvSource)
    }

    /// Loads configuration from any property source, applying defaults.
    pub fn from_source(source: &dyn ConfigurationSource) -> Result<Self> {
        let defaults = Config::default();

        Ok(Self {
            cluster_nodes: source.get_property(CLUSTER_NODES_KEY, &defaults.cluster_nodes),
            cluster_password: source.lookup(CLUSTER_PASSWORD_KEY),
            client_name: source.get_property(CLIENT_NAME_KEY, &defaults.client_name),
            default_max_entries: parse_number(source, DEFAULT_MAX_SIZE_KEY, "1000")?,
            default_ttl: Duration::from_millis(parse_number(
                source,
                DEFAULT_EXPIRE_KEY,
                "1800000",
            )?),
            compare_properties: split_list(&source.get_property(COMPARE_PROPERTIES_KEY, "")),
            compute_properties: split_list(&source.get_property(COMPUTE_PROPERTIES_KEY, "")),
            template_file: source
                .lookup(TEMPLATE_FILE_KEY)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            server_port: parse_number(source, SERVER_PORT_KEY, "3000")?,
            cleanup_interval: parse_number(source, CLEANUP_INTERVAL_KEY, "1")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster_nodes: "127.0.0.1:6379".to_string(),
            cluster_password: None,
            client_name: "im-dto-service".to_string(),
            default_max_entries: 1000,
            default_ttl: Duration::from_millis(1_800_000),
            compare_properties: Vec::new(),
            compute_properties: Vec::new(),
            template_file: None,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    source: &dyn ConfigurationSource,
    key: &str,
    default: &str,
) -> Result<T> {
    let raw = source.get_property(key, default);
    raw.trim().parse().map_err(|_| {
        InspectionError::Configuration(format!("Property {} is not a valid number: {}", key, raw))
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
