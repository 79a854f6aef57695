//! Cache Spec Module
//!
//! Validated construction parameters for a named cache.

use std::time::Duration;

use serde::Serialize;

use crate::error::{InspectionError, Result};

// == Cache Spec ==
/// Parameters handed to the cache manager when a cache is created.
///
/// Only constructible through [`CacheSpec::new`], so every instance is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSpec {
    name: String,
    max_entries: usize,
    #[serde(rename = "ttl_ms", serialize_with = "serialize_millis")]
    ttl: Duration,
    #[serde(skip)]
    backend_uri: String,
}

impl CacheSpec {
    /// Validates and builds a spec.
    ///
    /// # Errors
    /// `Configuration` if the name or backend URI is empty, or the capacity or
    /// TTL is zero.
    pub fn new(
        name: impl Into<String>,
        max_entries: usize,
        ttl: Duration,
        backend_uri: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let backend_uri = backend_uri.into();

        if name.is_empty() {
            return Err(InspectionError::Configuration(
                "Cache name cannot be empty".to_string(),
            ));
        }
        if max_entries == 0 {
            return Err(InspectionError::Configuration(
                "Max size must be positive".to_string(),
            ));
        }
        if ttl.is_zero() {
            return Err(InspectionError::Configuration(
                "Expire time must be positive".to_string(),
            ));
        }
        if backend_uri.is_empty() {
            return Err(InspectionError::Configuration(
                "Backend URI cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            name,
            max_entries,
            ttl,
            backend_uri,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn backend_uri(&self) -> &str {
        &self.backend_uri
    }
}

fn serialize_millis<S>(ttl: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(ttl.as_millis() as u64)
}
