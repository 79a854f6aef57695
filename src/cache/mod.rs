//! Cache Module
//!
//! Cluster URI building, cache specs, the cache collaborator traits, the
//! lazy provisioner, and an in-process backend.

mod entry;
mod handle;
mod local;
mod provisioner;
mod spec;
mod stats;
mod store;
mod uri;


// Re-export public types
pub use entry::CacheEntry;
pub use handle::{CacheHandle, CacheManager};
pub use local::{LocalCache, LocalCacheManager};
pub use provisioner::{
    CacheName, CacheProvisioner, ProvisionerSettings, TEMPLATE_CACHE_MAX_ENTRIES,
    TEMPLATE_CACHE_TTL,
};
pub use spec::CacheSpec;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use uri::{
    build_cluster_uris, connection_string, parse_cluster_nodes, ClusterEndpoint,
    CREDENTIAL_PRINCIPAL, URI_SCHEME,
};
