//! Infrastructure layer: tenancy graph stores, typed query filters, database config.

pub mod config;
pub mod query;
pub mod tenancy;

pub use config::DatabaseConfig;
pub use query::{Column, Filter, FilterSink, LinkSource, Membership, Predicate, Row, ScopeTarget};
pub use tenancy::{
    InMemoryTenancyStore, PostgresTenancyStore, StoreError, StoreResult, TenancySnapshot,
    TenancyStore,
};
