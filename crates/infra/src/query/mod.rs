//! Typed query filters that scope resolution injects into listings.

pub mod column;
pub mod filter;
pub mod predicate;
pub mod target;

pub use column::Column;
pub use filter::{Filter, FilterSink};
pub use predicate::{LinkSource, Membership, Predicate, Row};
pub use target::ScopeTarget;
