//! Deterministic, hierarchical IPv4 CIDR planner.
//!
//! Given a root address block, a set of organizational accounts with their
//! cloud providers and regions, and a catalog of subnet roles, [`allocator`]
//! walks accounts → providers → regions → availability zones → roles and
//! emits a complete, non-overlapping set of subnet allocations.

pub mod allocator;
pub mod catalog;
pub mod cidr;
pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod output;

pub use allocator::{generate, AllocationRecord};
pub use cidr::Cidr;
pub use config::InputRecord;
pub use error::{PlannerError, Result};
