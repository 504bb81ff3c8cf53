//! blog-posts/crates/services/src/lib.rs
//!
//! Post use cases composed from the domain ports: query normalization,
//! visibility/permission policy, aggregate assembly and the `PostService`
//! orchestrator.

pub mod assembler;
pub mod policy;
pub mod post_service;
pub mod query;

pub use post_service::PostService;
pub use query::normalize_list_params;
