//! # Rangekit Core
//!
//! Core types, traits, and error definitions for the Rangekit data-access
//! layer of the cyber-range training platform. This crate provides the
//! foundational abstractions shared by the mapper framework, the paginated
//! resource services, and the API client band.

pub mod error;
pub mod fetch;
pub mod pagination;
pub mod result;

pub use error::*;
pub use fetch::*;
pub use pagination::*;
pub use result::*;
