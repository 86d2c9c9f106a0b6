//! # Rangekit Paging
//!
//! The paginated resource access layer of the cyber-range data stack:
//!
//! - [`PaginatedElementsService`] holds the authoritative current page of
//!   a list-typed resource and broadcasts `resource` / `is_loading` /
//!   `has_error` state to any number of subscribers.
//! - [`PollingPaginatedService`] re-issues the last fetch on a fixed-delay
//!   schedule in addition to manual triggers.
//! - [`PaginationStorage`] remembers a user's last-chosen page size per
//!   logical view across sessions, with bounded retention.
//!
//! Subscribers receive state through `tokio::sync::watch` receivers, which
//! replay the latest value to new subscribers and never block the
//! publisher.

pub mod polling;
pub mod service;
pub mod storage;

pub use polling::PollingPaginatedService;
pub use service::PaginatedElementsService;
pub use storage::{
    InMemoryStore, JsonFileStore, KeyValueStore, PaginationStorage, PaginationStorageEntry,
};
