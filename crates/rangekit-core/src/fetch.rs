//! The fetch-function contract consumed by the paginated services.

use crate::{PaginatedResource, PaginationRequest, RangeResult};
use async_trait::async_trait;

/// A source of paginated data, supplied by the calling collaborator.
///
/// This is the only boundary the paging layer has to the outside world:
/// an implementation typically wraps an HTTP API client and converts wire
/// DTOs into domain elements on the way out. The paging layer does not
/// know or care about transport details; any `Err` is treated as an
/// opaque error signal.
///
/// `P` carries request context beyond pagination, such as a parent
/// resource id or a filter string.
#[async_trait]
pub trait PaginatedFetcher<T, P>: Send + Sync
where
    T: Send + Sync,
    P: Send + Sync,
{
    /// Fetches one page of elements.
    async fn fetch(
        &self,
        pagination: &PaginationRequest,
        params: &P,
    ) -> RangeResult<PaginatedResource<T>>;
}
