//! Transport-facing abstractions.
//!
//! The client never talks HTTP directly; it depends on [`DtoPageApi`], a
//! trait a transport implementation (or a test double) provides. The
//! [`MappedFetcher`] adapter then lifts a DTO-level API into the
//! model-level [`PaginatedFetcher`] the paging services consume,
//! converting every element through the mapper registry on the way.

use async_trait::async_trait;
use rangekit_core::{
    PaginatedFetcher, PaginatedResource, PaginationRequest, RangeError, RangeResult,
};
use rangekit_mapper::MapperRegistry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// A paginated, DTO-level endpoint.
///
/// `D` is the wire DTO the endpoint serves; `P` is the endpoint's filter
/// parameter type (use `()` for endpoints without filters).
#[async_trait]
pub trait DtoPageApi<D, P>: Send + Sync
where
    D: Send + Sync,
    P: Send + Sync,
{
    /// Fetches one page of DTOs.
    async fn fetch_page(
        &self,
        pagination: &PaginationRequest,
        params: &P,
    ) -> RangeResult<PaginatedResource<D>>;
}

/// Adapts a DTO-level API into a model-level fetcher.
///
/// Each fetched element is converted through the registered read mapping
/// for `(D, M)`. A missing registration is a hard error here: the
/// adapter's whole purpose is the conversion, so an unmapped pair means
/// the composition root forgot a registration.
pub struct MappedFetcher<D, M, P> {
    api: Arc<dyn DtoPageApi<D, P>>,
    registry: Arc<MapperRegistry>,
    _marker: PhantomData<fn() -> M>,
}

impl<D, M, P> MappedFetcher<D, M, P> {
    /// Creates a fetcher backed by the given API and registry.
    pub fn new(api: Arc<dyn DtoPageApi<D, P>>, registry: Arc<MapperRegistry>) -> Self {
        Self {
            api,
            registry,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<D, M, P> PaginatedFetcher<M, P> for MappedFetcher<D, M, P>
where
    D: Serialize + Send + Sync + 'static,
    M: DeserializeOwned + Send + Sync + 'static,
    P: Send + Sync,
{
    async fn fetch(
        &self,
        pagination: &PaginationRequest,
        params: &P,
    ) -> RangeResult<PaginatedResource<M>> {
        let page = self.api.fetch_page(pagination, params).await?;
        debug!(
            dto = type_name::<D>(),
            elements = page.len(),
            page = page.pagination.page,
            "Converting fetched page"
        );

        let meta = page.pagination;
        let mut models = Vec::with_capacity(page.len());
        for dto in page {
            let model = self
                .registry
                .convert_read::<D, M>(&dto)
                .map_err(|e| RangeError::internal(e.to_string()))?
                .ok_or_else(|| {
                    RangeError::missing_mapping(type_name::<D>(), type_name::<M>())
                })?;
            models.push(model);
        }
        Ok(PaginatedResource::new(models, meta))
    }
}
