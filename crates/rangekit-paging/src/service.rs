//! The offset-paginated elements service.

use parking_lot::Mutex;
use rangekit_core::{PaginatedFetcher, PaginatedResource, PaginationRequest, RangeResult};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Holds the current page of a list-typed resource and mediates fetches.
///
/// The `resource` / `is_loading` / `has_error` triple is exclusively owned
/// and mutated by this service; everything else reads via subscription.
/// State mutations are applied strictly in the order responses arrive,
/// which is not necessarily the order requests were issued: there is no
/// request-generation fencing, so a stale in-flight response overwrites a
/// newer one. Overlapping `get_all` calls are neither deduplicated nor
/// cancelled.
///
/// `P` is the extra-parameter type the fetch function takes alongside
/// pagination, such as a parent resource id or filter.
pub struct PaginatedElementsService<T, P> {
    fetcher: Arc<dyn PaginatedFetcher<T, P>>,
    resource_tx: watch::Sender<PaginatedResource<T>>,
    is_loading_tx: watch::Sender<bool>,
    has_error_tx: watch::Sender<bool>,
    last_request: Mutex<Option<(PaginationRequest, P)>>,
}

impl<T, P> PaginatedElementsService<T, P>
where
    T: Clone + Send + Sync,
    P: Clone + Send + Sync,
{
    /// Creates a new service around a fetch function.
    ///
    /// The initial published resource is the "not yet loaded" placeholder.
    #[must_use]
    pub fn new(fetcher: Arc<dyn PaginatedFetcher<T, P>>) -> Self {
        let (resource_tx, _) = watch::channel(PaginatedResource::placeholder());
        let (is_loading_tx, _) = watch::channel(false);
        let (has_error_tx, _) = watch::channel(false);
        Self {
            fetcher,
            resource_tx,
            is_loading_tx,
            has_error_tx,
            last_request: Mutex::new(None),
        }
    }

    /// Subscribes to the current page. New subscribers immediately see the
    /// latest published value.
    #[must_use]
    pub fn resource(&self) -> watch::Receiver<PaginatedResource<T>> {
        self.resource_tx.subscribe()
    }

    /// Subscribes to the loading flag.
    #[must_use]
    pub fn is_loading(&self) -> watch::Receiver<bool> {
        self.is_loading_tx.subscribe()
    }

    /// Subscribes to the error flag.
    #[must_use]
    pub fn has_error(&self) -> watch::Receiver<bool> {
        self.has_error_tx.subscribe()
    }

    /// Returns a snapshot of the current page.
    #[must_use]
    pub fn snapshot(&self) -> PaginatedResource<T> {
        self.resource_tx.borrow().clone()
    }

    /// Fetches a page and publishes the outcome.
    ///
    /// Records `pagination` and `params` as last-used for later
    /// [`Self::refresh`] calls. On success the resource is replaced
    /// wholesale and `has_error` clears. On failure `has_error` is set and
    /// the previous resource is left untouched: stale-but-valid data is
    /// preferred over clearing. `is_loading` clears on completion either
    /// way.
    ///
    /// # Errors
    ///
    /// Propagates the fetch function's error after updating the flags.
    pub async fn get_all(
        &self,
        pagination: PaginationRequest,
        params: P,
    ) -> RangeResult<PaginatedResource<T>> {
        debug!(page = pagination.page, size = pagination.size, "Fetching page");

        *self.last_request.lock() = Some((pagination.clone(), params.clone()));
        self.is_loading_tx.send_replace(true);
        self.has_error_tx.send_replace(false);

        let outcome = self.fetcher.fetch(&pagination, &params).await;
        self.is_loading_tx.send_replace(false);

        match outcome {
            Ok(resource) => {
                debug!(
                    elements = resource.len(),
                    total = resource.pagination.total_elements,
                    "Page fetched"
                );
                self.resource_tx.send_replace(resource.clone());
                Ok(resource)
            }
            Err(err) => {
                warn!(error = %err, "Page fetch failed; keeping previous resource");
                self.has_error_tx.send_replace(true);
                Err(err)
            }
        }
    }

    /// Re-issues the last-used request.
    ///
    /// Returns `Ok(None)` when [`Self::get_all`] has never been called, so
    /// a polling loop started before initialization simply idles.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get_all`].
    pub async fn refresh(&self) -> RangeResult<Option<PaginatedResource<T>>> {
        let last = self.last_request.lock().clone();
        match last {
            Some((pagination, params)) => self.get_all(pagination, params).await.map(Some),
            None => Ok(None),
        }
    }
}

impl<T, P> std::fmt::Debug for PaginatedElementsService<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedElementsService")
            .finish_non_exhaustive()
    }
}
