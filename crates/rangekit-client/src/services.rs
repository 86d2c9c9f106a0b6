//! Resource services the UI layer subscribes to.
//!
//! Each service owns a paginated elements service for one resource kind,
//! remembers the user's page size through [`PaginationStorage`], and
//! converts between models and outgoing DTOs at the edges.

use crate::api::{DtoPageApi, MappedFetcher};
use crate::dto::{
    validate_request, SandboxPoolCreateDto, SandboxPoolDto, TrainingDefinitionDto,
    TrainingDefinitionUpdateDto, TrainingRunDto,
};
use crate::model::{SandboxPool, TrainingDefinition, TrainingRun};
use rangekit_config::DataConfig;
use rangekit_core::{
    PaginatedResource, PaginationRequest, RangeError, RangeResult, SortDir,
};
use rangekit_mapper::MapperRegistry;
use rangekit_paging::{
    KeyValueStore, PaginatedElementsService, PaginationStorage, PollingPaginatedService,
};
use std::any::type_name;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Builds the shared page-size storage from configuration.
#[must_use]
pub fn storage_from_config(store: Arc<dyn KeyValueStore>, data: &DataConfig) -> PaginationStorage {
    PaginationStorage::new(store, data.default_page_size)
        .with_registry_key(data.storage_registry_key.clone())
        .with_ttl_days(data.page_size_ttl_days)
}

/// Training definition listing and editing.
pub struct TrainingDefinitionService {
    service: PaginatedElementsService<TrainingDefinition, ()>,
    storage: Arc<PaginationStorage>,
    registry: Arc<MapperRegistry>,
}

impl TrainingDefinitionService {
    const VIEW_KEY: &'static str = "training-definition-overview";

    /// Wires the service from its collaborators.
    #[must_use]
    pub fn new(
        api: Arc<dyn DtoPageApi<TrainingDefinitionDto, ()>>,
        registry: Arc<MapperRegistry>,
        storage: Arc<PaginationStorage>,
    ) -> Self {
        let fetcher = MappedFetcher::<TrainingDefinitionDto, TrainingDefinition, ()>::new(
            api,
            Arc::clone(&registry),
        );
        Self {
            service: PaginatedElementsService::new(Arc::new(fetcher)),
            storage,
            registry,
        }
    }

    /// Subscribes to the current page of definitions.
    #[must_use]
    pub fn resource(&self) -> watch::Receiver<PaginatedResource<TrainingDefinition>> {
        self.service.resource()
    }

    /// Subscribes to the loading flag.
    #[must_use]
    pub fn is_loading(&self) -> watch::Receiver<bool> {
        self.service.is_loading()
    }

    /// Subscribes to the error flag.
    #[must_use]
    pub fn has_error(&self) -> watch::Receiver<bool> {
        self.service.has_error()
    }

    /// Builds the initial request for this view, sized from the stored
    /// page-size memory and sorted by title.
    #[must_use]
    pub fn initial_pagination(&self) -> PaginationRequest {
        self.storage
            .create_pagination(Self::VIEW_KEY, Some("title"), SortDir::Asc)
    }

    /// Fetches and publishes one page of definitions.
    ///
    /// Remembers the requested size for the next session.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures; the previous page stays published.
    pub async fn get_all(
        &self,
        pagination: PaginationRequest,
    ) -> RangeResult<PaginatedResource<TrainingDefinition>> {
        self.storage.save_page_size(Self::VIEW_KEY, pagination.size)?;
        self.service.get_all(pagination, ()).await
    }

    /// Re-issues the last fetch.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures.
    pub async fn refresh(&self) -> RangeResult<Option<PaginatedResource<TrainingDefinition>>> {
        self.service.refresh().await
    }

    /// Converts an edited definition into a validated update request.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the edit breaks a field constraint,
    /// or a missing-mapping error if the write mapping is not registered.
    pub fn to_update_dto(
        &self,
        definition: &TrainingDefinition,
    ) -> RangeResult<TrainingDefinitionUpdateDto> {
        let dto: TrainingDefinitionUpdateDto = self
            .registry
            .convert_write(definition)
            .map_err(|e| RangeError::internal(e.to_string()))?
            .ok_or_else(|| {
                RangeError::missing_mapping(
                    type_name::<TrainingDefinition>(),
                    type_name::<TrainingDefinitionUpdateDto>(),
                )
            })?;
        validate_request(&dto)?;
        Ok(dto)
    }
}

/// Sandbox pool monitoring for one training definition.
///
/// Pool allocation changes server-side as trainees come and go, so this
/// service polls: once started, the last fetched page is re-fetched on a
/// fixed-delay schedule until stopped.
pub struct SandboxPoolService {
    polling: PollingPaginatedService<SandboxPool, u64>,
    storage: Arc<PaginationStorage>,
    registry: Arc<MapperRegistry>,
}

impl SandboxPoolService {
    const VIEW_KEY: &'static str = "sandbox-pool-overview";

    /// Wires the service from its collaborators.
    #[must_use]
    pub fn new(
        api: Arc<dyn DtoPageApi<SandboxPoolDto, u64>>,
        registry: Arc<MapperRegistry>,
        storage: Arc<PaginationStorage>,
        poll_period: Duration,
    ) -> Self {
        let fetcher =
            MappedFetcher::<SandboxPoolDto, SandboxPool, u64>::new(api, Arc::clone(&registry));
        let service = Arc::new(PaginatedElementsService::new(Arc::new(fetcher)));
        Self {
            polling: PollingPaginatedService::new(service, poll_period),
            storage,
            registry,
        }
    }

    /// Subscribes to the current page of pools.
    #[must_use]
    pub fn resource(&self) -> watch::Receiver<PaginatedResource<SandboxPool>> {
        self.polling.service().resource()
    }

    /// Subscribes to the error flag.
    #[must_use]
    pub fn has_error(&self) -> watch::Receiver<bool> {
        self.polling.service().has_error()
    }

    /// Builds the initial request for this view.
    #[must_use]
    pub fn initial_pagination(&self) -> PaginationRequest {
        self.storage.create_pagination(Self::VIEW_KEY, None, SortDir::Asc)
    }

    /// Fetches one page of pools for the given definition and remembers
    /// the request as the polling target.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures.
    pub async fn get_all(
        &self,
        definition_id: u64,
        pagination: PaginationRequest,
    ) -> RangeResult<PaginatedResource<SandboxPool>> {
        self.storage.save_page_size(Self::VIEW_KEY, pagination.size)?;
        self.polling.service().get_all(pagination, definition_id).await
    }

    /// Starts background polling.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if polling is already running.
    pub fn start_polling(&self) -> RangeResult<()> {
        self.polling.start()
    }

    /// Stops background polling.
    pub fn stop_polling(&self) {
        self.polling.stop();
    }

    /// Returns true while the polling task is alive.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.polling.is_running()
    }

    /// Converts a pool draft into a validated create request.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range sizes, or a
    /// missing-mapping error if the write mapping is not registered.
    pub fn to_create_dto(&self, pool: &SandboxPool) -> RangeResult<SandboxPoolCreateDto> {
        let dto: SandboxPoolCreateDto = self
            .registry
            .convert_write(pool)
            .map_err(|e| RangeError::internal(e.to_string()))?
            .ok_or_else(|| {
                RangeError::missing_mapping(
                    type_name::<SandboxPool>(),
                    type_name::<SandboxPoolCreateDto>(),
                )
            })?;
        validate_request(&dto)?;
        Ok(dto)
    }
}

/// Training run listing for one training definition.
pub struct TrainingRunService {
    service: PaginatedElementsService<TrainingRun, u64>,
    storage: Arc<PaginationStorage>,
}

impl TrainingRunService {
    const VIEW_KEY: &'static str = "training-run-overview";

    /// Wires the service from its collaborators.
    #[must_use]
    pub fn new(
        api: Arc<dyn DtoPageApi<TrainingRunDto, u64>>,
        registry: Arc<MapperRegistry>,
        storage: Arc<PaginationStorage>,
    ) -> Self {
        let fetcher = MappedFetcher::<TrainingRunDto, TrainingRun, u64>::new(api, registry);
        Self {
            service: PaginatedElementsService::new(Arc::new(fetcher)),
            storage,
        }
    }

    /// Subscribes to the current page of runs.
    #[must_use]
    pub fn resource(&self) -> watch::Receiver<PaginatedResource<TrainingRun>> {
        self.service.resource()
    }

    /// Subscribes to the loading flag.
    #[must_use]
    pub fn is_loading(&self) -> watch::Receiver<bool> {
        self.service.is_loading()
    }

    /// Builds the initial request for this view, newest runs first.
    #[must_use]
    pub fn initial_pagination(&self) -> PaginationRequest {
        self.storage
            .create_pagination(Self::VIEW_KEY, Some("startTime"), SortDir::Desc)
    }

    /// Fetches one page of runs for the given definition.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures.
    pub async fn get_all(
        &self,
        definition_id: u64,
        pagination: PaginationRequest,
    ) -> RangeResult<PaginatedResource<TrainingRun>> {
        self.storage.save_page_size(Self::VIEW_KEY, pagination.size)?;
        self.service.get_all(pagination, definition_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappings::build_registry;
    use crate::model::DefinitionState;
    use async_trait::async_trait;
    use chrono::Utc;
    use rangekit_core::Pagination;
    use rangekit_paging::InMemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn wiring() -> (Arc<MapperRegistry>, Arc<PaginationStorage>) {
        let registry = Arc::new(build_registry().unwrap());
        let store = Arc::new(InMemoryStore::new());
        let storage = Arc::new(storage_from_config(store as _, &DataConfig::default()));
        (registry, storage)
    }

    fn definition_dto(id: u64, title: &str) -> TrainingDefinitionDto {
        TrainingDefinitionDto {
            id,
            title: title.to_string(),
            description: None,
            state: "UNRELEASED".to_string(),
            level_ids: vec![1, 2],
            estimated_duration: 60,
            last_edited: Utc::now(),
            last_edited_by: "trainer".to_string(),
        }
    }

    /// Serves a fixed list of definitions, counting calls.
    struct DefinitionApi {
        dtos: Vec<TrainingDefinitionDto>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DtoPageApi<TrainingDefinitionDto, ()> for DefinitionApi {
        async fn fetch_page(
            &self,
            pagination: &PaginationRequest,
            (): &(),
        ) -> RangeResult<PaginatedResource<TrainingDefinitionDto>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let total = self.dtos.len() as u64;
            Ok(PaginatedResource::new(
                self.dtos.clone(),
                Pagination::new(pagination.page, pagination.size, total),
            ))
        }
    }

    /// Serves pools whose size grows with every call, as a live pool
    /// would while trainees join.
    struct GrowingPoolApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DtoPageApi<SandboxPoolDto, u64> for GrowingPoolApi {
        async fn fetch_page(
            &self,
            pagination: &PaginationRequest,
            definition_id: &u64,
        ) -> RangeResult<PaginatedResource<SandboxPoolDto>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let dto = SandboxPoolDto {
                id: 1,
                definition_id: *definition_id,
                size: call as u64,
                max_size: 10,
                locked: false,
                created_by: "ops".to_string(),
            };
            Ok(PaginatedResource::new(
                vec![dto],
                Pagination::new(pagination.page, pagination.size, 1),
            ))
        }
    }

    #[tokio::test]
    async fn test_definition_get_all_publishes_models() {
        let (registry, storage) = wiring();
        let api = Arc::new(DefinitionApi {
            dtos: vec![definition_dto(1, "Forensics"), definition_dto(2, "Phishing")],
            calls: AtomicUsize::new(0),
        });
        let service = TrainingDefinitionService::new(api, registry, storage);

        let page = service.get_all(service.initial_pagination()).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.elements[0].title, "Forensics");
        assert_eq!(page.elements[0].level_count, 2);

        let published = service.resource().borrow().clone();
        assert_eq!(published, page);
    }

    #[tokio::test]
    async fn test_definition_page_size_remembered() {
        let (registry, storage) = wiring();
        let api = Arc::new(DefinitionApi {
            dtos: vec![definition_dto(1, "Forensics")],
            calls: AtomicUsize::new(0),
        });
        let service =
            TrainingDefinitionService::new(api, registry, Arc::clone(&storage));

        assert_eq!(service.initial_pagination().size, 10);
        service.get_all(PaginationRequest::new(0, 25)).await.unwrap();
        assert_eq!(service.initial_pagination().size, 25);
    }

    #[tokio::test]
    async fn test_definition_update_dto_round_trip() {
        let (registry, storage) = wiring();
        let api = Arc::new(DefinitionApi {
            dtos: vec![],
            calls: AtomicUsize::new(0),
        });
        let service = TrainingDefinitionService::new(api, registry, storage);

        let definition = TrainingDefinition {
            id: 4,
            title: "Incident response".to_string(),
            description: Some("Tabletop".to_string()),
            state: DefinitionState::Unreleased,
            level_count: 3,
            estimated_duration: 90,
            last_edited: Utc::now(),
            last_edited_by: "trainer".to_string(),
        };
        let dto = service.to_update_dto(&definition).unwrap();
        assert_eq!(dto.id, 4);
        assert_eq!(dto.title, "Incident response");
        assert_eq!(dto.estimated_duration, 90);
    }

    #[tokio::test]
    async fn test_definition_update_dto_validation_rejects_bad_edit() {
        let (registry, storage) = wiring();
        let api = Arc::new(DefinitionApi {
            dtos: vec![],
            calls: AtomicUsize::new(0),
        });
        let service = TrainingDefinitionService::new(api, registry, storage);

        let definition = TrainingDefinition {
            id: 4,
            title: String::new(),
            description: None,
            state: DefinitionState::Unreleased,
            level_count: 0,
            estimated_duration: 90,
            last_edited: Utc::now(),
            last_edited_by: "trainer".to_string(),
        };
        let result = service.to_update_dto(&definition);
        assert!(matches!(result, Err(RangeError::Validation(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pool_polling_picks_up_growth() {
        const PERIOD: Duration = Duration::from_secs(5);

        let (registry, storage) = wiring();
        let api = Arc::new(GrowingPoolApi {
            calls: AtomicUsize::new(0),
        });
        let service = SandboxPoolService::new(api, registry, storage, PERIOD);

        let page = service.get_all(7, service.initial_pagination()).await.unwrap();
        assert_eq!(page.elements[0].size, 0);
        assert_eq!(page.elements[0].free_slots, 10);

        service.start_polling().unwrap();
        let mut resource = service.resource();
        resource.mark_unchanged();

        tokio::time::sleep(PERIOD + Duration::from_millis(50)).await;
        resource.changed().await.unwrap();
        let latest = resource.borrow_and_update().clone();
        assert_eq!(latest.elements[0].size, 1);
        assert_eq!(latest.elements[0].free_slots, 9);
        assert_eq!(latest.elements[0].definition_id, 7);

        service.stop_polling();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!service.is_polling());
    }

    #[tokio::test]
    async fn test_pool_create_dto_validation() {
        let (registry, storage) = wiring();
        let api = Arc::new(GrowingPoolApi {
            calls: AtomicUsize::new(0),
        });
        let service =
            SandboxPoolService::new(api, registry, storage, Duration::from_secs(5));

        let mut pool = SandboxPool {
            id: 0,
            definition_id: 7,
            size: 0,
            max_size: 20,
            free_slots: 20,
            locked: false,
            created_by: "ops".to_string(),
        };
        let dto = service.to_create_dto(&pool).unwrap();
        assert_eq!(dto.definition_id, 7);
        assert_eq!(dto.max_size, 20);

        pool.max_size = 0;
        assert!(matches!(
            service.to_create_dto(&pool),
            Err(RangeError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_run_service_fetches_for_definition() {
        struct RunApi;

        #[async_trait]
        impl DtoPageApi<TrainingRunDto, u64> for RunApi {
            async fn fetch_page(
                &self,
                pagination: &PaginationRequest,
                definition_id: &u64,
            ) -> RangeResult<PaginatedResource<TrainingRunDto>> {
                let start = Utc::now() - chrono::Duration::minutes(30);
                let dto = TrainingRunDto {
                    id: 100,
                    definition_id: *definition_id,
                    trainee_name: "casey".to_string(),
                    state: "FINISHED".to_string(),
                    start_time: start,
                    end_time: Some(start + chrono::Duration::minutes(25)),
                    event_log_reference: Some("runs/100/events".to_string()),
                };
                Ok(PaginatedResource::new(
                    vec![dto],
                    Pagination::new(pagination.page, pagination.size, 1),
                ))
            }
        }

        let (registry, storage) = wiring();
        let service = TrainingRunService::new(Arc::new(RunApi), registry, storage);

        let request = service.initial_pagination();
        assert_eq!(request.sort.as_deref(), Some("startTime"));
        assert_eq!(request.sort_dir, SortDir::Desc);

        let page = service.get_all(9, request).await.unwrap();
        assert_eq!(page.elements[0].definition_id, 9);
        assert_eq!(page.elements[0].duration_seconds, Some(25 * 60));
    }
}
