//! Process entry point (SPEC_FULL.md §2: "a thin binary crate wiring one
//! `Controller` per kind together using a `Config` read from the
//! environment"). Instantiates a store and a reconciler per resource kind
//! and hands both to [`wiring::run_kind`], mirroring `kube-runtime`'s own
//! examples, which build one `Controller` per watched kind in `main` and
//! run them concurrently.
//!
//! The external-collaborator implementations (orchestrator, gateway, auth
//! service, image registry, model-registry drivers, accelerator manager)
//! are out of scope (spec.md §1) — this process wires the hand-rolled mocks
//! from `neutree_controllers::collaborators::mock` in their place, the only
//! implementations of those traits this workspace carries. A deployment
//! with real collaborators would swap these constructors for its own
//! `Arc<dyn Trait>` values; nothing else in this file would change.

mod config;
mod store_reader;
mod wiring;

use std::sync::Arc;

use neutree_controllers::collaborators::mock::{
    MockAcceleratorManager, MockAuthClient, MockGateway, MockImageService, MockModelRegistryDriver, MockOrchestrator,
};
use neutree_controllers::collaborators::model_registry::DriverRegistry;
use neutree_controllers::reconcilers::{
    ApiKeyReconciler, ClusterReconciler, EndpointReconciler, EngineReconciler, ExternalEndpointReconciler,
    ImageRegistryReconciler, ModelCatalogReconciler, ModelRegistryReconciler, RoleAssignmentReconciler, RoleReconciler,
    UserProfileReconciler, WorkspaceReconciler,
};
use neutree_core::resources::model_registry::ModelRegistryType;
use neutree_core::ResourceKind;
use neutree_store::http::HttpStore;
use neutree_store::ResourceStore;
use tokio_util::sync::CancellationToken;

use config::Config;

fn store<Spec, Status>(config: &Config, kind: ResourceKind) -> Arc<dyn ResourceStore<Spec, Status>>
where
    Spec: serde::Serialize + serde::de::DeserializeOwned + Send + Sync + Clone + 'static,
    Status: serde::Serialize + serde::de::DeserializeOwned + Send + Sync + Clone + Default + 'static,
{
    Arc::new(HttpStore::new(config.store_base_url.as_str(), kind, "v1", &config.store_jwt_secret))
}

fn driver_registry() -> DriverRegistry {
    DriverRegistry::new()
        .register(ModelRegistryType::HuggingFace, |_spec| Ok(Box::new(MockModelRegistryDriver::new())))
        .register(ModelRegistryType::File, |_spec| Ok(Box::new(MockModelRegistryDriver::new())))
        .register(ModelRegistryType::Nfs, |_spec| Ok(Box::new(MockModelRegistryDriver::new())))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = Config::from_env().map_err(|err| {
        tracing::error!(%err, "failed to load configuration");
        err
    })?;

    tracing::info!(
        worker_count = config.worker_count,
        resync_interval_secs = config.resync_interval.as_secs(),
        "starting neutree controller manager"
    );

    let orchestrator: Arc<dyn neutree_controllers::collaborators::Orchestrator> = Arc::new(MockOrchestrator::new());
    let gateway: Arc<dyn neutree_controllers::collaborators::Gateway> = Arc::new(MockGateway::new());
    let auth_client: Arc<dyn neutree_controllers::collaborators::AuthClient> = Arc::new(MockAuthClient::new());
    let image_service: Arc<dyn neutree_controllers::collaborators::ImageService> = Arc::new(MockImageService::new());
    let accelerator_manager: Arc<dyn neutree_controllers::collaborators::AcceleratorManager> =
        Arc::new(MockAcceleratorManager::new());
    let drivers = Arc::new(driver_registry());

    let engine_store = store(&config, ResourceKind::Engine);

    // Shared across every per-kind controller; Ctrl+C (or SIGTERM under a
    // process manager that translates it) cancels all of them together, and
    // each drains its own in-flight reconciles before `run` returns
    // (spec.md §4.1, §5).
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("received shutdown signal, cancelling controllers");
                cancel.cancel();
            }
        }
    });

    tokio::join!(
        wiring::run_kind(
            ClusterReconciler::new(orchestrator.clone(), gateway.clone()),
            store(&config, ResourceKind::Cluster),
            ResourceKind::Cluster,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            ImageRegistryReconciler::new(image_service.clone()),
            store(&config, ResourceKind::ImageRegistry),
            ResourceKind::ImageRegistry,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            ModelRegistryReconciler::new(drivers.clone()),
            store(&config, ResourceKind::ModelRegistry),
            ResourceKind::ModelRegistry,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            EndpointReconciler::new(orchestrator.clone(), gateway.clone()),
            store(&config, ResourceKind::Endpoint),
            ResourceKind::Endpoint,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            EngineReconciler::default(),
            engine_store.clone(),
            ResourceKind::Engine,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            RoleReconciler::default(),
            store(&config, ResourceKind::Role),
            ResourceKind::Role,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            RoleAssignmentReconciler::default(),
            store(&config, ResourceKind::RoleAssignment),
            ResourceKind::RoleAssignment,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            WorkspaceReconciler::new(accelerator_manager.clone(), engine_store.clone()),
            store(&config, ResourceKind::Workspace),
            ResourceKind::Workspace,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            ApiKeyReconciler::new(gateway.clone()),
            store(&config, ResourceKind::ApiKey),
            ResourceKind::ApiKey,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            ModelCatalogReconciler::default(),
            store(&config, ResourceKind::ModelCatalog),
            ResourceKind::ModelCatalog,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            ExternalEndpointReconciler::new(gateway.clone()),
            store(&config, ResourceKind::ExternalEndpoint),
            ResourceKind::ExternalEndpoint,
            &config,
            cancel.clone(),
        ),
        wiring::run_kind(
            UserProfileReconciler::new(auth_client.clone()),
            store(&config, ResourceKind::UserProfile),
            ResourceKind::UserProfile,
            &config,
            cancel.clone(),
        ),
    );

    Ok(())
}
