//! End-to-end reconcile-pass scenarios (spec.md §8), each driving a full
//! [`run_pass`] against a [`MockStore`] and the hand-rolled collaborator
//! mocks rather than calling `handle_normal`/`handle_deletion` directly, so
//! the debounced status write and the physical row delete are exercised
//! too, not just the per-kind state machine.

use std::sync::Arc;

use neutree_controllers::collaborators::mock::{
    MockAuthClient, MockGateway, MockModelRegistryDriver, MockOrchestrator,
};
use neutree_controllers::collaborators::model_registry::DriverRegistry;
use neutree_controllers::reconcilers::{ClusterReconciler, EndpointReconciler, ModelRegistryReconciler, UserProfileReconciler};
use neutree_controllers::run_pass;
use neutree_core::force_delete::FORCE_DELETE_ANNOTATION;
use neutree_core::resources::cluster::{ClusterPhase, ClusterRuntime, ClusterSpec, ClusterStatus, NodeProvisionState};
use neutree_core::resources::endpoint::{EndpointModel, EndpointPhase, EndpointResources, EndpointRouter, EndpointSpec, EndpointStatus};
use neutree_core::resources::model_registry::{ModelRegistryPhase, ModelRegistrySpec, ModelRegistryStatus, ModelRegistryType};
use neutree_core::resources::user_profile::{UserProfilePhase, UserProfileSpec, UserProfileStatus};
use neutree_core::{time::rfc3339_now, Object, ObjectId, ObjectMeta, ResourceKind};
use neutree_store::mock::MockStore;
use neutree_store::ResourceStore;
use serde_json::json;

fn meta(name: &str, workspace: Option<&str>) -> ObjectMeta {
    ObjectMeta {
        name: name.to_string(),
        display_name: None,
        workspace: workspace.map(str::to_string),
        deletion_timestamp: None,
        creation_timestamp: rfc3339_now(),
        update_timestamp: rfc3339_now(),
        labels: Default::default(),
        annotations: Default::default(),
    }
}

/// S1. Endpoint happy path: no status, orchestrator reports RUNNING. After
/// one reconcile the endpoint is RUNNING with no error; the mock gateway's
/// serve URL defaults to empty, which is treated as "unknown" and leaves
/// `service_url` at its prior (absent) value.
#[tokio::test]
async fn s1_endpoint_happy_path() {
    let store: MockStore<EndpointSpec, EndpointStatus> = MockStore::new(ResourceKind::Endpoint);
    let obj = store
        .create(
            meta("ep", Some("w")),
            EndpointSpec {
                cluster: "c".to_string(),
                model: EndpointModel {
                    name: "m".to_string(),
                    model_registry: "mr".to_string(),
                    resources: EndpointResources {
                        cpu: json!(1),
                        memory: json!("1Gi"),
                    },
                    router: EndpointRouter { replicas: json!(1) },
                    access_mode: "public".to_string(),
                    paused: false,
                },
            },
        )
        .await
        .unwrap();

    let reconciler = EndpointReconciler::new(Arc::new(MockOrchestrator::new()), Arc::new(MockGateway::new()));
    run_pass(&reconciler, &store, obj.clone()).await.unwrap();

    let row = store.get_by_id(obj.id.as_int().unwrap()).unwrap();
    assert_eq!(row.status.common.phase, EndpointPhase::Running);
    assert_eq!(row.status.common.error_message, "");
    // The mock gateway's serve URL defaults to "", which the reconciler
    // treats as "no URL yet" and leaves the prior value (here, absent) in
    // place per spec.md §4.6.
    assert_eq!(row.status.service_url, None);
}

/// S2. Force-delete with failing gateway cleanup: one reconcile lands
/// DELETED with no error (and logs the override); the row itself survives
/// until the next reconcile observes the terminal phase.
#[tokio::test]
async fn s2_endpoint_force_delete_with_failing_cleanup() {
    let store: MockStore<EndpointSpec, EndpointStatus> = MockStore::new(ResourceKind::Endpoint);
    let mut obj = store
        .create(
            meta("ep", Some("w")),
            EndpointSpec {
                cluster: "c".to_string(),
                model: EndpointModel {
                    name: "m".to_string(),
                    model_registry: "mr".to_string(),
                    resources: EndpointResources {
                        cpu: json!(1),
                        memory: json!("1Gi"),
                    },
                    router: EndpointRouter { replicas: json!(1) },
                    access_mode: "public".to_string(),
                    paused: false,
                },
            },
        )
        .await
        .unwrap();
    obj.metadata
        .annotations
        .insert(FORCE_DELETE_ANNOTATION.to_string(), "true".to_string());
    store.soft_delete(&obj.id).await.unwrap();
    let obj = store.get_by_id(obj.id.as_int().unwrap()).unwrap();

    let gateway = MockGateway::new();
    gateway.set_delete_endpoint(Err("gateway unreachable".to_string()));
    let reconciler = EndpointReconciler::new(Arc::new(MockOrchestrator::new()), Arc::new(gateway));

    run_pass(&reconciler, &store, obj.clone()).await.unwrap();
    let row = store.get_by_id(obj.id.as_int().unwrap()).unwrap();
    assert_eq!(row.status.common.phase, EndpointPhase::Deleted);
    assert_eq!(row.status.common.error_message, "");

    // Second pass observes the terminal phase and removes the row.
    run_pass(&reconciler, &store, row.clone()).await.unwrap();
    assert!(store.get_by_id(obj.id.as_int().unwrap()).is_none());
}

/// S3. Cluster node convergence: one node starts, one fails to start, one
/// stops; the aggregated error names the failing IP and the reconcile
/// fails the pass (spec.md §4.3.1).
#[tokio::test]
async fn s3_cluster_node_convergence() {
    let store: MockStore<ClusterSpec, ClusterStatus> = MockStore::new(ResourceKind::Cluster);
    let mut status = ClusterStatus {
        initialized: true,
        ..Default::default()
    };
    status.common.phase = ClusterPhase::Running;
    status
        .node_provision_status
        .insert("A".to_string(), NodeProvisionState::Provisioned);
    status
        .node_provision_status
        .insert("D".to_string(), NodeProvisionState::Provisioned);
    let obj = Object {
        id: ObjectId::Int(1),
        api_version: "v1".to_string(),
        kind: ResourceKind::Cluster,
        metadata: meta("c", Some("w")),
        spec: ClusterSpec {
            runtime: ClusterRuntime::Ssh {
                static_workers: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            },
            image_registry: "ir".to_string(),
            version: "1.0".to_string(),
            preset_key: None,
        },
        status,
    };
    store.seed(obj.clone());

    let orchestrator = MockOrchestrator::new();
    orchestrator.set_desire_static_workers_ip(vec!["A".to_string(), "B".to_string(), "C".to_string()]);
    orchestrator.set_start_node("B", Ok(()));
    orchestrator.set_start_node("C", Err("timeout".to_string()));
    orchestrator.set_stop_node("D", Ok(()));
    let reconciler = ClusterReconciler::new(Arc::new(orchestrator), Arc::new(MockGateway::new()));

    run_pass(&reconciler, &store, obj.clone()).await.unwrap();

    let row = store.get_by_id(1).unwrap();
    assert_eq!(row.status.common.phase, ClusterPhase::Failed);
    assert!(row.status.common.error_message.contains("failed to start ray node C"));
    assert_eq!(
        row.status.node_provision_status.get("A"),
        Some(&NodeProvisionState::Provisioned)
    );
    assert_eq!(
        row.status.node_provision_status.get("B"),
        Some(&NodeProvisionState::Provisioned)
    );
    assert_eq!(
        row.status.node_provision_status.get("C"),
        Some(&NodeProvisionState::Provisioning)
    );
    assert!(!row.status.node_provision_status.contains_key("D"));
}

/// S4. Model registry recovery: FAILED, Disconnect then Connect both
/// succeed, lands CONNECTED with no error.
#[tokio::test]
async fn s4_model_registry_recovery() {
    let store: MockStore<ModelRegistrySpec, ModelRegistryStatus> = MockStore::new(ResourceKind::ModelRegistry);
    let mut status = ModelRegistryStatus::default();
    status.common.phase = ModelRegistryPhase::Failed;
    status.common.error_message = "previous connect timed out".to_string();
    let obj = Object {
        id: ObjectId::Int(1),
        api_version: "v1".to_string(),
        kind: ResourceKind::ModelRegistry,
        metadata: meta("mr", None),
        spec: ModelRegistrySpec {
            ty: ModelRegistryType::HuggingFace,
            url: "https://huggingface.co".to_string(),
        },
        status,
    };
    store.seed(obj.clone());

    let drivers = DriverRegistry::new()
        .register(ModelRegistryType::HuggingFace, |_spec| Ok(Box::new(MockModelRegistryDriver::new())));
    let reconciler = ModelRegistryReconciler::new(Arc::new(drivers));

    run_pass(&reconciler, &store, obj.clone()).await.unwrap();

    let row = store.get_by_id(1).unwrap();
    assert_eq!(row.status.common.phase, ModelRegistryPhase::Connected);
    assert_eq!(row.status.common.error_message, "");
}

/// S5. Referential integrity: soft-deleting an ImageRegistry still
/// referenced by a cluster is rejected, and `deletion_timestamp` is left
/// unchanged (spec.md §4.10, §4.12).
#[tokio::test]
async fn s5_referential_integrity_blocks_soft_delete() {
    use neutree_core::resources::image_registry::{ImageRegistryAuthConfig, ImageRegistrySpec, ImageRegistryStatus};

    let store: MockStore<ImageRegistrySpec, ImageRegistryStatus> = MockStore::new(ResourceKind::ImageRegistry)
        .with_deletion_guard(|_obj| Some(("cluster", 1)));
    let obj = store
        .create(
            meta("x", None),
            ImageRegistrySpec {
                url: "https://registry.example.com".to_string(),
                repository: "neutree".to_string(),
                auth_config: ImageRegistryAuthConfig::Token { token: "t".to_string() },
            },
        )
        .await
        .unwrap();

    let err = store.soft_delete(&obj.id).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("cannot delete image_registry"));
    assert!(message.contains("1 cluster(s)"));

    let row = store.get_by_id(obj.id.as_int().unwrap()).unwrap();
    assert!(row.metadata.deletion_timestamp.is_none());
}

/// S6. User profile two-phase deletion: auth client reports "not found"
/// (treated as success); first pass lands DELETED, second pass removes
/// the row.
#[tokio::test]
async fn s6_user_profile_two_phase_deletion() {
    let store: MockStore<UserProfileSpec, UserProfileStatus> = MockStore::new(ResourceKind::UserProfile);
    let mut status = UserProfileStatus::default();
    status.common.phase = UserProfilePhase::Created;
    let obj = Object {
        id: ObjectId::Uuid(uuid::Uuid::nil()),
        api_version: "v1".to_string(),
        kind: ResourceKind::UserProfile,
        metadata: meta("alice", None),
        spec: UserProfileSpec {
            email: "alice@example.com".to_string(),
        },
        status,
    };

    let auth = MockAuthClient::new();
    auth.set_admin_delete_user(Err("user not found".to_string()));
    let reconciler = UserProfileReconciler::new(Arc::new(auth));

    let mut deleting = obj.clone();
    deleting.metadata.deletion_timestamp = Some(rfc3339_now());

    // UserProfile uses a uuid id, which MockStore (int-only) can't hold;
    // drive the reconciler directly through run_pass against a store that
    // only needs to answer update_status/delete for this one row.
    let store = SingleRowStore::new(deleting.clone());
    run_pass(&reconciler, &store, deleting.clone()).await.unwrap();
    let after_first = store.current();
    assert_eq!(after_first.status.common.phase, UserProfilePhase::Deleted);

    run_pass(&reconciler, &store, after_first.clone()).await.unwrap();
    assert!(store.deleted());

    let _ = (store, obj);
}

/// Minimal single-row [`ResourceStore`] for kinds keyed by a UUID, which
/// [`MockStore`] (int-keyed) can't represent.
struct SingleRowStore<Spec, Status> {
    row: parking_lot::Mutex<Option<Object<Spec, Status>>>,
}

impl<Spec, Status> SingleRowStore<Spec, Status>
where
    Spec: Clone,
    Status: Clone,
{
    fn new(obj: Object<Spec, Status>) -> Self {
        Self {
            row: parking_lot::Mutex::new(Some(obj)),
        }
    }

    fn current(&self) -> Object<Spec, Status> {
        self.row.lock().clone().expect("row still present")
    }

    fn deleted(&self) -> bool {
        self.row.lock().is_none()
    }
}

#[async_trait::async_trait]
impl<Spec, Status> ResourceStore<Spec, Status> for SingleRowStore<Spec, Status>
where
    Spec: Clone + Send + Sync,
    Status: Clone + Send + Sync,
{
    async fn get(&self, _key: &neutree_core::ObjectRef) -> Result<Object<Spec, Status>, neutree_store::StoreError> {
        self.row.lock().clone().ok_or(neutree_store::StoreError::NotFound)
    }

    async fn list(&self, _workspace: Option<&str>) -> Result<Vec<Object<Spec, Status>>, neutree_store::StoreError> {
        Ok(self.row.lock().iter().cloned().collect())
    }

    async fn create(&self, _metadata: ObjectMeta, _spec: Spec) -> Result<Object<Spec, Status>, neutree_store::StoreError> {
        unimplemented!("not needed by these scenarios")
    }

    async fn soft_delete(&self, _id: &ObjectId) -> Result<(), neutree_store::StoreError> {
        unimplemented!("not needed by these scenarios")
    }

    async fn update_status(&self, _id: &ObjectId, status: Status) -> Result<(), neutree_store::StoreError> {
        let mut row = self.row.lock();
        if let Some(obj) = row.as_mut() {
            obj.status = status;
        }
        Ok(())
    }

    async fn update_spec(&self, _id: &ObjectId, _spec: Spec) -> Result<(), neutree_store::StoreError> {
        unimplemented!("not needed by these scenarios")
    }

    async fn delete(&self, _id: &ObjectId) -> Result<(), neutree_store::StoreError> {
        *self.row.lock() = None;
        Ok(())
    }
}
