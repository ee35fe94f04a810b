//! Hand-rolled fakes for the external collaborator traits, recording every
//! call so tests can assert on call order and arguments. The corpus does
//! not reach for `mockall`, so neither do we (spec.md's ambient-stack
//! expansion, SPEC_FULL.md §1).

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use neutree_core::resources::api_key::ApiKeySpec;
use neutree_core::resources::cluster::{ClusterSpec, ClusterStatus};
use neutree_core::resources::endpoint::{EndpointSpec, EndpointStatus};
use neutree_core::resources::external_endpoint::ExternalEndpointSpec;
use neutree_core::resources::image_registry::ImageRegistryAuthConfig;
use neutree_core::Object;

use super::accelerator_manager::{AcceleratorManager, AcceleratorSupportedEngine};
use super::auth_client::AuthClient;
use super::gateway::Gateway;
use super::image_service::ImageService;
use super::model_registry::ModelRegistryDriver;
use super::orchestrator::{ClusterRuntimeStatus, EndpointRuntimeStatus, Orchestrator};

/// Default config for [`MockOrchestrator`]'s `cluster_status`: a cluster
/// whose observed nodes already match its desired count. Tests that care
/// about partial convergence override it with [`MockOrchestrator::set_cluster_status`].
fn default_cluster_status() -> ClusterRuntimeStatus {
    ClusterRuntimeStatus {
        ready_nodes: 1,
        desire_nodes: 1,
        version: "1.0.0".to_string(),
        ray_version: "2.9.0".to_string(),
    }
}

pub struct MockOrchestrator {
    calls: Mutex<Vec<String>>,
    create_cluster: Mutex<Result<String, String>>,
    delete_cluster: Mutex<Result<(), String>>,
    health_check: Mutex<Result<(), String>>,
    cluster_status: Mutex<Result<ClusterRuntimeStatus, String>>,
    sync_cluster: Mutex<Result<(), String>>,
    desire_static_workers_ip: Mutex<Vec<String>>,
    start_node: Mutex<HashMap<String, Result<(), String>>>,
    stop_node: Mutex<HashMap<String, Result<(), String>>>,
    create_endpoint: Mutex<Result<(), String>>,
    delete_endpoint: Mutex<Result<(), String>>,
    pause_endpoint: Mutex<Result<(), String>>,
    is_endpoint_paused: Mutex<bool>,
    endpoint_status: Mutex<Result<EndpointRuntimeStatus, String>>,
}

impl Default for MockOrchestrator {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            create_cluster: Mutex::new(Ok("10.0.0.1".to_string())),
            delete_cluster: Mutex::new(Ok(())),
            health_check: Mutex::new(Ok(())),
            cluster_status: Mutex::new(Ok(default_cluster_status())),
            sync_cluster: Mutex::new(Ok(())),
            desire_static_workers_ip: Mutex::new(Vec::new()),
            start_node: Mutex::new(HashMap::new()),
            stop_node: Mutex::new(HashMap::new()),
            create_endpoint: Mutex::new(Ok(())),
            delete_endpoint: Mutex::new(Ok(())),
            pause_endpoint: Mutex::new(Ok(())),
            is_endpoint_paused: Mutex::new(false),
            endpoint_status: Mutex::new(Ok(EndpointRuntimeStatus::Running)),
        }
    }
}

impl MockOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn set_health_check(&self, result: Result<(), String>) {
        *self.health_check.lock() = result;
    }

    pub fn set_sync_cluster(&self, result: Result<(), String>) {
        *self.sync_cluster.lock() = result;
    }

    pub fn set_delete_cluster(&self, result: Result<(), String>) {
        *self.delete_cluster.lock() = result;
    }

    pub fn set_cluster_status(&self, result: Result<ClusterRuntimeStatus, String>) {
        *self.cluster_status.lock() = result;
    }

    pub fn set_desire_static_workers_ip(&self, ips: Vec<String>) {
        *self.desire_static_workers_ip.lock() = ips;
    }

    pub fn set_start_node(&self, ip: &str, result: Result<(), String>) {
        self.start_node.lock().insert(ip.to_string(), result);
    }

    pub fn set_stop_node(&self, ip: &str, result: Result<(), String>) {
        self.stop_node.lock().insert(ip.to_string(), result);
    }

    pub fn set_delete_endpoint(&self, result: Result<(), String>) {
        *self.delete_endpoint.lock() = result;
    }

    pub fn set_is_endpoint_paused(&self, paused: bool) {
        *self.is_endpoint_paused.lock() = paused;
    }

    pub fn set_endpoint_status(&self, result: Result<EndpointRuntimeStatus, String>) {
        *self.endpoint_status.lock() = result;
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

#[async_trait]
impl Orchestrator for MockOrchestrator {
    async fn create_cluster(&self, _cluster: &Object<ClusterSpec, ClusterStatus>) -> Result<String, String> {
        self.log("create_cluster");
        self.create_cluster.lock().clone()
    }

    async fn delete_cluster(&self, _cluster: &Object<ClusterSpec, ClusterStatus>) -> Result<(), String> {
        self.log("delete_cluster");
        self.delete_cluster.lock().clone()
    }

    async fn health_check(&self, _cluster: &Object<ClusterSpec, ClusterStatus>) -> Result<(), String> {
        self.log("health_check");
        self.health_check.lock().clone()
    }

    async fn cluster_status(
        &self,
        _cluster: &Object<ClusterSpec, ClusterStatus>,
    ) -> Result<ClusterRuntimeStatus, String> {
        self.log("cluster_status");
        self.cluster_status.lock().clone()
    }

    async fn sync_cluster(&self, _cluster: &Object<ClusterSpec, ClusterStatus>) -> Result<(), String> {
        self.log("sync_cluster");
        self.sync_cluster.lock().clone()
    }

    async fn get_desire_static_workers_ip(
        &self,
        _cluster: &Object<ClusterSpec, ClusterStatus>,
    ) -> Result<Vec<String>, String> {
        self.log("get_desire_static_workers_ip");
        Ok(self.desire_static_workers_ip.lock().clone())
    }

    async fn start_node(&self, _cluster: &Object<ClusterSpec, ClusterStatus>, ip: &str) -> Result<(), String> {
        self.log(format!("start_node({ip})"));
        self.start_node
            .lock()
            .get(ip)
            .cloned()
            .unwrap_or(Ok(()))
    }

    async fn stop_node(&self, _cluster: &Object<ClusterSpec, ClusterStatus>, ip: &str) -> Result<(), String> {
        self.log(format!("stop_node({ip})"));
        self.stop_node.lock().get(ip).cloned().unwrap_or(Ok(()))
    }

    async fn create_endpoint(&self, _endpoint: &Object<EndpointSpec, EndpointStatus>) -> Result<(), String> {
        self.log("create_endpoint");
        self.create_endpoint.lock().clone()
    }

    async fn delete_endpoint(&self, _endpoint: &Object<EndpointSpec, EndpointStatus>) -> Result<(), String> {
        self.log("delete_endpoint");
        self.delete_endpoint.lock().clone()
    }

    async fn pause_endpoint(&self, _endpoint: &Object<EndpointSpec, EndpointStatus>) -> Result<(), String> {
        self.log("pause_endpoint");
        self.pause_endpoint.lock().clone()
    }

    async fn is_endpoint_paused(&self, _endpoint: &Object<EndpointSpec, EndpointStatus>) -> Result<bool, String> {
        self.log("is_endpoint_paused");
        Ok(*self.is_endpoint_paused.lock())
    }

    async fn get_endpoint_status(
        &self,
        _endpoint: &Object<EndpointSpec, EndpointStatus>,
    ) -> Result<EndpointRuntimeStatus, String> {
        self.log("get_endpoint_status");
        self.endpoint_status.lock().clone()
    }
}

pub struct MockGateway {
    calls: Mutex<Vec<String>>,
    sync_cluster: Mutex<Result<(), String>>,
    delete_cluster: Mutex<Result<(), String>>,
    sync_endpoint: Mutex<Result<(), String>>,
    delete_endpoint: Mutex<Result<(), String>>,
    endpoint_serve_url: Mutex<Result<String, String>>,
    sync_api_key: Mutex<Result<(), String>>,
    delete_api_key: Mutex<Result<(), String>>,
    sync_external_endpoint: Mutex<Result<(), String>>,
    delete_external_endpoint: Mutex<Result<(), String>>,
    external_endpoint_serve_url: Mutex<Result<String, String>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sync_cluster: Mutex::new(Ok(())),
            delete_cluster: Mutex::new(Ok(())),
            sync_endpoint: Mutex::new(Ok(())),
            delete_endpoint: Mutex::new(Ok(())),
            endpoint_serve_url: Mutex::new(Ok(String::new())),
            sync_api_key: Mutex::new(Ok(())),
            delete_api_key: Mutex::new(Ok(())),
            sync_external_endpoint: Mutex::new(Ok(())),
            delete_external_endpoint: Mutex::new(Ok(())),
            external_endpoint_serve_url: Mutex::new(Ok(String::new())),
        }
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn set_delete_cluster(&self, result: Result<(), String>) {
        *self.delete_cluster.lock() = result;
    }

    pub fn set_delete_endpoint(&self, result: Result<(), String>) {
        *self.delete_endpoint.lock() = result;
    }

    pub fn set_endpoint_serve_url(&self, result: Result<String, String>) {
        *self.endpoint_serve_url.lock() = result;
    }

    pub fn set_sync_endpoint(&self, result: Result<(), String>) {
        *self.sync_endpoint.lock() = result;
    }

    pub fn set_external_endpoint_serve_url(&self, result: Result<String, String>) {
        *self.external_endpoint_serve_url.lock() = result;
    }

    pub fn set_delete_api_key(&self, result: Result<(), String>) {
        *self.delete_api_key.lock() = result;
    }

    pub fn set_sync_external_endpoint(&self, result: Result<(), String>) {
        *self.sync_external_endpoint.lock() = result;
    }

    pub fn set_delete_external_endpoint(&self, result: Result<(), String>) {
        *self.delete_external_endpoint.lock() = result;
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn sync_cluster(&self, _cluster: &Object<ClusterSpec, ClusterStatus>) -> Result<(), String> {
        self.log("sync_cluster");
        self.sync_cluster.lock().clone()
    }

    async fn delete_cluster(&self, _cluster: &Object<ClusterSpec, ClusterStatus>) -> Result<(), String> {
        self.log("delete_cluster");
        self.delete_cluster.lock().clone()
    }

    async fn sync_endpoint(&self, _endpoint: &Object<EndpointSpec, EndpointStatus>) -> Result<(), String> {
        self.log("sync_endpoint");
        self.sync_endpoint.lock().clone()
    }

    async fn delete_endpoint(&self, _endpoint: &Object<EndpointSpec, EndpointStatus>) -> Result<(), String> {
        self.log("delete_endpoint");
        self.delete_endpoint.lock().clone()
    }

    async fn get_endpoint_serve_url(
        &self,
        _endpoint: &Object<EndpointSpec, EndpointStatus>,
    ) -> Result<String, String> {
        self.log("get_endpoint_serve_url");
        self.endpoint_serve_url.lock().clone()
    }

    async fn sync_api_key(&self, _api_key_id: &str, _spec: &ApiKeySpec) -> Result<(), String> {
        self.log("sync_api_key");
        self.sync_api_key.lock().clone()
    }

    async fn delete_api_key(&self, _api_key_id: &str) -> Result<(), String> {
        self.log("delete_api_key");
        self.delete_api_key.lock().clone()
    }

    async fn sync_external_endpoint(&self, _spec: &ExternalEndpointSpec) -> Result<(), String> {
        self.log("sync_external_endpoint");
        self.sync_external_endpoint.lock().clone()
    }

    async fn delete_external_endpoint(&self, _name: &str) -> Result<(), String> {
        self.log("delete_external_endpoint");
        self.delete_external_endpoint.lock().clone()
    }

    async fn get_external_endpoint_serve_url(&self, _name: &str) -> Result<String, String> {
        self.log("get_external_endpoint_serve_url");
        self.external_endpoint_serve_url.lock().clone()
    }
}

pub struct MockAuthClient {
    calls: Mutex<Vec<String>>,
    admin_create_user: Mutex<Result<Uuid, String>>,
    admin_update_user: Mutex<Result<(), String>>,
    admin_delete_user: Mutex<Result<(), String>>,
}

impl Default for MockAuthClient {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            admin_create_user: Mutex::new(Ok(Uuid::nil())),
            admin_update_user: Mutex::new(Ok(())),
            admin_delete_user: Mutex::new(Ok(())),
        }
    }
}

impl MockAuthClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn set_admin_update_user(&self, result: Result<(), String>) {
        *self.admin_update_user.lock() = result;
    }

    pub fn set_admin_delete_user(&self, result: Result<(), String>) {
        *self.admin_delete_user.lock() = result;
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

#[async_trait]
impl AuthClient for MockAuthClient {
    async fn admin_create_user(&self, _email: &str) -> Result<Uuid, String> {
        self.log("admin_create_user");
        self.admin_create_user.lock().clone()
    }

    async fn admin_update_user(&self, _id: Uuid, _email: &str, _email_confirm: bool) -> Result<(), String> {
        self.log("admin_update_user");
        self.admin_update_user.lock().clone()
    }

    async fn admin_delete_user(&self, _id: Uuid) -> Result<(), String> {
        self.log("admin_delete_user");
        self.admin_delete_user.lock().clone()
    }
}

pub struct MockImageService {
    calls: Mutex<Vec<String>>,
    list_image_tags: Mutex<Result<Vec<String>, String>>,
}

impl Default for MockImageService {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            list_image_tags: Mutex::new(Ok(vec!["latest".to_string()])),
        }
    }
}

impl MockImageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn set_list_image_tags(&self, result: Result<Vec<String>, String>) {
        *self.list_image_tags.lock() = result;
    }
}

#[async_trait]
impl ImageService for MockImageService {
    async fn list_image_tags(
        &self,
        target: &str,
        _auth: &ImageRegistryAuthConfig,
    ) -> Result<Vec<String>, String> {
        self.calls.lock().push(format!("list_image_tags({target})"));
        self.list_image_tags.lock().clone()
    }
}

pub struct MockModelRegistryDriver {
    calls: Mutex<Vec<String>>,
    connect: Mutex<Result<(), String>>,
    disconnect: Mutex<Result<(), String>>,
    healthy_check: Mutex<Result<(), String>>,
}

impl Default for MockModelRegistryDriver {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            connect: Mutex::new(Ok(())),
            disconnect: Mutex::new(Ok(())),
            healthy_check: Mutex::new(Ok(())),
        }
    }
}

impl MockModelRegistryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn set_connect(&self, result: Result<(), String>) {
        *self.connect.lock() = result;
    }

    pub fn set_disconnect(&self, result: Result<(), String>) {
        *self.disconnect.lock() = result;
    }

    pub fn set_healthy_check(&self, result: Result<(), String>) {
        *self.healthy_check.lock() = result;
    }
}

#[async_trait]
impl ModelRegistryDriver for MockModelRegistryDriver {
    async fn connect(&self) -> Result<(), String> {
        self.calls.lock().push("connect".to_string());
        self.connect.lock().clone()
    }

    async fn disconnect(&self) -> Result<(), String> {
        self.calls.lock().push("disconnect".to_string());
        self.disconnect.lock().clone()
    }

    async fn healthy_check(&self) -> Result<(), String> {
        self.calls.lock().push("healthy_check".to_string());
        self.healthy_check.lock().clone()
    }
}

pub struct MockAcceleratorManager {
    engines: Mutex<Vec<AcceleratorSupportedEngine>>,
}

impl Default for MockAcceleratorManager {
    fn default() -> Self {
        Self {
            engines: Mutex::new(Vec::new()),
        }
    }
}

impl MockAcceleratorManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_engines(&self, engines: Vec<AcceleratorSupportedEngine>) {
        *self.engines.lock() = engines;
    }
}

#[async_trait]
impl AcceleratorManager for MockAcceleratorManager {
    async fn get_all_accelerator_support_engines(&self) -> Result<Vec<AcceleratorSupportedEngine>, String> {
        Ok(self.engines.lock().clone())
    }
}
