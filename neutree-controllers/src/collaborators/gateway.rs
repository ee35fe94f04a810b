use async_trait::async_trait;
use neutree_core::resources::api_key::ApiKeySpec;
use neutree_core::resources::cluster::{ClusterSpec, ClusterStatus};
use neutree_core::resources::endpoint::{EndpointSpec, EndpointStatus};
use neutree_core::resources::external_endpoint::ExternalEndpointSpec;
use neutree_core::Object;

/// Applies routing/api-key configuration to the outbound proxy (spec.md
/// §1, §6). Every method is `obj -> err | value`, matching the contract
/// table verbatim.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn sync_cluster(&self, cluster: &Object<ClusterSpec, ClusterStatus>) -> Result<(), String>;
    async fn delete_cluster(&self, cluster: &Object<ClusterSpec, ClusterStatus>) -> Result<(), String>;

    async fn sync_endpoint(&self, endpoint: &Object<EndpointSpec, EndpointStatus>) -> Result<(), String>;
    async fn delete_endpoint(&self, endpoint: &Object<EndpointSpec, EndpointStatus>) -> Result<(), String>;
    async fn get_endpoint_serve_url(
        &self,
        endpoint: &Object<EndpointSpec, EndpointStatus>,
    ) -> Result<String, String>;

    async fn sync_api_key(&self, api_key_id: &str, spec: &ApiKeySpec) -> Result<(), String>;
    async fn delete_api_key(&self, api_key_id: &str) -> Result<(), String>;

    async fn sync_external_endpoint(&self, spec: &ExternalEndpointSpec) -> Result<(), String>;
    async fn delete_external_endpoint(&self, name: &str) -> Result<(), String>;
    async fn get_external_endpoint_serve_url(&self, name: &str) -> Result<String, String>;
}
