use async_trait::async_trait;

use neutree_core::resources::image_registry::ImageRegistryAuthConfig;

/// Validates catalog access against an image registry (spec.md §1, §6).
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn list_image_tags(
        &self,
        target: &str,
        auth: &ImageRegistryAuthConfig,
    ) -> Result<Vec<String>, String>;
}

/// Builds the probe target spec.md §4.4 names: `"{host}/{repository}/neutree-serve"`.
pub fn probe_target(url: &str, repository: &str) -> String {
    let host = url.trim_end_matches('/');
    format!("{host}/{repository}/neutree-serve")
}
