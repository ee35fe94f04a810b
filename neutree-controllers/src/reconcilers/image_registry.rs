//! Image registry reconciler (spec.md §4.4): no delete-path external
//! cleanup, so deletion transitions straight to DELETED.

use std::sync::Arc;

use async_trait::async_trait;
use neutree_core::resources::image_registry::{ImageRegistryPhase, ImageRegistrySpec, ImageRegistryStatus};
use neutree_core::{time::rfc3339_now, Object, ResourceKind};

use crate::collaborators::image_service::probe_target;
use crate::collaborators::ImageService;
use crate::reconcile::{PassOutcome, Reconciler};

type ImageRegistryObject = Object<ImageRegistrySpec, ImageRegistryStatus>;

pub struct ImageRegistryReconciler {
    pub image_service: Arc<dyn ImageService>,
}

impl ImageRegistryReconciler {
    pub fn new(image_service: Arc<dyn ImageService>) -> Self {
        Self { image_service }
    }
}

#[async_trait]
impl Reconciler for ImageRegistryReconciler {
    type Spec = ImageRegistrySpec;
    type Status = ImageRegistryStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::ImageRegistry
    }

    async fn handle_normal(&self, obj: &ImageRegistryObject) -> PassOutcome<ImageRegistryStatus> {
        let mut status = obj.status.clone();
        let target = probe_target(&obj.spec.url, &obj.spec.repository);
        match self.image_service.list_image_tags(&target, &obj.spec.auth_config).await {
            Ok(_tags) => {
                if status.common.phase != ImageRegistryPhase::Connected {
                    status.common.last_transition_time = Some(rfc3339_now());
                }
                status.common.phase = ImageRegistryPhase::Connected;
                status.common.error_message = String::new();
            }
            Err(err) => {
                status.common.phase = ImageRegistryPhase::Failed;
                status.common.error_message = format!("failed to list image tags: {err}");
            }
        }
        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &ImageRegistryObject) -> PassOutcome<ImageRegistryStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == ImageRegistryPhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }
        status.common.phase = ImageRegistryPhase::Deleted;
        status.common.error_message = String::new();
        status.common.last_transition_time = Some(rfc3339_now());
        PassOutcome::status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::mock::MockImageService;
    use neutree_core::resources::image_registry::ImageRegistryAuthConfig;
    use neutree_core::{ObjectId, ObjectMeta};

    fn obj() -> ImageRegistryObject {
        Object {
            id: ObjectId::Int(1),
            api_version: "v1".to_string(),
            kind: ResourceKind::ImageRegistry,
            metadata: ObjectMeta {
                name: "ir".to_string(),
                display_name: None,
                workspace: None,
                deletion_timestamp: None,
                creation_timestamp: rfc3339_now(),
                update_timestamp: rfc3339_now(),
                labels: Default::default(),
                annotations: Default::default(),
            },
            spec: ImageRegistrySpec {
                url: "https://registry.example.com".to_string(),
                repository: "models".to_string(),
                auth_config: ImageRegistryAuthConfig::Token { token: "t".to_string() },
            },
            status: ImageRegistryStatus::default(),
        }
    }

    #[tokio::test]
    async fn successful_probe_transitions_to_connected() {
        let svc = MockImageService::new();
        let reconciler = ImageRegistryReconciler::new(Arc::new(svc));
        let outcome = reconciler.handle_normal(&obj()).await;
        assert_eq!(outcome.status.common.phase, ImageRegistryPhase::Connected);
    }

    #[tokio::test]
    async fn failed_probe_transitions_to_failed() {
        let svc = MockImageService::new();
        svc.set_list_image_tags(Err("unauthorized".to_string()));
        let reconciler = ImageRegistryReconciler::new(Arc::new(svc));
        let outcome = reconciler.handle_normal(&obj()).await;
        assert_eq!(outcome.status.common.phase, ImageRegistryPhase::Failed);
        assert!(outcome.status.common.error_message.contains("unauthorized"));
    }

    #[tokio::test]
    async fn deletion_has_no_cleanup_and_goes_straight_to_deleted() {
        let svc = MockImageService::new();
        let reconciler = ImageRegistryReconciler::new(Arc::new(svc));
        let mut o = obj();
        o.metadata.deletion_timestamp = Some(rfc3339_now());
        let outcome = reconciler.handle_deletion(&o).await;
        assert_eq!(outcome.status.common.phase, ImageRegistryPhase::Deleted);
        assert!(!outcome.delete_row);
    }
}
