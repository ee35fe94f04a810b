//! Model registry reconciler (spec.md §4.5): a small state machine driven
//! through a [`DriverRegistry`]-selected [`ModelRegistryDriver`].

use std::sync::Arc;

use async_trait::async_trait;
use neutree_core::resources::model_registry::{ModelRegistryPhase, ModelRegistrySpec, ModelRegistryStatus};
use neutree_core::{time::rfc3339_now, Object, ResourceKind};

use crate::collaborators::model_registry::DriverRegistry;
use crate::reconcile::{PassOutcome, Reconciler};

type ModelRegistryObject = Object<ModelRegistrySpec, ModelRegistryStatus>;

pub struct ModelRegistryReconciler {
    pub drivers: Arc<DriverRegistry>,
}

impl ModelRegistryReconciler {
    pub fn new(drivers: Arc<DriverRegistry>) -> Self {
        Self { drivers }
    }
}

#[async_trait]
impl Reconciler for ModelRegistryReconciler {
    type Spec = ModelRegistrySpec;
    type Status = ModelRegistryStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::ModelRegistry
    }

    async fn handle_normal(&self, obj: &ModelRegistryObject) -> PassOutcome<ModelRegistryStatus> {
        let mut status = obj.status.clone();

        let driver = match self.drivers.build(&obj.spec) {
            Ok(driver) => driver,
            Err(err) => {
                status.common.phase = ModelRegistryPhase::Failed;
                status.common.error_message = err;
                return PassOutcome::status(status);
            }
        };

        let result = match status.common.phase {
            ModelRegistryPhase::Pending => driver.connect().await,
            ModelRegistryPhase::Connected => driver.healthy_check().await,
            ModelRegistryPhase::Failed => match driver.disconnect().await {
                Ok(()) => driver.connect().await,
                Err(err) => Err(err),
            },
            ModelRegistryPhase::Deleted => Ok(()),
        };

        match result {
            Ok(()) => {
                if status.common.phase != ModelRegistryPhase::Connected {
                    status.common.last_transition_time = Some(rfc3339_now());
                }
                status.common.phase = ModelRegistryPhase::Connected;
                status.common.error_message = String::new();
            }
            Err(err) => {
                status.common.phase = ModelRegistryPhase::Failed;
                status.common.error_message = err;
            }
        }

        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &ModelRegistryObject) -> PassOutcome<ModelRegistryStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == ModelRegistryPhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }

        if let Ok(driver) = self.drivers.build(&obj.spec) {
            if let Err(err) = driver.disconnect().await {
                tracing::warn!(model_registry = obj.name(), error = %err, "disconnect failed during deletion, proceeding anyway");
            }
        }

        status.common.phase = ModelRegistryPhase::Deleted;
        status.common.error_message = String::new();
        status.common.last_transition_time = Some(rfc3339_now());
        PassOutcome::status(status)
    }
}
