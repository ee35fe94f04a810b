//! Workspace reconciler (spec.md §4.7): on entering CREATED, seeds one
//! engine row per accelerator-supported engine; on deletion, removes every
//! engine it owns before marking DELETED.

use std::sync::Arc;

use async_trait::async_trait;
use neutree_core::resources::engine::{EngineSpec, EngineStatus};
use neutree_core::resources::workspace::{WorkspacePhase, WorkspaceSpec, WorkspaceStatus};
use neutree_core::{time::rfc3339_now, Object, ObjectMeta, ResourceKind};
use neutree_store::ResourceStore;

use crate::collaborators::AcceleratorManager;
use crate::reconcile::{PassOutcome, Reconciler};

type WorkspaceObject = Object<WorkspaceSpec, WorkspaceStatus>;

pub struct WorkspaceReconciler {
    pub accelerator_manager: Arc<dyn AcceleratorManager>,
    pub engine_store: Arc<dyn ResourceStore<EngineSpec, EngineStatus>>,
}

impl WorkspaceReconciler {
    pub fn new(
        accelerator_manager: Arc<dyn AcceleratorManager>,
        engine_store: Arc<dyn ResourceStore<EngineSpec, EngineStatus>>,
    ) -> Self {
        Self {
            accelerator_manager,
            engine_store,
        }
    }

    async fn seed_engines(&self, workspace: &str) -> Result<(), String> {
        let engines = self
            .accelerator_manager
            .get_all_accelerator_support_engines()
            .await
            .map_err(|e| format!("failed to list accelerator-supported engines: {e}"))?;
        for engine in engines {
            let metadata = ObjectMeta {
                name: format!("{}-{}", workspace, engine.accelerator),
                display_name: None,
                workspace: Some(workspace.to_string()),
                deletion_timestamp: None,
                creation_timestamp: rfc3339_now(),
                update_timestamp: rfc3339_now(),
                labels: Default::default(),
                annotations: Default::default(),
            };
            let spec = EngineSpec {
                accelerator: engine.accelerator,
                image: engine.image,
                seeded_by_workspace: Some(true),
            };
            self.engine_store
                .create(metadata, spec)
                .await
                .map_err(|e| format!("failed to seed engine row: {e}"))?;
        }
        Ok(())
    }

    async fn remove_owned_engines(&self, workspace: &str) -> Result<(), String> {
        let engines = self
            .engine_store
            .list(Some(workspace))
            .await
            .map_err(|e| format!("failed to list workspace engines: {e}"))?;
        for engine in engines {
            if engine.spec.seeded_by_workspace != Some(true) {
                continue;
            }
            self.engine_store
                .delete(&engine.id)
                .await
                .map_err(|e| format!("failed to delete owned engine {}: {e}", engine.name()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl Reconciler for WorkspaceReconciler {
    type Spec = WorkspaceSpec;
    type Status = WorkspaceStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Workspace
    }

    async fn handle_normal(&self, obj: &WorkspaceObject) -> PassOutcome<WorkspaceStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == WorkspacePhase::Pending {
            match self.seed_engines(obj.name()).await {
                Ok(()) => {
                    status.common.phase = WorkspacePhase::Created;
                    status.common.error_message = String::new();
                    status.common.last_transition_time = Some(rfc3339_now());
                }
                Err(err) => {
                    status.common.phase = WorkspacePhase::Failed;
                    status.common.error_message = err;
                }
            }
        }
        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &WorkspaceObject) -> PassOutcome<WorkspaceStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == WorkspacePhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }
        match self.remove_owned_engines(obj.name()).await {
            Ok(()) => {
                status.common.phase = WorkspacePhase::Deleted;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            Err(err) => {
                status.common.error_message = err;
            }
        }
        PassOutcome::status(status)
    }
}
