//! Engine reconciler (spec.md §4.7): no external side effects, a
//! write-through state machine.

use async_trait::async_trait;
use neutree_core::resources::engine::{EnginePhase, EngineSpec, EngineStatus};
use neutree_core::{time::rfc3339_now, Object, ResourceKind};

use crate::reconcile::{PassOutcome, Reconciler};

type EngineObject = Object<EngineSpec, EngineStatus>;

#[derive(Default)]
pub struct EngineReconciler;

#[async_trait]
impl Reconciler for EngineReconciler {
    type Spec = EngineSpec;
    type Status = EngineStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Engine
    }

    async fn handle_normal(&self, obj: &EngineObject) -> PassOutcome<EngineStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == EnginePhase::Pending {
            status.common.phase = EnginePhase::Ready;
            status.common.error_message = String::new();
            status.common.last_transition_time = Some(rfc3339_now());
        }
        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &EngineObject) -> PassOutcome<EngineStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == EnginePhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }
        status.common.phase = EnginePhase::Deleted;
        status.common.error_message = String::new();
        status.common.last_transition_time = Some(rfc3339_now());
        PassOutcome::status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neutree_core::{ObjectId, ObjectMeta};

    fn obj(phase: EnginePhase) -> EngineObject {
        let mut status = EngineStatus::default();
        status.common.phase = phase;
        Object {
            id: ObjectId::Int(1),
            api_version: "v1".to_string(),
            kind: ResourceKind::Engine,
            metadata: ObjectMeta {
                name: "e".to_string(),
                display_name: None,
                workspace: Some("w".to_string()),
                deletion_timestamp: None,
                creation_timestamp: rfc3339_now(),
                update_timestamp: rfc3339_now(),
                labels: Default::default(),
                annotations: Default::default(),
            },
            spec: EngineSpec {
                accelerator: "nvidia-a100".to_string(),
                image: "neutree/engine:latest".to_string(),
                seeded_by_workspace: None,
            },
            status,
        }
    }

    #[tokio::test]
    async fn pending_becomes_ready() {
        let outcome = EngineReconciler.handle_normal(&obj(EnginePhase::Pending)).await;
        assert_eq!(outcome.status.common.phase, EnginePhase::Ready);
    }

    #[tokio::test]
    async fn deletion_marks_deleted_then_next_pass_deletes_row() {
        let mut o = obj(EnginePhase::Ready);
        o.metadata.deletion_timestamp = Some(rfc3339_now());
        let first = EngineReconciler.handle_deletion(&o).await;
        assert_eq!(first.status.common.phase, EnginePhase::Deleted);
        assert!(!first.delete_row);

        o.status = first.status;
        let second = EngineReconciler.handle_deletion(&o).await;
        assert!(second.delete_row);
    }
}
