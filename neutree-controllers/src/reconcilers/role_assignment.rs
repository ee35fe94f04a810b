//! RoleAssignment reconciler (spec.md §4.7): no external side effects, a
//! write-through state machine.

use async_trait::async_trait;
use neutree_core::resources::role_assignment::{RoleAssignmentPhase, RoleAssignmentSpec, RoleAssignmentStatus};
use neutree_core::{time::rfc3339_now, Object, ResourceKind};

use crate::reconcile::{PassOutcome, Reconciler};

type RoleAssignmentObject = Object<RoleAssignmentSpec, RoleAssignmentStatus>;

#[derive(Default)]
pub struct RoleAssignmentReconciler;

#[async_trait]
impl Reconciler for RoleAssignmentReconciler {
    type Spec = RoleAssignmentSpec;
    type Status = RoleAssignmentStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::RoleAssignment
    }

    async fn handle_normal(&self, obj: &RoleAssignmentObject) -> PassOutcome<RoleAssignmentStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == RoleAssignmentPhase::Pending {
            status.common.phase = RoleAssignmentPhase::Created;
            status.common.error_message = String::new();
            status.common.last_transition_time = Some(rfc3339_now());
        }
        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &RoleAssignmentObject) -> PassOutcome<RoleAssignmentStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == RoleAssignmentPhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }
        status.common.phase = RoleAssignmentPhase::Deleted;
        status.common.error_message = String::new();
        status.common.last_transition_time = Some(rfc3339_now());
        PassOutcome::status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neutree_core::{ObjectId, ObjectMeta};

    fn obj() -> RoleAssignmentObject {
        Object {
            id: ObjectId::Int(1),
            api_version: "v1".to_string(),
            kind: ResourceKind::RoleAssignment,
            metadata: ObjectMeta {
                name: "ra".to_string(),
                display_name: None,
                workspace: None,
                deletion_timestamp: None,
                creation_timestamp: rfc3339_now(),
                update_timestamp: rfc3339_now(),
                labels: Default::default(),
                annotations: Default::default(),
            },
            spec: RoleAssignmentSpec {
                user_id: "11111111-1111-1111-1111-111111111111".to_string(),
                role: "viewer".to_string(),
            },
            status: RoleAssignmentStatus::default(),
        }
    }

    #[tokio::test]
    async fn pending_becomes_created() {
        let outcome = RoleAssignmentReconciler.handle_normal(&obj()).await;
        assert_eq!(outcome.status.common.phase, RoleAssignmentPhase::Created);
    }
}
