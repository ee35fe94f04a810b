//! Role reconciler (spec.md §4.7): no external side effects, a
//! write-through state machine. Preset rows (`spec.preset_key` non-null)
//! are protected at the database layer (spec.md §4.10), not here.

use async_trait::async_trait;
use neutree_core::resources::role::{RolePhase, RoleSpec, RoleStatus};
use neutree_core::{time::rfc3339_now, Object, ResourceKind};

use crate::reconcile::{PassOutcome, Reconciler};

type RoleObject = Object<RoleSpec, RoleStatus>;

#[derive(Default)]
pub struct RoleReconciler;

#[async_trait]
impl Reconciler for RoleReconciler {
    type Spec = RoleSpec;
    type Status = RoleStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Role
    }

    async fn handle_normal(&self, obj: &RoleObject) -> PassOutcome<RoleStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == RolePhase::Pending {
            status.common.phase = RolePhase::Created;
            status.common.error_message = String::new();
            status.common.last_transition_time = Some(rfc3339_now());
        }
        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &RoleObject) -> PassOutcome<RoleStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == RolePhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }
        status.common.phase = RolePhase::Deleted;
        status.common.error_message = String::new();
        status.common.last_transition_time = Some(rfc3339_now());
        PassOutcome::status(status)
    }
}
