//! UserProfile reconciler (spec.md §4.8): two-phase deletion through the
//! auth client, and a sync-on-drift normal path.

use std::sync::Arc;

use async_trait::async_trait;
use neutree_core::resources::user_profile::{UserProfilePhase, UserProfileSpec, UserProfileStatus};
use neutree_core::{is_force_delete, time::rfc3339_now, Object, ResourceKind};

use crate::collaborators::auth_client::is_benign_not_found;
use crate::collaborators::AuthClient;
use crate::reconcile::{PassOutcome, Reconciler};

type UserProfileObject = Object<UserProfileSpec, UserProfileStatus>;

pub struct UserProfileReconciler {
    pub auth_client: Arc<dyn AuthClient>,
}

impl UserProfileReconciler {
    pub fn new(auth_client: Arc<dyn AuthClient>) -> Self {
        Self { auth_client }
    }

    fn parse_uuid(obj: &UserProfileObject) -> Result<uuid::Uuid, String> {
        obj.id
            .as_uuid()
            .ok_or_else(|| format!("user profile id {} is not a uuid", obj.id))
    }
}

#[async_trait]
impl Reconciler for UserProfileReconciler {
    type Spec = UserProfileSpec;
    type Status = UserProfileStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::UserProfile
    }

    async fn handle_normal(&self, obj: &UserProfileObject) -> PassOutcome<UserProfileStatus> {
        let mut status = obj.status.clone();

        let needs_sync = status
            .synced_spec
            .as_ref()
            .map(|synced| synced.email != obj.spec.email)
            .unwrap_or(true);
        if !needs_sync {
            return PassOutcome::status(status);
        }

        let id = match Self::parse_uuid(obj) {
            Ok(id) => id,
            Err(err) => {
                status.common.phase = UserProfilePhase::Failed;
                status.common.error_message = err;
                return PassOutcome::status(status);
            }
        };

        match self.auth_client.admin_update_user(id, &obj.spec.email, true).await {
            Ok(()) => {
                status.synced_spec = Some(obj.spec.clone());
                if status.common.phase != UserProfilePhase::Created {
                    status.common.last_transition_time = Some(rfc3339_now());
                }
                status.common.phase = UserProfilePhase::Created;
                status.common.error_message = String::new();
            }
            Err(err) => {
                status.common.phase = UserProfilePhase::Failed;
                status.common.error_message = format!("failed to sync user into auth service: {err}");
            }
        }

        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &UserProfileObject) -> PassOutcome<UserProfileStatus> {
        let mut status = obj.status.clone();

        if status.common.phase == UserProfilePhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }

        let id = match Self::parse_uuid(obj) {
            Ok(id) => id,
            Err(err) => {
                status.common.error_message = err;
                return PassOutcome::status(status);
            }
        };

        let result = match self.auth_client.admin_delete_user(id).await {
            Ok(()) => Ok(()),
            Err(err) if is_benign_not_found(&err) => Ok(()),
            Err(err) => Err(err),
        };

        let force = is_force_delete(&obj.metadata.annotations);
        match result {
            Ok(()) => {
                status.common.phase = UserProfilePhase::Deleted;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            Err(err) if force => {
                tracing::warn!(user = obj.name(), error = %err, "force-deleting user profile despite auth cleanup failure");
                status.common.phase = UserProfilePhase::Deleted;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            Err(err) => {
                status.common.phase = UserProfilePhase::Failed;
                status.common.error_message = err;
            }
        }

        PassOutcome::status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::mock::MockAuthClient;
    use neutree_core::{ObjectId, ObjectMeta};
    use uuid::Uuid;

    fn obj() -> UserProfileObject {
        Object {
            id: ObjectId::Uuid(Uuid::nil()),
            api_version: "v1".to_string(),
            kind: ResourceKind::UserProfile,
            metadata: ObjectMeta {
                name: "alice".to_string(),
                display_name: None,
                workspace: None,
                deletion_timestamp: None,
                creation_timestamp: rfc3339_now(),
                update_timestamp: rfc3339_now(),
                labels: Default::default(),
                annotations: Default::default(),
            },
            spec: UserProfileSpec {
                email: "alice@example.com".to_string(),
            },
            status: UserProfileStatus::default(),
        }
    }

    #[tokio::test]
    async fn first_sync_calls_admin_update_user_and_records_synced_spec() {
        let reconciler = UserProfileReconciler::new(Arc::new(MockAuthClient::new()));
        let outcome = reconciler.handle_normal(&obj()).await;
        assert_eq!(outcome.status.common.phase, UserProfilePhase::Created);
        assert_eq!(outcome.status.synced_spec, Some(obj().spec));
    }

    #[tokio::test]
    async fn matching_synced_spec_skips_sync_call() {
        let auth = Arc::new(MockAuthClient::new());
        let reconciler = UserProfileReconciler::new(auth.clone());
        let mut o = obj();
        o.status.synced_spec = Some(o.spec.clone());
        o.status.common.phase = UserProfilePhase::Created;
        reconciler.handle_normal(&o).await;
        assert!(auth.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_user_not_found_is_treated_as_success() {
        let auth = MockAuthClient::new();
        auth.set_admin_delete_user(Err("user not found".to_string()));
        let reconciler = UserProfileReconciler::new(Arc::new(auth));
        let mut o = obj();
        o.metadata.deletion_timestamp = Some(rfc3339_now());
        let outcome = reconciler.handle_deletion(&o).await;
        assert_eq!(outcome.status.common.phase, UserProfilePhase::Deleted);
    }

    #[tokio::test]
    async fn genuine_delete_failure_without_force_sets_failed() {
        let auth = MockAuthClient::new();
        auth.set_admin_delete_user(Err("internal server error".to_string()));
        let reconciler = UserProfileReconciler::new(Arc::new(auth));
        let mut o = obj();
        o.metadata.deletion_timestamp = Some(rfc3339_now());
        let outcome = reconciler.handle_deletion(&o).await;
        assert_eq!(outcome.status.common.phase, UserProfilePhase::Failed);
    }
}
