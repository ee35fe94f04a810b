use async_trait::async_trait;
use uuid::Uuid;

/// The external identity/auth service that owns user credentials (spec.md
/// §1, §6). Errors whose text contains "not found" or "404" are benign —
/// the caller treats them as success (spec.md §4.8, §6).
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn admin_create_user(&self, email: &str) -> Result<Uuid, String>;
    async fn admin_update_user(&self, id: Uuid, email: &str, email_confirm: bool) -> Result<(), String>;
    async fn admin_delete_user(&self, id: Uuid) -> Result<(), String>;
}

/// Whether an auth-client error is benign (spec.md §6: "Errors containing
/// the substrings \"not found\" or \"404\" are benign").
pub fn is_benign_not_found(err: &str) -> bool {
    let lower = err.to_lowercase();
    lower.contains("not found") || lower.contains("404")
}
