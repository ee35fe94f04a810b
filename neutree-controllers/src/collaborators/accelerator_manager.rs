use async_trait::async_trait;

/// One engine the accelerator manager knows how to run workloads on
/// (spec.md §4.7: "seeds one engine row per accelerator-supported engine").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceleratorSupportedEngine {
    pub accelerator: String,
    pub image: String,
}

/// Out-of-scope collaborator (spec.md §6) that knows which accelerators
/// (GPU/TPU families) the platform currently supports and which engine
/// image serves each.
#[async_trait]
pub trait AcceleratorManager: Send + Sync {
    async fn get_all_accelerator_support_engines(&self) -> Result<Vec<AcceleratorSupportedEngine>, String>;
}
