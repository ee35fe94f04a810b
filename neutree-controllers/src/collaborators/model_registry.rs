use async_trait::async_trait;

use neutree_core::resources::model_registry::{ModelRegistrySpec, ModelRegistryType};

/// One connected model-registry backend (HuggingFace, file-based, NFS —
/// spec.md §1, §4.5, §6). Selected by `spec.type` through
/// [`DriverRegistry`] rather than dynamic plugin loading (spec.md §9
/// design note: "represent as a tagged sum and a constructor table").
#[async_trait]
pub trait ModelRegistryDriver: Send + Sync {
    async fn connect(&self) -> Result<(), String>;
    async fn disconnect(&self) -> Result<(), String>;
    async fn healthy_check(&self) -> Result<(), String>;
}

type DriverCtor = fn(&ModelRegistrySpec) -> Result<Box<dyn ModelRegistryDriver>, String>;

/// A `spec.type -> constructor` table (spec.md §9: "driver registries...
/// a small constructor registry... per kind"). Construction can fail (a
/// malformed URL, spec.md §6), which callers must handle distinctly from a
/// connect failure: at delete time a construction failure is swallowed
/// (spec.md §6: "a construction failure at delete time is swallowed").
pub struct DriverRegistry {
    constructors: std::collections::HashMap<ModelRegistryType, DriverCtor>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self {
            constructors: std::collections::HashMap::new(),
        }
    }

    pub fn register(mut self, ty: ModelRegistryType, ctor: DriverCtor) -> Self {
        self.constructors.insert(ty, ctor);
        self
    }

    pub fn build(&self, spec: &ModelRegistrySpec) -> Result<Box<dyn ModelRegistryDriver>, String> {
        let ctor = self
            .constructors
            .get(&spec.ty)
            .ok_or_else(|| format!("no driver registered for model registry type {:?}", spec.ty))?;
        ctor(spec)
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
