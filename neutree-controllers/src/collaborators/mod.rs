//! External collaborator contracts (spec.md §6). Every trait here is a
//! thin `#[async_trait]` boundary around a system this crate treats as an
//! opaque dependency (the outbound gateway driver, the cluster
//! orchestrator, the model-registry drivers, the identity service, the
//! image-registry client, the accelerator manager) — their own
//! implementations are out of scope (spec.md §1).
//!
//! [`mock`] provides hand-rolled fakes recording every call, consistent
//! with the rest of the corpus's test texture (no `mockall`).

pub mod accelerator_manager;
pub mod auth_client;
pub mod gateway;
pub mod image_service;
pub mod mock;
pub mod model_registry;
pub mod orchestrator;

pub use accelerator_manager::AcceleratorManager;
pub use auth_client::AuthClient;
pub use gateway::Gateway;
pub use image_service::ImageService;
pub use model_registry::ModelRegistryDriver;
pub use orchestrator::Orchestrator;
