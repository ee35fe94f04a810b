//! Shared types for the Neutree control-plane core: the resource envelope,
//! per-kind phase enums, object references used as queue/store keys, the
//! force-delete annotation helper, and the reconcile error taxonomy.
//!
//! This crate has no I/O of its own — it is the vocabulary that
//! `neutree-store`, `neutree-runtime` and `neutree-controllers` all share.

pub mod error;
pub mod force_delete;
pub mod meta;
pub mod object_ref;
pub mod resource;
pub mod resources;
pub mod time;

pub use error::{ErrorCode, ReconcileError};
pub use force_delete::is_force_delete;
pub use meta::ObjectMeta;
pub use object_ref::ObjectRef;
pub use resource::{Object, ObjectId, ResourceKind};
