//! Per-kind reconcile logic for the Neutree control plane (SPEC_FULL.md
//! §2 item 4): the external-collaborator contracts, the debounced status
//! writer, the fan-out helper, the generic [`reconcile::Reconciler`]
//! contract, and one reconciler implementation per resource kind.
//!
//! This crate has no knowledge of how objects are fetched from the queue
//! or retried — that lives in `neutree-runtime`. It only knows how to turn
//! one `Object<Spec, Status>` into a [`reconcile::PassOutcome`].

pub mod collaborators;
pub mod fanout;
pub mod reconcile;
pub mod reconcilers;
pub mod status;

pub use reconcile::{run_pass, PassOutcome, Reconciler};
