//! Generic reconciliation engine shared by every resource kind (spec.md §2,
//! §7): a dedup/delay [`scheduler::Scheduler`], a bounded worker pool in
//! [`controller::Controller`], and the `Context<T>`/`Action` vocabulary
//! reconcilers are written against.
//!
//! This crate knows nothing about clusters, roles, or workspaces — it only
//! knows how to drive an [`async_trait`]-free `Fn(Arc<Object<S, T>>) -> Future`
//! reconciler against a [`reader::Reader`] on a schedule, exactly the way
//! `kube_runtime::Controller` drives a Kubernetes reconciler against a
//! `kube_runtime::reflector::Store`.

pub mod action;
pub mod context;
pub mod controller;
pub mod hooks;
pub mod queue;
pub mod reader;
pub mod scheduler;

pub use action::Action;
pub use context::Context;
pub use controller::{Controller, ReconcileOutcome, TriggerHandle};
pub use hooks::{HookList, ReconcileHooks, SharedHooks, TracingHooks};
pub use queue::{QueueHandle, RateLimitingQueue};
pub use reader::Reader;
pub use scheduler::{ScheduleRequest, Scheduler};
