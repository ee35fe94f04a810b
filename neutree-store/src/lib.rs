//! The resource access façade (spec.md §2 item 2): a typed read/patch
//! interface over the control plane's relational store, surfacing
//! `get`/`list`/`create`/`update_status`/`delete` per kind and mapping
//! "not found" to a single sentinel (`StoreError::NotFound`).
//!
//! [`http::HttpStore`] is the production implementation, talking to a
//! PostgREST-style HTTP API (spec.md §6). [`mock::MockStore`] is an
//! in-memory test double that re-implements the database's enforcement
//! invariants (spec.md §4.12) in Rust so the reconciler test suite can run
//! without a live Postgres instance.

pub mod auth;
pub mod error;
pub mod filter;
pub mod http;
pub mod mock;
pub mod store;

pub use error::StoreError;
pub use store::ResourceStore;
