use std::sync::Arc;

/// Read-only shared state handed to a reconciler on every invocation:
/// the resource store, external collaborators, and anything else the
/// reconciler needs but shouldn't own.
///
/// Mirrors `kube_runtime::Controller`'s `Context<T>`: a cheaply-cloneable
/// `Arc` wrapper so the controller doesn't have to build a new closure per
/// reconcile.
pub struct Context<T>(Arc<T>);

impl<T> Context<T> {
    pub fn new(state: T) -> Self {
        Context(Arc::new(state))
    }

    pub fn get_ref(&self) -> &T {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.0
    }
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Context(Arc::clone(&self.0))
    }
}

impl<T> std::ops::Deref for Context<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}
