//! Uniform callable wrapper for hooks, handlers and availability predicates.
//!
//! Every callable the engine stores is a [`Hook`]: a shared closure returning
//! a boxed future. Synchronous closures are lifted with [`Hook::sync`], so the
//! engine always awaits and never needs to know how a callable was written.
//!
//! Identity is the allocation: two clones of the same `Hook` compare equal,
//! two hooks built from identical closures do not. Registration de-duplication
//! and removal rely on this.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

type HookFn<A, R> = dyn Fn(A) -> BoxFuture<'static, R> + Send + Sync;

/// A shared, async-callable hook taking `A` and producing `R`.
pub struct Hook<A, R> {
    f: Arc<HookFn<A, R>>,
}

impl<A: 'static, R: 'static> Hook<A, R> {
    /// Wrap an async closure.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        Self {
            f: Arc::new(move |args: A| -> BoxFuture<'static, R> { Box::pin(f(args)) }),
        }
    }

    /// Wrap a synchronous closure; its result is delivered as a ready future.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
        R: Send,
    {
        Self::new(move |args: A| std::future::ready(f(args)))
    }

    /// Invoke the hook.
    pub fn call(&self, args: A) -> BoxFuture<'static, R> {
        (self.f)(args)
    }
}

impl<A, R> Hook<A, R> {
    /// True if both handles point at the same registered callable.
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl<A, R> Clone for Hook<A, R> {
    fn clone(&self) -> Self {
        Self { f: self.f.clone() }
    }
}

impl<A, R> PartialEq for Hook<A, R> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<A, R> Eq for Hook<A, R> {}

impl<A, R> fmt::Debug for Hook<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({:p})", Arc::as_ptr(&self.f) as *const ())
    }
}

/// Append `hook` unless the same callable is already registered.
pub(crate) fn register<A, R>(list: &mut Vec<Hook<A, R>>, hook: Hook<A, R>) -> bool {
    if list.iter().any(|h| h.same(&hook)) {
        return false;
    }
    list.push(hook);
    true
}

/// Remove the first registration of `hook`.
pub(crate) fn unregister<A, R>(list: &mut Vec<Hook<A, R>>, hook: &Hook<A, R>) -> bool {
    match list.iter().position(|h| h.same(hook)) {
        Some(pos) => {
            list.remove(pos);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sync_and_async_hooks_are_awaited_alike() {
        let double = Hook::sync(|x: u32| x * 2);
        let triple = Hook::new(|x: u32| async move { x * 3 });

        assert_eq!(double.call(4).await, 8);
        assert_eq!(triple.call(4).await, 12);
    }

    #[test]
    fn test_identity_is_the_allocation() {
        let a = Hook::sync(|_: ()| ());
        let b = Hook::sync(|_: ()| ());

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_register_deduplicates_and_unregister_removes_first() {
        let a: Hook<(), ()> = Hook::sync(|_| ());
        let b: Hook<(), ()> = Hook::sync(|_| ());
        let mut list = Vec::new();

        assert!(register(&mut list, a.clone()));
        assert!(!register(&mut list, a.clone()));
        assert!(register(&mut list, b.clone()));
        assert_eq!(list.len(), 2);

        assert!(unregister(&mut list, &a));
        assert!(!unregister(&mut list, &a));
        assert_eq!(list, vec![b]);
    }
}
