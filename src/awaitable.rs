//! The future capability the combinators are built on.
//!
//! Nothing here implements a future: any `Future<Output = Result<T, E>>` is
//! an [`Awaitable`]. The helpers build futures that are already settled.

use std::future::Future;

use futures::future::{self, Ready};

/// A future that settles once, to `Ok(T)` or `Err(E)`.
///
/// Blanket-implemented for every matching future, so it is mostly useful
/// for spelling decorator and continuation signatures:
///
/// ```
/// use conjoin::{resolved, Awaitable};
///
/// fn load(name: &'static str) -> impl Awaitable<usize, String> {
///     resolved(name.len())
/// }
/// # let _ = load("mesh");
/// ```
pub trait Awaitable<T, E>: Future<Output = Result<T, E>> {}

impl<F, T, E> Awaitable<T, E> for F where F: Future<Output = Result<T, E>> + ?Sized {}

/// An already-succeeded future.
pub fn resolved<T, E>(value: T) -> Ready<Result<T, E>> {
    future::ok(value)
}

/// An already-failed future.
pub fn rejected<T, E>(reason: E) -> Ready<Result<T, E>> {
    future::err(reason)
}
