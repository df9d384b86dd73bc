//! Decorators: per-input transformations applied before a join.

use futures::future::{self, Either, IntoFuture, Ready};
use futures::{TryFuture, TryFutureExt};

/// Maps one raw input to a future of the value a join should see.
///
/// Every `Fn(X) -> F` where `F` is a future of a `Result` is a decorator.
/// A type may implement `Decorator` for several raw types, which lets one
/// decorator handle a tuple of mixed inputs.
///
/// ```
/// use conjoin::compose::Decorator;
/// use conjoin::resolved;
/// use futures::executor::block_on;
///
/// let measure = |name: &str| resolved::<_, ()>(name.len());
/// assert_eq!(block_on(measure.decorate("mesh")), Ok(4));
/// ```
pub trait Decorator<X> {
    /// Future of the decorated value.
    type Future: TryFuture;

    fn decorate(&self, raw: X) -> Self::Future;
}

impl<D, X, F> Decorator<X> for D
where
    D: Fn(X) -> F,
    F: TryFuture,
{
    type Future = F;

    #[inline]
    fn decorate(&self, raw: X) -> F {
        self(raw)
    }
}

/// A decorator that can fail before it produces a future.
///
/// Wraps `Fn(X) -> Result<F, F::Error>`. An `Err` becomes an already-failed
/// input, so the join treats it like any other rejected input.
#[derive(Debug, Clone, Copy)]
pub struct Fallible<D>(D);

/// Wrap a decorator that may fail synchronously. See [`Fallible`].
///
/// ```
/// use conjoin::compose::{fallible, Decorator};
/// use conjoin::resolved;
/// use futures::executor::block_on;
///
/// let parse = fallible(|raw: &str| match raw.parse::<u8>() {
///     Ok(n) => Ok(resolved(n)),
///     Err(_) => Err(format!("not a byte: {raw}")),
/// });
/// assert_eq!(block_on(parse.decorate("7")), Ok(7));
/// assert_eq!(block_on(parse.decorate("x")), Err("not a byte: x".to_string()));
/// ```
pub fn fallible<D>(decorator: D) -> Fallible<D> {
    Fallible(decorator)
}

impl<D, X, F> Decorator<X> for Fallible<D>
where
    D: Fn(X) -> Result<F, F::Error>,
    F: TryFuture,
{
    type Future = Either<IntoFuture<F>, Ready<Result<F::Ok, F::Error>>>;

    fn decorate(&self, raw: X) -> Self::Future {
        match (self.0)(raw) {
            Ok(future) => Either::Left(TryFutureExt::into_future(future)),
            Err(reason) => Either::Right(future::err(reason)),
        }
    }
}
