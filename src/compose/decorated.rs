//! Joins that decorate their inputs first.
//!
//! [`decorated_join`] takes one decorator and returns a [`DecoratedJoin`]
//! with the same calling convention as [`join`](crate::join): raw inputs
//! plus a trailing continuation. Each raw input goes through the decorator,
//! and the decorated futures are joined as usual. The continuation is never
//! decorated.

use std::fmt;

use futures::TryFuture;

use crate::compose::{then, DecorateInputs, Then};
use crate::concurrent::{Join, JoinInputs, Joiner};
use crate::handler::{Continuation, Immediate};

/// Build a join variant that runs `decorator` over every input.
///
/// # Examples
///
/// ```
/// use conjoin::{decorated_join, resolved};
/// use futures::executor::block_on;
///
/// let shader_source = |name: &'static str| resolved::<_, String>(format!("// {name}"));
/// let load = decorated_join(shader_source);
///
/// let program = load.join(("vertex", "fragment"), |vs: String, fs: String| {
///     Ok(format!("{vs}\n{fs}"))
/// });
/// assert_eq!(block_on(program).unwrap(), "// vertex\n// fragment");
/// ```
pub fn decorated_join<D>(decorator: D) -> DecoratedJoin<D> {
    Joiner::new().decorate(decorator)
}

/// A join that decorates its inputs. See [`decorated_join`].
#[derive(Clone)]
pub struct DecoratedJoin<D> {
    decorator: D,
    joiner: Joiner,
}

impl<D> DecoratedJoin<D> {
    pub(crate) fn new(decorator: D, joiner: Joiner) -> Self {
        DecoratedJoin { decorator, joiner }
    }

    /// The decorator applied to every input.
    pub fn decorator(&self) -> &D {
        &self.decorator
    }

    /// The joiner the decorated inputs are handed to.
    pub fn joiner(&self) -> &Joiner {
        &self.joiner
    }

    /// Decorate `inputs`, wait for them, then call `continuation`.
    ///
    /// Same contract as [`join`](crate::join); a failing decorator is a
    /// failing input.
    pub fn join<R, E, C, T>(
        &self,
        inputs: R,
        continuation: C,
    ) -> Join<<R::Decorated as JoinInputs<E>>::Aggregate, Immediate<C>>
    where
        R: DecorateInputs<D>,
        R::Decorated: JoinInputs<E>,
        E: fmt::Debug,
        C: Continuation<<R::Decorated as JoinInputs<E>>::Values, Output = Result<T, E>>,
    {
        self.joiner
            .join(inputs.decorate_with(&self.decorator), continuation)
    }

    /// Decorate `inputs`, wait for them, then call `continuation` and wait
    /// for the future it returns.
    ///
    /// Same contract as [`join_then`](crate::join_then).
    pub fn join_then<R, E, C>(
        &self,
        inputs: R,
        continuation: C,
    ) -> Join<<R::Decorated as JoinInputs<E>>::Aggregate, C>
    where
        R: DecorateInputs<D>,
        R::Decorated: JoinInputs<E>,
        E: fmt::Debug,
        C: Continuation<<R::Decorated as JoinInputs<E>>::Values>,
        C::Output: TryFuture<Error = E>,
    {
        self.joiner
            .join_then(inputs.decorate_with(&self.decorator), continuation)
    }

    /// Add a second decorator that runs on the values the current one
    /// resolves to.
    ///
    /// ```
    /// use conjoin::{decorated_join, rejected, resolved, JoinError};
    /// use futures::executor::block_on;
    ///
    /// let fetch = |id: u32| resolved::<_, String>((id, id * 100));
    /// let fresh = |(id, stamp): (u32, u32)| {
    ///     if stamp >= 200 { resolved(id) } else { rejected(format!("{id} is stale")) }
    /// };
    /// let load = decorated_join(fetch).then(fresh);
    ///
    /// assert_eq!(block_on(load.join((2, 3), |a, b| Ok(a + b))), Ok(5));
    /// assert_eq!(
    ///     block_on(load.join((1, 3), |a: u32, b: u32| Ok(a + b))),
    ///     Err(JoinError::Input("1 is stale".to_string()))
    /// );
    /// ```
    pub fn then<N>(self, next: N) -> DecoratedJoin<Then<D, N>> {
        DecoratedJoin {
            decorator: then(self.decorator, next),
            joiner: self.joiner,
        }
    }
}

impl<D> fmt::Debug for DecoratedJoin<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratedJoin")
            .field("joiner", &self.joiner)
            .finish_non_exhaustive()
    }
}
