//! Chaining decorators.
//!
//! [`Then`] runs a raw input through one decorator, then feeds the resolved
//! value to a second one. Either stage failing fails the input.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use futures::TryFuture;
use pin_project::pin_project;

use crate::compose::Decorator;

/// Two decorators run one after the other.
pub struct Then<D1, D2> {
    first: D1,
    next: Arc<D2>,
}

/// Chain `first` with `next`: `next` decorates whatever `first` resolves to.
///
/// ```
/// use conjoin::compose::{then, Decorator};
/// use conjoin::resolved;
/// use futures::executor::block_on;
///
/// let load = |name: &'static str| resolved::<_, String>(format!("<{name}>"));
/// let measure = |source: String| resolved(source.len());
///
/// let both = then(load, measure);
/// assert_eq!(block_on(both.decorate("vs")), Ok(4));
/// ```
pub fn then<D1, D2>(first: D1, next: D2) -> Then<D1, D2> {
    Then {
        first,
        next: Arc::new(next),
    }
}

impl<D1: Clone, D2> Clone for Then<D1, D2> {
    fn clone(&self) -> Self {
        Then {
            first: self.first.clone(),
            next: Arc::clone(&self.next),
        }
    }
}

impl<D1, D2> fmt::Debug for Then<D1, D2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Then").finish_non_exhaustive()
    }
}

impl<X, D1, D2> Decorator<X> for Then<D1, D2>
where
    D1: Decorator<X>,
    D2: Decorator<<D1::Future as TryFuture>::Ok>,
    D2::Future: TryFuture<Error = <D1::Future as TryFuture>::Error>,
{
    type Future = ThenFuture<D1::Future, D2>;

    fn decorate(&self, raw: X) -> Self::Future {
        ThenFuture {
            state: ThenState::First {
                future: self.first.decorate(raw),
                next: Arc::clone(&self.next),
            },
        }
    }
}

/// Future returned by a [`Then`] decorator.
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ThenFuture<F, D>
where
    F: TryFuture,
    D: Decorator<F::Ok>,
{
    #[pin]
    state: ThenState<F, D, D::Future>,
}

#[pin_project(project = ThenStateProj)]
enum ThenState<F1, D, F2> {
    First {
        #[pin]
        future: F1,
        next: Arc<D>,
    },
    Second {
        #[pin]
        future: F2,
    },
    Done,
}

impl<F, D> Future for ThenFuture<F, D>
where
    F: TryFuture,
    D: Decorator<F::Ok>,
    D::Future: TryFuture<Error = F::Error>,
{
    type Output = Result<<D::Future as TryFuture>::Ok, F::Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        loop {
            let mut this = self.as_mut().project();
            let output = match this.state.as_mut().project() {
                ThenStateProj::First { future, next } => match ready!(future.try_poll(cx)) {
                    Ok(value) => {
                        let future = <D as Decorator<F::Ok>>::decorate(next, value);
                        this.state.set(ThenState::Second { future });
                        continue;
                    }
                    Err(reason) => Err(reason),
                },
                ThenStateProj::Second { future } => ready!(future.try_poll(cx)),
                ThenStateProj::Done => panic!("ThenFuture polled after completion"),
            };

            this.state.set(ThenState::Done);
            return Poll::Ready(output);
        }
    }
}

impl<F, D> fmt::Debug for ThenFuture<F, D>
where
    F: TryFuture,
    D: Decorator<F::Ok>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            ThenState::First { .. } => "First",
            ThenState::Second { .. } => "Second",
            ThenState::Done => "Done",
        };
        f.debug_struct("ThenFuture").field("state", &state).finish()
    }
}
