//! A future that settles exactly once and can be shared.
//!
//! [`promise`] returns a producer/consumer pair. The [`Resolver`] settles
//! the promise; the first settlement wins and every later attempt is a
//! no-op. The [`Promise`] can be cloned freely and handed to any number of
//! joins: all clones observe the same settlement, and the producer side
//! runs once.
//!
//! ```
//! use conjoin::{join, promise};
//! use futures::executor::block_on;
//!
//! let (resolver, mesh) = promise::<u32, String>();
//! let left = join((mesh.clone(),), |m| Ok(m + 1));
//! let right = join((mesh,), |m| Ok(m * 2));
//!
//! assert!(resolver.resolve(10));
//! assert!(!resolver.reject("too late".to_string()));
//!
//! assert_eq!(block_on(left), Ok(11));
//! assert_eq!(block_on(right), Ok(20));
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{FusedFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;

/// Create a settle-once promise and its resolver.
pub fn promise<T, E>() -> (Resolver<T, E>, Promise<T, E>)
where
    T: Clone,
    E: Clone,
{
    let (sender, receiver) = oneshot::channel();
    let resolver = Resolver {
        sender: Arc::new(Mutex::new(Some(sender))),
    };
    let promise = Promise {
        inner: Settlement {
            receiver,
            abandoned: false,
        }
        .shared(),
    };
    (resolver, promise)
}

/// Producer side of a [`Promise`].
///
/// Cloning a resolver gives another handle to the same promise; whichever
/// handle settles first wins.
pub struct Resolver<T, E> {
    sender: Arc<Mutex<Option<oneshot::Sender<Result<T, E>>>>>,
}

impl<T, E> Resolver<T, E> {
    /// Settle with a value. Returns `false` if the promise was already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settle with a failure. Returns `false` if the promise was already settled.
    pub fn reject(&self, reason: E) -> bool {
        self.settle(Err(reason))
    }

    /// Settle with `outcome`. Returns `false` if the promise was already settled.
    pub fn settle(&self, outcome: Result<T, E>) -> bool {
        match self.sender.lock().take() {
            Some(sender) => {
                // Every consumer may already be gone; settling still counts.
                let _ = sender.send(outcome);
                true
            }
            None => {
                tracing::debug!("ignoring settlement of an already settled promise");
                false
            }
        }
    }

    /// Whether some handle already settled the promise.
    pub fn is_settled(&self) -> bool {
        self.sender.lock().is_none()
    }
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Resolver {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// Consumer side of a settle-once promise. See [`promise`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Promise<T, E> {
    inner: Shared<Settlement<T, E>>,
}

impl<T, E> Promise<T, E>
where
    T: Clone,
    E: Clone,
{
    /// The settlement, if it has already been observed.
    pub fn peek(&self) -> Option<&Result<T, E>> {
        self.inner.peek()
    }
}

impl<T, E> Clone for Promise<T, E>
where
    T: Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Promise {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Future for Promise<T, E>
where
    T: Clone,
    E: Clone,
{
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T, E> FusedFuture for Promise<T, E>
where
    T: Clone,
    E: Clone,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_terminated()
    }
}

impl<T, E> fmt::Debug for Promise<T, E>
where
    T: Clone + fmt::Debug,
    E: Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("settlement", &self.peek())
            .finish()
    }
}

/// The single underlying wait shared by every clone of a [`Promise`].
struct Settlement<T, E> {
    receiver: oneshot::Receiver<Result<T, E>>,
    abandoned: bool,
}

impl<T, E> Future for Settlement<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.abandoned {
            return Poll::Pending;
        }
        match self.receiver.poll_unpin(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(oneshot::Canceled)) => {
                tracing::warn!("promise abandoned: every resolver dropped before settling");
                self.abandoned = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
