//! Joining futures into a continuation.
//!
//! [`join`] waits for an ordered set of futures and then calls a
//! continuation with their values as separate positional arguments.
//! The call returns a [`Join`] future immediately; nothing waits until that
//! future is polled.
//!
//! # Semantics
//!
//! `join((f1, f2, f3), |a, b, c| ...)`:
//! 1. Wait for `f1`, `f2`, `f3` together
//! 2. If one fails, resolve to [`JoinError::Input`] with its reason, without
//!    waiting for the others and without calling the continuation
//! 3. Otherwise call the continuation once with `(a, b, c)` in input order
//! 4. Resolve to the continuation's result ([`join`]) or to the result of
//!    the future it returns ([`join_then`])
//!
//! Every failure is also handed to the [`Joiner`]'s error sink before the
//! future resolves. See [`crate::report`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::future::FusedFuture;
use futures::TryFuture;
use pin_project::pin_project;

use crate::compose::DecoratedJoin;
use crate::concurrent::JoinInputs;
use crate::error::JoinError;
use crate::handler::{immediate, Continuation, Immediate};
use crate::report::{ErrorSink, Reporting};

/// Wait for `inputs`, then call `continuation` with their values.
///
/// The continuation returns a `Result`; an `Err` resolves the join to
/// [`JoinError::Continuation`]. A panicking continuation is not caught: the
/// panic unwinds out of `poll` like any other future's.
///
/// # Examples
///
/// ```
/// use conjoin::{join, resolved};
/// use futures::executor::block_on;
///
/// let sum = join((resolved::<_, &str>(2), resolved(3)), |a, b| Ok(a + b));
/// assert_eq!(block_on(sum), Ok(5));
/// ```
pub fn join<I, E, C, T>(inputs: I, continuation: C) -> Join<I::Aggregate, Immediate<C>>
where
    I: JoinInputs<E>,
    E: fmt::Debug,
    C: Continuation<I::Values, Output = Result<T, E>>,
{
    Joiner::new().join(inputs, continuation)
}

/// Wait for `inputs`, then call `continuation` and wait for the future it
/// returns.
///
/// The result is flattened: the join resolves to the nested future's value,
/// and a rejection of the nested future is a [`JoinError::Continuation`].
/// Panics in the continuation or its future are not caught.
///
/// # Examples
///
/// ```
/// use conjoin::{join_then, resolved};
/// use futures::executor::block_on;
///
/// let word = join_then((resolved::<_, ()>("ab"),), |s: &'static str| {
///     let doubled = s.repeat(2);
///     async move { Ok(doubled) }
/// });
/// assert_eq!(block_on(word).as_deref(), Ok("abab"));
/// ```
pub fn join_then<I, E, C>(inputs: I, continuation: C) -> Join<I::Aggregate, C>
where
    I: JoinInputs<E>,
    E: fmt::Debug,
    C: Continuation<I::Values>,
    C::Output: TryFuture<Error = E>,
{
    Joiner::new().join_then(inputs, continuation)
}

/// Builds joins that share a failure-reporting policy.
///
/// The free functions [`join`] and [`join_then`] use `Joiner::new()`, which
/// reports to the process-wide sink.
///
/// ```
/// use conjoin::{rejected, resolved, Joiner, JoinError};
/// use futures::executor::block_on;
///
/// let quiet = Joiner::new().silent();
/// let sum = quiet.join((rejected("bad"), resolved(1)), |a: i32, b: i32| Ok(a + b));
/// assert_eq!(block_on(sum), Err(JoinError::Input("bad")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Joiner {
    reporting: Reporting,
}

impl Joiner {
    /// A joiner reporting to the process-wide sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report failures to `sink` instead of the process-wide sink.
    pub fn report_to<S>(mut self, sink: S) -> Self
    where
        S: ErrorSink + 'static,
    {
        self.reporting = Reporting::Sink(std::sync::Arc::new(sink));
        self
    }

    /// Do not report failures at all. The joins still fail.
    pub fn silent(mut self) -> Self {
        self.reporting = Reporting::Silent;
        self
    }

    /// How this joiner reports failures.
    pub fn reporting(&self) -> &Reporting {
        &self.reporting
    }

    /// See [`join`].
    pub fn join<I, E, C, T>(&self, inputs: I, continuation: C) -> Join<I::Aggregate, Immediate<C>>
    where
        I: JoinInputs<E>,
        E: fmt::Debug,
        C: Continuation<I::Values, Output = Result<T, E>>,
    {
        self.join_then(inputs, immediate(continuation))
    }

    /// See [`join_then`].
    pub fn join_then<I, E, C>(&self, inputs: I, continuation: C) -> Join<I::Aggregate, C>
    where
        I: JoinInputs<E>,
        E: fmt::Debug,
        C: Continuation<I::Values>,
        C::Output: TryFuture<Error = E>,
    {
        let arity = inputs.arity();
        Join {
            state: JoinState::Aggregating {
                inputs: inputs.aggregate(),
                continuation: Some(continuation),
            },
            reporting: self.reporting.clone(),
            arity,
        }
    }

    /// Build a join that runs `decorator` over every input first.
    ///
    /// See [`decorated_join`](crate::compose::decorated_join).
    pub fn decorate<D>(&self, decorator: D) -> DecoratedJoin<D> {
        DecoratedJoin::new(decorator, self.clone())
    }
}

/// Future returned by [`join`] and [`join_then`].
///
/// Resolves once: to the continuation's value, or to the first failure.
/// The continuation is called at most once.
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Join<A, C>
where
    A: TryFuture,
    C: Continuation<A::Ok>,
{
    #[pin]
    state: JoinState<A, C, C::Output>,
    reporting: Reporting,
    arity: usize,
}

#[pin_project(project = JoinStateProj)]
enum JoinState<A, C, F> {
    Aggregating {
        #[pin]
        inputs: A,
        continuation: Option<C>,
    },
    Continuing {
        #[pin]
        future: F,
    },
    Done,
}

impl<A, C> Join<A, C>
where
    A: TryFuture,
    C: Continuation<A::Ok>,
{
    /// Number of inputs this join waits on.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl<A, C> Future for Join<A, C>
where
    A: TryFuture,
    A::Error: fmt::Debug,
    C: Continuation<A::Ok>,
    C::Output: TryFuture<Error = A::Error>,
{
    type Output = Result<<C::Output as TryFuture>::Ok, JoinError<A::Error>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        loop {
            let mut this = self.as_mut().project();
            let output = match this.state.as_mut().project() {
                JoinStateProj::Aggregating {
                    inputs,
                    continuation,
                } => match ready!(inputs.try_poll(cx)) {
                    Ok(values) => {
                        tracing::trace!(arity = *this.arity, "join inputs settled");
                        let continuation = continuation
                            .take()
                            .expect("Join continuation can only be called once");
                        let future = continuation.call(values);
                        this.state.set(JoinState::Continuing { future });
                        continue;
                    }
                    Err(reason) => Err(JoinError::Input(reason)),
                },
                JoinStateProj::Continuing { future } => {
                    ready!(future.try_poll(cx)).map_err(JoinError::Continuation)
                }
                JoinStateProj::Done => panic!("Join polled after completion"),
            };

            this.state.set(JoinState::Done);
            if let Err(error) = &output {
                this.reporting.report(error);
            }
            return Poll::Ready(output);
        }
    }
}

impl<A, C> FusedFuture for Join<A, C>
where
    A: TryFuture,
    A::Error: fmt::Debug,
    C: Continuation<A::Ok>,
    C::Output: TryFuture<Error = A::Error>,
{
    fn is_terminated(&self) -> bool {
        matches!(self.state, JoinState::Done)
    }
}

impl<A, C> fmt::Debug for Join<A, C>
where
    A: TryFuture,
    C: Continuation<A::Ok>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            JoinState::Aggregating { .. } => "Aggregating",
            JoinState::Continuing { .. } => "Continuing",
            JoinState::Done => "Done",
        };
        f.debug_struct("Join")
            .field("state", &state)
            .field("arity", &self.arity)
            .field("reporting", &self.reporting)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::decorated_join;
    use crate::report::tests::{Recorder, GLOBAL_SINK_LOCK};
    use crate::report::{reset_error_sink, set_error_sink};
    use crate::{rejected, resolved};
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::{self, FutureExt, TryFutureExt};
    use futures::poll;
    use std::pin::pin;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn quiet() -> Joiner {
        Joiner::new().silent()
    }

    #[test]
    fn test_join_adds_two_resolved_values() {
        let sum = quiet().join((resolved::<_, &str>(2), resolved(3)), |a, b| Ok(a + b));
        assert_eq!(block_on(sum), Ok(5));
    }

    #[test]
    fn test_join_rejected_input_skips_continuation() {
        let called = AtomicBool::new(false);
        let sum = quiet().join((rejected("bad"), resolved(1)), |a: i32, b: i32| {
            called.store(true, Ordering::SeqCst);
            Ok(a + b)
        });

        assert_eq!(block_on(sum), Err(JoinError::Input("bad")));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_join_zero_inputs_calls_continuation_without_arguments() {
        let answer = quiet().join((), || Ok::<_, ()>(42));
        assert_eq!(answer.arity(), 0);
        assert_eq!(block_on(answer), Ok(42));
    }

    #[test]
    fn test_join_out_of_order_settlement_keeps_argument_order() {
        let (tx1, rx1) = oneshot::channel::<&str>();
        let (tx2, rx2) = oneshot::channel::<&str>();
        let (tx3, rx3) = oneshot::channel::<&str>();
        let dropped = |_| "sender dropped";

        let joined = quiet().join(
            (rx1.map_err(dropped), rx2.map_err(dropped), rx3.map_err(dropped)),
            |a, b, c| Ok(format!("{a}{b}{c}")),
        );

        block_on(async move {
            let mut joined = pin!(joined);
            assert!(poll!(joined.as_mut()).is_pending());

            tx3.send("c").unwrap();
            assert!(poll!(joined.as_mut()).is_pending());
            tx1.send("a").unwrap();
            assert!(poll!(joined.as_mut()).is_pending());
            tx2.send("b").unwrap();

            match joined.await {
                Ok(word) => assert_eq!(word, "abc"),
                other => panic!("Expected Ok(\"abc\"), got {:?}", other),
            }
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_earliest_failure_wins() {
        let called = Arc::new(AtomicBool::new(false));
        let slow = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err::<u32, _>("R1")
        };
        let fast = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Err::<u32, _>("R2")
        };

        let flag = Arc::clone(&called);
        let joined = quiet().join((slow, fast), move |a, b| {
            flag.store(true, Ordering::SeqCst);
            Ok(a + b)
        });

        assert_eq!(joined.await, Err(JoinError::Input("R2")));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_failure_does_not_wait_for_pending_inputs() {
        let failing = async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            Err::<u32, _>("gave up")
        };
        let never = future::pending::<Result<u32, &str>>();

        let joined = quiet().join((failing, never), |a, b| Ok(a + b));
        assert_eq!(joined.await, Err(JoinError::Input("gave up")));
    }

    #[test]
    fn test_join_then_flattens_nested_future() {
        let nested = quiet().join_then((resolved::<_, &str>(20), resolved(22)), |a, b| async move {
            Ok(a + b)
        });
        assert_eq!(block_on(nested), Ok(42));
    }

    #[test]
    fn test_join_continuation_error_is_a_continuation_failure() {
        let failed = quiet().join((resolved(1),), |_: i32| Err::<i32, _>("no"));
        assert_eq!(block_on(failed), Err(JoinError::Continuation("no")));

        let failed = quiet().join_then((resolved(1),), |_: i32| rejected::<i32, _>("later"));
        assert_eq!(block_on(failed), Err(JoinError::Continuation("later")));
    }

    #[test]
    fn test_join_vec_inputs_pass_values_in_order() {
        let inputs: Vec<_> = ["x", "y", "z"].into_iter().map(resolved::<_, ()>).collect();
        let joined = quiet().join(inputs, |values: Vec<&str>| Ok(values.concat()));
        assert_eq!(joined.arity(), 3);
        assert_eq!(block_on(joined).as_deref(), Ok("xyz"));
    }

    #[test]
    fn test_join_shared_input_runs_once_for_every_subscriber() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let texture = async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, &str>(7)
        }
        .shared();

        let left = quiet().join((texture.clone(), resolved(1)), |t, x| Ok(t + x));
        let right = quiet().join((texture.clone(),), |t| Ok(t * 2));

        let (left, right) = block_on(future::join(left, right));
        assert_eq!(left, Ok(8));
        assert_eq!(right, Ok(14));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_join_reports_failures_to_its_sink() {
        let recorder = Recorder::default();
        let joiner = Joiner::new().report_to(recorder.clone());

        let ok = joiner.join((resolved::<_, &str>(1),), |x| Ok(x));
        assert_eq!(block_on(ok), Ok(1));
        assert!(recorder.seen().is_empty());

        let failed = joiner.join((rejected::<i32, _>("bad"),), |x| Ok(x));
        assert_eq!(block_on(failed), Err(JoinError::Input("bad")));

        let failed = joiner.join((resolved(1),), |_: i32| Err::<i32, _>("worse"));
        assert_eq!(block_on(failed), Err(JoinError::Continuation("worse")));

        assert_eq!(recorder.seen(), ["input: \"bad\"", "continuation: \"worse\""]);
    }

    #[test]
    fn test_join_is_terminated_after_completion() {
        let mut joined = quiet().join((resolved::<_, ()>(1),), |x| Ok(x));
        assert!(!joined.is_terminated());
        assert_eq!(block_on(&mut joined), Ok(1));
        assert!(joined.is_terminated());
    }

    #[test]
    fn test_join_nests_into_a_graph() {
        let flour = resolved::<_, String>(250);
        let eggs = resolved(3);
        let batter = quiet()
            .join((flour, eggs), |flour, eggs| Ok(format!("{flour}g/{eggs}")))
            .shared();

        let first = quiet().join((batter.clone().map_err(|e| e.into_reason()),), |b| {
            Ok(format!("crepe #1 from {b}"))
        });
        let second = quiet().join((batter.map_err(|e| e.into_reason()),), |b| {
            Ok(format!("crepe #2 from {b}"))
        });

        let both = join(
            (
                first.map_err(JoinError::into_reason),
                second.map_err(JoinError::into_reason),
            ),
            |a, b| Ok(vec![a, b]),
        );
        assert_eq!(
            block_on(both).unwrap(),
            ["crepe #1 from 250g/3", "crepe #2 from 250g/3"]
        );
    }

    #[test]
    fn test_joiner_reporting_follows_configuration() {
        assert!(matches!(Joiner::new().reporting(), Reporting::Global));
        assert!(matches!(quiet().reporting(), Reporting::Silent));
        assert!(matches!(
            Joiner::new().report_to(Recorder::default()).reporting(),
            Reporting::Sink(_)
        ));
    }

    #[test]
    fn test_free_joins_report_to_the_process_wide_sink() {
        let _guard = GLOBAL_SINK_LOCK.lock();
        let recorder = Recorder::default();
        set_error_sink(recorder.clone());

        let joined = join((rejected::<i32, _>("free-join-marker"),), |x| Ok(x));
        let decorated = decorated_join(|_: u8| rejected::<u8, _>("free-decorated-marker"))
            .join((1,), |x| Ok(x));
        let joined = block_on(joined);
        let decorated = block_on(decorated);
        reset_error_sink();

        assert_eq!(joined, Err(JoinError::Input("free-join-marker")));
        assert_eq!(decorated, Err(JoinError::Input("free-decorated-marker")));
        let seen = recorder.seen();
        assert!(seen.contains(&"input: \"free-join-marker\"".to_string()));
        assert!(seen.contains(&"input: \"free-decorated-marker\"".to_string()));
    }

    #[test]
    #[should_panic(expected = "continuation blew up")]
    fn test_panicking_continuation_is_not_caught() {
        let joined = quiet().join((resolved::<_, ()>(1),), |_: i32| -> Result<i32, ()> {
            panic!("continuation blew up")
        });
        let _ = block_on(joined);
    }
}
