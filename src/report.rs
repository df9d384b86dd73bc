//! Last-resort reporting of join failures.
//!
//! Every failed [`Join`](crate::concurrent::Join) hands its error to an
//! [`ErrorSink`] before resolving. Reporting is purely observational: the
//! returned future fails either way, and the caller stays responsible for
//! handling it.
//!
//! The process-wide sink defaults to [`TracingSink`], which emits a
//! `tracing` error event. Replace it with [`set_error_sink`], restore the
//! default with [`reset_error_sink`], or override it for a single
//! [`Joiner`](crate::concurrent::Joiner).
//!
//! ```
//! use conjoin::report::{self, Failure};
//!
//! let previous = report::set_error_sink(report::sink_fn(|failure: &Failure<'_>| {
//!     eprintln!("{} failed: {:?}", failure.origin(), failure.reason());
//! }));
//! # report::reset_error_sink();
//! # drop(previous);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::{const_rwlock, RwLock};

use crate::error::{FailureOrigin, JoinError};

static ERROR_SINK: RwLock<Option<Arc<dyn ErrorSink>>> = const_rwlock(None);

/// A failure as seen by an [`ErrorSink`].
#[derive(Clone, Copy)]
pub struct Failure<'a> {
    origin: FailureOrigin,
    reason: &'a dyn fmt::Debug,
}

impl<'a> Failure<'a> {
    pub(crate) fn from_error<E: fmt::Debug>(error: &'a JoinError<E>) -> Self {
        Failure {
            origin: error.origin(),
            reason: error.reason(),
        }
    }

    /// Whether an input or the continuation failed.
    pub fn origin(&self) -> FailureOrigin {
        self.origin
    }

    /// The original rejection reason.
    pub fn reason(&self) -> &'a dyn fmt::Debug {
        self.reason
    }
}

impl fmt::Debug for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("origin", &self.origin)
            .field("reason", self.reason)
            .finish()
    }
}

/// Receives join failures that would otherwise go unnoticed.
pub trait ErrorSink: Send + Sync {
    fn report(&self, failure: &Failure<'_>);
}

impl<S: ErrorSink + ?Sized> ErrorSink for Arc<S> {
    fn report(&self, failure: &Failure<'_>) {
        (**self).report(failure)
    }
}

/// Default sink: one `tracing` error event per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, failure: &Failure<'_>) {
        tracing::error!(
            origin = %failure.origin(),
            reason = ?failure.reason(),
            "join failed"
        );
    }
}

/// Sink backed by a closure. See [`sink_fn`].
#[derive(Clone)]
pub struct FnSink<F>(F);

/// Wrap a closure as an [`ErrorSink`].
pub fn sink_fn<F>(f: F) -> FnSink<F>
where
    F: Fn(&Failure<'_>) + Send + Sync,
{
    FnSink(f)
}

impl<F> ErrorSink for FnSink<F>
where
    F: Fn(&Failure<'_>) + Send + Sync,
{
    fn report(&self, failure: &Failure<'_>) {
        (self.0)(failure)
    }
}

/// The sink currently installed for the process.
pub fn error_sink() -> Arc<dyn ErrorSink> {
    match &*ERROR_SINK.read() {
        Some(sink) => Arc::clone(sink),
        None => Arc::new(TracingSink),
    }
}

/// Install a process-wide sink, returning the one it replaces.
pub fn set_error_sink<S>(sink: S) -> Option<Arc<dyn ErrorSink>>
where
    S: ErrorSink + 'static,
{
    ERROR_SINK.write().replace(Arc::new(sink))
}

/// Restore the default [`TracingSink`], returning the sink that was installed.
pub fn reset_error_sink() -> Option<Arc<dyn ErrorSink>> {
    ERROR_SINK.write().take()
}

/// Where a [`Joiner`](crate::concurrent::Joiner) sends its failures.
#[derive(Clone, Default)]
pub enum Reporting {
    /// Whatever [`error_sink`] returns at the time of failure.
    #[default]
    Global,
    /// A dedicated sink.
    Sink(Arc<dyn ErrorSink>),
    /// Nothing is reported.
    Silent,
}

impl Reporting {
    pub(crate) fn report<E: fmt::Debug>(&self, error: &JoinError<E>) {
        let failure = Failure::from_error(error);
        match self {
            Reporting::Global => error_sink().report(&failure),
            Reporting::Sink(sink) => sink.report(&failure),
            Reporting::Silent => {}
        }
    }
}

impl fmt::Debug for Reporting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reporting::Global => write!(f, "Global"),
            Reporting::Sink(_) => write!(f, "Sink(..)"),
            Reporting::Silent => write!(f, "Silent"),
        }
    }
}
