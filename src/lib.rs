//! # Conjoin: Join Futures Into a Continuation
//!
//! Wait for an ordered set of futures and hand their values, positionally,
//! to a continuation. If any input fails, the continuation is never called
//! and the joined future fails with that input's reason.
//!
//! ## Core Traits
//!
//! - **[`JoinInputs<E>`]**: Ordered inputs a join can wait on (`()`, tuples, `Vec`)
//! - **[`Continuation<Args>`]**: Callables that take the resolved values as arguments
//! - **[`Decorator<X>`]**: Per-input transformations applied before a join
//!
//! ## Key Features
//!
//! - **Positional**: Input `i` resolves to argument `i`, regardless of settle order
//! - **Fail fast**: The first input to fail decides the outcome; nothing waits for the rest
//! - **Decorated**: [`decorated_join`] runs every raw input through one decorator first
//! - **Observable**: Failures are reported to an [`ErrorSink`](report::ErrorSink),
//!   `tracing` by default
//!
//! ## Example
//!
//! ```
//! use conjoin::*;
//! use futures::executor::block_on;
//!
//! let batter = resolved::<_, String>("batter");
//! let pan = resolved("pan");
//!
//! let crepe = join((batter, pan), |b: &str, p: &str| Ok(format!("{b} in {p}")));
//! assert_eq!(block_on(crepe).unwrap(), "batter in pan");
//! ```
//!
//! ## Common Functions
//!
//! **Joining:**
//! - [`join(inputs, continuation)`](join()) - Wait for inputs, call a continuation returning `Result`
//! - [`join_then(inputs, continuation)`](join_then()) - Same, with a continuation returning a future
//! - [`decorated_join(decorator)`](decorated_join()) - Build a join that decorates every input
//!
//! **Producing inputs:**
//! - [`resolved(value)`](resolved()) / [`rejected(reason)`](rejected()) - Already settled inputs
//! - [`promise()`](promise()) - A settle-once input with a separate resolver
//!
//! **Configuration:**
//! - [`Joiner`] - Joins with a chosen error sink
//! - [`report::set_error_sink`] - Replace the process-wide sink

mod awaitable;
pub mod compose;
pub mod concurrent;
mod error;
mod handler;
pub mod prelude;
mod promise;
pub mod report;

pub use awaitable::*;
pub use compose::{decorated_join, DecoratedJoin, Decorator};
pub use concurrent::{join, join_then, Join, JoinInputs, Joiner};
pub use error::*;
pub use handler::*;
pub use promise::*;
