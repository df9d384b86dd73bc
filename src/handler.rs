//! Continuations: the handler a join invokes once its inputs are ready.
//!
//! A continuation receives the resolved values as separate positional
//! arguments. [`Continuation<Args>`] is implemented for every `FnOnce` whose
//! parameters match the tuple `Args`, and for `FnOnce(Vec<T>)` when the
//! inputs were a `Vec`.

use futures::future::{self, Ready};

/// A handler called once with the values of a join's inputs.
///
/// `Args` is the tuple (or `Vec`) of resolved values, in input order.
///
/// ```
/// use conjoin::Continuation;
///
/// let add = |a: i32, b: i32| a + b;
/// assert_eq!(add.call((2, 3)), 5);
/// ```
pub trait Continuation<Args> {
    /// What the handler returns.
    type Output;

    /// Spread `args` into the handler's parameters and call it.
    fn call(self, args: Args) -> Self::Output;
}

macro_rules! continuation_arity {
    ($(($($A:ident),*),)*) => {
        $(
            #[allow(non_snake_case)]
            impl<F, R, $($A),*> Continuation<($($A,)*)> for F
            where
                F: FnOnce($($A),*) -> R,
            {
                type Output = R;

                #[inline]
                fn call(self, ($($A,)*): ($($A,)*)) -> R {
                    self($($A),*)
                }
            }
        )*
    };
}

continuation_arity! {
    (),
    (A1),
    (A1, A2),
    (A1, A2, A3),
    (A1, A2, A3, A4),
    (A1, A2, A3, A4, A5),
}

impl<F, R, T> Continuation<Vec<T>> for F
where
    F: FnOnce(Vec<T>) -> R,
{
    type Output = R;

    #[inline]
    fn call(self, args: Vec<T>) -> R {
        self(args)
    }
}

/// Adapts a continuation that returns a plain `Result` into one that
/// returns an already-settled future.
///
/// This is how [`join`](crate::concurrent::join) shares its machinery with
/// [`join_then`](crate::concurrent::join_then).
#[derive(Debug, Clone, Copy)]
pub struct Immediate<C>(C);

/// Wrap a `Result`-returning continuation. See [`Immediate`].
pub fn immediate<C>(continuation: C) -> Immediate<C> {
    Immediate(continuation)
}

impl<Args, C> Continuation<Args> for Immediate<C>
where
    C: Continuation<Args>,
{
    type Output = Ready<C::Output>;

    fn call(self, args: Args) -> Self::Output {
        future::ready(self.0.call(args))
    }
}
