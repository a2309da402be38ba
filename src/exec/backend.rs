// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The engine never knows what a task does; it hands each task to a
//! [`TaskExecutor`] and awaits the returned future.
//!
//! - [`ShellExecutor`](super::ShellExecutor) runs shell commands and is what
//!   the `taskwave` binary uses.
//! - [`executor_fn`] adapts a plain closure, which is the usual choice for
//!   library callers and tests.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use crate::dag::Task;

/// Future returned by an executor for a single attempt.
///
/// It must be `'static`: the engine spawns every attempt so that a timed-out
/// attempt can be left running in the background while the run moves on.
pub type ExecFuture<R> = Pin<Box<dyn Future<Output = anyhow::Result<R>> + Send + 'static>>;

/// Trait abstracting how a task is executed.
///
/// `execute` is called once per attempt, so it may be called several times
/// for the same task when retries are enabled.
pub trait TaskExecutor<P, R>: Send + Sync {
    fn execute(&self, task: &Task<P>) -> ExecFuture<R>;
}

/// [`TaskExecutor`] backed by a closure. Build one with [`executor_fn`].
pub struct FnExecutor<F, P> {
    f: F,
    _payload: PhantomData<fn(&P)>,
}

impl<F, P> fmt::Debug for FnExecutor<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExecutor").finish_non_exhaustive()
    }
}

/// Wrap a closure `Fn(&Task<P>) -> impl Future<Output = anyhow::Result<R>>`
/// as a [`TaskExecutor`].
///
/// The returned future must not borrow the task; clone what you need first:
///
/// ```
/// use taskwave::dag::Task;
/// use taskwave::exec::executor_fn;
///
/// let exec = executor_fn(|task: &Task| {
///     let id = task.id.clone();
///     async move { Ok::<_, anyhow::Error>(format!("ran {id}")) }
/// });
/// # let _ = exec;
/// ```
pub fn executor_fn<P, R, F, Fut>(f: F) -> FnExecutor<F, P>
where
    F: Fn(&Task<P>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    FnExecutor {
        f,
        _payload: PhantomData,
    }
}

impl<P, R, F, Fut> TaskExecutor<P, R> for FnExecutor<F, P>
where
    F: Fn(&Task<P>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    fn execute(&self, task: &Task<P>) -> ExecFuture<R> {
        Box::pin((self.f)(task))
    }
}
