use super::{
    settle::{self, Fulfill, Reject},
    shared_state::SharedState,
    Chain, OnFulfilled, OnRejected, Ptr, Settled,
};
use crate::{PledgeError, Value};
use std::{
    any::Any,
    cell::RefCell,
    fmt,
    future::{Future, IntoFuture},
    hash::{Hash, Hasher},
};
use tracing::{debug, trace};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum State {
    Pending,
    Fulfilled,
    Rejected,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Pending => "pending",
            State::Fulfilled => "fulfilled",
            State::Rejected => "rejected",
        })
    }
}

/// The eventual outcome of an operation: a value `T` or a reason `E`.
///
/// A `Pledge` is a handle. Clones refer to the same pledge and compare equal,
/// and [`then`](Pledge::then) hands back the very same handle rather than a
/// derived pledge: chaining rewrites the single pledge's result as its
/// handlers run in sequence.
pub struct Pledge<T, E> {
    pub(super) state: Ptr<RefCell<SharedState<T, E>>>,
}

impl<T, E> Pledge<T, E>
where
    T: Value,
    E: Value,
{
    /// Create a pledge and run `resolver` with its two settle capabilities.
    /// The resolver runs exactly once, before `new` returns. If it returns
    /// `Err` the pledge is rejected with that reason, unless a capability
    /// already settled it.
    pub fn new<R>(resolver: R) -> Self
    where
        R: FnOnce(Fulfill<T, E>, Reject<T, E>) -> Result<(), E>,
    {
        let (pledge, fulfill, reject) = Self::deferred();
        let fallback = reject.clone();
        if let Err(reason) = resolver(fulfill, reject) {
            // No handler can be attached yet, so this walk cannot fail.
            let _ignore = fallback.reject(reason);
        }
        pledge
    }

    /// Like [`Pledge::new`] for a resolver that might be missing.
    pub fn try_new<R>(resolver: Option<R>) -> Result<Self, PledgeError>
    where
        R: FnOnce(Fulfill<T, E>, Reject<T, E>) -> Result<(), E>,
    {
        resolver
            .map(Self::new)
            .ok_or(PledgeError::ResolverNotCallable)
    }

    pub(crate) fn deferred() -> (Self, Fulfill<T, E>, Reject<T, E>) {
        let pledge = Pledge {
            state: Ptr::new(RefCell::new(SharedState::new())),
        };
        let (fulfill, reject) = settle::capabilities(&pledge);
        (pledge, fulfill, reject)
    }

    /// A pledge already fulfilled with `value`.
    pub fn resolve(value: T) -> Self {
        Self::new(|fulfill, _| fulfill.fulfill(value))
    }

    /// A pledge that follows `pledge`, settling with its value or reason.
    pub fn resolve_pledge(pledge: Pledge<T, E>) -> Self {
        Self::new(|fulfill, _| fulfill.adopt(pledge))
    }

    /// A pledge already rejected with `reason`.
    pub fn reject(reason: E) -> Self {
        Self::new(|_, reject| reject.reject(reason))
    }

    /// Settle a pledge from a future running on the current
    /// [`LocalSet`](tokio::task::LocalSet).
    ///
    /// # Panics
    ///
    /// Panics if called outside of a `LocalSet`.
    pub fn spawn_local<F>(future: F) -> Self
    where
        F: 'static + Future<Output = Result<T, E>>,
    {
        let (pledge, fulfill, reject) = Self::deferred();
        tokio::task::spawn_local(async move {
            let settled = match future.await {
                Ok(value) => fulfill.fulfill(value),
                Err(reason) => reject.reject(reason),
            };
            if settled.is_err() {
                debug!("rejection handler error escaped a spawned producer");
            }
        });
        pledge
    }

    /// Register either handler, both, or neither. If the pledge has already
    /// settled, the matching queue is walked again before this returns so the
    /// new handlers observe the current result.
    ///
    /// Returns this same pledge, or the error thrown by a rejection handler
    /// during that walk.
    pub fn subscribe(
        &self,
        on_fulfilled: Option<OnFulfilled<T, E>>,
        on_rejected: Option<OnRejected<T, E>>,
    ) -> Result<Self, E> {
        let replay = {
            let mut state = self.state.borrow_mut();
            if let Some(handler) = on_fulfilled {
                state.on_fulfilled.push(handler);
            }
            if let Some(handler) = on_rejected {
                state.on_rejected.push(handler);
            }
            if state.can_replay() {
                state.result.clone()
            } else {
                None
            }
        };

        match replay {
            Some(Ok(value)) => {
                trace!("replaying fulfillment for late handlers");
                self.settle_fulfilled(value)?;
            }
            Some(Err(reason)) => {
                trace!("replaying rejection for late handlers");
                self.settle_rejected(reason)?;
            }
            None => {}
        }
        Ok(self.clone())
    }

    pub fn then<F>(&self, on_fulfilled: F) -> Result<Self, E>
    where
        F: 'static + FnOnce(T) -> Result<Chain<T, T, E>, E>,
    {
        let on_fulfilled: OnFulfilled<T, E> = Box::new(on_fulfilled);
        self.subscribe(Some(on_fulfilled), None)
    }

    pub fn then_catch<F, R>(&self, on_fulfilled: F, on_rejected: R) -> Result<Self, E>
    where
        F: 'static + FnOnce(T) -> Result<Chain<T, T, E>, E>,
        R: 'static + FnOnce(E) -> Result<Chain<E, T, E>, E>,
    {
        let on_fulfilled: OnFulfilled<T, E> = Box::new(on_fulfilled);
        let on_rejected: OnRejected<T, E> = Box::new(on_rejected);
        self.subscribe(Some(on_fulfilled), Some(on_rejected))
    }

    pub fn catch<R>(&self, on_rejected: R) -> Result<Self, E>
    where
        R: 'static + FnOnce(E) -> Result<Chain<E, T, E>, E>,
    {
        let on_rejected: OnRejected<T, E> = Box::new(on_rejected);
        self.subscribe(None, Some(on_rejected))
    }

    /// A future that resolves with the outcome of this pledge. It does not
    /// keep the pledge alive.
    pub fn settled(&self) -> Settled<T, E> {
        let mut state = self.state.borrow_mut();
        if state.can_replay() {
            if let Some(result) = &state.result {
                return Settled::ready(result.clone());
            }
        }
        let (settled, on_fulfilled, on_rejected) = Settled::waiting();
        // Pending, walking or adopting: queue without replaying.
        state.on_fulfilled.push(on_fulfilled);
        state.on_rejected.push(on_rejected);
        settled
    }

    pub fn state(&self) -> State {
        self.state.borrow().state()
    }

    pub fn is_pending(&self) -> bool {
        self.state() == State::Pending
    }

    /// The current value or reason, `None` while pending.
    pub fn result(&self) -> Option<Result<T, E>> {
        self.state.borrow().result.clone()
    }

    /// The number of handlers still waiting in both queues.
    #[cfg(feature = "trace")]
    pub fn handler_count(&self) -> usize {
        let state = self.state.borrow();
        state.on_fulfilled.len() + state.on_rejected.len()
    }
}

/// Whether `value` is a `Pledge<T, E>`.
pub fn is_pledge<T, E>(value: &dyn Any) -> bool
where
    T: Value,
    E: Value,
{
    value.is::<Pledge<T, E>>()
}

impl<T, E> IntoFuture for Pledge<T, E>
where
    T: Value,
    E: Value,
{
    type Output = <Settled<T, E> as Future>::Output;
    type IntoFuture = Settled<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        self.settled()
    }
}

impl<T, E> Clone for Pledge<T, E> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T, E> PartialEq for Pledge<T, E> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.state.eq(&other.state)
    }
}

impl<T, E> Eq for Pledge<T, E> {}

impl<T, E> Hash for Pledge<T, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.state.hash(state)
    }
}

impl<T, E> fmt::Debug for Pledge<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state.try_borrow() {
            Ok(state) => state.state().to_string(),
            Err(_) => "<settling>".to_string(),
        };
        f.debug_struct("Pledge").field("state", &state).finish()
    }
}
