use super::{Chain, OnFulfilled, OnRejected};
use crate::{Closed, Value};
use futures::channel::oneshot;
use std::{
    cell::RefCell,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

/// Future returned by [`Pledge::settled`](super::Pledge::settled).
///
/// Resolves with `Ok(result)` once the pledge settles, or `Err(Closed)` if
/// the pledge is dropped while still pending.
pub struct Settled<T, E> {
    inner: Inner<T, E>,
}

enum Inner<T, E> {
    Ready(Option<Result<T, E>>),
    Waiting(oneshot::Receiver<Result<T, E>>),
}

// Nothing is pinned structurally. The outcome is only ever moved out.
impl<T, E> Unpin for Settled<T, E> {}

impl<T, E> Settled<T, E>
where
    T: Value,
    E: Value,
{
    pub(crate) fn ready(result: Result<T, E>) -> Self {
        Self {
            inner: Inner::Ready(Some(result)),
        }
    }

    /// A pending `Settled` plus the handler pair that completes it. The pair
    /// shares one sender, whichever runs first sends.
    pub(crate) fn waiting() -> (Self, OnFulfilled<T, E>, OnRejected<T, E>) {
        let (sender, receiver) = oneshot::channel();
        let on_value = Rc::new(RefCell::new(Some(sender)));
        let on_reason = on_value.clone();

        let on_fulfilled: OnFulfilled<T, E> = Box::new(move |value| {
            if let Some(sender) = on_value.borrow_mut().take() {
                // The receiver may be gone, nobody is listening then.
                let _ignore = sender.send(Ok(value));
            }
            Ok(Chain::Keep)
        });
        let on_rejected: OnRejected<T, E> = Box::new(move |reason| {
            if let Some(sender) = on_reason.borrow_mut().take() {
                let _ignore = sender.send(Err(reason));
            }
            Ok(Chain::Keep)
        });

        let settled = Self {
            inner: Inner::Waiting(receiver),
        };
        (settled, on_fulfilled, on_rejected)
    }
}

impl<T, E> Future for Settled<T, E> {
    type Output = Result<Result<T, E>, Closed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().inner {
            // Polled again after completion.
            Inner::Ready(result) => Poll::Ready(result.take().ok_or(Closed)),
            Inner::Waiting(receiver) => Pin::new(receiver)
                .poll(cx)
                .map(|received| received.map_err(|_canceled| Closed)),
        }
    }
}
