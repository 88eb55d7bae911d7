use super::{Chain, OnFulfilled, OnRejected, Pledge};
use crate::Value;
use tracing::{debug, trace};

// The settlement algorithm. Both walks take handlers off their queue one at a
// time and never hold the RefCell borrow while a handler runs, so handlers
// may re-enter the pledge they are attached to.
impl<T, E> Pledge<T, E>
where
    T: Value,
    E: Value,
{
    pub(crate) fn settle_fulfilled(&self, value: T) -> Result<(), E> {
        trace!("pledge fulfilled");
        {
            let mut state = self.state.borrow_mut();
            state.result = Some(Ok(value.clone()));
            state.adopting = false;
            state.walking = true;
        }

        let mut current = value;
        loop {
            let handler = match self.state.borrow_mut().on_fulfilled.take_next() {
                Some(handler) => handler,
                None => break,
            };
            match handler(current.clone()) {
                Ok(Chain::Keep) => {}
                Ok(Chain::Value(next)) => {
                    self.state.borrow_mut().result = Some(Ok(next.clone()));
                    current = next;
                }
                Ok(Chain::Adopt(inner)) => return self.adopt(inner),
                Err(reason) => {
                    debug!("fulfillment handler failed, rejecting pledge");
                    {
                        // The rest of the fulfillment queue is abandoned.
                        let mut state = self.state.borrow_mut();
                        state.on_fulfilled.purge();
                        state.walking = false;
                    }
                    return self.settle_rejected(reason);
                }
            }
        }

        let mut state = self.state.borrow_mut();
        state.purge_handlers();
        state.walking = false;
        Ok(())
    }

    pub(crate) fn settle_rejected(&self, reason: E) -> Result<(), E> {
        trace!("pledge rejected");
        {
            let mut state = self.state.borrow_mut();
            state.result = Some(Err(reason.clone()));
            state.adopting = false;
            state.walking = true;
        }

        let mut current = reason;
        loop {
            let handler = match self.state.borrow_mut().on_rejected.take_next() {
                Some(handler) => handler,
                None => break,
            };
            match handler(current.clone()) {
                Ok(Chain::Keep) => {}
                Ok(Chain::Value(next)) => {
                    self.state.borrow_mut().result = Some(Err(next.clone()));
                    current = next;
                }
                Ok(Chain::Adopt(inner)) => return self.adopt(inner),
                // Escapes as-is. The handlers not yet invoked stay queued.
                Err(escaped) => {
                    self.state.borrow_mut().walking = false;
                    return Err(escaped);
                }
            }
        }

        let mut state = self.state.borrow_mut();
        state.purge_handlers();
        state.walking = false;
        Ok(())
    }

    /// Follow `inner`: this pledge's own settle steps become inner's
    /// handlers, so the queued tail resumes with inner's value or reason.
    pub(crate) fn adopt(&self, inner: Pledge<T, E>) -> Result<(), E> {
        trace!("pledge adopting another pledge");
        {
            let mut state = self.state.borrow_mut();
            state.walking = false;
            state.adopting = true;
        }

        let outer = self.clone();
        let on_fulfilled: OnFulfilled<T, E> = Box::new(move |value| {
            outer.settle_fulfilled(value)?;
            Ok(Chain::Keep)
        });
        let outer = self.clone();
        let on_rejected: OnRejected<T, E> = Box::new(move |reason| {
            outer.settle_rejected(reason)?;
            Ok(Chain::Keep)
        });
        inner.subscribe(Some(on_fulfilled), Some(on_rejected))?;
        Ok(())
    }
}
