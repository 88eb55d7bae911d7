use super::{OnFulfilled, OnRejected, State};
use crate::handlers::Handlers;

pub(crate) struct SharedState<T, E> {
    pub result: Option<Result<T, E>>,
    pub on_fulfilled: Handlers<OnFulfilled<T, E>>,
    pub on_rejected: Handlers<OnRejected<T, E>>,
    // A walk over one of the queues is running. Registrations made from
    // inside a handler are picked up by that walk instead of replaying.
    pub walking: bool,
    // Subscribed to an inner pledge. The unprocessed tail waits for it.
    pub adopting: bool,
}

impl<T, E> SharedState<T, E> {
    pub fn new() -> Self {
        Self {
            result: None,
            on_fulfilled: Handlers::new(),
            on_rejected: Handlers::new(),
            walking: false,
            adopting: false,
        }
    }

    pub fn state(&self) -> State {
        match &self.result {
            None => State::Pending,
            Some(Ok(_)) => State::Fulfilled,
            Some(Err(_)) => State::Rejected,
        }
    }

    /// Late registrations replay against the result only once the pledge is
    /// settled and idle.
    pub fn can_replay(&self) -> bool {
        !self.walking && !self.adopting && self.result.is_some()
    }

    pub fn purge_handlers(&mut self) {
        self.on_fulfilled.purge();
        self.on_rejected.purge();
    }
}
