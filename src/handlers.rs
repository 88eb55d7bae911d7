use std::collections::VecDeque;

// Handlers are taken off the front one at a time so that a walk never holds
// a borrow of the queue while user code runs. Whatever has not been taken
// yet is the unprocessed tail, which is what survives a paused walk.
pub(crate) struct Handlers<H> {
    queue: VecDeque<H>,
}

impl<H> Handlers<H> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, handler: H) {
        self.queue.push_back(handler);
    }

    pub fn take_next(&mut self) -> Option<H> {
        self.queue.pop_front()
    }

    pub fn purge(&mut self) {
        self.queue.clear();
    }

    #[cfg(any(test, feature = "trace"))]
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
