use crate::*;
use std::{
    cell::{Cell, RefCell},
    mem,
    rc::Rc,
};

struct Gathered<T> {
    slots: Vec<Option<T>>,
    recorded: usize,
}

/// Join: fulfills with every value in input order once all inputs fulfill,
/// or rejects with the first rejection reason seen. Plain values count as
/// already fulfilled. An empty input fulfills immediately with an empty
/// `Vec`.
pub fn all<T, E, I>(inputs: I) -> Pledge<Vec<T>, E>
where
    T: Value,
    E: Value,
    I: IntoIterator<Item = MaybePledge<T, E>>,
{
    let inputs: Vec<_> = inputs.into_iter().map(MaybePledge::into_pledge).collect();
    Pledge::new(move |fulfill, reject| {
        let len = inputs.len();
        if len == 0 {
            return fulfill.fulfill(Vec::new());
        }

        // Separate from the output's own state. Fulfillments arriving after a
        // rejection must not be recorded.
        let guard = Rc::new(Cell::new(State::Pending));
        let gathered = Rc::new(RefCell::new(Gathered {
            slots: vec![None; len],
            recorded: 0,
        }));

        for (i, input) in inputs.into_iter().enumerate() {
            let (fulfill, reject) = (fulfill.clone(), reject.clone());
            let (on_value_guard, on_reason_guard) = (guard.clone(), guard.clone());
            let gathered = gathered.clone();
            input.then_catch(
                move |value| {
                    if on_value_guard.get() == State::Rejected {
                        return Ok(Chain::Keep);
                    }
                    let complete = {
                        let mut gathered = gathered.borrow_mut();
                        let Gathered { slots, recorded } = &mut *gathered;
                        if let Some(slot) = slots.get_mut(i) {
                            if slot.replace(value).is_none() {
                                *recorded += 1;
                            }
                        }
                        if *recorded == len {
                            Some(mem::take(slots).into_iter().flatten().collect::<Vec<_>>())
                        } else {
                            None
                        }
                    };
                    if let Some(values) = complete {
                        on_value_guard.set(State::Fulfilled);
                        fulfill.fulfill(values)?;
                    }
                    Ok(Chain::Keep)
                },
                move |reason| {
                    on_reason_guard.set(State::Rejected);
                    reject.reject(reason)?;
                    Ok(Chain::Keep)
                },
            )?;
        }
        Ok(())
    })
}

/// First to settle wins: the output takes the value or reason of whichever
/// input settles first, by time rather than position. Later settlements are
/// ignored. An empty input never settles.
pub fn race<T, E, I>(inputs: I) -> Pledge<T, E>
where
    T: Value,
    E: Value,
    I: IntoIterator<Item = MaybePledge<T, E>>,
{
    let inputs: Vec<_> = inputs.into_iter().map(MaybePledge::into_pledge).collect();
    Pledge::new(move |fulfill, reject| {
        let guard = Rc::new(Cell::new(State::Pending));
        for input in inputs {
            let (fulfill, reject) = (fulfill.clone(), reject.clone());
            let (on_value_guard, on_reason_guard) = (guard.clone(), guard.clone());
            input.then_catch(
                move |value| {
                    if on_value_guard.get() == State::Pending {
                        on_value_guard.set(State::Fulfilled);
                        fulfill.fulfill(value)?;
                    }
                    Ok(Chain::Keep)
                },
                move |reason| {
                    if on_reason_guard.get() == State::Pending {
                        on_reason_guard.set(State::Rejected);
                        reject.reject(reason)?;
                    }
                    Ok(Chain::Keep)
                },
            )?;
        }
        Ok(())
    })
}
