use pledge::*;
use std::{cell::RefCell, rc::Rc};

fn deferred<T: Value, E: Value>() -> (Pledge<T, E>, Fulfill<T, E>, Reject<T, E>) {
    let mut capabilities = None;
    let pledge = Pledge::new(|fulfill, reject| {
        capabilities = Some((fulfill, reject));
        Ok(())
    });
    let (fulfill, reject) = capabilities.unwrap();
    (pledge, fulfill, reject)
}

fn recorder<V: Value>() -> Rc<RefCell<Vec<V>>> {
    Rc::new(RefCell::new(vec![]))
}

#[test]
fn return_values_flow_to_the_next_handler() {
    let pledge = Pledge::<u32, String>::resolve(1)
        .then(|v| Ok(Chain::Value(v + 1)))
        .unwrap()
        .then(|v| Ok(Chain::Value(v * 2)))
        .unwrap();
    assert_eq!(pledge.state(), State::Fulfilled);
    assert_eq!(pledge.result(), Some(Ok(4)));
}

#[test]
fn keep_leaves_the_result_alone() {
    let seen = recorder();
    let record = seen.clone();
    let pledge = Pledge::<u32, String>::resolve(5)
        .then(|_| Ok(Chain::Keep))
        .unwrap()
        .then(move |v| {
            record.borrow_mut().push(v);
            Ok(Chain::Keep)
        })
        .unwrap();
    assert_eq!(*seen.borrow(), vec![5]);
    assert_eq!(pledge.result(), Some(Ok(5)));
}

#[test]
fn then_returns_the_same_pledge() {
    let pledge = Pledge::<u32, String>::resolve(1);
    let chained = pledge.then(|v| Ok(Chain::Value(v + 1))).unwrap();
    assert_eq!(chained, pledge);

    // A later, unrelated subscriber observes the rewritten result.
    let seen = recorder();
    let record = seen.clone();
    pledge
        .then(move |v| {
            record.borrow_mut().push(v);
            Ok(Chain::Keep)
        })
        .unwrap();
    assert_eq!(*seen.borrow(), vec![2]);
}

#[test]
fn returned_pledge_is_unwrapped() {
    let seen = recorder();
    let record = seen.clone();
    Pledge::<&str, String>::resolve("foo")
        .then(|_| Ok(Chain::Adopt(Pledge::resolve("bar"))))
        .unwrap()
        .then(move |v| {
            record.borrow_mut().push(v);
            Ok(Chain::Keep)
        })
        .unwrap();
    assert_eq!(*seen.borrow(), vec!["bar"]);
}

#[test]
fn chain_waits_for_a_pending_inner_pledge() {
    let (inner, inner_fulfill, _inner_reject) = deferred::<u32, String>();
    let seen = recorder();
    let record = seen.clone();

    let outer = Pledge::<u32, String>::resolve(1)
        .then(move |_| Ok(inner.into()))
        .unwrap()
        .then(move |v| {
            record.borrow_mut().push(v);
            Ok(Chain::Value(v + 1))
        })
        .unwrap();

    // Paused: the previous result is kept and the tail has not run.
    assert_eq!(outer.result(), Some(Ok(1)));
    assert!(seen.borrow().is_empty());

    inner_fulfill.fulfill(10).unwrap();
    assert_eq!(*seen.borrow(), vec![10]);
    assert_eq!(outer.result(), Some(Ok(11)));
}

#[test]
fn inner_rejection_rejects_the_outer_pledge() {
    let (inner, _inner_fulfill, inner_reject) = deferred::<u32, String>();
    let outer = Pledge::<u32, String>::resolve(1)
        .then(move |_| Ok(Chain::Adopt(inner)))
        .unwrap();
    inner_reject.reject("inner failed".to_string()).unwrap();
    assert_eq!(outer.state(), State::Rejected);
    assert_eq!(outer.result(), Some(Err("inner failed".to_string())));
}

#[test]
fn resolving_with_a_pledge_follows_it() {
    let (inner, inner_fulfill, _inner_reject) = deferred::<u32, String>();
    let outer = Pledge::resolve_pledge(inner.clone());
    assert_eq!(outer.state(), State::Pending);
    assert_eq!(outer.result(), None);
    assert_ne!(outer, inner);

    inner_fulfill.fulfill(3).unwrap();
    assert_eq!(outer.result(), Some(Ok(3)));

    let settled = Pledge::<u32, String>::resolve_pledge(Pledge::reject("no".to_string()));
    assert_eq!(settled.result(), Some(Err("no".to_string())));
}

#[test]
fn adopting_capability_ignores_later_calls() {
    let (inner, inner_fulfill, _inner_reject) = deferred::<u32, String>();
    let (outer, fulfill, reject) = deferred::<u32, String>();
    fulfill.adopt(inner).unwrap();
    fulfill.fulfill(1).unwrap();
    reject.reject("ignored".to_string()).unwrap();
    assert!(outer.is_pending());

    inner_fulfill.fulfill(2).unwrap();
    assert_eq!(outer.result(), Some(Ok(2)));
}

#[test]
fn pledge_adopting_itself_stays_paused() {
    let pledge = Pledge::<u32, ()>::resolve(1);
    let itself = pledge.clone();
    pledge.then(move |_| Ok(Chain::Adopt(itself))).unwrap();

    let seen = recorder();
    let record = seen.clone();
    pledge
        .then(move |v| {
            record.borrow_mut().push(v);
            Ok(Chain::Keep)
        })
        .unwrap();
    assert!(seen.borrow().is_empty());
    assert_eq!(pledge.result(), Some(Ok(1)));
}

#[test]
fn fulfillment_handler_error_rejects() {
    let pledge = Pledge::<&str, String>::resolve("foo")
        .then(|_| Err("bar".to_string()))
        .unwrap();
    assert_eq!(pledge.state(), State::Rejected);

    let seen = recorder();
    let record = seen.clone();
    pledge
        .catch(move |reason| {
            record.borrow_mut().push(reason);
            Ok(Chain::Keep)
        })
        .unwrap();
    assert_eq!(*seen.borrow(), vec!["bar".to_string()]);
}

#[test]
fn fulfillment_handler_error_abandons_the_queue() {
    let (pledge, fulfill, _reject) = deferred::<u32, String>();
    let seen = recorder();
    let (after, on_reason) = (seen.clone(), seen.clone());
    pledge
        .then(|_| Err("broken".to_string()))
        .unwrap()
        .then(move |v| {
            after.borrow_mut().push(format!("value {}", v));
            Ok(Chain::Keep)
        })
        .unwrap()
        .catch(move |reason| {
            on_reason.borrow_mut().push(format!("reason {}", reason));
            Ok(Chain::Keep)
        })
        .unwrap();

    fulfill.fulfill(1).unwrap();
    assert_eq!(*seen.borrow(), vec!["reason broken".to_string()]);
    assert_eq!(pledge.result(), Some(Err("broken".to_string())));
}

#[test]
fn abandoned_handlers_stay_abandoned_after_recovery() {
    let (pledge, fulfill, _reject) = deferred::<u32, String>();
    let seen = recorder();
    let after = seen.clone();
    pledge
        .then(|_| Err("broken".to_string()))
        .unwrap()
        .then(move |v| {
            after.borrow_mut().push(v);
            Ok(Chain::Keep)
        })
        .unwrap()
        .catch(|_| Ok(Chain::Adopt(Pledge::resolve(5))))
        .unwrap();

    fulfill.fulfill(1).unwrap();
    assert!(seen.borrow().is_empty());
    assert_eq!(pledge.result(), Some(Ok(5)));
}

#[test]
fn follower_stays_rejected_when_the_followed_pledge_recovers() {
    let (inner, fulfill, _reject) = deferred::<u32, String>();
    inner.then(|_| Err("x".to_string())).unwrap();
    let outer = Pledge::resolve_pledge(inner.clone());
    inner
        .catch(|_| Ok(Chain::Adopt(Pledge::resolve(9))))
        .unwrap();

    fulfill.fulfill(1).unwrap();
    assert_eq!(inner.result(), Some(Ok(9)));
    assert_eq!(outer.state(), State::Rejected);
    assert_eq!(outer.result(), Some(Err("x".to_string())));
}

#[test]
fn rejection_handler_error_escapes_the_producer() {
    let (pledge, _fulfill, reject) = deferred::<u32, String>();
    let seen = recorder();
    let record = seen.clone();
    pledge
        .catch(|reason| Err(format!("handler failed on {}", reason)))
        .unwrap()
        .catch(move |reason| {
            record.borrow_mut().push(reason);
            Ok(Chain::Keep)
        })
        .unwrap();

    let escaped = reject.reject("boom".to_string());
    assert_eq!(escaped, Err("handler failed on boom".to_string()));
    // Not converted: the reason is untouched and the next handler is still
    // waiting.
    assert_eq!(pledge.result(), Some(Err("boom".to_string())));
    assert!(seen.borrow().is_empty());
}

#[test]
fn rejection_handler_error_escapes_a_late_catch() {
    let pledge = Pledge::<u32, String>::reject("boom".to_string());
    let escaped = pledge.catch(|reason| Err(reason + "!"));
    assert_eq!(escaped, Err("boom!".to_string()));
    assert_eq!(pledge.state(), State::Rejected);
}

#[test]
fn rejection_handler_can_replace_the_reason() {
    let seen = recorder();
    let record = seen.clone();
    Pledge::<u32, String>::reject("a".to_string())
        .catch(|reason| Ok(Chain::Value(reason + "b")))
        .unwrap()
        .catch(move |reason| {
            record.borrow_mut().push(reason);
            Ok(Chain::Keep)
        })
        .unwrap();
    assert_eq!(*seen.borrow(), vec!["ab".to_string()]);
}

#[test]
fn rejection_handler_can_recover_through_a_pledge() {
    let pledge = Pledge::<u32, String>::reject("lost".to_string())
        .catch(|_| Ok(Chain::Adopt(Pledge::resolve(5))))
        .unwrap();
    assert_eq!(pledge.state(), State::Fulfilled);
    assert_eq!(pledge.result(), Some(Ok(5)));
}

#[test]
fn catch_on_a_fulfilled_pledge_is_dropped() {
    let pledge = Pledge::<u32, String>::resolve(1)
        .catch(|_| panic!("rejection handler called"))
        .unwrap();
    // The handler was purged by the replay, a later failure does not reach
    // it.
    pledge.then(|_| Err("late".to_string())).unwrap();
    assert_eq!(pledge.result(), Some(Err("late".to_string())));
}
