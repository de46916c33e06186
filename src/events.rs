//! Form lifecycle events.
//!
//! Subscribers receive every value change, reset and submission state
//! transition over a `std::sync::mpsc` channel. Delivery is synchronous with
//! the operation that caused the event.

use std::cell::RefCell;
use std::sync::mpsc;

use crate::submit::SubmissionState;
use crate::value::FieldName;

/// Events emitted by a form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// A field value was replaced.
    ValueChanged {
        /// Which field changed.
        field: FieldName,
    },
    /// Values were restored to their defaults.
    Reset,
    /// The submission state machine moved.
    Transition {
        /// State before the transition.
        from: SubmissionState,
        /// State after the transition.
        to: SubmissionState,
    },
}

/// Fan-out sender for form events.
#[derive(Debug, Default)]
pub(crate) struct EventSender {
    senders: RefCell<Vec<mpsc::Sender<FormEvent>>>,
}

impl EventSender {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn send(&self, event: FormEvent) {
        // Dropped receivers are pruned on the way
        self.senders
            .borrow_mut()
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    pub(crate) fn subscribe(&self) -> mpsc::Receiver<FormEvent> {
        let (tx, rx) = mpsc::channel();
        self.senders.borrow_mut().push(tx);
        rx
    }
}
