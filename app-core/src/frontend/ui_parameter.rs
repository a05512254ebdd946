use std::sync::mpsc::TryRecvError;

use log::warn;

use crate::backend::LinkReceiver;

/// A value shown by the frontend that may be waiting for a newer value
/// computed on the backend.
///
/// At most one reply is awaited at a time. Setting a new receiver drops
/// the previous one, which cancels its request, so a slow reply for an
/// older request can never overwrite the value requested last.
#[derive(Debug)]
pub struct UIParameter<T> {
    pending: Option<LinkReceiver<T>>,
    value: T,
}

impl<T> UIParameter<T> {
    pub fn new(value: T) -> Self {
        Self {
            pending: None,
            value,
        }
    }

    /// Polls the pending reply, if any. Returns true if the value changed,
    /// or if the request was lost and nothing is pending anymore.
    pub fn try_update(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let received = match rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                warn!("reply for '{}' was lost", rx.description());
                None
            }
        };
        self.pending = None;
        if let Some(value) = received {
            self.value = value;
        }
        true
    }

    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_none()
    }

    /// Waits for `rx` instead of the reply awaited so far.
    pub fn set_recv(&mut self, rx: LinkReceiver<T>) {
        self.pending = Some(rx);
    }

    /// Replaces the value and cancels any pending reply.
    pub fn set(&mut self, value: T) {
        self.pending = None;
        self.value = value;
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendEventLoop, BackendLink, BackendState};

    struct NoState;
    impl BackendState for NoState {}

    #[test]
    fn test_set_cancels_pending_reply() {
        let mut parameter = UIParameter::new("initial");
        let (rx, link) = BackendLink::new("reply", |_: &mut BackendEventLoop<NoState>| "reply");
        parameter.set_recv(rx);
        assert!(!parameter.is_up_to_date());

        parameter.set("local");
        assert!(link.is_cancelled());
        assert!(parameter.is_up_to_date());
        assert!(!parameter.try_update());
        assert_eq!(*parameter.value(), "local");
    }

    #[test]
    fn test_lost_reply_keeps_value() {
        let mut parameter = UIParameter::new("initial");
        let (rx, link) = BackendLink::new("reply", |_: &mut BackendEventLoop<NoState>| "reply");
        parameter.set_recv(rx);
        drop(link);

        assert!(parameter.try_update());
        assert!(parameter.is_up_to_date());
        assert_eq!(*parameter.value(), "initial");
    }
}
