use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::Value;

#[derive(Debug, Default)]
struct Queue {
    values: VecDeque<Value>,
    closed: bool,
}

/// Shared handle to a FIFO of values plus an end-of-stream flag.
///
/// Cloning a channel clones the handle, not the queue. A producer holds a
/// clone of its consumer's input channel and pushes into it; the consumer
/// pops from its own handle.
#[derive(Debug, Clone, Default)]
pub struct Channel {
    queue: Rc<RefCell<Queue>>,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: &[Value]) -> Self {
        let channel = Self::new();
        channel.reset(values);
        channel
    }

    pub fn send(&self, value: Value) {
        self.queue.borrow_mut().values.push_back(value);
    }

    pub fn recv(&self) -> Option<Value> {
        self.queue.borrow_mut().values.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().values.is_empty()
    }

    /// Mark that no further values will arrive.
    pub fn close(&self) {
        self.queue.borrow_mut().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.queue.borrow().closed
    }

    /// Replace the queued values and reopen the stream.
    pub fn reset(&self, values: &[Value]) {
        let mut queue = self.queue.borrow_mut();
        queue.values = values.iter().copied().collect();
        queue.closed = false;
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.queue.borrow().values.iter().copied().collect()
    }

    pub fn same_channel(&self, other: &Channel) -> bool {
        Rc::ptr_eq(&self.queue, &other.queue)
    }
}
