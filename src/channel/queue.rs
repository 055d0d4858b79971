use std::collections::VecDeque;

use crate::types::OutboundMessage;

/// FIFO buffer for payloads awaiting a reopened channel.
///
/// Bounded: on overflow the oldest entry is dropped so the most recent
/// messages survive an outage.
#[derive(Debug)]
pub struct OutboundQueue {
    items: VecDeque<OutboundMessage>,
    max_len: usize,
}

impl OutboundQueue {
    pub fn new(max_len: usize) -> Self {
        Self {
            items: VecDeque::new(),
            max_len,
        }
    }

    /// Append a payload, evicting the oldest entry when full.
    /// Returns the evicted entry, if any.
    pub fn push(&mut self, message: OutboundMessage) -> Option<OutboundMessage> {
        let evicted = if self.items.len() >= self.max_len {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(message);
        if evicted.is_some() {
            tracing::warn!(
                "Outbound queue full ({} entries), dropped oldest message",
                self.max_len
            );
        }
        evicted
    }

    /// Put a payload back at the head of the queue (failed in-flight send).
    pub fn push_front(&mut self, message: OutboundMessage) {
        self.items.push_front(message);
    }

    pub fn pop_front(&mut self) -> Option<OutboundMessage> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order_preserved() {
        let mut queue = OutboundQueue::new(8);
        queue.push(OutboundMessage::from("first"));
        queue.push(OutboundMessage::from("second"));
        queue.push(OutboundMessage::from("third"));

        assert_eq!(queue.pop_front(), Some(OutboundMessage::from("first")));
        assert_eq!(queue.pop_front(), Some(OutboundMessage::from("second")));
        assert_eq!(queue.pop_front(), Some(OutboundMessage::from("third")));
        assert_eq!(queue.pop_front(), None);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut queue = OutboundQueue::new(2);
        assert!(queue.push(OutboundMessage::from("a")).is_none());
        assert!(queue.push(OutboundMessage::from("b")).is_none());

        let evicted = queue.push(OutboundMessage::from("c"));
        assert_eq!(evicted, Some(OutboundMessage::from("a")));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_front(), Some(OutboundMessage::from("b")));
        assert_eq!(queue.pop_front(), Some(OutboundMessage::from("c")));
    }

    #[test]
    fn test_push_front_requeues_at_head() {
        let mut queue = OutboundQueue::new(8);
        queue.push(OutboundMessage::from("second"));
        queue.push_front(OutboundMessage::from("first"));

        assert_eq!(queue.pop_front(), Some(OutboundMessage::from("first")));
        assert_eq!(queue.pop_front(), Some(OutboundMessage::from("second")));
    }
}
