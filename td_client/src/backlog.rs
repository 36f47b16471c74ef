//! Backlog of responses observed while waiting for another one.
//!
//! Strict FIFO: entries leave in arrival order and are never reordered or
//! deduplicated.

use std::collections::VecDeque;
use td_schema::Response;

#[derive(Debug, Clone, Default)]
pub struct Backlog {
    responses: VecDeque<Response>,
}

impl Backlog {
    /// Creates an empty backlog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of buffered responses.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Returns whether the backlog is empty.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Appends a response behind everything already buffered.
    pub fn push(&mut self, response: Response) {
        self.responses.push_back(response);
    }

    /// Removes the oldest response.
    pub fn pop(&mut self) -> Option<Response> {
        self.responses.pop_front()
    }

    /// Peeks at the oldest response.
    pub fn front(&self) -> Option<&Response> {
        self.responses.front()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Response> {
        self.responses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use td_schema::{OptionValue, TdObject};

    fn update(name: &str) -> Response {
        Response::new(TdObject::update_option(name, OptionValue::Empty))
    }

    #[test]
    fn test_backlog_ordering() {
        let mut backlog = Backlog::new();
        backlog.push(update("a"));
        backlog.push(update("b"));
        backlog.push(update("c"));

        assert_eq!(backlog.pop(), Some(update("a")));
        assert_eq!(backlog.pop(), Some(update("b")));
        assert_eq!(backlog.pop(), Some(update("c")));
        assert!(backlog.pop().is_none());
    }

    #[test]
    fn test_backlog_keeps_duplicates() {
        let mut backlog = Backlog::new();
        backlog.push(update("a"));
        backlog.push(update("a"));
        assert_eq!(backlog.len(), 2);
    }

    #[test]
    fn test_front_does_not_remove() {
        let mut backlog = Backlog::new();
        assert!(backlog.front().is_none());
        backlog.push(update("a"));
        assert_eq!(backlog.front(), Some(&update("a")));
        assert_eq!(backlog.len(), 1);
        assert!(!backlog.is_empty());
    }

    #[test]
    fn test_iter_oldest_first() {
        let mut backlog = Backlog::new();
        backlog.push(update("x"));
        backlog.push(update("y"));
        let names: Vec<_> = backlog
            .iter()
            .map(|response| match &response.object {
                TdObject::UpdateOption { name, .. } => name.clone(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(names, vec!["x".to_string(), "y".to_string()]);
    }
}
