//! The pull-based list link protocol.
//!
//! Sequences travel through the dispatch layer as singly linked chains: any
//! node type participates by embedding a `next` slot and exposing it through
//! [`ListNode`]. The payload carried beside the link is opaque to this
//! layer; [`crate::visitor::Visitor::next_list`] only ever touches the
//! link slot.

/// The minimal node shape: a bare `next` link and nothing else.
///
/// Its size is the floor for the node-size contract check in
/// [`crate::visitor::Visitor::next_list`].
#[derive(Debug, Default)]
pub struct GenericLink {
    pub next: Option<Box<GenericLink>>,
}

/// Implemented by every type used as a list node.
pub trait ListNode: Default {
    /// Mutable access to the node's `next` link slot.
    fn next_mut(&mut self) -> &mut Option<Box<Self>>;
}

impl ListNode for GenericLink {
    fn next_mut(&mut self) -> &mut Option<Box<Self>> {
        &mut self.next
    }
}
