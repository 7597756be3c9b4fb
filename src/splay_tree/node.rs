use crate::arena::Handle;
use crate::entry::Entry;

pub type Link = Option<Handle>;

#[derive(Clone, Debug)]
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub parent: Link,
    pub left: Link,
    pub right: Link,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U) -> Self {
        Node {
            entry: Entry { key, value },
            parent: None,
            left: None,
            right: None,
        }
    }

    /// Returns `true` if `child` hangs off this node's left link.
    pub fn has_left_child(&self, child: Handle) -> bool {
        self.left == Some(child)
    }

    /// Returns `true` if `child` hangs off this node's right link.
    pub fn has_right_child(&self, child: Handle) -> bool {
        self.right == Some(child)
    }
}
