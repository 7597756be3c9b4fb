use crate::arena::{Handle, TypedArena};
use crate::entry::Entry;
use crate::error::Result;
use crate::splay_tree::node::{Link, Node};
use log::trace;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

/// The node storage and root link of a splay tree.
///
/// Nodes refer to their parent and children through arena handles, so every rotation is a
/// constant number of handle rewrites and the tree owns no recursive structure.
#[derive(Clone)]
pub struct Tree<T, U> {
    arena: TypedArena<Node<T, U>>,
    root: Link,
}

impl<T, U> Tree<T, U> {
    pub fn new(chunk_size: usize) -> Self {
        Tree {
            arena: TypedArena::new(chunk_size),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }

    pub fn root_entry(&self) -> Option<&Entry<T, U>> {
        let root = self.root?;
        Some(&self.arena[root].entry)
    }

    pub fn root_entry_mut(&mut self) -> Option<&mut Entry<T, U>> {
        let root = self.root?;
        Some(&mut self.arena[root].entry)
    }

    fn is_left_child(&self, node: Handle) -> bool {
        match self.arena[node].parent {
            Some(parent) => self.arena[parent].has_left_child(node),
            None => false,
        }
    }

    fn is_right_child(&self, node: Handle) -> bool {
        match self.arena[node].parent {
            Some(parent) => self.arena[parent].has_right_child(node),
            None => false,
        }
    }

    /// Makes `new` take the place of `old` under `grandparent`, or at the root if there is no
    /// grandparent.
    fn replace_child(&mut self, grandparent: Link, old: Handle, new: Handle) {
        self.arena[new].parent = grandparent;
        match grandparent {
            Some(grandparent) => {
                let grandparent = &mut self.arena[grandparent];
                if grandparent.has_left_child(old) {
                    grandparent.left = Some(new);
                } else {
                    grandparent.right = Some(new);
                }
            },
            None => self.root = Some(new),
        }
    }

    /// Lifts `node`, a right child, one level above its parent.
    fn rotate_left(&mut self, node: Handle) {
        let parent = self.arena[node]
            .parent
            .expect("Expected rotated node to have a parent.");
        debug_assert!(self.is_right_child(node));
        let grandparent = self.arena[parent].parent;

        let inner = self.arena[node].left;
        self.arena[parent].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(parent);
        }

        self.replace_child(grandparent, parent, node);
        self.arena[node].left = Some(parent);
        self.arena[parent].parent = Some(node);
    }

    /// Lifts `node`, a left child, one level above its parent.
    fn rotate_right(&mut self, node: Handle) {
        let parent = self.arena[node]
            .parent
            .expect("Expected rotated node to have a parent.");
        debug_assert!(self.is_left_child(node));
        let grandparent = self.arena[parent].parent;

        let inner = self.arena[node].right;
        self.arena[parent].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(parent);
        }

        self.replace_child(grandparent, parent, node);
        self.arena[node].right = Some(parent);
        self.arena[parent].parent = Some(node);
    }

    /// Rotates `node` upwards until it becomes the root.
    fn splay_node(&mut self, node: Handle) {
        let mut steps = 0;
        while let Some(parent) = self.arena[node].parent {
            match self.arena[parent].parent {
                // zig
                None => {
                    if self.is_left_child(node) {
                        self.rotate_right(node);
                    } else {
                        self.rotate_left(node);
                    }
                },
                Some(_) => {
                    match (self.is_left_child(node), self.is_left_child(parent)) {
                        // zig-zig
                        (true, true) => {
                            self.rotate_right(parent);
                            self.rotate_right(node);
                        },
                        (false, false) => {
                            self.rotate_left(parent);
                            self.rotate_left(node);
                        },
                        // zig-zag
                        (true, false) => {
                            self.rotate_right(node);
                            self.rotate_left(node);
                        },
                        (false, true) => {
                            self.rotate_left(node);
                            self.rotate_right(node);
                        },
                    }
                },
            }
            steps += 1;
        }
        trace!("splayed node to the root in {} steps", steps);
    }

    /// Returns the node holding `key`, or the last node on the search path for `key` if no such
    /// node exists. Returns `None` only for an empty tree.
    pub fn find_closest<V>(&self, key: &V) -> Link
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root?;
        loop {
            let node = &self.arena[curr];
            let next = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => None,
            };
            match next {
                Some(next) => curr = next,
                None => return Some(curr),
            }
        }
    }

    /// Splays the node closest to `key` to the root and returns how `key` compares to the new
    /// root's key. Returns `None` if the tree is empty.
    pub fn splay<V>(&mut self, key: &V) -> Option<Ordering>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let node = self.find_closest(key)?;
        self.splay_node(node);
        Some(key.cmp(self.arena[node].entry.key.borrow()))
    }

    /// Places a freshly allocated node at the root. `ordering` is the comparison of the new key
    /// against the current root's key, as returned by `splay`.
    fn push_root(&mut self, new_root: Handle, ordering: Ordering) {
        let prev_root = self.root.expect("Expected non-empty tree.");
        if ordering == Ordering::Less {
            let left = self.arena[prev_root].left.take();
            if let Some(left) = left {
                self.arena[left].parent = Some(new_root);
            }
            self.arena[new_root].left = left;
            self.arena[new_root].right = Some(prev_root);
        } else {
            let right = self.arena[prev_root].right.take();
            if let Some(right) = right {
                self.arena[right].parent = Some(new_root);
            }
            self.arena[new_root].right = right;
            self.arena[new_root].left = Some(prev_root);
        }
        self.arena[prev_root].parent = Some(new_root);
        self.root = Some(new_root);
    }

    fn attach(&mut self, key: T, value: U, ordering: Option<Ordering>) {
        let new_root = self.arena.allocate(Node::new(key, value));
        match ordering {
            Some(ordering) => self.push_root(new_root, ordering),
            None => self.root = Some(new_root),
        }
    }

    /// Inserts a key-value pair, splaying it to the root. Returns the previous value if the key
    /// was already present.
    pub fn insert(&mut self, key: T, value: U) -> Option<U>
    where
        T: Ord,
    {
        match self.splay(&key) {
            Some(Ordering::Equal) => {
                let entry = self.root_entry_mut().expect("Expected non-empty tree.");
                Some(mem::replace(&mut entry.value, value))
            },
            ordering => {
                self.attach(key, value, ordering);
                None
            },
        }
    }

    /// Like `insert`, but reserves room for the new node before touching the tree so that an
    /// allocation failure leaves the tree exactly as it was.
    pub fn try_insert(&mut self, key: T, value: U) -> Result<Option<U>>
    where
        T: Ord,
    {
        self.arena.try_reserve()?;
        Ok(self.insert(key, value))
    }

    /// Splays `key` to the root, inserting it with the value produced by `f` if it is absent, and
    /// returns the root entry.
    pub fn get_or_insert_with<F>(&mut self, key: T, f: F) -> &mut Entry<T, U>
    where
        T: Ord,
        F: FnOnce() -> U,
    {
        match self.splay(&key) {
            Some(Ordering::Equal) => {},
            ordering => self.attach(key, f(), ordering),
        }
        self.root_entry_mut().expect("Expected non-empty tree.")
    }

    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self.splay(key) {
            Some(Ordering::Equal) => self.root_entry_mut(),
            _ => None,
        }
    }

    /// Walks the whole tree and panics if a parent link, the key order, or the node count is
    /// inconsistent.
    #[cfg(test)]
    pub fn assert_valid(&self)
    where
        T: Ord,
    {
        if let Some(root) = self.root {
            assert_eq!(self.arena[root].parent, None);
        }

        let mut count = 0;
        let mut stack = Vec::new();
        let mut curr = self.root;
        let mut prev: Option<&T> = None;
        loop {
            while let Some(handle) = curr {
                stack.push(handle);
                curr = self.arena[handle].left;
            }
            let handle = match stack.pop() {
                Some(handle) => handle,
                None => break,
            };
            let node = &self.arena[handle];
            for child in [node.left, node.right].iter().flatten() {
                assert_eq!(self.arena[*child].parent, Some(handle));
            }
            assert!(!(self.is_left_child(handle) && self.is_right_child(handle)));
            if let Some(prev) = prev {
                assert!(prev < &node.entry.key);
            }
            prev = Some(&node.entry.key);
            count += 1;
            curr = node.right;
        }
        assert_eq!(count, self.arena.len());
    }
}
