//! An ordered map backed by a splay tree whose nodes live in a typed arena.
//!
//! # Examples
//!
//! ```
//! use splay_map::SplayMap;
//!
//! let mut map = SplayMap::new();
//! map.insert(5, "a");
//! map.insert(3, "b");
//! assert!(map.contains(&3));
//! assert_eq!(map.root_key(), Some(&3));
//! ```

mod entry;
mod error;
pub mod arena;
pub mod benchmark;
pub mod splay_tree;

pub use crate::error::{Error, Result};
pub use crate::splay_tree::SplayMap;
