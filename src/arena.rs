//! Fast, but limited allocator.

use crate::error::Result;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object stored in a `TypedArena<T>`.
///
/// Handles stay valid for as long as the arena they were issued by is alive and has not been
/// cleared.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk_index: usize,
    block_index: usize,
}

/// An append-only allocator that only allocates a single type of object.
///
/// Objects are stored in chunks of a fixed capacity. Once a chunk has been reserved it is never
/// reallocated, so filling the arena never moves or copies existing objects: it only reserves
/// another chunk. Objects cannot be freed individually. All of them are dropped together when
/// the arena is cleared or dropped, which walks the chunks one after another and therefore never
/// recurses, no matter how the stored objects refer to each other.
///
/// # Examples
///
/// ```
/// use splay_map::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
/// assert_eq!(arena.len(), 1);
/// ```
pub struct TypedArena<T> {
    chunks: Vec<Vec<T>>,
    chunk_size: usize,
    len: usize,
}

impl<T> TypedArena<T> {
    fn is_valid_handle(&self, handle: &Handle) -> bool {
        handle.chunk_index < self.chunks.len()
            && handle.block_index < self.chunks[handle.chunk_index].len()
    }

    fn is_full(&self) -> bool {
        self.chunks
            .last()
            .map_or(true, |chunk| chunk.len() == self.chunk_size)
    }

    fn push(&mut self, value: T) -> Handle {
        let chunk_index = self.chunks.len() - 1;
        let last_chunk = &mut self.chunks[chunk_index];
        last_chunk.push(value);
        self.len += 1;
        Handle {
            chunk_index,
            block_index: last_chunk.len() - 1,
        }
    }

    /// Constructs a new, empty `TypedArena<T>` with a specific number of objects per chunk. A
    /// chunk size of zero is treated as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::arena::TypedArena;
    ///
    /// // creates a new TypedArena<T> that contains a maximum of 1024 u32's per chunk
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        TypedArena {
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            len: 0,
        }
    }

    /// Allocates an object in the typed arena and returns a `Handle` that can later be used to
    /// retrieve mutable and immutable references to the object.
    ///
    /// # Panics
    ///
    /// Panics if a new chunk is needed and its capacity overflows `isize::MAX` bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        if self.is_full() {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
        }
        self.push(value)
    }

    /// Makes sure the next allocation will not need to reserve memory, reporting a failure to
    /// reserve a new chunk instead of aborting. On failure the arena is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::arena::TypedArena;
    /// use splay_map::Error;
    ///
    /// let mut arena: TypedArena<u64> = TypedArena::new(16);
    /// assert_eq!(arena.try_reserve(), Ok(()));
    ///
    /// let mut arena: TypedArena<u64> = TypedArena::new(usize::max_value());
    /// assert_eq!(arena.try_reserve(), Err(Error::AllocationFailed));
    /// ```
    pub fn try_reserve(&mut self) -> Result<()> {
        if self.is_full() {
            let mut chunk = Vec::new();
            chunk.try_reserve_exact(self.chunk_size)?;
            self.chunks.try_reserve(1)?;
            self.chunks.push(chunk);
        }
        Ok(())
    }

    /// Allocates an object in the typed arena, reporting a failure to reserve a new chunk instead
    /// of aborting. On failure the arena is left unchanged and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::arena::TypedArena;
    /// use splay_map::Error;
    ///
    /// let mut arena = TypedArena::new(16);
    /// assert!(arena.try_allocate(0u64).is_ok());
    ///
    /// let mut arena = TypedArena::new(usize::max_value());
    /// assert_eq!(arena.try_allocate(0u64), Err(Error::AllocationFailed));
    /// assert!(arena.is_empty());
    /// ```
    pub fn try_allocate(&mut self, value: T) -> Result<Handle> {
        self.try_reserve()?;
        Ok(self.push(value))
    }

    /// Returns an immutable reference to an object in the typed arena. Returns `None` if the
    /// handle does not correspond to a valid object.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn get(&self, handle: &Handle) -> Option<&T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        Some(&self.chunks[handle.chunk_index][handle.block_index])
    }

    /// Returns a mutable reference to an object in the typed arena. Returns `None` if the handle
    /// does not correspond to a valid object.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get_mut(&x), Some(&mut 0));
    /// ```
    pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        Some(&mut self.chunks[handle.chunk_index][handle.block_index])
    }

    /// Returns the number of objects stored in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every object in the arena and releases its chunks. All previously issued handles
    /// become invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// arena.clear();
    /// assert_eq!(arena.get(&x), None);
    /// assert!(arena.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.len = 0;
    }
}

impl<T> Clone for TypedArena<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let chunks = self
            .chunks
            .iter()
            .map(|chunk| {
                let mut new_chunk = Vec::with_capacity(self.chunk_size);
                new_chunk.extend(chunk.iter().cloned());
                new_chunk
            })
            .collect();
        TypedArena {
            chunks,
            chunk_size: self.chunk_size,
            len: self.len,
        }
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(&handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(&handle).expect("Error: handle out of bounds.")
    }
}
