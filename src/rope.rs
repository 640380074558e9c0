// Copyright 2016 The xi-editor Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A rope of bytes, edited by splitting and concatenating trees.

use std::fmt;
use std::mem;
use std::ops::{Add, ControlFlow, Range};

use tracing::trace;

use crate::cursor::{Bytes, Chunks};
use crate::error::{Result, RopeError};
use crate::tree::{Node, TreeDisplay};

/// A mutable byte string stored as a binary tree of buffers.
///
/// Editing a rope costs time proportional to the depth of the tree rather
/// than to the length of the text: an insertion splits the tree once and
/// splices a new leaf in, a deletion splits it twice and drops the middle.
/// Positions are byte offsets; there is no notion of characters or lines
/// beyond counting bytes.
///
/// The tree is not rebalanced after edits. Long edit sessions can leave it
/// deep; [`compact`](Rope::compact) collapses it back into a single leaf.
///
/// # Examples
///
/// ```
/// use byte_rope::Rope;
///
/// let mut rope = Rope::from("olamundo");
/// rope.insert(0, b"H").unwrap();
/// assert_eq!(rope.flatten().unwrap(), b"Holamundo");
/// ```
#[derive(Clone, Default)]
pub struct Rope {
    root: Node,
}

impl Rope {
    /// An empty rope. Nothing is allocated.
    pub fn new() -> Rope {
        Rope::default()
    }

    /// A rope holding a copy of `bytes`, reporting allocation failure
    /// instead of aborting.
    pub fn from_bytes(bytes: &[u8]) -> Result<Rope> {
        Ok(Rope {
            root: Node::from_bytes(bytes)?,
        })
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth of the underlying tree. A freshly created rope has depth 0.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Returns the byte at `position`.
    pub fn byte_at(&self, position: usize) -> Result<u8> {
        if position >= self.len() {
            return Err(RopeError::OutOfRange {
                position,
                len: self.len(),
            });
        }
        Ok(self.root.byte_at(position))
    }

    /// Iterate over the leaf buffers, left to right.
    ///
    /// Empty leaves are yielded too. Each call starts a fresh traversal.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(&self.root)
    }

    pub fn bytes(&self) -> Bytes<'_> {
        Bytes::new(&self.root)
    }

    /// Call `visit` once for every leaf buffer, left to right.
    pub fn for_each_chunk<F>(&self, mut visit: F)
    where
        F: FnMut(&[u8]),
    {
        for chunk in self.chunks() {
            visit(chunk);
        }
    }

    /// Like [`for_each_chunk`](Rope::for_each_chunk), but `visit` may stop
    /// the traversal early by returning [`ControlFlow::Break`].
    pub fn try_for_each_chunk<B, F>(&self, mut visit: F) -> ControlFlow<B>
    where
        F: FnMut(&[u8]) -> ControlFlow<B>,
    {
        for chunk in self.chunks() {
            if let ControlFlow::Break(b) = visit(chunk) {
                return ControlFlow::Break(b);
            }
        }
        ControlFlow::Continue(())
    }

    /// Join two ropes. Both are consumed and no bytes are copied.
    pub fn concat(mut self, mut other: Rope) -> Rope {
        let left = mem::take(&mut self.root);
        let right = mem::take(&mut other.root);
        let root = Node::concat(left, right);
        trace!(len = root.len(), "concat");
        Rope { root }
    }

    /// Split the rope in two at `at`.
    ///
    /// `self` keeps the bytes before `at`; the bytes from `at` onwards are
    /// returned as a new rope. Rejoining the halves with
    /// [`concat`](Rope::concat) restores the original content.
    pub fn split_off(&mut self, at: usize) -> Result<Rope> {
        self.check_position(at)?;
        let tail = self.root.split_off(at)?;
        trace!(at, tail = tail.len(), "split");
        debug_assert!(self.root.check_invariants());
        Ok(Rope { root: tail })
    }

    /// Consuming form of [`split_off`](Rope::split_off).
    pub fn split(mut self, at: usize) -> Result<(Rope, Rope)> {
        let tail = self.split_off(at)?;
        Ok((self, tail))
    }

    /// Insert `data` so that it starts at `position`.
    ///
    /// Empty `data` is rejected with [`RopeError::EmptyInsert`].
    pub fn insert(&mut self, position: usize, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(RopeError::EmptyInsert);
        }
        self.check_position(position)?;
        let leaf = Node::from_bytes(data)?;
        self.splice(position, position, Some(leaf))?;
        trace!(position, inserted = data.len(), len = self.len(), "insert");
        Ok(())
    }

    /// Remove the bytes in `[from, to)`.
    pub fn delete(&mut self, from: usize, to: usize) -> Result<()> {
        if to <= from {
            return Err(RopeError::InvalidRange { from, to });
        }
        self.check_position(to)?;
        self.splice(from, to, None)?;
        trace!(from, to, len = self.len(), "delete");
        Ok(())
    }

    /// Replace the bytes in `range` with `data`. Either side may be empty.
    pub fn edit(&mut self, range: Range<usize>, data: &[u8]) -> Result<()> {
        let Range { start, end } = range;
        self.check_range(start, end)?;
        if start == end && data.is_empty() {
            return Ok(());
        }
        let insertion = if data.is_empty() {
            None
        } else {
            Some(Node::from_bytes(data)?)
        };
        self.splice(start, end, insertion)?;
        trace!(start, end, inserted = data.len(), len = self.len(), "edit");
        Ok(())
    }

    /// Resolve a signed position to an absolute one.
    ///
    /// Non-negative positions are returned unchanged and are not bounds
    /// checked. A negative position `p` counts from the end and resolves to
    /// `len + p + 1`, so `-1` is the position just past the last byte, the
    /// place where an append goes. Use
    /// [`normalize_index`](Rope::normalize_index) when `-1` should name the
    /// last byte instead.
    pub fn normalize(&self, position: isize) -> Result<usize> {
        if position >= 0 {
            return Ok(position as usize);
        }
        self.len()
            .checked_sub(position.unsigned_abs() - 1)
            .ok_or(RopeError::NegativePosition {
                position,
                len: self.len(),
            })
    }

    /// Resolve a signed byte index: `-1` is the last byte, `-len` the first.
    pub fn normalize_index(&self, position: isize) -> Result<usize> {
        if position >= 0 {
            return Ok(position as usize);
        }
        self.len()
            .checked_sub(position.unsigned_abs())
            .ok_or(RopeError::NegativePosition {
                position,
                len: self.len(),
            })
    }

    /// Copy the whole content into one newly allocated buffer.
    pub fn flatten(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.len())?;
        for chunk in self.chunks() {
            out.extend_from_slice(chunk);
        }
        Ok(out)
    }

    /// Copy the whole content to the front of `dst`, returning the number of
    /// bytes written.
    pub fn copy_to(&self, dst: &mut [u8]) -> Result<usize> {
        let needed = self.len();
        if dst.len() < needed {
            return Err(RopeError::BufferTooSmall {
                needed,
                available: dst.len(),
            });
        }
        let mut written = 0;
        for chunk in self.chunks() {
            dst[written..written + chunk.len()].copy_from_slice(chunk);
            written += chunk.len();
        }
        Ok(written)
    }

    /// Copy the bytes in `range` out of the rope.
    pub fn slice(&self, range: Range<usize>) -> Result<Vec<u8>> {
        let Range { start, end } = range;
        self.check_range(start, end)?;
        let wanted = end - start;
        let mut out = Vec::new();
        out.try_reserve_exact(wanted)?;
        let (chunks, mut skip) = Chunks::at(&self.root, start);
        for chunk in chunks {
            if out.len() == wanted {
                break;
            }
            let chunk = &chunk[skip..];
            skip = 0;
            let take = chunk.len().min(wanted - out.len());
            out.extend_from_slice(&chunk[..take]);
        }
        Ok(out)
    }

    /// Offset of the first occurrence of `needle`.
    pub fn find_byte(&self, needle: u8) -> Option<usize> {
        let mut offset = 0;
        for chunk in self.chunks() {
            if let Some(i) = memchr::memchr(needle, chunk) {
                return Some(offset + i);
            }
            offset += chunk.len();
        }
        None
    }

    /// Offsets of every occurrence of `needle`, in increasing order.
    pub fn positions_of(&self, needle: u8) -> Vec<usize> {
        let mut positions = Vec::new();
        let mut offset = 0;
        for chunk in self.chunks() {
            let base = offset;
            positions.extend(memchr::memchr_iter(needle, chunk).map(move |i| base + i));
            offset += chunk.len();
        }
        positions
    }

    pub fn count_byte(&self, needle: u8) -> usize {
        self.chunks()
            .map(|chunk| bytecount::count(chunk, needle))
            .sum()
    }

    /// Number of `\n` bytes in the rope.
    pub fn line_count(&self) -> usize {
        self.count_byte(b'\n')
    }

    /// Collapse the tree into a single leaf.
    pub fn compact(&mut self) -> Result<()> {
        if self.root.is_leaf() {
            return Ok(());
        }
        let depth = self.depth();
        let data = self.flatten()?;
        mem::replace(&mut self.root, Node::Leaf(data)).dismantle();
        trace!(depth, len = self.len(), "compact");
        Ok(())
    }

    /// A `Display` value showing the structure of the tree.
    pub fn tree(&self) -> TreeDisplay<'_> {
        TreeDisplay { root: &self.root }
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position > self.len() {
            return Err(RopeError::OutOfRange {
                position,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn check_range(&self, from: usize, to: usize) -> Result<()> {
        if from > to {
            return Err(RopeError::InvalidRange { from, to });
        }
        self.check_position(to)
    }

    /// Replace `[start, end)` with `insertion`, or just remove it.
    ///
    /// Bounds are checked by the caller.
    fn splice(&mut self, start: usize, end: usize, insertion: Option<Node>) -> Result<()> {
        let mut tail = self.root.split_off(start)?;
        if end > start {
            let rest = match tail.split_off(end - start) {
                Ok(rest) => rest,
                Err(err) => {
                    // Only reachable when copying a leaf tail fails to
                    // allocate. Put the first cut back together so the
                    // content is unchanged; the shape keeps the extra node.
                    let head = mem::take(&mut self.root);
                    self.root = Node::concat(head, tail);
                    return Err(err);
                }
            };
            mem::replace(&mut tail, rest).dismantle();
        }
        let tail = match insertion {
            Some(leaf) => Node::concat(leaf, tail),
            None => tail,
        };
        let head = mem::take(&mut self.root);
        self.root = Node::concat(head, tail);
        debug_assert!(self.root.check_invariants());
        Ok(())
    }
}

impl Drop for Rope {
    fn drop(&mut self) {
        mem::take(&mut self.root).dismantle();
    }
}

impl Add for Rope {
    type Output = Rope;

    fn add(self, rhs: Rope) -> Rope {
        self.concat(rhs)
    }
}

impl PartialEq for Rope {
    fn eq(&self, other: &Rope) -> bool {
        self.len() == other.len() && self.bytes().eq(other.bytes())
    }
}

impl Eq for Rope {}

// Show the content, not the tree; `tree()` is there for the structure.
impl fmt::Debug for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for chunk in self.chunks() {
            write!(f, "{}", chunk.escape_ascii())?;
        }
        f.write_str("\"")
    }
}

impl From<&str> for Rope {
    fn from(s: &str) -> Rope {
        Rope::from(s.as_bytes())
    }
}

impl From<&[u8]> for Rope {
    fn from(bytes: &[u8]) -> Rope {
        Rope {
            root: Node::Leaf(bytes.to_vec()),
        }
    }
}

impl From<String> for Rope {
    fn from(s: String) -> Rope {
        Rope::from(s.into_bytes())
    }
}

impl From<Vec<u8>> for Rope {
    fn from(data: Vec<u8>) -> Rope {
        Rope {
            root: Node::Leaf(data),
        }
    }
}
