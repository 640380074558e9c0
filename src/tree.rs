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

//! A binary tree of byte buffers, the storage behind [`Rope`](crate::Rope).

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::error::Result;

/// A rope node.
///
/// Leaves own a contiguous byte buffer. Internal nodes own exactly two
/// children and cache the length of their left subtree as well as their
/// own total length. Each node is owned by exactly one parent; there is no
/// sharing between trees.
///
/// The tree is never rebalanced, so its depth depends entirely on the
/// sequence of edits that produced it.
pub(crate) enum Node {
    Leaf(Vec<u8>),
    Internal {
        /// Total length of `left`.
        left_len: usize,
        /// Total length of this subtree, `left_len + right.len()`.
        len: usize,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// An empty leaf. No storage is allocated.
    pub(crate) fn empty() -> Node {
        Node::Leaf(Vec::new())
    }

    /// A leaf holding a copy of `bytes`.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Node> {
        Ok(Node::Leaf(copy_bytes(bytes)?))
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Node::Leaf(data) => data.len(),
            Node::Internal { len, .. } => *len,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Number of edges on the longest path from this node to a leaf.
    pub(crate) fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Node::Internal { left, right, .. } = node {
                stack.push((&**left, depth + 1));
                stack.push((&**right, depth + 1));
            }
        }
        deepest
    }

    /// The byte at `pos`.
    ///
    /// Precondition: `pos < self.len()`. Callers check the bound.
    pub(crate) fn byte_at(&self, mut pos: usize) -> u8 {
        debug_assert!(pos < self.len());
        let mut node = self;
        loop {
            match node {
                Node::Leaf(data) => return data[pos],
                Node::Internal { left_len, left, right, .. } => {
                    if pos < *left_len {
                        node = &**left;
                    } else {
                        pos -= *left_len;
                        node = &**right;
                    }
                }
            }
        }
    }

    /// Join two trees under a new internal node. No bytes are copied.
    pub(crate) fn concat(left: Node, right: Node) -> Node {
        let left_len = left.len();
        let len = left_len + right.len();
        Node::Internal {
            left_len,
            len,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Split the tree at `at`.
    ///
    /// On return `self` holds the bytes `[0, at)` and the returned tree holds
    /// `[at, len)`. The only fallible step is copying the tail of a leaf,
    /// which happens before anything is modified, so an error leaves the
    /// tree as it was.
    ///
    /// Both passes walk down the tree in a loop, so the depth of the tree is
    /// not limited by the call stack.
    ///
    /// Precondition: `at <= self.len()`. Callers check the bound.
    pub(crate) fn split_off(&mut self, at: usize) -> Result<Node> {
        debug_assert!(at <= self.len());
        let leaf_tail = self.copy_leaf_tail(at)?;

        // Right subtrees cut loose on the way down, outermost first. They
        // belong after everything found below them.
        let mut detached = Vec::new();
        let mut at = at;
        let mut node = self;
        let mut tail = loop {
            let current = node;
            match current {
                Node::Leaf(data) => match leaf_tail {
                    Some(bytes) => {
                        data.truncate(at);
                        break Node::Leaf(bytes);
                    }
                    None => break Node::empty(),
                },
                Node::Internal {
                    left_len,
                    len,
                    left,
                    right,
                } => {
                    let pivot = *left_len;
                    *len = at;
                    match at.cmp(&pivot) {
                        Ordering::Greater => {
                            at -= pivot;
                            node = &mut **right;
                        }
                        Ordering::Equal => break mem::take(&mut **right),
                        Ordering::Less => {
                            // Everything after `at` in the left subtree has
                            // to travel together with the whole right subtree.
                            detached.push(mem::take(&mut **right));
                            *left_len = at;
                            node = &mut **left;
                        }
                    }
                }
            }
        };
        while let Some(right) = detached.pop() {
            tail = Node::concat(tail, right);
        }
        Ok(tail)
    }

    /// Copy the bytes after `at` out of the leaf a split at `at` would cut.
    ///
    /// Returns `None` when the split falls on a leaf or subtree boundary and
    /// no bytes need copying.
    fn copy_leaf_tail(&self, mut at: usize) -> Result<Option<Vec<u8>>> {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(data) => {
                    if at == data.len() {
                        return Ok(None);
                    }
                    return copy_bytes(&data[at..]).map(Some);
                }
                Node::Internal {
                    left_len,
                    left,
                    right,
                    ..
                } => match at.cmp(left_len) {
                    Ordering::Greater => {
                        at -= *left_len;
                        node = &**right;
                    }
                    Ordering::Equal => return Ok(None),
                    Ordering::Less => node = &**left,
                },
            }
        }
    }

    /// Verify the cached lengths of every internal node.
    pub(crate) fn check_invariants(&self) -> bool {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Node::Internal {
                left_len,
                len,
                left,
                right,
            } = node
            {
                if *left_len != left.len() || *len != *left_len + right.len() {
                    return false;
                }
                stack.push(&**left);
                stack.push(&**right);
            }
        }
        true
    }

    /// Release the tree without recursing, so arbitrarily deep trees can be
    /// freed on a small stack.
    pub(crate) fn dismantle(self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Node::Internal { left, right, .. } = node {
                stack.push(*left);
                stack.push(*right);
            }
        }
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self, 0)];
        while let Some((node, indent)) = stack.pop() {
            let indent_str = "  ".repeat(indent);
            match node {
                Node::Leaf(data) => writeln!(
                    f,
                    "{}Leaf len={} \"{}\"",
                    indent_str,
                    data.len(),
                    data.escape_ascii()
                )?,
                Node::Internal {
                    left_len,
                    len,
                    left,
                    right,
                } => {
                    writeln!(f, "{}Internal len={} left_len={}", indent_str, len, left_len)?;
                    stack.push((&**right, indent + 1));
                    stack.push((&**left, indent + 1));
                }
            }
        }
        Ok(())
    }
}

// Written out by hand so that cloning, like dropping, never recurses.
impl Clone for Node {
    fn clone(&self) -> Node {
        enum Step<'a> {
            Visit(&'a Node),
            Join { left_len: usize, len: usize },
        }

        let mut steps = vec![Step::Visit(self)];
        let mut built: Vec<Node> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Node::Leaf(data)) => built.push(Node::Leaf(data.clone())),
                Step::Visit(Node::Internal {
                    left_len,
                    len,
                    left,
                    right,
                }) => {
                    steps.push(Step::Join {
                        left_len: *left_len,
                        len: *len,
                    });
                    steps.push(Step::Visit(&**right));
                    steps.push(Step::Visit(&**left));
                }
                Step::Join { left_len, len } => {
                    let right = built.pop().expect("inconsistent, shouldn't get here");
                    let left = built.pop().expect("inconsistent, shouldn't get here");
                    built.push(Node::Internal {
                        left_len,
                        len,
                        left: Box::new(left),
                        right: Box::new(right),
                    });
                }
            }
        }
        built.pop().expect("inconsistent, shouldn't get here")
    }
}

impl Default for Node {
    fn default() -> Node {
        Node::empty()
    }
}

/// Renders the shape of a rope, one node per line, leaves with their bytes.
///
/// Returned by [`Rope::tree`](crate::Rope::tree).
pub struct TreeDisplay<'a> {
    pub(crate) root: &'a Node,
}

impl<'a> fmt::Display for TreeDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_tree(f)
    }
}

fn copy_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    #[cfg(test)]
    if fault::copy_fails() {
        // Asking for more than isize::MAX bytes always fails.
        data.try_reserve_exact(usize::MAX)?;
    }
    data.try_reserve_exact(bytes.len())?;
    data.extend_from_slice(bytes);
    Ok(data)
}
