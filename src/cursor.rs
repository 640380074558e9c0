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

//! Left-to-right traversal of the leaves of a tree.

use std::iter::FusedIterator;
use std::slice;

use crate::tree::Node;

/// An iterator over the leaf buffers of a rope, in order.
///
/// Every leaf is yielded exactly once, including empty ones left behind by
/// splits. Concatenating the yielded slices gives the content of the rope.
///
/// The traversal keeps its own stack of pending subtrees rather than
/// recursing, so it works on trees of any depth.
#[derive(Clone)]
pub struct Chunks<'a> {
    /// Subtrees still to visit; the next one is on top.
    stack: Vec<&'a Node>,
}

impl<'a> Chunks<'a> {
    pub(crate) fn new(root: &'a Node) -> Chunks<'a> {
        Chunks { stack: vec![root] }
    }

    /// Start at the leaf containing `position`.
    ///
    /// Returns the iterator together with the offset of `position` inside the
    /// first leaf it yields. A position equal to the length of the tree lands
    /// at the end of the last leaf.
    pub(crate) fn at(root: &'a Node, mut position: usize) -> (Chunks<'a>, usize) {
        let mut stack = Vec::new();
        let mut node = root;
        loop {
            match node {
                Node::Leaf(_) => {
                    stack.push(node);
                    return (Chunks { stack }, position);
                }
                Node::Internal {
                    left_len,
                    left,
                    right,
                    ..
                } => {
                    if position < *left_len {
                        stack.push(&**right);
                        node = &**left;
                    } else {
                        position -= *left_len;
                        node = &**right;
                    }
                }
            }
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Leaf(data) => return Some(data.as_slice()),
                Node::Internal { left, right, .. } => {
                    self.stack.push(&**right);
                    self.stack.push(&**left);
                }
            }
        }
        None
    }
}

impl<'a> FusedIterator for Chunks<'a> {}

/// An iterator over every byte of a rope.
#[derive(Clone)]
pub struct Bytes<'a> {
    chunks: Chunks<'a>,
    current: slice::Iter<'a, u8>,
}

impl<'a> Bytes<'a> {
    pub(crate) fn new(root: &'a Node) -> Bytes<'a> {
        Bytes {
            chunks: Chunks::new(root),
            current: (&[] as &[u8]).iter(),
        }
    }
}

impl<'a> Iterator for Bytes<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            if let Some(&b) = self.current.next() {
                return Some(b);
            }
            self.current = self.chunks.next()?.iter();
        }
    }
}

impl<'a> FusedIterator for Bytes<'a> {}

#[cfg(test)]
mod test {
    use super::*;

    fn leaf(s: &str) -> Node {
        Node::from_bytes(s.as_bytes()).unwrap()
    }

    fn sample() -> Node {
        // ((he | llo) | (" " | (wor | ld)))
        Node::concat(
            Node::concat(leaf("he"), leaf("llo")),
            Node::concat(leaf(" "), Node::concat(leaf("wor"), leaf("ld"))),
        )
    }

    #[test]
    fn chunks_in_order() {
        let root = sample();
        let chunks: Vec<&[u8]> = Chunks::new(&root).collect();
        let expected = vec![&b"he"[..], &b"llo"[..], &b" "[..], &b"wor"[..], &b"ld"[..]];
        assert_eq!(chunks, expected);
    }

    #[test]
    fn chunks_restart() {
        let root = sample();
        let first: Vec<&[u8]> = Chunks::new(&root).collect();
        let second: Vec<&[u8]> = Chunks::new(&root).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn chunks_include_empty_leaves() {
        let root = Node::concat(Node::empty(), leaf("a"));
        assert_eq!(Chunks::new(&root).count(), 2);
    }

    #[test]
    fn chunks_at_position() {
        let root = sample();
        let (mut chunks, offset) = Chunks::at(&root, 6);
        assert_eq!(chunks.next(), Some(&b"wor"[..]));
        assert_eq!(offset, 0);
        assert_eq!(chunks.next(), Some(&b"ld"[..]));
        assert_eq!(chunks.next(), None);

        let (mut chunks, offset) = Chunks::at(&root, 3);
        assert_eq!(chunks.next(), Some(&b"llo"[..]));
        assert_eq!(offset, 1);

        let (mut chunks, offset) = Chunks::at(&root, 11);
        assert_eq!(chunks.next(), Some(&b"ld"[..]));
        assert_eq!(offset, 2);
        assert_eq!(chunks.next(), None);
    }

    #[test]
    fn bytes_flatten() {
        let root = sample();
        let bytes: Vec<u8> = Bytes::new(&root).collect();
        assert_eq!(bytes, b"hello world");
        assert_eq!(Bytes::new(&Node::empty()).next(), None);
    }
}
