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

//! A rope for large mutable byte strings.
//!
//! The rope is a binary tree: leaves hold byte buffers, internal nodes hold
//! two children and the length of the left one. Everything is built from two
//! primitives, splitting a tree at an offset and concatenating two trees, so
//! an edit touches one path of the tree instead of copying the whole text.
//!
//! Ropes are single-owner values. Operations that absorb a rope into another
//! one, like [`Rope::concat`], take it by value, so a rope that has been
//! joined into another cannot be used again.

mod cursor;
mod error;
mod rope;
mod tree;

pub use crate::cursor::{Bytes, Chunks};
pub use crate::error::{Result, RopeError};
pub use crate::rope::Rope;
pub use crate::tree::TreeDisplay;
