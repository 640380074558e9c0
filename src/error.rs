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

//! Errors reported by rope operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Everything that can go wrong when editing or querying a rope.
///
/// A failed call never leaves a rope half edited: afterwards it holds exactly
/// the content it held before the call.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum RopeError {
    #[error("position {position} is out of range for rope of length {len}")]
    OutOfRange { position: usize, len: usize },

    #[error("invalid range {from}..{to}")]
    InvalidRange { from: usize, to: usize },

    #[error("cannot insert an empty byte string")]
    EmptyInsert,

    #[error("position {position} resolves before the start of rope of length {len}")]
    NegativePosition { position: isize, len: usize },

    #[error("destination holds {available} bytes but the rope needs {needed}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("failed to allocate leaf storage")]
    Alloc(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, RopeError>;
