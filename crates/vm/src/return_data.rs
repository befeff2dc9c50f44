// Copyright 2015-2020 Parity Technologies (UK) Ltd.
// This file is part of OpenEthereum.

// OpenEthereum is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// OpenEthereum is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with OpenEthereum.  If not, see <http://www.gnu.org/licenses/>.

//! Return data buffer, as read by RETURNDATACOPY/RETURNDATASIZE.

use std::ops::Deref;

use parity_bytes::Bytes;

/// Data returned by the most recently completed sub-call or by this frame's
/// own halt (RETURN/REVERT/STOP).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnData {
    mem: Bytes,
    offset: usize,
    size: usize,
}

impl ReturnData {
    /// Empty return data, as produced by STOP or a precompile/callee that
    /// wrote nothing.
    pub fn empty() -> Self {
        ReturnData {
            mem: Vec::new(),
            offset: 0,
            size: 0,
        }
    }

    /// View of `mem[offset..offset + size]`.
    pub fn new(mem: Bytes, offset: usize, size: usize) -> Self {
        ReturnData { mem, offset, size }
    }
}

impl Deref for ReturnData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.mem[self.offset..self.offset + self.size]
    }
}
