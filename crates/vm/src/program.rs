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

//! Immutable code buffer with a precomputed set of valid jump destinations
//! (§4.4).

use std::sync::Arc;

use bit_set::BitSet;
use parity_bytes::Bytes;

const JUMPDEST: u8 = 0x5b;
const PUSH1: u8 = 0x60;
const PUSH32: u8 = 0x7f;

/// Executable contract code plus the set of offsets JUMP/JUMPI may legally
/// target.
#[derive(Debug, Clone)]
pub struct Program {
    code: Arc<Bytes>,
    valid_jump_destinations: Arc<BitSet>,
}

impl Program {
    /// Scans `code` once, computing `validJumpDests`: every offset `i` such
    /// that `code[i] == JUMPDEST` and `i` does not fall within the
    /// immediate-data window of a preceding PUSHn.
    pub fn new(code: Bytes) -> Self {
        let valid_jump_destinations = Self::scan_jump_destinations(&code);
        Program {
            code: Arc::new(code),
            valid_jump_destinations: Arc::new(valid_jump_destinations),
        }
    }

    fn scan_jump_destinations(code: &[u8]) -> BitSet {
        let mut jump_dests = BitSet::with_capacity(code.len());
        let mut position = 0;
        while position < code.len() {
            let instruction = code[position];
            if instruction == JUMPDEST {
                jump_dests.insert(position);
            } else if (PUSH1..=PUSH32).contains(&instruction) {
                position += (instruction - PUSH1 + 1) as usize;
            }
            position += 1;
        }
        jump_dests
    }

    /// The underlying code buffer.
    pub fn code(&self) -> &Arc<Bytes> {
        &self.code
    }

    /// Number of bytes in the code.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// True for a zero-length program (treated as an immediate STOP).
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// True if `position` is a valid JUMP/JUMPI target.
    pub fn is_valid_jump_destination(&self, position: usize) -> bool {
        position < self.code.len() && self.valid_jump_destinations.contains(position)
    }

    /// The precomputed jump destination set, shared across frames running
    /// the same code.
    pub fn valid_jump_destinations(&self) -> &Arc<BitSet> {
        &self.valid_jump_destinations
    }
}

#[cfg(test)]
mod tests {
    use super::Program;

    #[test]
    fn jumpdest_is_valid() {
        // JUMPDEST, STOP
        let program = Program::new(vec![0x5b, 0x00]);
        assert!(program.is_valid_jump_destination(0));
        assert!(!program.is_valid_jump_destination(1));
    }

    #[test]
    fn jumpdest_inside_push_window_is_invalid() {
        // PUSH2 0x5b 0x5b, STOP: both 0x5b bytes are push immediate data.
        let program = Program::new(vec![0x61, 0x5b, 0x5b, 0x00]);
        assert!(!program.is_valid_jump_destination(1));
        assert!(!program.is_valid_jump_destination(2));
    }

    #[test]
    fn out_of_range_is_invalid() {
        let program = Program::new(vec![0x00]);
        assert!(!program.is_valid_jump_destination(100));
    }
}
