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

//! Byte-addressable, zero-extending memory with word-aligned expansion
//! cost (§4.2).

use ethereum_types::U256;
use vm::ReturnData;

const WORD_SIZE: usize = 32;

/// Rounds `size` up to the next multiple of 32.
fn to_word_size(size: usize) -> usize {
    (size + WORD_SIZE - 1) / WORD_SIZE
}

/// The memory region accessed by an opcode, already checked to fit in a
/// `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRange {
    pub offset: usize,
    pub size: usize,
}

impl MemoryRange {
    /// Word count `a` required to hold this range, per the quadratic
    /// memory-cost formula in §3.
    pub fn words(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            to_word_size(self.offset + self.size)
        }
    }
}

/// Expanding byte buffer; a read or write past the current length first
/// zero-extends to the next word boundary.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    mem: Vec<u8>,
}

impl Memory {
    /// Empty memory.
    pub fn new() -> Self {
        Memory { mem: Vec::new() }
    }

    /// Current size in bytes (always a multiple of 32).
    pub fn size(&self) -> usize {
        self.mem.len()
    }

    /// Word count `C_mem`'s `a` is evaluated against, given the buffer's
    /// current byte length.
    pub fn word_count(&self) -> usize {
        self.mem.len() / WORD_SIZE
    }

    /// Expands the buffer (zero-filled) so it can hold `range`. A
    /// size-zero range never expands memory (§4.2). Callers charge gas for
    /// the expansion *before* calling this.
    pub fn expand(&mut self, range: MemoryRange) {
        if range.size == 0 {
            return;
        }
        let new_len = to_word_size(range.offset + range.size) * WORD_SIZE;
        if new_len > self.mem.len() {
            self.mem.resize(new_len, 0);
        }
    }

    /// Reads 32 bytes as a `U256` (MLOAD). Caller must have expanded
    /// memory first.
    pub fn read(&self, offset: usize) -> U256 {
        U256::from_big_endian(&self.mem[offset..offset + WORD_SIZE])
    }

    /// Writes a `U256` as 32 big-endian bytes (MSTORE).
    pub fn write(&mut self, offset: usize, value: U256) {
        let mut bytes = [0u8; WORD_SIZE];
        value.to_big_endian(&mut bytes);
        self.mem[offset..offset + WORD_SIZE].copy_from_slice(&bytes);
    }

    /// Writes a single byte (MSTORE8).
    pub fn write_byte(&mut self, offset: usize, value: u8) {
        self.mem[offset] = value;
    }

    /// Reads an arbitrary-length slice, for CODECOPY/CALLDATACOPY/etc.
    pub fn read_slice(&self, offset: usize, size: usize) -> &[u8] {
        &self.mem[offset..offset + size]
    }

    /// Mutable view for copy-in opcodes (CALLDATACOPY, CODECOPY, ...).
    pub fn writeable_slice(&mut self, offset: usize, size: usize) -> &mut [u8] {
        &mut self.mem[offset..offset + size]
    }

    /// Writes `data` into memory at `offset`, zero-filling any portion of
    /// `size` beyond `data`'s length (out-of-bounds copy source reads as
    /// zero, per CALLDATACOPY/CODECOPY/EXTCODECOPY semantics).
    pub fn write_padded(&mut self, offset: usize, size: usize, data: &[u8], data_offset: usize) {
        let target = self.writeable_slice(offset, size);
        for (i, byte) in target.iter_mut().enumerate() {
            let src_index = data_offset.saturating_add(i);
            *byte = data.get(src_index).copied().unwrap_or(0);
        }
    }

    /// Converts `mem[offset..offset + size]` into owned `ReturnData` for
    /// RETURN/REVERT.
    pub fn into_return_data(self, offset: usize, size: usize) -> ReturnData {
        ReturnData::new(self.mem, offset, size)
    }
}

#[cfg(test)]
mod tests {
    use super::{to_word_size, Memory, MemoryRange};
    use ethereum_types::U256;

    #[test]
    fn zero_size_never_expands() {
        let mut mem = Memory::new();
        mem.expand(MemoryRange {
            offset: 1000,
            size: 0,
        });
        assert_eq!(mem.size(), 0);
    }

    #[test]
    fn expand_rounds_to_word() {
        let mut mem = Memory::new();
        mem.expand(MemoryRange { offset: 0, size: 1 });
        assert_eq!(mem.size(), 32);
    }

    #[test]
    fn read_of_untouched_region_is_zero() {
        let mut mem = Memory::new();
        mem.expand(MemoryRange {
            offset: 0,
            size: 32,
        });
        assert_eq!(mem.read(0), U256::zero());
    }

    #[test]
    fn word_size_rounding() {
        assert_eq!(to_word_size(0), 0);
        assert_eq!(to_word_size(1), 1);
        assert_eq!(to_word_size(32), 1);
        assert_eq!(to_word_size(33), 2);
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut mem = Memory::new();
        mem.expand(MemoryRange {
            offset: 0,
            size: 32,
        });
        mem.write(0, U256::from(23));
        assert_eq!(mem.read(0), U256::from(23));
    }
}
