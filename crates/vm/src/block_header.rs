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

//! Block-scalar context queried by BLOCKHASH/NUMBER/TIMESTAMP/DIFFICULTY/
//! GASLIMIT/COINBASE (§6).

use std::sync::Arc;

use ethereum_types::{Address, H256, U256};

/// The subset of block-header fields the interpreter may read. Supplied by
/// the host; the VM never validates or constructs one.
#[derive(Debug, Clone)]
pub struct BlockHeader {
    /// COINBASE.
    pub author: Address,
    /// TIMESTAMP.
    pub timestamp: u64,
    /// NUMBER.
    pub number: u64,
    /// DIFFICULTY.
    pub difficulty: U256,
    /// GASLIMIT.
    pub gas_limit: U256,
    /// Ancestor block hashes, indexed by distance from this block: index 0
    /// is the parent (`number - 1`), index 1 the grandparent, and so on, up
    /// to 256 entries. Used to resolve BLOCKHASH.
    pub last_hashes: Arc<Vec<H256>>,
}

impl BlockHeader {
    /// Resolves BLOCKHASH(number). Returns zero for out-of-window or
    /// future blocks, matching the Yellow Paper's BLOCKHASH semantics.
    pub fn blockhash(&self, number: U256) -> H256 {
        let current = U256::from(self.number);
        if number >= current {
            return H256::zero();
        }
        let distance = current - number;
        if distance > U256::from(256) {
            return H256::zero();
        }
        let index = distance.as_usize() - 1;
        self.last_hashes
            .get(index)
            .cloned()
            .unwrap_or_else(H256::zero)
    }
}
