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

//! Log entries emitted by LOG0..LOG4.

use ethereum_types::{Address, H256};
use parity_bytes::Bytes;

/// A single log entry, appended only; never mutated or removed within a
/// frame (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Address of the account that emitted the log.
    pub address: Address,
    /// Indexed topics, 0 to 4 of them.
    pub topics: Vec<H256>,
    /// Non-indexed data.
    pub data: Bytes,
}
