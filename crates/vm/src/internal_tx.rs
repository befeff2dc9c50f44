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

//! Trace-only record of a nested CALL/CREATE dispatch. Never consulted by
//! the interpreter; purely a carry-through field gated by
//! `EvmConfig::trace_internal_transactions`.

use ethereum_types::{Address, U256};

/// Which family of dispatch produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalTransactionKind {
    /// CALL, CALLCODE, DELEGATECALL or STATICCALL.
    Call,
    /// CREATE or CREATE2.
    Create,
}

/// Metadata record for tracing; does not affect consensus (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalTransaction {
    /// Call or create.
    pub kind: InternalTransactionKind,
    /// Frame that initiated the dispatch.
    pub from: Address,
    /// Destination address. `None` for CREATE/CREATE2 before the new
    /// address is derived.
    pub to: Option<Address>,
    /// Value carried by the dispatch.
    pub value: U256,
    /// Gas stipend forwarded.
    pub gas_limit: U256,
}
