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

//! Immutable per-frame constants (§3, §6).

use std::sync::Arc;

use ethereum_types::{Address, U256};
use parity_bytes::Bytes;

use crate::{action_value::ActionValue, block_header::BlockHeader, call_type::CallType,
            evm_config::EvmConfig, program::Program};

/// Read-only execution environment for a single call/create frame.
/// Constructed once when the frame is entered and never mutated; contrast
/// with `ProgramState`, the mutable record threaded through opcode
/// execution.
#[derive(Debug, Clone)]
pub struct ExecEnv {
    /// The address whose storage this frame mutates (equal to `caller` for
    /// CALLCODE/DELEGATECALL).
    pub owner: Address,
    /// Immediate caller: this frame's `msg.sender`.
    pub caller: Address,
    /// EOA that initiated the top-level call; constant across a whole
    /// transaction's call tree.
    pub origin: Address,
    /// Calldata.
    pub input_data: Arc<Bytes>,
    /// CALLVALUE.
    pub value: ActionValue,
    /// Code being executed, with its precomputed jump destinations.
    pub program: Arc<Program>,
    /// GASPRICE.
    pub gas_price: U256,
    /// Gas provided to this frame at entry.
    pub start_gas: U256,
    /// Block-scalar context.
    pub block_header: BlockHeader,
    /// Nesting depth of this frame (0 at the top level).
    pub call_depth: usize,
    /// How this frame was dispatched.
    pub call_type: CallType,
    /// True once this frame or any ancestor entered via STATICCALL;
    /// propagates down the whole subtree regardless of how descendants are
    /// themselves dispatched (§4.7).
    pub is_static: bool,
    /// Fork-gated gas schedule and feature flags.
    pub evm_config: Arc<EvmConfig>,
}
