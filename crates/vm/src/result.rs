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

//! Frame-exit result types (§6).

use std::collections::HashSet;

use ethereum_types::{Address, H256, U256};

use crate::{error::Error, internal_tx::InternalTransaction, log_entry::LogEntry,
            return_data::ReturnData};

/// How a CREATE/CREATE2 derives the new contract's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateContractAddress {
    /// CREATE: `keccak256(rlp([creator, nonce - 1]))`.
    FromSenderAndNonce,
    /// CREATE2: `keccak256(0xff ++ creator ++ salt ++ keccak256(initCode))`.
    FromSenderSaltAndCodeHash(H256),
}

/// Either a plain gas amount, or the gas/offset/size triple a RETURN/REVERT
/// needs resolved against the executing frame's own memory before it can
/// be turned into a `ReturnData`.
#[derive(Debug, Clone)]
pub enum GasLeft {
    /// Frame halted without producing return data (STOP, or a completed
    /// sub-call already folded in).
    Known(U256),
    /// Frame halted via RETURN/REVERT; `data` is the memory slice the
    /// instruction named, `apply_state` distinguishes RETURN (true) from
    /// REVERT (false).
    NeedsReturn {
        /// Gas remaining after charging for the halting instruction.
        gas_left: U256,
        /// Memory region named by RETURN/REVERT.
        data: ReturnData,
        /// Whether this frame's state changes should be kept.
        apply_state: bool,
    },
}

/// Outcome of a CALL-family dispatch, as observed by the calling frame
/// (§4.7 step 7).
#[derive(Debug, Clone)]
pub enum MessageCallResult {
    /// Sub-frame halted successfully (STOP/RETURN).
    Success(U256, ReturnData),
    /// Sub-frame halted via REVERT.
    Reverted(U256, ReturnData),
    /// Sub-frame errored, or the pre-flight check (depth/balance) failed.
    /// All gas offered to the sub-call is consumed in the error case; none
    /// is consumed in the pre-flight-rejection case.
    Failed,
}

/// Outcome of a CREATE/CREATE2 dispatch (§4.8).
#[derive(Debug, Clone)]
pub enum ContractCreateResult {
    /// Init code ran to completion and code deposit succeeded (or was
    /// waived pre-Homestead).
    Created(Address, U256),
    /// Init code halted via REVERT.
    Reverted(U256, ReturnData),
    /// Init code errored, the pre-flight check failed, or code deposit was
    /// rejected under `exceptionalFailedCodeDeposit`.
    Failed,
}

/// Full record produced at frame exit, merged into the caller's frame or,
/// at depth 0, returned to the transaction processor.
#[derive(Debug, Clone)]
pub struct ProgramResult<W> {
    /// Data returned by RETURN/REVERT, or empty for STOP/error.
    pub return_data: ReturnData,
    /// Gas left over after this frame's (and all its children's) execution.
    pub gas_remaining: U256,
    /// World state as of frame exit. Callers replace their own world with
    /// this one only when the frame did not error.
    pub world: W,
    /// Addresses scheduled for deletion via SELFDESTRUCT, materialized by
    /// the host at end-of-transaction.
    pub addresses_to_delete: HashSet<Address>,
    /// Logs emitted by LOG0..LOG4, in execution order.
    pub logs: Vec<LogEntry>,
    /// Trace-only nested CALL/CREATE records.
    pub internal_txs: Vec<InternalTransaction>,
    /// Accumulated SSTORE-clear and SELFDESTRUCT refund, pre-cap.
    pub gas_refund: U256,
    /// Set iff the frame halted with an error (including REVERT).
    pub error: Option<Error>,
}
