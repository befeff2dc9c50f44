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

//! Virtual Machine (VM) support library: the error taxonomy, gas schedule,
//! execution environment, program representation, world-state interface
//! and frame-exit result types consumed by the `evm` interpreter. No
//! opcode logic lives here.

mod action_value;
mod block_header;
mod call_type;
mod error;
mod evm_config;
mod exec_env;
mod internal_tx;
mod log_entry;
mod precompile;
mod program;
mod result;
mod return_data;
mod schedule;
mod world_state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::{
    action_value::ActionValue,
    block_header::BlockHeader,
    call_type::CallType,
    error::{Error, Result},
    evm_config::EvmConfig,
    exec_env::ExecEnv,
    internal_tx::{InternalTransaction, InternalTransactionKind},
    log_entry::LogEntry,
    precompile::{NoPrecompiles, PrecompileResult, PrecompileSet},
    program::Program,
    result::{ContractCreateResult, CreateContractAddress, GasLeft, MessageCallResult,
             ProgramResult},
    return_data::ReturnData,
    schedule::Schedule,
    world_state::{Account, WorldState},
};
