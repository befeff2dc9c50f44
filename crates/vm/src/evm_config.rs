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

//! Recognized-options record (§6 `EvmConfig`): the fee schedule plus the
//! fork-gated toggles the interpreter consults outside of gas arithmetic.

use crate::schedule::Schedule;

/// Config handed to the interpreter for a single call/create frame. Wraps
/// the fork's [`Schedule`] (which already carries `opCodes`-equivalent
/// `have_*` flags and `chargeSelfDestructForNewAccount`-equivalent
/// `no_empty`/`kill_empty` flags) with the two options the schedule itself
/// doesn't model.
#[derive(Debug, Clone)]
pub struct EvmConfig {
    /// Per-fork gas constants, refund rules and opcode availability.
    pub schedule: Schedule,
    /// Accumulate `InternalTransaction` trace records for every CALL-family
    /// dispatch and CREATE. Never read by the interpreter itself.
    pub trace_internal_transactions: bool,
}

impl EvmConfig {
    /// Wraps a schedule with tracing disabled.
    pub fn new(schedule: Schedule) -> Self {
        EvmConfig {
            schedule,
            trace_internal_transactions: false,
        }
    }
}

impl Default for EvmConfig {
    fn default() -> Self {
        EvmConfig::new(Schedule::default())
    }
}
