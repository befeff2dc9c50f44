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

//! Value a call frame carries: either an actual transfer, or the apparent
//! value reported to CALLVALUE without a backing balance movement
//! (DELEGATECALL/CALLCODE/STATICCALL).

use ethereum_types::U256;

/// How much value a call frame carries, and whether it is actually
/// transferred between accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionValue {
    /// Value that should be transferred from caller to callee (CALL,
    /// CREATE, CREATE2).
    Transfer(U256),
    /// Value that is reported to the callee's CALLVALUE without any
    /// balance movement (DELEGATECALL, CALLCODE propagates the original
    /// value; STATICCALL is always zero).
    Apparent(U256),
}

impl ActionValue {
    /// Returns a `Transfer` value.
    pub fn transfer(value: U256) -> ActionValue {
        ActionValue::Transfer(value)
    }

    /// Returns an `Apparent` value.
    pub fn apparent(value: U256) -> ActionValue {
        ActionValue::Apparent(value)
    }

    /// The value visible to CALLVALUE, regardless of variant.
    pub fn value(&self) -> U256 {
        match *self {
            ActionValue::Transfer(value) | ActionValue::Apparent(value) => value,
        }
    }

    /// True if this frame should move balance from caller to callee.
    pub fn should_transfer(&self) -> bool {
        matches!(self, ActionValue::Transfer(_))
    }
}
