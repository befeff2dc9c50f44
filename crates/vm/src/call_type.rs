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

//! The flavour of a CALL-family dispatch (§4.7).

/// Type of call-like instruction that produced a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallType {
    /// Not a call-originated frame (top-level message call or CREATE).
    None,
    /// CALL: executes `to`'s code against `to`'s storage, transfers value.
    Call,
    /// CALLCODE: executes `to`'s code against the caller's storage, value
    /// is transferred from caller to itself (no-op for balances other than
    /// the self-transfer accounting).
    CallCode,
    /// DELEGATECALL: executes `to`'s code against the caller's storage,
    /// propagating the original caller and apparent value. No transfer.
    DelegateCall,
    /// STATICCALL: like `Call` but forbids any state-modifying opcode in
    /// the sub-frame. No transfer.
    StaticCall,
}

impl CallType {
    /// Whether this call type runs the callee's code against the caller's
    /// own storage (CALLCODE, DELEGATECALL) rather than the callee's.
    pub fn uses_caller_storage(&self) -> bool {
        matches!(self, CallType::CallCode | CallType::DelegateCall)
    }

    /// Whether this call type forbids state-modifying opcodes.
    pub fn is_static(&self) -> bool {
        matches!(self, CallType::StaticCall)
    }
}
