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

//! VM errors module

use std::fmt;

/// Errors that halt execution of the current call frame (§7).
///
/// None of these unwind across a CALL/CREATE boundary: the calling frame
/// observes only whether the sub-frame produced an error and pushes 0 or 1
/// accordingly (see `ContractCreateResult` / `MessageCallResult`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Returned when the currently executing instruction would cost more
    /// gas than is left in the frame. All remaining gas is forfeited.
    OutOfGas,
    /// Execution tried to move to a position that wasn't marked with
    /// JUMPDEST, or that lies inside a PUSHn immediate window.
    BadJumpDestination {
        /// Position the code tried to jump to.
        destination: usize,
    },
    /// The opcode byte at `pc` is not recognised by the active schedule.
    BadInstruction {
        /// Unrecognised opcode.
        instruction: u8,
    },
    /// Not enough elements on the stack to satisfy an instruction's arity.
    StackUnderflow {
        /// Invoked instruction.
        instruction: &'static str,
        /// How many stack elements the instruction wanted.
        wanted: usize,
        /// How many elements were on the stack.
        on_stack: usize,
    },
    /// Execution would push the stack past `Schedule::stack_limit`.
    OutOfStack {
        /// Invoked instruction.
        instruction: &'static str,
        /// Net number of elements the instruction wanted to push.
        wanted: usize,
        /// Configured stack limit.
        limit: usize,
    },
    /// A state-modifying opcode was executed inside a STATICCALL frame.
    MutableCallInStaticContext,
    /// Code deposited by CREATE/CREATE2 init code was rejected.
    InvalidCode,
    /// Out of bounds access, e.g. RETURNDATACOPY reading past
    /// `RETURNDATASIZE`.
    OutOfBounds,
    /// Execution halted via REVERT: unused gas is returned to the caller,
    /// return data is preserved, and this frame's world-state changes are
    /// discarded.
    Reverted,
    /// Indicative of a bug rather than a well-formed consensus failure.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::Error::*;
        match *self {
            OutOfGas => write!(f, "Out of gas"),
            BadJumpDestination { destination } => {
                write!(f, "Bad jump destination {destination:x}")
            }
            BadInstruction { instruction } => write!(f, "Bad instruction {instruction:x}"),
            StackUnderflow {
                instruction,
                wanted,
                on_stack,
            } => write!(f, "Stack underflow {instruction} {wanted}/{on_stack}"),
            OutOfStack {
                instruction,
                wanted,
                limit,
            } => write!(f, "Out of stack {instruction} {wanted}/{limit}"),
            MutableCallInStaticContext => write!(f, "Mutable call in static context"),
            InvalidCode => write!(f, "Invalid code to deploy as a contract"),
            OutOfBounds => write!(f, "Out of bounds"),
            Reverted => write!(f, "Reverted"),
            Internal(ref msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = ::std::result::Result<T, Error>;
