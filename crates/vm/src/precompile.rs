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

//! Precompile dispatch table (§6, §9). Only the lookup-by-address surface
//! is modeled here; the individual algorithms (elliptic-curve ops, hashing)
//! are an explicit Non-goal and are left to the embedder.

use ethereum_types::{Address, U256};
use parity_bytes::Bytes;

use crate::error::Error;

/// A precompiled contract's output: the data it returns and the gas left
/// after its (embedder-defined) cost was charged.
pub type PrecompileResult = Result<(U256, Bytes), Error>;

/// Resolves reserved low addresses (0x01-0x09 and beyond, depending on
/// fork) to native implementations, bypassing bytecode execution entirely.
/// This crate ships no implementations: callers inject their own, or use
/// [`NoPrecompiles`] to model a world with none active.
pub trait PrecompileSet: Send + Sync {
    /// True if `address` is a precompile under the active configuration.
    /// Consulted *before* loading any contract code (§9).
    fn is_precompile(&self, address: &Address) -> bool;

    /// Executes the precompile at `address` with the given input and gas
    /// budget. Only ever called when `is_precompile` returned true.
    fn execute(&self, address: &Address, input: &[u8], gas: U256) -> PrecompileResult;
}

/// A `PrecompileSet` with no addresses registered; every CALL/STATICCALL
/// falls through to ordinary code dispatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrecompiles;

impl PrecompileSet for NoPrecompiles {
    fn is_precompile(&self, _address: &Address) -> bool {
        false
    }

    fn execute(&self, _address: &Address, _input: &[u8], _gas: U256) -> PrecompileResult {
        Err(Error::Internal(
            "execute called on NoPrecompiles; is_precompile should have returned false".into(),
        ))
    }
}
