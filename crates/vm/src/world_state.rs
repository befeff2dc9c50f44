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

//! The contract the VM requires from the backing state (§6). Implemented
//! externally; the VM only ever holds a `W: WorldState` by value and
//! threads it through frames.

use std::sync::Arc;

use ethereum_types::{Address, H256, U256};
use parity_bytes::Bytes;

/// An account record as the VM sees it. Storage and code are addressed
/// separately, by address, not embedded here (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Number of CREATE-family contracts ever deployed by this address,
    /// or number of transactions sent from it.
    pub nonce: U256,
    /// Wei balance.
    pub balance: U256,
    /// `keccak256(code)`; the empty-code hash for accounts with no code.
    pub code_hash: H256,
}

impl Account {
    /// An account is *empty* iff nonce=0, balance=0 and code is empty
    /// (§3).
    pub fn is_empty(&self, empty_code_hash: H256) -> bool {
        self.nonce.is_zero() && self.balance.is_zero() && self.code_hash == empty_code_hash
    }
}

/// World-state snapshot consumed by the interpreter.
///
/// Every mutator takes `self` by value and returns a new `Self`: callers
/// are expected to implement this either via structural sharing (a
/// persistent map) or via cheap internal copy-on-write, per §9's world
/// snapshot recommendation — the VM itself never deep-copies a `World`, it
/// simply keeps the parent's value untouched until a child frame succeeds,
/// then replaces it with the child's.
pub trait WorldState: Sized + Clone {
    /// `getAccount`.
    fn get_account(&self, addr: &Address) -> Option<Account>;

    /// `getBalance`; zero if the account is absent.
    fn get_balance(&self, addr: &Address) -> U256;

    /// `getCode`.
    fn get_code(&self, addr: &Address) -> Arc<Bytes>;

    /// `getCodeHash`.
    fn get_code_hash(&self, addr: &Address) -> H256;

    /// `getStorage`; zero for unset keys.
    fn get_storage(&self, addr: &Address, key: &H256) -> H256;

    /// `saveStorage`.
    fn save_storage(self, addr: Address, key: H256, value: H256) -> Self;

    /// `saveCode`.
    fn save_code(self, addr: Address, code: Bytes) -> Self;

    /// `saveAccount`.
    fn save_account(self, addr: Address, account: Account) -> Self;

    /// `transfer`; creates `to` if absent.
    fn transfer(self, from: Address, to: Address, value: U256) -> Self;

    /// `initialiseAccount`.
    fn initialise_account(self, addr: Address) -> Self;

    /// `createAddress` (CREATE derivation).
    fn create_address(&self, creator: Address) -> Address;

    /// `create2Address` (CREATE2 derivation).
    fn create2_address(&self, creator: Address, salt: H256, init_code_hash: H256) -> Address;

    /// `nonEmptyCodeOrNonceAccount` (EIP-684 collision check).
    fn non_empty_code_or_nonce_account(&self, addr: &Address) -> bool;

    /// `increaseNonce`.
    fn increase_nonce(self, addr: Address) -> Self;
}
