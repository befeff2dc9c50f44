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

//! In-memory `WorldState` reference implementation, used by this crate's
//! own tests and by `evm`'s interpreter tests.

use std::{collections::HashMap, sync::Arc};

use ethereum_types::{Address, H256, U256};
use keccak_hash::keccak;
use parity_bytes::Bytes;

use crate::world_state::{Account, WorldState};

/// Simple clone-on-write world backed by hash maps. Not optimized for
/// production use (see `WorldState`'s documentation on structural
/// sharing); it exists to make the interpreter's own tests runnable
/// without pulling in a trie implementation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorldState {
    accounts: HashMap<Address, Account>,
    code: HashMap<H256, Arc<Bytes>>,
    storage: HashMap<(Address, H256), H256>,
}

impl InMemoryWorldState {
    /// Empty world.
    pub fn new() -> Self {
        InMemoryWorldState::default()
    }

    /// Seeds an account with a balance and no code, for test scenario
    /// setup.
    pub fn with_balance(mut self, addr: Address, balance: U256) -> Self {
        let mut account = self.accounts.get(&addr).cloned().unwrap_or(Account {
            nonce: U256::zero(),
            balance: U256::zero(),
            code_hash: keccak(&[]),
        });
        account.balance = balance;
        self.accounts.insert(addr, account);
        self
    }

    /// Seeds an account with deployed code, for test scenario setup.
    pub fn with_code(mut self, addr: Address, code: Bytes) -> Self {
        let code_hash = keccak(&code);
        self.code.insert(code_hash, Arc::new(code));
        let mut account = self.accounts.get(&addr).cloned().unwrap_or(Account {
            nonce: U256::zero(),
            balance: U256::zero(),
            code_hash,
        });
        account.code_hash = code_hash;
        self.accounts.insert(addr, account);
        self
    }
}

impl WorldState for InMemoryWorldState {
    fn get_account(&self, addr: &Address) -> Option<Account> {
        self.accounts.get(addr).cloned()
    }

    fn get_balance(&self, addr: &Address) -> U256 {
        self.accounts
            .get(addr)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    fn get_code(&self, addr: &Address) -> Arc<Bytes> {
        self.accounts
            .get(addr)
            .and_then(|a| self.code.get(&a.code_hash))
            .cloned()
            .unwrap_or_default()
    }

    fn get_code_hash(&self, addr: &Address) -> H256 {
        self.accounts
            .get(addr)
            .map(|a| a.code_hash)
            .unwrap_or_else(|| keccak(&[]))
    }

    fn get_storage(&self, addr: &Address, key: &H256) -> H256 {
        self.storage
            .get(&(*addr, *key))
            .cloned()
            .unwrap_or_else(H256::zero)
    }

    fn save_storage(mut self, addr: Address, key: H256, value: H256) -> Self {
        if value.is_zero() {
            self.storage.remove(&(addr, key));
        } else {
            self.storage.insert((addr, key), value);
        }
        self
    }

    fn save_code(mut self, addr: Address, code: Bytes) -> Self {
        let code_hash = keccak(&code);
        self.code.insert(code_hash, Arc::new(code));
        let mut account = self.accounts.remove(&addr).unwrap_or(Account {
            nonce: U256::zero(),
            balance: U256::zero(),
            code_hash,
        });
        account.code_hash = code_hash;
        self.accounts.insert(addr, account);
        self
    }

    fn save_account(mut self, addr: Address, account: Account) -> Self {
        self.accounts.insert(addr, account);
        self
    }

    fn transfer(mut self, from: Address, to: Address, value: U256) -> Self {
        if from != to {
            if let Some(account) = self.accounts.get_mut(&from) {
                account.balance -= value;
            }
        }
        let to_account = self.accounts.entry(to).or_insert(Account {
            nonce: U256::zero(),
            balance: U256::zero(),
            code_hash: keccak(&[]),
        });
        if from == to {
            // Self-transfer: no net balance change.
        } else {
            to_account.balance += value;
        }
        self
    }

    fn initialise_account(mut self, addr: Address) -> Self {
        self.accounts.entry(addr).or_insert(Account {
            nonce: U256::zero(),
            balance: U256::zero(),
            code_hash: keccak(&[]),
        });
        self
    }

    fn create_address(&self, creator: Address) -> Address {
        let nonce = self
            .accounts
            .get(&creator)
            .map(|a| a.nonce)
            .unwrap_or_default();
        let mut stream = rlp::RlpStream::new_list(2);
        stream.append(&creator);
        stream.append(&nonce);
        Address::from_slice(&keccak(stream.as_raw())[12..])
    }

    fn create2_address(&self, creator: Address, salt: H256, init_code_hash: H256) -> Address {
        let mut buffer = Vec::with_capacity(85);
        buffer.push(0xffu8);
        buffer.extend_from_slice(creator.as_bytes());
        buffer.extend_from_slice(salt.as_bytes());
        buffer.extend_from_slice(init_code_hash.as_bytes());
        Address::from_slice(&keccak(&buffer)[12..])
    }

    fn non_empty_code_or_nonce_account(&self, addr: &Address) -> bool {
        match self.accounts.get(addr) {
            Some(account) => !account.nonce.is_zero() || account.code_hash != keccak(&[]),
            None => false,
        }
    }

    fn increase_nonce(mut self, addr: Address) -> Self {
        let account = self.accounts.entry(addr).or_insert(Account {
            nonce: U256::zero(),
            balance: U256::zero(),
            code_hash: keccak(&[]),
        });
        account.nonce += U256::one();
        self
    }
}
