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

//! LRU cache of valid-jump-destination sets, keyed by code hash, so that
//! repeated calls into the same deployed code don't re-scan the bytecode
//! on every invocation.

use std::sync::Arc;

use ethereum_types::H256;
use lru_cache::LruCache;
use parking_lot::Mutex;
use vm::Program;

const DEFAULT_CACHE_SIZE: usize = 4096;

/// Process-wide cache shared across frames, keyed by `keccak256(code)`.
pub struct SharedCache {
    programs: Mutex<LruCache<H256, Arc<Program>>>,
}

impl SharedCache {
    /// Creates a cache holding up to `max_size` entries.
    pub fn new(max_size: usize) -> Self {
        SharedCache {
            programs: Mutex::new(LruCache::new(max_size)),
        }
    }

    /// Looks up or builds the `Program` (code + valid jump destinations)
    /// for `code_hash`/`code`, caching the scan result.
    pub fn get(&self, code_hash: H256, code: &[u8]) -> Arc<Program> {
        let mut programs = self.programs.lock();
        if let Some(program) = programs.get_mut(&code_hash) {
            return program.clone();
        }
        let program = Arc::new(Program::new(code.to_vec()));
        programs.insert(code_hash, program.clone());
        program
    }
}

impl Default for SharedCache {
    fn default() -> Self {
        SharedCache::new(DEFAULT_CACHE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::SharedCache;
    use ethereum_types::H256;

    #[test]
    fn caches_repeated_lookup() {
        let cache = SharedCache::default();
        let code = vec![0x5bu8, 0x00];
        let hash = H256::from_low_u64_be(1);
        let first = cache.get(hash, &code);
        let second = cache.get(hash, &code);
        assert!(std::sync::Arc::ptr_eq(&first, &second));
    }
}
