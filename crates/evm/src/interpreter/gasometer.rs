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

//! Dynamic gas computation: memory expansion, copy/word costs, SSTORE
//! tiers and the CALL-family stipend/new-account/value-transfer surcharges
//! (§4.6).

use ethereum_types::{H256, U256};
use vm::Schedule;

use super::memory::MemoryRange;

/// Tracks the memory word-count charged so far within a single frame, so
/// that repeated accesses to an already-expanded region are free.
#[derive(Debug, Default)]
pub struct Gasometer {
    mem_words: usize,
}

impl Gasometer {
    /// Fresh gasometer for a new frame.
    pub fn new() -> Self {
        Gasometer { mem_words: 0 }
    }

    /// `C_mem(a) = 3a + floor(a^2/512)`.
    pub fn mem_gas_cost(schedule: &Schedule, words: usize) -> U256 {
        let a = U256::from(words);
        U256::from(schedule.memory_gas) * a + (a * a) / U256::from(schedule.quad_coeff_div)
    }

    /// Incremental cost of expanding memory to cover `range`, given what
    /// has already been charged for in this frame. Zero if `range` is
    /// already covered or has zero size.
    pub fn mem_expansion_gas(&mut self, schedule: &Schedule, range: MemoryRange) -> U256 {
        let new_words = range.words();
        if new_words <= self.mem_words {
            return U256::zero();
        }
        let cost_new = Self::mem_gas_cost(schedule, new_words);
        let cost_old = Self::mem_gas_cost(schedule, self.mem_words);
        self.mem_words = new_words;
        cost_new - cost_old
    }

    /// Cost of copying `size` bytes (CALLDATACOPY/CODECOPY/EXTCODECOPY/
    /// RETURNDATACOPY), on top of memory expansion.
    pub fn copy_gas_cost(schedule: &Schedule, size: usize) -> U256 {
        U256::from(schedule.copy_gas) * U256::from(ceil_div_32(size))
    }

    /// Cost of hashing `size` bytes for SHA3, on top of memory expansion.
    pub fn sha3_gas_cost(schedule: &Schedule, size: usize) -> U256 {
        U256::from(schedule.sha3_gas) + U256::from(schedule.sha3_word_gas) * U256::from(ceil_div_32(size))
    }

    /// Cost of LOG0..LOG4, on top of memory expansion.
    pub fn log_gas_cost(schedule: &Schedule, topic_count: usize, data_size: usize) -> U256 {
        U256::from(schedule.log_gas)
            + U256::from(schedule.log_data_gas) * U256::from(data_size)
            + U256::from(schedule.log_topic_gas) * U256::from(topic_count)
    }

    /// EIP-150 "63/64" gas retention: how much of `available` may be
    /// forwarded to a sub-call/create when `requested` gas was asked for
    /// (`None` request means "all available", used by CREATE).
    pub fn gas_cap(schedule: &Schedule, available: U256, requested: Option<U256>) -> U256 {
        match schedule.sub_gas_cap_divisor {
            Some(divisor) => {
                let capped = available - available / U256::from(divisor);
                match requested {
                    Some(requested) => std::cmp::min(requested, capped),
                    None => capped,
                }
            }
            None => requested.unwrap_or(available),
        }
    }

    /// Base gas for a SSTORE given the slot's current and new value, plus
    /// the refund it grants (0 unless a non-zero slot is cleared). The
    /// pre-EIP-1283 rule: cost depends only on whether the *current* value
    /// is zero.
    pub fn sstore_gas(schedule: &Schedule, current: H256, new: H256) -> (U256, U256) {
        let cost = if current.is_zero() {
            schedule.sstore_set_gas
        } else {
            schedule.sstore_reset_gas
        };
        let refund = if !current.is_zero() && new.is_zero() {
            schedule.sstore_refund_gas
        } else {
            0
        };
        (U256::from(cost), U256::from(refund))
    }
}

fn ceil_div_32(size: usize) -> usize {
    (size + 31) / 32
}

#[cfg(test)]
mod tests {
    use super::Gasometer;
    use ethereum_types::{H256, U256};
    use vm::Schedule;

    #[test]
    fn gas_cap_retains_one_sixty_fourth() {
        let schedule = Schedule::new_tangerine_whistle();
        let cap = Gasometer::gas_cap(&schedule, U256::from(64_000), None);
        assert_eq!(cap, U256::from(64_000 - 1_000));
    }

    #[test]
    fn gas_cap_pre_eip150_forwards_all() {
        let schedule = Schedule::new_homestead();
        let cap = Gasometer::gas_cap(&schedule, U256::from(64_000), Some(U256::from(70_000)));
        assert_eq!(cap, U256::from(70_000));
    }

    #[test]
    fn sstore_set_vs_reset() {
        let schedule = Schedule::new_frontier();
        let (cost, refund) = Gasometer::sstore_gas(&schedule, H256::zero(), H256::from_low_u64_be(1));
        assert_eq!(cost, U256::from(schedule.sstore_set_gas));
        assert_eq!(refund, U256::zero());

        let (cost, refund) =
            Gasometer::sstore_gas(&schedule, H256::from_low_u64_be(1), H256::zero());
        assert_eq!(cost, U256::from(schedule.sstore_reset_gas));
        assert_eq!(refund, U256::from(schedule.sstore_refund_gas));
    }
}
