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

//! Cost schedule and other parameterisations for the EVM (§6 `EvmConfig`).

/// Gas used in a call divided by this number is the maximum refundable amount.
pub const MAX_REFUND_QUOTIENT: usize = 2;

/// Definition of the cost schedule and other parameterisations for the EVM,
/// spanning Frontier through Constantinople.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Does it support exceptional failed code deposit
    pub exceptional_failed_code_deposit: bool,
    /// Does it have a delegate call
    pub have_delegate_call: bool,
    /// Does it have a CREATE2 instruction
    pub have_create2: bool,
    /// Does it have a REVERT instruction
    pub have_revert: bool,
    /// RETURNDATA and RETURNDATASIZE opcodes enabled.
    pub have_return_data: bool,
    /// Static Call opcode enabled.
    pub have_static_call: bool,
    /// SHL, SHR, SAR opcodes enabled.
    pub have_bitwise_shifting: bool,
    /// Does it have a EXTCODEHASH instruction
    pub have_extcodehash: bool,
    /// VM stack limit
    pub stack_limit: usize,
    /// Max number of nested calls/creates
    pub max_depth: usize,
    /// Gas prices for instructions in all tiers
    pub tier_step_gas: [usize; 8],
    /// Gas price for `EXP` opcode
    pub exp_gas: usize,
    /// Additional gas for `EXP` opcode for each byte of exponent
    pub exp_byte_gas: usize,
    /// Gas price for `SHA3` opcode
    pub sha3_gas: usize,
    /// Additional gas for `SHA3` opcode for each word of hashed memory
    pub sha3_word_gas: usize,
    /// Gas price for loading from storage
    pub sload_gas: usize,
    /// Gas price for setting new value to storage (`storage==0`, `new!=0`)
    pub sstore_set_gas: usize,
    /// Gas price for altering value in storage
    pub sstore_reset_gas: usize,
    /// Gas refund for `SSTORE` clearing (when `storage!=0`, `new==0`)
    pub sstore_refund_gas: usize,
    /// Gas price for `JUMPDEST` opcode
    pub jumpdest_gas: usize,
    /// Gas price for `LOG*`
    pub log_gas: usize,
    /// Additional gas for data in `LOG*`
    pub log_data_gas: usize,
    /// Additional gas for each topic in `LOG*`
    pub log_topic_gas: usize,
    /// Gas price for `CREATE` opcode
    pub create_gas: usize,
    /// Gas price for `*CALL*` opcodes
    pub call_gas: usize,
    /// Stipend for transfer for `CALL|CALLCODE` opcode when `value>0`
    pub call_stipend: usize,
    /// Additional gas required for value transfer (`CALL|CALLCODE`)
    pub call_value_transfer_gas: usize,
    /// Additional gas for creating new account (`CALL|CALLCODE`)
    pub call_new_account_gas: usize,
    /// Refund for SELFDESTRUCT
    pub suicide_refund_gas: usize,
    /// Gas for used memory, per word
    pub memory_gas: usize,
    /// Coefficient used to convert memory size to gas price for memory
    pub quad_coeff_div: usize,
    /// Cost for contract length when executing `CREATE`
    pub create_data_gas: usize,
    /// Maximum code size when creating a contract (EIP-170).
    pub create_data_limit: usize,
    /// Gas price for copying memory
    pub copy_gas: usize,
    /// Price of EXTCODESIZE
    pub extcodesize_gas: usize,
    /// Base price of EXTCODECOPY
    pub extcodecopy_base_gas: usize,
    /// Price of BALANCE
    pub balance_gas: usize,
    /// Price of EXTCODEHASH
    pub extcodehash_gas: usize,
    /// Price of SELFDESTRUCT
    pub suicide_gas: usize,
    /// Amount of additional gas to pay when SELFDESTRUCT credits a
    /// non-existent account
    pub suicide_to_new_account_cost: usize,
    /// `Some(64)` under EIP-150: let limit = GAS - GAS/64; CALL's gas =
    /// min(requested, limit), CREATE's gas = limit. `None` pre-EIP-150.
    pub sub_gas_cap_divisor: Option<usize>,
    /// Don't ever make empty accounts; contracts start with nonce=1. Also,
    /// don't charge the new-account surcharge when sending/suicide
    /// zero-value (EIP-161).
    pub no_empty: bool,
    /// Kill empty accounts if touched (EIP-161).
    pub kill_empty: bool,
    /// BLOCKHASH instruction gas cost.
    pub blockhash_gas: usize,
    /// Gas used in a call divided by this number is the maximum refundable
    /// amount.
    pub max_refund_quotient: usize,
}

impl Schedule {
    /// Schedule for the Frontier-era of the Ethereum main net.
    pub fn new_frontier() -> Schedule {
        Self::new(false, false)
    }

    /// Schedule for the Homestead-era of the Ethereum main net.
    pub fn new_homestead() -> Schedule {
        Self::new(true, true)
    }

    /// Schedule for the Tangerine Whistle fork (EIP-150) of the Ethereum
    /// main net.
    pub fn new_tangerine_whistle() -> Schedule {
        let mut schedule = Self::new_homestead();
        schedule.sload_gas = 200;
        schedule.call_gas = 700;
        schedule.extcodesize_gas = 700;
        schedule.extcodecopy_base_gas = 700;
        schedule.balance_gas = 400;
        schedule.suicide_gas = 5000;
        schedule.suicide_to_new_account_cost = 25000;
        schedule.sub_gas_cap_divisor = Some(64);
        schedule
    }

    /// Schedule for the Spurious Dragon fork (EIP-155/158/160/161) of the
    /// Ethereum main net.
    pub fn new_spurious_dragon() -> Schedule {
        let mut schedule = Self::new_tangerine_whistle();
        schedule.create_data_limit = 24576; // EIP-170
        schedule.exp_byte_gas = 50; // EIP-160
        schedule.no_empty = true; // EIP-161
        schedule.kill_empty = true; // EIP-161
        schedule
    }

    /// Schedule for the Byzantium fork of the Ethereum main net.
    pub fn new_byzantium() -> Schedule {
        let mut schedule = Self::new_spurious_dragon();
        schedule.have_create2 = true;
        schedule.have_revert = true;
        schedule.have_static_call = true;
        schedule.have_return_data = true;
        schedule
    }

    /// Schedule for the Constantinople fork of the Ethereum main net.
    pub fn new_constantinople() -> Schedule {
        let mut schedule = Self::new_byzantium();
        schedule.have_bitwise_shifting = true; // EIP-145
        schedule.have_extcodehash = true; // EIP-1052
        schedule
    }

    fn new(exceptional_failed_code_deposit: bool, have_delegate_call: bool) -> Schedule {
        Schedule {
            exceptional_failed_code_deposit,
            have_delegate_call,
            have_create2: false,
            have_revert: false,
            have_return_data: false,
            have_static_call: false,
            have_bitwise_shifting: false,
            have_extcodehash: false,
            stack_limit: 1024,
            max_depth: 1024,
            tier_step_gas: [0, 2, 3, 5, 8, 10, 20, 0],
            exp_gas: 10,
            exp_byte_gas: 10,
            sha3_gas: 30,
            sha3_word_gas: 6,
            sload_gas: 50,
            sstore_set_gas: 20000,
            sstore_reset_gas: 5000,
            sstore_refund_gas: 15000,
            jumpdest_gas: 1,
            log_gas: 375,
            log_data_gas: 8,
            log_topic_gas: 375,
            create_gas: 32000,
            call_gas: 40,
            call_stipend: 2300,
            call_value_transfer_gas: 9000,
            call_new_account_gas: 25000,
            suicide_refund_gas: 24000,
            memory_gas: 3,
            quad_coeff_div: 512,
            create_data_gas: 200,
            create_data_limit: usize::max_value(),
            copy_gas: 3,
            extcodesize_gas: 20,
            extcodecopy_base_gas: 20,
            extcodehash_gas: 400,
            balance_gas: 20,
            suicide_gas: 0,
            suicide_to_new_account_cost: 0,
            sub_gas_cap_divisor: None,
            no_empty: false,
            kill_empty: false,
            blockhash_gas: 20,
            max_refund_quotient: MAX_REFUND_QUOTIENT,
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::new_frontier()
    }
}

#[test]
#[cfg(test)]
fn schedule_evm_assumptions() {
    let s1 = Schedule::new_frontier();
    let s2 = Schedule::new_homestead();

    // To optimize division we assume 2**9 for quad_coeff_div
    assert_eq!(s1.quad_coeff_div, 512);
    assert_eq!(s2.quad_coeff_div, 512);
}

#[test]
fn schedule_fork_progression() {
    let eip150 = Schedule::new_tangerine_whistle();
    assert_eq!(eip150.sub_gas_cap_divisor, Some(64));
    assert_eq!(eip150.sload_gas, 200);

    let spurious = Schedule::new_spurious_dragon();
    assert!(spurious.no_empty);
    assert!(spurious.kill_empty);
    assert_eq!(spurious.create_data_limit, 24576);

    let byzantium = Schedule::new_byzantium();
    assert!(byzantium.have_revert);
    assert!(byzantium.have_static_call);
    assert!(byzantium.have_create2);

    let constantinople = Schedule::new_constantinople();
    assert!(constantinople.have_bitwise_shifting);
    assert!(constantinople.have_extcodehash);
}
