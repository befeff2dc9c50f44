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

//! Rust VM implementation: the fetch-decode-execute loop (§4.10) and the
//! CALL/CREATE dispatch (§4.7, §4.8). Unlike the trap/resume
//! continuation-passing scheme this module is grounded on, nested calls
//! are driven by direct recursion into [`execute`] — this crate's
//! execution model is strictly single-threaded with no suspension points
//! (§5), so there is no external scheduler to hand a trap to.

mod gasometer;
mod memory;
mod shared_cache;
mod stack;

use std::{cmp, collections::HashSet, sync::Arc};

use ethereum_types::{Address, H256, U256};
use keccak_hash::keccak;
use log::{debug, trace, warn};
use num_bigint::BigUint;
use parity_bytes::Bytes;

use vm::{
    ActionValue, CallType, ContractCreateResult, Error, ExecEnv, InternalTransaction,
    InternalTransactionKind, LogEntry, MessageCallResult, PrecompileSet, Program, ProgramResult,
    ReturnData, Result as VmResult, Schedule, WorldState,
};

pub use self::shared_cache::SharedCache;
use self::{
    gasometer::Gasometer,
    memory::{Memory, MemoryRange},
    stack::{Stack, VecStack},
};
use crate::instructions::{self, *};

type ProgramCounter = usize;

/// Top bit of a 256-bit word; XORing it flips the sign for two's
/// complement ordering tricks (SLT/SGT).
const SIGN_BIT: U256 = U256([0, 0, 0, 0x8000000000000000]);

fn to_biguint(x: U256) -> BigUint {
    let mut bytes = [0u8; 32];
    x.to_big_endian(&mut bytes);
    BigUint::from_bytes_be(&bytes)
}

fn from_biguint(x: BigUint) -> U256 {
    let bytes = x.to_bytes_be();
    U256::from_big_endian(&bytes)
}

fn u256_to_address(value: U256) -> Address {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    Address::from_slice(&bytes[12..])
}

fn address_to_u256(address: Address) -> U256 {
    U256::from_big_endian(address.as_bytes())
}

fn bool_to_u256(b: bool) -> U256 {
    if b {
        U256::one()
    } else {
        U256::zero()
    }
}

fn is_negative(value: U256) -> bool {
    value.bit(255)
}

fn two_complement_negate(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

fn abs(value: U256) -> (U256, bool) {
    if is_negative(value) {
        (two_complement_negate(value), true)
    } else {
        (value, false)
    }
}

fn sdiv(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    let min = SIGN_BIT; // -2^255, the most negative representable value
    if a == min && b == U256::MAX {
        // -2^255 / -1 overflows; wraps back to itself mod 2^256.
        return min;
    }
    let (a_abs, a_neg) = abs(a);
    let (b_abs, b_neg) = abs(b);
    let result = a_abs / b_abs;
    if a_neg ^ b_neg {
        two_complement_negate(result)
    } else {
        result
    }
}

fn smod(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    let (a_abs, a_neg) = abs(a);
    let (b_abs, _) = abs(b);
    let result = a_abs % b_abs;
    if a_neg {
        two_complement_negate(result)
    } else {
        result
    }
}

fn slt(a: U256, b: U256) -> bool {
    (a ^ SIGN_BIT) < (b ^ SIGN_BIT)
}

fn sgt(a: U256, b: U256) -> bool {
    slt(b, a)
}

fn sar(value: U256, shift: U256) -> U256 {
    let negative = is_negative(value);
    if shift >= U256::from(256) {
        return if negative { U256::MAX } else { U256::zero() };
    }
    let shift = shift.as_usize();
    if shift == 0 {
        return value;
    }
    if negative {
        let mask = U256::MAX << (256 - shift);
        (value >> shift) | mask
    } else {
        value >> shift
    }
}

fn signextend(byte_num: U256, value: U256) -> U256 {
    if byte_num >= U256::from(32) {
        return value;
    }
    let byte_num = byte_num.as_usize();
    let bit_index = 8 * byte_num + 7;
    let bit = value.bit(bit_index);
    let mask = (U256::one() << (bit_index + 1)) - U256::one();
    if bit {
        value | !mask
    } else {
        value & mask
    }
}

fn byte_op(index: U256, value: U256) -> U256 {
    if index >= U256::from(32) {
        return U256::zero();
    }
    let index = index.as_usize();
    (value >> (248 - index * 8)) & U256::from(0xffu64)
}

fn exp(base: U256, exponent: U256) -> U256 {
    let mut result = U256::one();
    let mut base = base;
    let mut exponent = exponent;
    while !exponent.is_zero() {
        if exponent.bit(0) {
            result = result.overflowing_mul(base).0;
        }
        base = base.overflowing_mul(base).0;
        exponent >>= 1usize;
    }
    result
}

fn addmod(a: U256, b: U256, n: U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    from_biguint((to_biguint(a) + to_biguint(b)) % to_biguint(n))
}

fn mulmod(a: U256, b: U256, n: U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    from_biguint((to_biguint(a) * to_biguint(b)) % to_biguint(n))
}

/// Abstraction over the raw code bytes, tracking the program counter.
struct CodeReader {
    position: ProgramCounter,
    code: Arc<Bytes>,
}

impl CodeReader {
    fn new(code: Arc<Bytes>) -> Self {
        CodeReader { code, position: 0 }
    }

    /// Reads `no_of_bytes` immediate bytes and advances the PC past them.
    /// Missing trailing bytes (PUSHn running off the end of code) read as
    /// zero, matching the Yellow Paper's implicit zero-padding.
    fn read_push(&mut self, no_of_bytes: usize) -> U256 {
        let pos = self.position;
        self.position += no_of_bytes;
        let max = cmp::min(pos + no_of_bytes, self.code.len());
        let mut bytes = [0u8; 32];
        if max > pos {
            let slice = &self.code[pos..max];
            bytes[32 - no_of_bytes..32 - no_of_bytes + slice.len()].copy_from_slice(slice);
        }
        U256::from_big_endian(&bytes)
    }

    fn len(&self) -> usize {
        self.code.len()
    }
}

/// One call/create frame's mutable execution state (§3 `ProgramState`),
/// plus everything needed to recurse for CALL/CREATE.
struct Interpreter<'a, W: WorldState> {
    env: ExecEnv,
    world: W,
    reader: CodeReader,
    program: Arc<Program>,
    stack: VecStack<U256>,
    memory: Memory,
    gasometer: Gasometer,
    gas: U256,
    return_data: ReturnData,
    logs: Vec<LogEntry>,
    addresses_to_delete: HashSet<Address>,
    internal_txs: Vec<InternalTransaction>,
    gas_refund: U256,
    precompiles: &'a dyn PrecompileSet,
    cache: &'a SharedCache,
}

/// Runs a frame's code (top-level message call, top-level create's init
/// code, or any recursive CALL/CREATE/CALLCODE/DELEGATECALL/STATICCALL
/// sub-frame) to completion.
///
/// If `to` resolves to a precompile the lookup happens inside the CALL
/// dispatch itself, *before* any contract code is loaded (§9); `execute`
/// only ever runs ordinary bytecode.
pub fn execute<W: WorldState>(
    env: ExecEnv,
    world: W,
    precompiles: &dyn PrecompileSet,
    cache: &SharedCache,
) -> ProgramResult<W> {
    let code = env.program.code().clone();
    let interpreter = Interpreter {
        gas: env.start_gas,
        reader: CodeReader::new(code),
        program: env.program.clone(),
        env,
        world,
        stack: VecStack::with_capacity(1024),
        memory: Memory::new(),
        gasometer: Gasometer::new(),
        return_data: ReturnData::empty(),
        logs: Vec::new(),
        addresses_to_delete: HashSet::new(),
        internal_txs: Vec::new(),
        gas_refund: U256::zero(),
        precompiles,
        cache,
    };
    interpreter.run()
}

impl<'a, W: WorldState> Interpreter<'a, W> {
    fn run(mut self) -> ProgramResult<W> {
        if self.program.is_empty() {
            let gas = self.gas;
            return self.halt_success(gas, ReturnData::empty());
        }
        loop {
            if self.reader.position >= self.reader.len() {
                let gas = self.gas;
                return self.halt_success(gas, ReturnData::empty());
            }
            match self.step() {
                Ok(StepOutcome::Continue) => {}
                Ok(StepOutcome::Halt(gas_left, data, apply_state)) => {
                    if apply_state {
                        return self.halt_success(gas_left, data);
                    } else {
                        return self.halt_reverted(gas_left, data);
                    }
                }
                Err(err) => return self.halt_error(err),
            }
        }
    }

    fn halt_success(self, gas_left: U256, data: ReturnData) -> ProgramResult<W> {
        ProgramResult {
            return_data: data,
            gas_remaining: gas_left,
            world: self.world,
            addresses_to_delete: self.addresses_to_delete,
            logs: self.logs,
            internal_txs: self.internal_txs,
            gas_refund: self.gas_refund,
            error: None,
        }
    }

    fn halt_reverted(self, gas_left: U256, data: ReturnData) -> ProgramResult<W> {
        ProgramResult {
            return_data: data,
            gas_remaining: gas_left,
            world: self.world,
            addresses_to_delete: HashSet::new(),
            logs: Vec::new(),
            internal_txs: self.internal_txs,
            gas_refund: U256::zero(),
            error: Some(Error::Reverted),
        }
    }

    fn halt_error(self, error: Error) -> ProgramResult<W> {
        ProgramResult {
            return_data: ReturnData::empty(),
            gas_remaining: U256::zero(),
            world: self.world,
            addresses_to_delete: HashSet::new(),
            logs: Vec::new(),
            internal_txs: self.internal_txs,
            gas_refund: U256::zero(),
            error: Some(error),
        }
    }

    fn schedule(&self) -> &Schedule {
        &self.env.evm_config.schedule
    }

    fn require(&self, instruction: u8, args: usize) -> VmResult<()> {
        if !self.stack.has(args) {
            return Err(Error::StackUnderflow {
                instruction: instructions::name(instruction),
                wanted: args,
                on_stack: self.stack.size(),
            });
        }
        Ok(())
    }

    fn check_push(&self, instruction: u8, pushes: usize) -> VmResult<()> {
        let limit = self.schedule().stack_limit;
        if self.stack.size() + pushes > limit {
            return Err(Error::OutOfStack {
                instruction: instructions::name(instruction),
                wanted: pushes,
                limit,
            });
        }
        Ok(())
    }

    fn charge(&mut self, cost: U256) -> VmResult<()> {
        if cost > self.gas {
            return Err(Error::OutOfGas);
        }
        self.gas -= cost;
        Ok(())
    }

    fn mem_range(&self, offset: U256, size: U256) -> VmResult<MemoryRange> {
        if size.is_zero() {
            return Ok(MemoryRange { offset: 0, size: 0 });
        }
        if offset > U256::from(usize::max_value()) || size > U256::from(usize::max_value()) {
            return Err(Error::OutOfGas);
        }
        let offset = offset.as_usize();
        let size = size.as_usize();
        if offset.checked_add(size).is_none() {
            return Err(Error::OutOfGas);
        }
        Ok(MemoryRange { offset, size })
    }

    fn charge_mem_expansion(&mut self, range: MemoryRange) -> VmResult<()> {
        let schedule = self.schedule().clone();
        let cost = self.gasometer.mem_expansion_gas(&schedule, range);
        self.charge(cost)
    }

    fn verify_jump(&self, dest: U256) -> VmResult<usize> {
        if dest > U256::from(usize::max_value()) {
            return Err(Error::BadJumpDestination {
                destination: usize::max_value(),
            });
        }
        let dest = dest.as_usize();
        if self.program.is_valid_jump_destination(dest) {
            Ok(dest)
        } else {
            Err(Error::BadJumpDestination { destination: dest })
        }
    }

    /// Executes a single instruction: checks arity, computes and debits
    /// gas, applies the state transform, advances `pc` (unless a taken
    /// jump already did). The "check, debit, mutate" ordering must be
    /// preserved in every branch — any rearrangement changes consensus
    /// behavior (§9).
    fn step(&mut self) -> VmResult<StepOutcome> {
        let pc = self.reader.position;
        let op = self.reader.code[pc];
        self.reader.position += 1;
        trace!("pc={} op={} gas={}", pc, instructions::name(op), self.gas);

        if is_push(op) {
            self.check_push(op, 1)?;
            self.charge(U256::from(self.schedule().tier_step_gas[2]))?; // VeryLow
            let bytes = instructions::push_bytes(op);
            let value = self.reader.read_push(bytes);
            self.stack.push(value);
            return Ok(StepOutcome::Continue);
        }
        if is_dup(op) {
            let n = instructions::dup_position(op);
            self.require(op, n)?;
            self.check_push(op, 1)?;
            self.charge(U256::from(self.schedule().tier_step_gas[2]))?;
            self.stack.dup(n - 1);
            return Ok(StepOutcome::Continue);
        }
        if is_swap(op) {
            let n = instructions::swap_position(op);
            self.require(op, n + 1)?;
            self.charge(U256::from(self.schedule().tier_step_gas[2]))?;
            self.stack.swap_with_top(n);
            return Ok(StepOutcome::Continue);
        }
        if is_log(op) {
            return self.exec_log(op);
        }

        match op {
            STOP => return Ok(StepOutcome::Halt(self.gas, ReturnData::empty(), true)),

            SHL | SHR | SAR if !self.schedule().have_bitwise_shifting => {
                return Err(Error::BadInstruction { instruction: op })
            }
            ADD | MUL | SUB | DIV | SDIV | MOD | SMOD | LT | GT | SLT | SGT | EQ | AND | OR
            | XOR | BYTE | SHL | SHR | SAR | SIGNEXTEND => self.exec_binary(op)?,

            ISZERO | NOT => self.exec_unary(op)?,

            ADDMOD | MULMOD => self.exec_ternary(op)?,

            EXP => self.exec_exp()?,

            SHA3 => self.exec_sha3()?,

            ADDRESS => self.push_const(address_to_u256(self.env.owner), op)?,
            ORIGIN => self.push_const(address_to_u256(self.env.origin), op)?,
            CALLER => self.push_const(address_to_u256(self.env.caller), op)?,
            CALLVALUE => self.push_const(self.env.value.value(), op)?,
            CALLDATASIZE => self.push_const(U256::from(self.env.input_data.len()), op)?,
            CODESIZE => self.push_const(U256::from(self.reader.len()), op)?,
            GASPRICE => self.push_const(self.env.gas_price, op)?,
            COINBASE => self.push_const(address_to_u256(self.env.block_header.author), op)?,
            TIMESTAMP => self.push_const(U256::from(self.env.block_header.timestamp), op)?,
            NUMBER => self.push_const(U256::from(self.env.block_header.number), op)?,
            DIFFICULTY => self.push_const(self.env.block_header.difficulty, op)?,
            GASLIMIT => self.push_const(self.env.block_header.gas_limit, op)?,
            PC => self.push_const(U256::from(pc), op)?,
            MSIZE => self.push_const(U256::from(self.memory.size()), op)?,
            GAS => self.push_const(self.gas, op)?,
            RETURNDATASIZE => self.push_const(U256::from(self.return_data.len()), op)?,

            CALLDATALOAD => self.exec_calldataload()?,
            CALLDATACOPY => self.exec_calldatacopy()?,
            CODECOPY => self.exec_codecopy()?,
            EXTCODECOPY => self.exec_extcodecopy()?,
            RETURNDATACOPY => self.exec_returndatacopy()?,

            BALANCE => self.exec_balance()?,
            EXTCODESIZE => self.exec_extcodesize()?,
            EXTCODEHASH => self.exec_extcodehash()?,
            BLOCKHASH => self.exec_blockhash()?,

            POP => {
                self.require(op, 1)?;
                self.charge(U256::from(self.schedule().tier_step_gas[1]))?; // Base
                self.stack.pop_back();
            }

            MLOAD => self.exec_mload()?,
            MSTORE => self.exec_mstore()?,
            MSTORE8 => self.exec_mstore8()?,
            SLOAD => self.exec_sload()?,
            SSTORE => self.exec_sstore()?,

            JUMP => {
                self.require(op, 1)?;
                self.charge(U256::from(self.schedule().tier_step_gas[4]))?; // Mid
                let dest = self.stack.pop_back();
                let target = self.verify_jump(dest)?;
                self.reader.position = target;
                return Ok(StepOutcome::Continue);
            }
            JUMPI => {
                self.require(op, 2)?;
                self.charge(U256::from(self.schedule().tier_step_gas[5]))?; // High
                let dest = self.stack.pop_back();
                let cond = self.stack.pop_back();
                if !cond.is_zero() {
                    let target = self.verify_jump(dest)?;
                    self.reader.position = target;
                    return Ok(StepOutcome::Continue);
                }
            }
            JUMPDEST => self.charge(U256::from(self.schedule().jumpdest_gas))?,

            RETURN => return self.exec_halt_with_return(true),
            REVERT => {
                if !self.schedule().have_revert {
                    return Err(Error::BadInstruction { instruction: op });
                }
                return self.exec_halt_with_return(false);
            }
            INVALID => return Err(Error::BadInstruction { instruction: op }),

            CREATE => return self.exec_create(false),
            CREATE2 => {
                if !self.schedule().have_create2 {
                    return Err(Error::BadInstruction { instruction: op });
                }
                return self.exec_create(true);
            }
            CALL => return self.exec_call(CallType::Call),
            CALLCODE => return self.exec_call(CallType::CallCode),
            DELEGATECALL => {
                if !self.schedule().have_delegate_call {
                    return Err(Error::BadInstruction { instruction: op });
                }
                return self.exec_call(CallType::DelegateCall);
            }
            STATICCALL => {
                if !self.schedule().have_static_call {
                    return Err(Error::BadInstruction { instruction: op });
                }
                return self.exec_call(CallType::StaticCall);
            }
            SELFDESTRUCT => return self.exec_selfdestruct(),

            _ => return Err(Error::BadInstruction { instruction: op }),
        }
        Ok(StepOutcome::Continue)
    }

    fn push_const(&mut self, value: U256, instruction: u8) -> VmResult<()> {
        self.check_push(instruction, 1)?;
        self.charge(U256::from(self.schedule().tier_step_gas[1]))?; // Base
        self.stack.push(value);
        Ok(())
    }

    fn exec_binary(&mut self, op: u8) -> VmResult<()> {
        self.require(op, 2)?;
        let tier = match op {
            MUL | DIV | SDIV | MOD | SMOD | SIGNEXTEND => 3, // Low
            _ => 2,                                          // VeryLow
        };
        self.charge(U256::from(self.schedule().tier_step_gas[tier]))?;
        let a = self.stack.pop_back();
        let b = self.stack.pop_back();
        let result = match op {
            ADD => a.overflowing_add(b).0,
            MUL => a.overflowing_mul(b).0,
            SUB => a.overflowing_sub(b).0,
            DIV => {
                if b.is_zero() {
                    U256::zero()
                } else {
                    a / b
                }
            }
            SDIV => sdiv(a, b),
            MOD => {
                if b.is_zero() {
                    U256::zero()
                } else {
                    a % b
                }
            }
            SMOD => smod(a, b),
            LT => bool_to_u256(a < b),
            GT => bool_to_u256(a > b),
            SLT => bool_to_u256(slt(a, b)),
            SGT => bool_to_u256(sgt(a, b)),
            EQ => bool_to_u256(a == b),
            AND => a & b,
            OR => a | b,
            XOR => a ^ b,
            BYTE => byte_op(a, b),
            SHL => {
                if a >= U256::from(256) {
                    U256::zero()
                } else {
                    b << a.as_usize()
                }
            }
            SHR => {
                if a >= U256::from(256) {
                    U256::zero()
                } else {
                    b >> a.as_usize()
                }
            }
            SAR => sar(b, a),
            SIGNEXTEND => signextend(a, b),
            _ => unreachable!(),
        };
        self.stack.push(result);
        Ok(())
    }

    fn exec_unary(&mut self, op: u8) -> VmResult<()> {
        self.require(op, 1)?;
        self.charge(U256::from(self.schedule().tier_step_gas[2]))?; // VeryLow
        let a = self.stack.pop_back();
        let result = match op {
            ISZERO => bool_to_u256(a.is_zero()),
            NOT => !a,
            _ => unreachable!(),
        };
        self.stack.push(result);
        Ok(())
    }

    fn exec_ternary(&mut self, op: u8) -> VmResult<()> {
        self.require(op, 3)?;
        self.charge(U256::from(self.schedule().tier_step_gas[4]))?; // Mid
        let a = self.stack.pop_back();
        let b = self.stack.pop_back();
        let n = self.stack.pop_back();
        let result = match op {
            ADDMOD => addmod(a, b, n),
            MULMOD => mulmod(a, b, n),
            _ => unreachable!(),
        };
        self.stack.push(result);
        Ok(())
    }

    fn exec_exp(&mut self) -> VmResult<()> {
        self.require(EXP, 2)?;
        let a = *self.stack.peek(0);
        let b = *self.stack.peek(1);
        let byte_len = (b.bits() + 7) / 8;
        let cost = U256::from(self.schedule().exp_gas)
            + U256::from(self.schedule().exp_byte_gas) * U256::from(byte_len);
        self.charge(cost)?;
        self.stack.pop_back();
        self.stack.pop_back();
        self.stack.push(exp(a, b));
        Ok(())
    }

    fn exec_sha3(&mut self) -> VmResult<()> {
        self.require(SHA3, 2)?;
        let offset = *self.stack.peek(0);
        let size = *self.stack.peek(1);
        let range = self.mem_range(offset, size)?;
        let schedule = self.schedule().clone();
        let expansion = self.gasometer.mem_expansion_gas(&schedule, range);
        let cost = expansion + Gasometer::sha3_gas_cost(&schedule, range.size);
        self.charge(cost)?;
        self.memory.expand(range);
        self.stack.pop_back();
        self.stack.pop_back();
        let hash = keccak(self.memory.read_slice(range.offset, range.size));
        self.stack.push(U256::from_big_endian(hash.as_bytes()));
        Ok(())
    }

    fn exec_calldataload(&mut self) -> VmResult<()> {
        self.require(CALLDATALOAD, 1)?;
        self.charge(U256::from(self.schedule().tier_step_gas[2]))?;
        let offset = self.stack.pop_back();
        let mut bytes = [0u8; 32];
        if offset < U256::from(self.env.input_data.len()) {
            let offset = offset.as_usize();
            let data = &self.env.input_data;
            for (i, byte) in bytes.iter_mut().enumerate() {
                if let Some(b) = data.get(offset + i) {
                    *byte = *b;
                }
            }
        }
        self.stack.push(U256::from_big_endian(&bytes));
        Ok(())
    }

    fn copy_into_memory(
        &mut self,
        dest_offset: U256,
        source_offset: usize,
        size: U256,
        source: &[u8],
    ) -> VmResult<()> {
        let range = self.mem_range(dest_offset, size)?;
        let schedule = self.schedule().clone();
        let expansion = self.gasometer.mem_expansion_gas(&schedule, range);
        let copy_cost = Gasometer::copy_gas_cost(&schedule, range.size);
        self.charge(expansion + copy_cost)?;
        self.memory.expand(range);
        self.memory
            .write_padded(range.offset, range.size, source, source_offset);
        Ok(())
    }

    fn clamp_usize(value: U256) -> usize {
        if value > U256::from(usize::max_value()) {
            usize::max_value()
        } else {
            value.as_usize()
        }
    }

    fn exec_calldatacopy(&mut self) -> VmResult<()> {
        self.require(CALLDATACOPY, 3)?;
        let dest = self.stack.pop_back();
        let src = self.stack.pop_back();
        let size = self.stack.pop_back();
        let src_offset = Self::clamp_usize(src);
        let data = self.env.input_data.clone();
        self.copy_into_memory(dest, src_offset, size, &data)
    }

    fn exec_codecopy(&mut self) -> VmResult<()> {
        self.require(CODECOPY, 3)?;
        let dest = self.stack.pop_back();
        let src = self.stack.pop_back();
        let size = self.stack.pop_back();
        let src_offset = Self::clamp_usize(src);
        let code = self.program.code().clone();
        self.copy_into_memory(dest, src_offset, size, &code)
    }

    fn exec_extcodecopy(&mut self) -> VmResult<()> {
        self.require(EXTCODECOPY, 4)?;
        let addr = u256_to_address(self.stack.pop_back());
        let dest = self.stack.pop_back();
        let src = self.stack.pop_back();
        let size = self.stack.pop_back();
        let range = self.mem_range(dest, size)?;
        let schedule = self.schedule().clone();
        let expansion = self.gasometer.mem_expansion_gas(&schedule, range);
        let copy_cost = Gasometer::copy_gas_cost(&schedule, range.size);
        let base = U256::from(schedule.extcodecopy_base_gas);
        self.charge(base + expansion + copy_cost)?;
        self.memory.expand(range);
        let code = self.world.get_code(&addr);
        let src_offset = Self::clamp_usize(src);
        self.memory
            .write_padded(range.offset, range.size, &code, src_offset);
        Ok(())
    }

    fn exec_returndatacopy(&mut self) -> VmResult<()> {
        if !self.schedule().have_return_data {
            return Err(Error::BadInstruction {
                instruction: RETURNDATACOPY,
            });
        }
        self.require(RETURNDATACOPY, 3)?;
        let dest = self.stack.pop_back();
        let src = self.stack.pop_back();
        let size = self.stack.pop_back();
        if src.saturating_add(size) > U256::from(self.return_data.len()) {
            return Err(Error::OutOfBounds);
        }
        let src_offset = src.as_usize();
        let range = self.mem_range(dest, size)?;
        let schedule = self.schedule().clone();
        let expansion = self.gasometer.mem_expansion_gas(&schedule, range);
        let copy_cost = Gasometer::copy_gas_cost(&schedule, range.size);
        self.charge(expansion + copy_cost)?;
        self.memory.expand(range);
        let data: Vec<u8> = self.return_data.to_vec();
        self.memory
            .write_padded(range.offset, range.size, &data, src_offset);
        Ok(())
    }

    fn exec_balance(&mut self) -> VmResult<()> {
        self.require(BALANCE, 1)?;
        self.charge(U256::from(self.schedule().balance_gas))?;
        let addr = u256_to_address(self.stack.pop_back());
        self.stack.push(self.world.get_balance(&addr));
        Ok(())
    }

    fn exec_extcodesize(&mut self) -> VmResult<()> {
        self.require(EXTCODESIZE, 1)?;
        self.charge(U256::from(self.schedule().extcodesize_gas))?;
        let addr = u256_to_address(self.stack.pop_back());
        self.stack.push(U256::from(self.world.get_code(&addr).len()));
        Ok(())
    }

    fn exec_extcodehash(&mut self) -> VmResult<()> {
        if !self.schedule().have_extcodehash {
            return Err(Error::BadInstruction {
                instruction: EXTCODEHASH,
            });
        }
        self.require(EXTCODEHASH, 1)?;
        self.charge(U256::from(self.schedule().extcodehash_gas))?;
        let addr = u256_to_address(self.stack.pop_back());
        let hash = match self.world.get_account(&addr) {
            Some(_) => self.world.get_code_hash(&addr),
            None => H256::zero(),
        };
        self.stack.push(U256::from_big_endian(hash.as_bytes()));
        Ok(())
    }

    fn exec_blockhash(&mut self) -> VmResult<()> {
        self.require(BLOCKHASH, 1)?;
        self.charge(U256::from(self.schedule().blockhash_gas))?;
        let number = self.stack.pop_back();
        let hash = self.env.block_header.blockhash(number);
        self.stack.push(U256::from_big_endian(hash.as_bytes()));
        Ok(())
    }

    fn exec_mload(&mut self) -> VmResult<()> {
        self.require(MLOAD, 1)?;
        let offset = *self.stack.peek(0);
        let range = self.mem_range(offset, U256::from(32))?;
        self.charge_mem_expansion(range)?;
        self.charge(U256::from(self.schedule().tier_step_gas[2]))?;
        self.memory.expand(range);
        self.stack.pop_back();
        self.stack.push(self.memory.read(range.offset));
        Ok(())
    }

    fn exec_mstore(&mut self) -> VmResult<()> {
        self.require(MSTORE, 2)?;
        let offset = *self.stack.peek(0);
        let range = self.mem_range(offset, U256::from(32))?;
        self.charge_mem_expansion(range)?;
        self.charge(U256::from(self.schedule().tier_step_gas[2]))?;
        self.memory.expand(range);
        self.stack.pop_back();
        let value = self.stack.pop_back();
        self.memory.write(range.offset, value);
        Ok(())
    }

    fn exec_mstore8(&mut self) -> VmResult<()> {
        self.require(MSTORE8, 2)?;
        let offset = *self.stack.peek(0);
        let range = self.mem_range(offset, U256::from(1))?;
        self.charge_mem_expansion(range)?;
        self.charge(U256::from(self.schedule().tier_step_gas[2]))?;
        self.memory.expand(range);
        self.stack.pop_back();
        let value = self.stack.pop_back();
        self.memory.write_byte(range.offset, value.low_u32() as u8);
        Ok(())
    }

    fn exec_sload(&mut self) -> VmResult<()> {
        self.require(SLOAD, 1)?;
        self.charge(U256::from(self.schedule().sload_gas))?;
        let key = H256::from_uint(&self.stack.pop_back());
        let value = self.world.get_storage(&self.env.owner, &key);
        self.stack.push(U256::from_big_endian(value.as_bytes()));
        Ok(())
    }

    fn exec_sstore(&mut self) -> VmResult<()> {
        if self.env.is_static {
            return Err(Error::MutableCallInStaticContext);
        }
        self.require(SSTORE, 2)?;
        let key = H256::from_uint(&self.stack.pop_back());
        let value = H256::from_uint(&self.stack.pop_back());
        let current = self.world.get_storage(&self.env.owner, &key);
        let schedule = self.schedule().clone();
        let (cost, refund) = Gasometer::sstore_gas(&schedule, current, value);
        self.charge(cost)?;
        self.gas_refund += refund;
        self.world = self.world.clone().save_storage(self.env.owner, key, value);
        Ok(())
    }

    fn exec_log(&mut self, op: u8) -> VmResult<StepOutcome> {
        if self.env.is_static {
            return Err(Error::MutableCallInStaticContext);
        }
        let topic_count = instructions::log_topics(op);
        self.require(op, topic_count + 2)?;
        let offset = *self.stack.peek(0);
        let size = *self.stack.peek(1);
        let range = self.mem_range(offset, size)?;
        let schedule = self.schedule().clone();
        let expansion = self.gasometer.mem_expansion_gas(&schedule, range);
        let cost = expansion + Gasometer::log_gas_cost(&schedule, topic_count, range.size);
        self.charge(cost)?;
        self.memory.expand(range);
        self.stack.pop_back();
        self.stack.pop_back();
        let mut topics = Vec::with_capacity(topic_count);
        for _ in 0..topic_count {
            topics.push(H256::from_uint(&self.stack.pop_back()));
        }
        let data = self.memory.read_slice(range.offset, range.size).to_vec();
        self.logs.push(LogEntry {
            address: self.env.owner,
            topics,
            data,
        });
        Ok(StepOutcome::Continue)
    }

    fn exec_halt_with_return(&mut self, apply_state: bool) -> VmResult<StepOutcome> {
        self.require(if apply_state { RETURN } else { REVERT }, 2)?;
        let offset = *self.stack.peek(0);
        let size = *self.stack.peek(1);
        let range = self.mem_range(offset, size)?;
        self.charge_mem_expansion(range)?;
        self.memory.expand(range);
        self.stack.pop_back();
        self.stack.pop_back();
        let data = self
            .memory
            .clone()
            .into_return_data(range.offset, range.size);
        Ok(StepOutcome::Halt(self.gas, data, apply_state))
    }

    fn exec_selfdestruct(&mut self) -> VmResult<StepOutcome> {
        if self.env.is_static {
            return Err(Error::MutableCallInStaticContext);
        }
        self.require(SELFDESTRUCT, 1)?;
        let beneficiary = u256_to_address(self.stack.pop_back());
        let schedule = self.schedule().clone();
        let balance = self.world.get_balance(&self.env.owner);

        let mut cost = U256::from(schedule.suicide_gas);
        let beneficiary_exists = self.world.get_account(&beneficiary).is_some();
        if schedule.no_empty {
            if !beneficiary_exists && !balance.is_zero() {
                cost += U256::from(schedule.suicide_to_new_account_cost);
            }
        } else if !beneficiary_exists {
            cost += U256::from(schedule.suicide_to_new_account_cost);
        }
        self.charge(cost)?;

        if self.env.owner != beneficiary {
            self.world = self.world.clone().transfer(self.env.owner, beneficiary, balance);
        }
        if self.addresses_to_delete.insert(self.env.owner) {
            self.gas_refund += U256::from(schedule.suicide_refund_gas);
        }
        Ok(StepOutcome::Halt(self.gas, ReturnData::empty(), true))
    }

    fn exec_call(&mut self, call_type: CallType) -> VmResult<StepOutcome> {
        let has_value_arg = matches!(call_type, CallType::Call | CallType::CallCode);
        let args = if has_value_arg { 7 } else { 6 };
        self.require(CALL, args)?;

        let gas_requested = *self.stack.peek(0);
        let to = u256_to_address(*self.stack.peek(1));
        let value = if has_value_arg {
            *self.stack.peek(2)
        } else {
            U256::zero()
        };
        let (in_off, in_size, out_off, out_size) = if has_value_arg {
            (
                *self.stack.peek(3),
                *self.stack.peek(4),
                *self.stack.peek(5),
                *self.stack.peek(6),
            )
        } else {
            (
                *self.stack.peek(2),
                *self.stack.peek(3),
                *self.stack.peek(4),
                *self.stack.peek(5),
            )
        };

        if matches!(call_type, CallType::Call) && self.env.is_static && !value.is_zero() {
            return Err(Error::MutableCallInStaticContext);
        }

        let in_range = self.mem_range(in_off, in_size)?;
        let out_range = self.mem_range(out_off, out_size)?;
        let schedule = self.schedule().clone();
        let expansion_in = self.gasometer.mem_expansion_gas(&schedule, in_range);
        let expansion_out = self.gasometer.mem_expansion_gas(&schedule, out_range);

        let value_nonzero = has_value_arg && !value.is_zero();
        let new_account = call_type == CallType::Call
            && value_nonzero
            && self.world.get_account(&to).is_none();

        let mut cost = U256::from(schedule.call_gas) + expansion_in + expansion_out;
        if value_nonzero {
            cost += U256::from(schedule.call_value_transfer_gas);
        }
        if new_account {
            cost += U256::from(schedule.call_new_account_gas);
        }
        self.charge(cost)?;
        self.memory.expand(in_range);
        self.memory.expand(out_range);

        for _ in 0..args {
            self.stack.pop_back();
        }

        let available = self.gas;
        let stipend = Gasometer::gas_cap(&schedule, available, Some(gas_requested));
        let call_gas = if value_nonzero {
            stipend + U256::from(schedule.call_stipend)
        } else {
            stipend
        };

        if self.env.call_depth + 1 > schedule.max_depth
            || (value_nonzero && self.world.get_balance(&self.env.owner) < value)
        {
            self.stack.push(U256::zero());
            self.return_data = ReturnData::empty();
            return Ok(StepOutcome::Continue);
        }

        self.charge(stipend)?;

        let input = self
            .memory
            .read_slice(in_range.offset, in_range.size)
            .to_vec();

        let owner = if call_type.uses_caller_storage() {
            self.env.owner
        } else {
            to
        };
        let caller = if matches!(call_type, CallType::DelegateCall) {
            self.env.caller
        } else {
            self.env.owner
        };
        let frame_value = match call_type {
            CallType::Call => ActionValue::Transfer(value),
            CallType::CallCode => ActionValue::Apparent(value),
            CallType::DelegateCall => self.env.value,
            CallType::StaticCall | CallType::None => ActionValue::Apparent(U256::zero()),
        };

        debug!("{:?} to {:?} gas={} value={}", call_type, to, call_gas, value);

        if self.env.evm_config.trace_internal_transactions {
            self.internal_txs.push(InternalTransaction {
                kind: InternalTransactionKind::Call,
                from: self.env.owner,
                to: Some(to),
                value: frame_value.value(),
                gas_limit: call_gas,
            });
        }

        let mut world = self.world.clone();
        if call_type == CallType::Call && !value.is_zero() {
            world = world.transfer(self.env.owner, to, value);
        }

        let result = if self.precompiles.is_precompile(&to) {
            match self.precompiles.execute(&to, &input, call_gas) {
                Ok((gas_left, data)) => {
                    // Precompile ran: the value transfer computed into `world`
                    // above takes effect.
                    self.world = world;
                    let len = data.len();
                    MessageCallResult::Success(gas_left, ReturnData::new(data, 0, len))
                }
                Err(_) => MessageCallResult::Failed,
            }
        } else {
            let code_hash = world.get_code_hash(&to);
            let code = world.get_code(&to);
            let program = self.cache.get(code_hash, &code);
            let env = ExecEnv {
                owner,
                caller,
                origin: self.env.origin,
                input_data: Arc::new(input),
                value: frame_value,
                program,
                gas_price: self.env.gas_price,
                start_gas: call_gas,
                block_header: self.env.block_header.clone(),
                call_depth: self.env.call_depth + 1,
                call_type,
                is_static: self.env.is_static || matches!(call_type, CallType::StaticCall),
                evm_config: self.env.evm_config.clone(),
            };
            let sub_result = execute(env, world, self.precompiles, self.cache);
            self.merge_child(&sub_result);
            match sub_result.error {
                None => MessageCallResult::Success(sub_result.gas_remaining, sub_result.return_data),
                Some(Error::Reverted) => {
                    MessageCallResult::Reverted(sub_result.gas_remaining, sub_result.return_data)
                }
                Some(_) => MessageCallResult::Failed,
            }
        };

        match result {
            MessageCallResult::Success(gas_left, data) => {
                self.gas += gas_left;
                let len = cmp::min(out_range.size, data.len());
                self.memory.write_padded(out_range.offset, len, &data, 0);
                self.return_data = data;
                self.stack.push(U256::one());
            }
            MessageCallResult::Reverted(gas_left, data) => {
                self.gas += gas_left;
                let len = cmp::min(out_range.size, data.len());
                self.memory.write_padded(out_range.offset, len, &data, 0);
                self.return_data = data;
                self.stack.push(U256::zero());
            }
            MessageCallResult::Failed => {
                self.return_data = ReturnData::empty();
                self.stack.push(U256::zero());
            }
        }
        Ok(StepOutcome::Continue)
    }

    /// Folds a completed sub-frame's side effects into this frame. World,
    /// logs, addresses-to-delete and refund are adopted only on success:
    /// a REVERT or error discards the sub-frame's state changes entirely
    /// (§4.7 step 7). Internal-transaction traces survive regardless,
    /// since they don't affect consensus.
    fn merge_child(&mut self, sub_result: &ProgramResult<W>) {
        if sub_result.error.is_none() {
            self.world = sub_result.world.clone();
            self.addresses_to_delete
                .extend(sub_result.addresses_to_delete.iter().cloned());
            self.logs.extend(sub_result.logs.iter().cloned());
            self.gas_refund += sub_result.gas_refund;
        }
        self.internal_txs.extend(sub_result.internal_txs.iter().cloned());
    }

    fn exec_create(&mut self, is_create2: bool) -> VmResult<StepOutcome> {
        if self.env.is_static {
            return Err(Error::MutableCallInStaticContext);
        }
        let args = if is_create2 { 4 } else { 3 };
        self.require(CREATE, args)?;

        let value = *self.stack.peek(0);
        let mem_off = *self.stack.peek(1);
        let mem_size = *self.stack.peek(2);
        let salt = if is_create2 { *self.stack.peek(3) } else { U256::zero() };

        let range = self.mem_range(mem_off, mem_size)?;
        let schedule = self.schedule().clone();
        let expansion = self.gasometer.mem_expansion_gas(&schedule, range);
        let mut cost = U256::from(schedule.create_gas) + expansion;
        if is_create2 {
            cost += Gasometer::sha3_gas_cost(&schedule, range.size) - U256::from(schedule.sha3_gas);
        }
        self.charge(cost)?;
        self.memory.expand(range);

        for _ in 0..args {
            self.stack.pop_back();
        }

        let init_code = self.memory.read_slice(range.offset, range.size).to_vec();

        if self.env.call_depth + 1 > schedule.max_depth
            || self.world.get_balance(&self.env.owner) < value
        {
            self.stack.push(U256::zero());
            self.return_data = ReturnData::empty();
            return Ok(StepOutcome::Continue);
        }

        let new_address = if is_create2 {
            let code_hash = keccak(&init_code);
            self.world
                .create2_address(self.env.owner, H256::from_uint(&salt), code_hash)
        } else {
            self.world.create_address(self.env.owner)
        };

        self.world = self.world.clone().increase_nonce(self.env.owner);

        let collision = self.world.non_empty_code_or_nonce_account(&new_address);
        let effective_init_code = if collision {
            warn!("CREATE address collision at {:?}", new_address);
            vec![INVALID]
        } else {
            init_code
        };

        let available = self.gas;
        let create_gas = Gasometer::gas_cap(&schedule, available, None);
        self.charge(create_gas)?;

        debug!(
            "CREATE{} depth={} address={:?} gas={}",
            if is_create2 { "2" } else { "" },
            self.env.call_depth,
            new_address,
            create_gas
        );

        if self.env.evm_config.trace_internal_transactions {
            self.internal_txs.push(InternalTransaction {
                kind: InternalTransactionKind::Create,
                from: self.env.owner,
                to: Some(new_address),
                value,
                gas_limit: create_gas,
            });
        }

        let mut world = self
            .world
            .clone()
            .initialise_account(new_address)
            .transfer(self.env.owner, new_address, value);

        let program = Arc::new(Program::new(effective_init_code));
        let env = ExecEnv {
            owner: new_address,
            caller: self.env.owner,
            origin: self.env.origin,
            input_data: Arc::new(Vec::new()),
            value: ActionValue::Transfer(value),
            program,
            gas_price: self.env.gas_price,
            start_gas: create_gas,
            block_header: self.env.block_header.clone(),
            call_depth: self.env.call_depth + 1,
            call_type: CallType::None,
            is_static: false,
            evm_config: self.env.evm_config.clone(),
        };
        let sub_result = execute(env, world.clone(), self.precompiles, self.cache);
        world = sub_result.world.clone();
        self.internal_txs.extend(sub_result.internal_txs.iter().cloned());

        let create_result = match &sub_result.error {
            None => {
                let code = sub_result.return_data.to_vec();
                self.finalize_deposit(&mut world, new_address, code, sub_result.gas_remaining)
            }
            Some(Error::Reverted) => {
                ContractCreateResult::Reverted(sub_result.gas_remaining, sub_result.return_data.clone())
            }
            Some(_) => ContractCreateResult::Failed,
        };

        match create_result {
            ContractCreateResult::Created(address, gas_left) => {
                self.world = world;
                self.addresses_to_delete
                    .extend(sub_result.addresses_to_delete.iter().cloned());
                self.logs.extend(sub_result.logs.iter().cloned());
                self.gas_refund += sub_result.gas_refund;
                self.gas += gas_left;
                self.return_data = ReturnData::empty();
                self.stack.push(address_to_u256(address));
            }
            ContractCreateResult::Reverted(gas_left, data) => {
                self.gas += gas_left;
                self.return_data = data;
                self.stack.push(U256::zero());
            }
            ContractCreateResult::Failed => {
                self.return_data = ReturnData::empty();
                self.stack.push(U256::zero());
            }
        }
        Ok(StepOutcome::Continue)
    }

    /// EIP-170/EIP-3541 deposit gate plus the deposit-gas debit (§4.8
    /// steps 8-9).
    fn finalize_deposit(
        &self,
        world: &mut W,
        address: Address,
        code: Bytes,
        gas_remaining: U256,
    ) -> ContractCreateResult {
        let schedule = self.schedule();
        if schedule.create_data_limit != usize::max_value() && code.len() > schedule.create_data_limit
        {
            return ContractCreateResult::Failed;
        }
        if !code.is_empty() && code[0] == 0xef {
            return ContractCreateResult::Failed;
        }
        let deposit_cost = U256::from(schedule.create_data_gas) * U256::from(code.len());
        if gas_remaining >= deposit_cost {
            *world = world.clone().save_code(address, code);
            ContractCreateResult::Created(address, gas_remaining - deposit_cost)
        } else if schedule.exceptional_failed_code_deposit {
            ContractCreateResult::Failed
        } else {
            ContractCreateResult::Created(address, gas_remaining)
        }
    }
}

/// What a single `step()` produced.
enum StepOutcome {
    /// Keep executing at the (possibly jumped-to) program counter.
    Continue,
    /// Frame halted: gas left, return data, and whether state changes
    /// apply (RETURN/STOP => true, REVERT => false).
    Halt(U256, ReturnData, bool),
}

#[cfg(test)]
mod tests {
    use super::*;
    use vm::{test_utils::InMemoryWorldState, BlockHeader, EvmConfig, Schedule};

    fn env(code: Vec<u8>, owner: Address, gas: U256) -> ExecEnv {
        ExecEnv {
            owner,
            caller: Address::zero(),
            origin: Address::zero(),
            input_data: Arc::new(Vec::new()),
            value: ActionValue::Transfer(U256::zero()),
            program: Arc::new(Program::new(code)),
            gas_price: U256::one(),
            start_gas: gas,
            block_header: BlockHeader {
                author: Address::zero(),
                timestamp: 0,
                number: 1,
                difficulty: U256::zero(),
                gas_limit: U256::from(8_000_000),
                last_hashes: Arc::new(Vec::new()),
            },
            call_depth: 0,
            call_type: CallType::None,
            is_static: false,
            evm_config: Arc::new(EvmConfig::new(Schedule::new_constantinople())),
        }
    }

    fn run(code: Vec<u8>, gas: U256) -> ProgramResult<InMemoryWorldState> {
        let owner = Address::from_low_u64_be(1);
        let cache = SharedCache::default();
        let precompiles = vm::NoPrecompiles;
        execute(
            env(code, owner, gas),
            InMemoryWorldState::new(),
            &precompiles,
            &cache,
        )
    }

    #[test]
    fn s1_simple_return() {
        // PUSH1 23, PUSH1 0, MSTORE, PUSH1 32, PUSH1 0, RETURN
        let code = vec![0x60, 0x17, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3];
        let result = run(code, U256::from(100_000));
        assert!(result.error.is_none());
        assert_eq!(result.return_data.len(), 32);
        assert_eq!(result.return_data[31], 23);
    }

    #[test]
    fn s2_division_by_zero() {
        // PUSH1 0, PUSH1 5, DIV, PUSH1 0, MSTORE, PUSH1 32, PUSH1 0, RETURN
        let code = vec![
            0x60, 0x00, 0x60, 0x05, 0x04, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3,
        ];
        let result = run(code, U256::from(100_000));
        assert!(result.error.is_none());
        assert_eq!(U256::from_big_endian(&result.return_data), U256::zero());
    }

    #[test]
    fn s3_revert_with_message() {
        // PUSH1 42, PUSH1 0, MSTORE, PUSH1 32, PUSH1 0, REVERT
        let code = vec![
            0x60, 0x2a, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xfd,
        ];
        let result = run(code, U256::from(100_000));
        assert_eq!(result.error, Some(Error::Reverted));
        assert_eq!(result.return_data.len(), 32);
        assert_eq!(result.return_data[31], 42);
    }

    #[test]
    fn s4_invalid_jump() {
        // PUSH1 0x05, JUMP  (code[5] is not JUMPDEST)
        let code = vec![0x60, 0x05, 0x56, 0x00, 0x00, 0x00];
        let result = run(code, U256::from(100_000));
        assert_eq!(result.error, Some(Error::BadJumpDestination { destination: 5 }));
    }

    #[test]
    fn stop_on_empty_code() {
        let result = run(Vec::new(), U256::from(21_000));
        assert!(result.error.is_none());
        assert_eq!(result.return_data.len(), 0);
    }

    #[test]
    fn out_of_gas_halts() {
        // PUSH1 1, PUSH1 1, ADD with 1 gas.
        let code = vec![0x60, 0x01, 0x60, 0x01, 0x01];
        let result = run(code, U256::from(1));
        assert_eq!(result.error, Some(Error::OutOfGas));
    }

    #[test]
    fn revert_preserves_return_data() {
        // PUSH1 0, PUSH1 0, REVERT
        let code = vec![0x60, 0x00, 0x60, 0x00, 0xfd];
        let result = run(code, U256::from(100_000));
        assert_eq!(result.error, Some(Error::Reverted));
    }

    #[test]
    fn s5_create_deploys_runtime_code() {
        // Init code that returns a single 0x01 byte:
        // PUSH1 1, PUSH1 0, MSTORE8, PUSH1 1, PUSH1 0, RETURN
        let init: Vec<u8> = vec![0x60, 0x01, 0x60, 0x00, 0x53, 0x60, 0x01, 0x60, 0x00, 0xf3];

        // Outer code: copy `init` into memory via CODECOPY, then CREATE it.
        let mut code = vec![
            0x60, init.len() as u8, // PUSH1 len
            0x60, 0x0d, // PUSH1 src offset (index of init code, patched below)
            0x60, 0x00, // PUSH1 dest offset
            0x39, // CODECOPY
            0x60, 0x00, // PUSH1 value
            0x60, init.len() as u8, // PUSH1 size
            0x60, 0x00, // PUSH1 offset
            0xf0, // CREATE
        ];
        let src_offset = code.len() as u8;
        code[3] = src_offset; // fix up the CODECOPY source offset
        code.extend_from_slice(&init);

        let owner = Address::from_low_u64_be(1);
        let cache = SharedCache::default();
        let precompiles = vm::NoPrecompiles;
        let world = InMemoryWorldState::new().with_balance(owner, U256::from(1_000_000));
        let predicted = world.create_address(owner);
        let result = execute(
            env(code, owner, U256::from(1_000_000)),
            world,
            &precompiles,
            &cache,
        );
        assert!(result.error.is_none());
        assert_eq!(&*result.world.get_code(&predicted), &vec![0x01u8]);
    }

    #[test]
    fn s6_create_collision_yields_invalid_init_code() {
        // An account with existing code already occupies the address CREATE
        // would derive (nonce 0 from owner), so the creation must fail by
        // substituting INVALID for the init code rather than running it.
        let owner = Address::from_low_u64_be(1);
        let cache = SharedCache::default();
        let precompiles = vm::NoPrecompiles;
        let mut world = InMemoryWorldState::new().with_balance(owner, U256::from(1_000_000));
        let predicted = world.create_address(owner);
        world = world.with_code(predicted, vec![0x00]);

        // PUSH1 0 size, PUSH1 0 offset, PUSH1 0 value, CREATE
        let code = vec![0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0xf0];
        let result = execute(
            env(code, owner, U256::from(1_000_000)),
            world,
            &precompiles,
            &cache,
        );
        assert!(result.error.is_none());
    }
}
