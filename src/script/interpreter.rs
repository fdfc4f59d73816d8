use super::checker::{check_pubkey_encoding, check_signature_encoding, SEQUENCE_LOCKTIME_DISABLE_FLAG};
use super::number::{decode_bool, MAX_LOCKTIME_NUM_SIZE, MAX_NUM_SIZE};
use super::operation::{find_and_delete, Operation};
use super::{
    Checker, EvaluationContext, Opcode, RuleFlags, ScriptError, SigVersion,
    MAX_PUBKEYS_PER_MULTISIG, MAX_SCRIPT_ELEMENT_SIZE, MAX_SCRIPT_SIZE,
};
use crate::hash160::{hash160, ripemd160};
use crate::hash256::{sha1, sha256, sha256d};
use crate::result::{Error, Result};
use std::io::Cursor;

#[inline]
fn fail<T>(e: ScriptError) -> Result<T> {
    Err(Error::ScriptError(e))
}

/// Executes a script against the context, returning why it failed if it did
///
/// The whole script is decoded before anything runs, so a truncated push fails the script
/// even when it sits in a branch that would not execute. Success here only means no operation
/// failed. Whether the final stack is acceptable is for the caller to decide.
pub fn eval<T: Checker>(
    script: &[u8],
    ctx: &mut EvaluationContext,
    checker: &mut T,
) -> Result<()> {
    if script.len() > MAX_SCRIPT_SIZE {
        return fail(ScriptError::ScriptSize);
    }

    // Each operation with the offset just past it
    let mut ops = Vec::new();
    let mut cursor = Cursor::new(script);
    while (cursor.position() as usize) < script.len() {
        let op = Operation::read(&mut cursor)?;
        ops.push((op, cursor.position() as usize));
    }

    let flags = ctx.flags();
    let version = ctx.version();
    // Start of the script code signed by CHECKSIG
    let mut code_start = 0;

    for (op, end) in ops.iter() {
        let executing = ctx.executing();

        if op.data.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return fail(ScriptError::PushSize);
        }
        if op.is_counted() {
            ctx.count_ops(1)?;
        }
        if op.is_disabled() {
            return fail(ScriptError::DisabledOpcode);
        }
        if op.opcode == Opcode::OP_CODESEPARATOR
            && version == SigVersion::Base
            && flags.contains(RuleFlags::CONST_SCRIPTCODE)
        {
            return fail(ScriptError::CodeSeparator);
        }

        if executing && op.opcode.has_data() {
            if flags.contains(RuleFlags::MINIMALDATA) && !op.is_minimal_push() {
                return fail(ScriptError::MinimalData);
            }
            ctx.push(op.data.clone());
        } else if executing || op.is_conditional() {
            trace!("{:?}", op);
            step(op, *end, script, &mut code_start, ctx, checker)?;
        }

        ctx.check_stack_size()?;
    }

    if !ctx.conditions().closed() {
        return fail(ScriptError::UnbalancedConditional);
    }
    Ok(())
}

/// Executes a script, collapsing any failure to `false`
pub fn run<T: Checker>(script: &[u8], ctx: &mut EvaluationContext, checker: &mut T) -> bool {
    match eval(script, ctx, checker) {
        Ok(()) => true,
        Err(e) => {
            debug!("script failed: {}", e);
            false
        }
    }
}

/// Executes one operation that is not a data push
fn step<T: Checker>(
    op: &Operation,
    end: usize,
    script: &[u8],
    code_start: &mut usize,
    ctx: &mut EvaluationContext,
    checker: &mut T,
) -> Result<()> {
    let flags = ctx.flags();

    match op.opcode {
        Opcode::OP_0
        | Opcode::OP_PUSHBYTES(_)
        | Opcode::OP_PUSHDATA1
        | Opcode::OP_PUSHDATA2
        | Opcode::OP_PUSHDATA4 => {
            // Data pushes are handled by eval
            return Err(Error::BadArgument(format!("{} is not a step", op.opcode)));
        }
        Opcode::OP_1NEGATE
        | Opcode::OP_1
        | Opcode::OP_2
        | Opcode::OP_3
        | Opcode::OP_4
        | Opcode::OP_5
        | Opcode::OP_6
        | Opcode::OP_7
        | Opcode::OP_8
        | Opcode::OP_9
        | Opcode::OP_10
        | Opcode::OP_11
        | Opcode::OP_12
        | Opcode::OP_13
        | Opcode::OP_14
        | Opcode::OP_15
        | Opcode::OP_16 => ctx.push_num(op.opcode.small_int().unwrap_or_default()),

        // ------------------------------------------------------------------------------------
        // Control
        // ------------------------------------------------------------------------------------
        Opcode::OP_NOP => {}
        Opcode::OP_NOP1
        | Opcode::OP_NOP4
        | Opcode::OP_NOP5
        | Opcode::OP_NOP6
        | Opcode::OP_NOP7
        | Opcode::OP_NOP8
        | Opcode::OP_NOP9
        | Opcode::OP_NOP10 => discourage_nop(flags)?,
        Opcode::OP_CHECKLOCKTIMEVERIFY => {
            if !flags.contains(RuleFlags::CHECKLOCKTIMEVERIFY) {
                return discourage_nop(flags);
            }
            let locktime = ctx.peek_num(0, MAX_LOCKTIME_NUM_SIZE)?;
            if locktime < 0 {
                return fail(ScriptError::NegativeLocktime);
            }
            if !checker.check_locktime(locktime)? {
                return fail(ScriptError::UnsatisfiedLocktime);
            }
        }
        Opcode::OP_CHECKSEQUENCEVERIFY => {
            if !flags.contains(RuleFlags::CHECKSEQUENCEVERIFY) {
                return discourage_nop(flags);
            }
            let sequence = ctx.peek_num(0, MAX_LOCKTIME_NUM_SIZE)?;
            if sequence < 0 {
                return fail(ScriptError::NegativeLocktime);
            }
            // Disabled relative lock times behave as a NOP
            if sequence & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
                return Ok(());
            }
            if !checker.check_sequence(sequence)? {
                return fail(ScriptError::UnsatisfiedLocktime);
            }
        }
        Opcode::OP_IF | Opcode::OP_NOTIF => {
            let mut value = false;
            if ctx.executing() {
                let top = ctx
                    .peek(0)
                    .map_err(|_| Error::ScriptError(ScriptError::UnbalancedConditional))?;
                if ctx.version() == SigVersion::WitnessV0
                    && flags.contains(RuleFlags::MINIMALIF)
                    && (top.len() > 1 || (top.len() == 1 && top[0] != 1))
                {
                    return fail(ScriptError::MinimalIf);
                }
                value = decode_bool(top);
                if op.opcode == Opcode::OP_NOTIF {
                    value = !value;
                }
                ctx.pop()?;
            }
            ctx.conditions_mut().open(value);
        }
        Opcode::OP_ELSE => ctx.conditions_mut().negate()?,
        Opcode::OP_ENDIF => ctx.conditions_mut().close()?,
        Opcode::OP_VERIFY => {
            if !ctx.peek_bool(0)? {
                return fail(ScriptError::Verify);
            }
            ctx.pop()?;
        }
        Opcode::OP_RETURN => return fail(ScriptError::OpReturn),

        // ------------------------------------------------------------------------------------
        // Stack
        // ------------------------------------------------------------------------------------
        Opcode::OP_TOALTSTACK => ctx.to_alt()?,
        Opcode::OP_FROMALTSTACK => ctx.from_alt()?,
        Opcode::OP_2DROP => {
            ctx.require(2)?;
            ctx.pop()?;
            ctx.pop()?;
        }
        Opcode::OP_2DUP => {
            ctx.require(2)?;
            let second = ctx.peek(1)?.clone();
            let top = ctx.peek(0)?.clone();
            ctx.push(second);
            ctx.push(top);
        }
        Opcode::OP_3DUP => {
            ctx.require(3)?;
            let third = ctx.peek(2)?.clone();
            let second = ctx.peek(1)?.clone();
            let top = ctx.peek(0)?.clone();
            ctx.push(third);
            ctx.push(second);
            ctx.push(top);
        }
        Opcode::OP_2OVER => {
            ctx.require(4)?;
            let fourth = ctx.peek(3)?.clone();
            let third = ctx.peek(2)?.clone();
            ctx.push(fourth);
            ctx.push(third);
        }
        Opcode::OP_2ROT => {
            ctx.require(6)?;
            let sixth = ctx.erase(5)?;
            let fifth = ctx.erase(4)?;
            ctx.push(sixth);
            ctx.push(fifth);
        }
        Opcode::OP_2SWAP => {
            ctx.require(4)?;
            ctx.swap(3, 1)?;
            ctx.swap(2, 0)?;
        }
        Opcode::OP_IFDUP => {
            if ctx.peek_bool(0)? {
                let top = ctx.peek(0)?.clone();
                ctx.push(top);
            }
        }
        Opcode::OP_DEPTH => {
            let depth = ctx.len() as i64;
            ctx.push_num(depth);
        }
        Opcode::OP_DROP => {
            ctx.pop()?;
        }
        Opcode::OP_DUP => {
            let top = ctx.peek(0)?.clone();
            ctx.push(top);
        }
        Opcode::OP_NIP => {
            ctx.erase(1)?;
        }
        Opcode::OP_OVER => {
            let second = ctx.peek(1)?.clone();
            ctx.push(second);
        }
        Opcode::OP_PICK | Opcode::OP_ROLL => {
            ctx.require(2)?;
            let n = ctx.pop_num(MAX_NUM_SIZE)?;
            if n < 0 || n as usize >= ctx.len() {
                return fail(ScriptError::InvalidStackOperation);
            }
            let item = if op.opcode == Opcode::OP_PICK {
                ctx.peek(n as usize)?.clone()
            } else {
                ctx.erase(n as usize)?
            };
            ctx.push(item);
        }
        Opcode::OP_ROT => {
            ctx.require(3)?;
            ctx.swap(2, 1)?;
            ctx.swap(1, 0)?;
        }
        Opcode::OP_SWAP => ctx.swap(0, 1)?,
        Opcode::OP_TUCK => {
            ctx.require(2)?;
            let top = ctx.peek(0)?.clone();
            ctx.insert(2, top)?;
        }
        Opcode::OP_SIZE => {
            let size = ctx.peek(0)?.len() as i64;
            ctx.push_num(size);
        }

        // ------------------------------------------------------------------------------------
        // Bitwise logic
        // ------------------------------------------------------------------------------------
        Opcode::OP_EQUAL | Opcode::OP_EQUALVERIFY => {
            ctx.require(2)?;
            let b = ctx.pop()?;
            let a = ctx.pop()?;
            let equal = a == b;
            if op.opcode == Opcode::OP_EQUALVERIFY {
                if !equal {
                    return fail(ScriptError::EqualVerify);
                }
            } else {
                ctx.push_bool(equal);
            }
        }

        // ------------------------------------------------------------------------------------
        // Arithmetic
        // ------------------------------------------------------------------------------------
        Opcode::OP_1ADD
        | Opcode::OP_1SUB
        | Opcode::OP_NEGATE
        | Opcode::OP_ABS
        | Opcode::OP_NOT
        | Opcode::OP_0NOTEQUAL => {
            let x = ctx.pop_num(MAX_NUM_SIZE)?;
            let result = match op.opcode {
                Opcode::OP_1ADD => x + 1,
                Opcode::OP_1SUB => x - 1,
                Opcode::OP_NEGATE => -x,
                Opcode::OP_ABS => x.abs(),
                Opcode::OP_NOT => (x == 0) as i64,
                _ => (x != 0) as i64,
            };
            ctx.push_num(result);
        }
        Opcode::OP_ADD
        | Opcode::OP_SUB
        | Opcode::OP_BOOLAND
        | Opcode::OP_BOOLOR
        | Opcode::OP_NUMEQUAL
        | Opcode::OP_NUMEQUALVERIFY
        | Opcode::OP_NUMNOTEQUAL
        | Opcode::OP_LESSTHAN
        | Opcode::OP_GREATERTHAN
        | Opcode::OP_LESSTHANOREQUAL
        | Opcode::OP_GREATERTHANOREQUAL
        | Opcode::OP_MIN
        | Opcode::OP_MAX => {
            ctx.require(2)?;
            let a = ctx.peek_num(1, MAX_NUM_SIZE)?;
            let b = ctx.peek_num(0, MAX_NUM_SIZE)?;
            ctx.pop()?;
            ctx.pop()?;
            let result = match op.opcode {
                Opcode::OP_ADD => a + b,
                Opcode::OP_SUB => a - b,
                Opcode::OP_BOOLAND => (a != 0 && b != 0) as i64,
                Opcode::OP_BOOLOR => (a != 0 || b != 0) as i64,
                Opcode::OP_NUMEQUAL | Opcode::OP_NUMEQUALVERIFY => (a == b) as i64,
                Opcode::OP_NUMNOTEQUAL => (a != b) as i64,
                Opcode::OP_LESSTHAN => (a < b) as i64,
                Opcode::OP_GREATERTHAN => (a > b) as i64,
                Opcode::OP_LESSTHANOREQUAL => (a <= b) as i64,
                Opcode::OP_GREATERTHANOREQUAL => (a >= b) as i64,
                Opcode::OP_MIN => a.min(b),
                _ => a.max(b),
            };
            if op.opcode == Opcode::OP_NUMEQUALVERIFY {
                if result == 0 {
                    return fail(ScriptError::NumEqualVerify);
                }
            } else {
                ctx.push_num(result);
            }
        }
        Opcode::OP_WITHIN => {
            ctx.require(3)?;
            let x = ctx.peek_num(2, MAX_NUM_SIZE)?;
            let min = ctx.peek_num(1, MAX_NUM_SIZE)?;
            let max = ctx.peek_num(0, MAX_NUM_SIZE)?;
            ctx.pop()?;
            ctx.pop()?;
            ctx.pop()?;
            ctx.push_bool(min <= x && x < max);
        }

        // ------------------------------------------------------------------------------------
        // Crypto
        // ------------------------------------------------------------------------------------
        Opcode::OP_RIPEMD160 => {
            let v = ctx.pop()?;
            ctx.push(ripemd160(&v).to_vec());
        }
        Opcode::OP_SHA1 => {
            let v = ctx.pop()?;
            ctx.push(sha1(&v).to_vec());
        }
        Opcode::OP_SHA256 => {
            let v = ctx.pop()?;
            ctx.push(sha256(&v).to_vec());
        }
        Opcode::OP_HASH160 => {
            let v = ctx.pop()?;
            ctx.push(hash160(&v).0.to_vec());
        }
        Opcode::OP_HASH256 => {
            let v = ctx.pop()?;
            ctx.push(sha256d(&v).0.to_vec());
        }
        Opcode::OP_CODESEPARATOR => *code_start = end,
        Opcode::OP_CHECKSIG | Opcode::OP_CHECKSIGVERIFY => {
            ctx.require(2)?;
            let sig = ctx.peek(1)?.clone();
            let pubkey = ctx.peek(0)?.clone();

            let mut script_code = script[*code_start..].to_vec();
            if ctx.version() == SigVersion::Base {
                let found = find_and_delete(&mut script_code, &Operation::push(&sig).to_bytes());
                if found > 0 && flags.contains(RuleFlags::CONST_SCRIPTCODE) {
                    return fail(ScriptError::SigFindAndDelete);
                }
            }

            check_signature_encoding(&sig, flags)?;
            check_pubkey_encoding(&pubkey, flags, ctx.version())?;
            let success = checker.check_sig(&sig, &pubkey, &script_code, ctx.version())?;
            if !success && flags.contains(RuleFlags::NULLFAIL) && !sig.is_empty() {
                return fail(ScriptError::SigNullFail);
            }

            ctx.pop()?;
            ctx.pop()?;
            if op.opcode == Opcode::OP_CHECKSIGVERIFY {
                if !success {
                    return fail(ScriptError::CheckSigVerify);
                }
            } else {
                ctx.push_bool(success);
            }
        }
        Opcode::OP_CHECKMULTISIG | Opcode::OP_CHECKMULTISIGVERIFY => {
            let success = check_multisig(&script[*code_start..], ctx, checker)?;
            if op.opcode == Opcode::OP_CHECKMULTISIGVERIFY {
                if !success {
                    return fail(ScriptError::CheckMultisigVerify);
                }
            } else {
                ctx.push_bool(success);
            }
        }

        // ------------------------------------------------------------------------------------
        // Invalid
        // ------------------------------------------------------------------------------------
        Opcode::OP_CAT
        | Opcode::OP_SUBSTR
        | Opcode::OP_LEFT
        | Opcode::OP_RIGHT
        | Opcode::OP_INVERT
        | Opcode::OP_AND
        | Opcode::OP_OR
        | Opcode::OP_XOR
        | Opcode::OP_2MUL
        | Opcode::OP_2DIV
        | Opcode::OP_MUL
        | Opcode::OP_DIV
        | Opcode::OP_MOD
        | Opcode::OP_LSHIFT
        | Opcode::OP_RSHIFT => return fail(ScriptError::DisabledOpcode),
        Opcode::OP_RESERVED
        | Opcode::OP_VER
        | Opcode::OP_VERIF
        | Opcode::OP_VERNOTIF
        | Opcode::OP_RESERVED1
        | Opcode::OP_RESERVED2
        | Opcode::OP_UNKNOWN(_) => return fail(ScriptError::BadOpcode),
    }
    Ok(())
}

#[inline]
fn discourage_nop(flags: RuleFlags) -> Result<()> {
    if flags.contains(RuleFlags::DISCOURAGE_UPGRADABLE_NOPS) {
        return fail(ScriptError::DiscourageUpgradableNops);
    }
    Ok(())
}

/// Runs CHECKMULTISIG, leaving the stack without its arguments
///
/// Stack layout, top first: key count, keys, signature count, signatures, and one unused
/// element. Signatures must appear in the same order as their keys.
fn check_multisig<T: Checker>(
    script: &[u8],
    ctx: &mut EvaluationContext,
    checker: &mut T,
) -> Result<bool> {
    let flags = ctx.flags();
    let version = ctx.version();

    // Depth of the element after the one being read
    let mut i = 1;
    ctx.require(i)?;
    let n_keys = ctx.peek_num(i - 1, MAX_NUM_SIZE)?;
    if n_keys < 0 || n_keys > MAX_PUBKEYS_PER_MULTISIG as i64 {
        return fail(ScriptError::PubkeyCount);
    }
    let mut n_keys = n_keys as usize;
    // Each key is a potential signature check
    ctx.count_ops(n_keys)?;
    i += 1;
    let mut ikey = i;
    // Elements left to pop before the signatures, used for NULLFAIL
    let mut ikey2 = n_keys + 2;
    i += n_keys;

    ctx.require(i)?;
    let n_sigs = ctx.peek_num(i - 1, MAX_NUM_SIZE)?;
    if n_sigs < 0 || n_sigs as usize > n_keys {
        return fail(ScriptError::SigCount);
    }
    let mut n_sigs = n_sigs as usize;
    i += 1;
    let mut isig = i;
    i += n_sigs;
    ctx.require(i)?;

    let mut script_code = script.to_vec();
    if version == SigVersion::Base {
        for k in 0..n_sigs {
            let sig = Operation::push(ctx.peek(isig + k - 1)?).to_bytes();
            let found = find_and_delete(&mut script_code, &sig);
            if found > 0 && flags.contains(RuleFlags::CONST_SCRIPTCODE) {
                return fail(ScriptError::SigFindAndDelete);
            }
        }
    }

    let mut success = true;
    while success && n_sigs > 0 {
        let sig = ctx.peek(isig - 1)?.clone();
        let pubkey = ctx.peek(ikey - 1)?.clone();
        check_signature_encoding(&sig, flags)?;
        check_pubkey_encoding(&pubkey, flags, version)?;
        if checker.check_sig(&sig, &pubkey, &script_code, version)? {
            isig += 1;
            n_sigs -= 1;
        }
        ikey += 1;
        n_keys -= 1;
        // Not enough keys left for the remaining signatures
        if n_sigs > n_keys {
            success = false;
        }
    }

    // Pop everything but the unused element
    for _ in 1..i {
        if !success && flags.contains(RuleFlags::NULLFAIL) && ikey2 == 0 && !ctx.peek(0)?.is_empty() {
            return fail(ScriptError::SigNullFail);
        }
        if ikey2 > 0 {
            ikey2 -= 1;
        }
        ctx.pop()?;
    }

    // Extra element consumed by the historical off-by-one
    if flags.contains(RuleFlags::NULLDUMMY) && !ctx.peek(0)?.is_empty() {
        return fail(ScriptError::SigNullDummy);
    }
    ctx.pop()?;
    Ok(success)
}
