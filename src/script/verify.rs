//! Full spend verification: signature script, output script, P2SH and witness programs

use super::op_codes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160};
use super::standard::{is_pay_to_script_hash, is_push_only, witness_program};
use super::{
    eval, Checker, EvaluationContext, Operation, RuleFlags, ScriptError, SigVersion,
    MAX_SCRIPT_ELEMENT_SIZE,
};
use crate::hash256::sha256;
use crate::result::{Error, Result};

#[inline]
fn fail<T>(e: ScriptError) -> Result<T> {
    Err(Error::ScriptError(e))
}

/// Verifies that a signature script and witness satisfy an output script
///
/// The signature script runs first and the output script runs on the stack it leaves. Under
/// P2SH the redeem script then runs on a copy of the signature script's stack. Witness programs
/// are checked against `witness` under WITNESS.
///
/// Fails with [`Error::BadArgument`] if CLEANSTACK is set without both P2SH and WITNESS, or
/// WITNESS without P2SH.
pub fn verify_script<T: Checker>(
    script_sig: &[u8],
    script_pubkey: &[u8],
    witness: &[Vec<u8>],
    flags: RuleFlags,
    checker: &mut T,
) -> Result<()> {
    if flags.contains(RuleFlags::CLEANSTACK)
        && !flags.contains(RuleFlags::P2SH | RuleFlags::WITNESS)
    {
        let msg = "CLEANSTACK requires P2SH and WITNESS".to_string();
        return Err(Error::BadArgument(msg));
    }
    if flags.contains(RuleFlags::WITNESS) && !flags.contains(RuleFlags::P2SH) {
        return Err(Error::BadArgument("WITNESS requires P2SH".to_string()));
    }

    if flags.contains(RuleFlags::SIGPUSHONLY) && !is_push_only(script_sig) {
        return fail(ScriptError::SigPushOnly);
    }

    let mut ctx = EvaluationContext::new(flags, SigVersion::Base);
    eval(script_sig, &mut ctx, checker)?;

    let p2sh = flags.contains(RuleFlags::P2SH) && is_pay_to_script_hash(script_pubkey);
    let sig_stack = if p2sh {
        Some(ctx.stack().to_vec())
    } else {
        None
    };

    let mut ctx = EvaluationContext::with_stack(ctx.into_stack(), flags, SigVersion::Base);
    eval(script_pubkey, &mut ctx, checker)?;
    if ctx.is_empty() || !ctx.peek_bool(0)? {
        return fail(ScriptError::EvalFalse);
    }
    let mut stack = ctx.into_stack();

    let mut had_witness = false;
    if flags.contains(RuleFlags::WITNESS) {
        if let Some((version, program)) = witness_program(script_pubkey) {
            had_witness = true;
            if !script_sig.is_empty() {
                return fail(ScriptError::WitnessMalleated);
            }
            verify_witness_program(witness, version, program, flags, checker)?;
            // Leaves exactly one element for CLEANSTACK
            stack.truncate(1);
        }
    }

    if let Some(mut sig_stack) = sig_stack {
        if !is_push_only(script_sig) {
            return fail(ScriptError::SigPushOnly);
        }
        // Cannot be empty because the output script succeeded hashing its top element
        let redeem = sig_stack
            .pop()
            .ok_or(Error::ScriptError(ScriptError::InvalidStackOperation))?;
        let mut ctx = EvaluationContext::with_stack(sig_stack, flags, SigVersion::Base);
        eval(&redeem, &mut ctx, checker)?;
        if ctx.is_empty() || !ctx.peek_bool(0)? {
            return fail(ScriptError::EvalFalse);
        }
        stack = ctx.into_stack();

        if flags.contains(RuleFlags::WITNESS) {
            if let Some((version, program)) = witness_program(&redeem) {
                had_witness = true;
                if script_sig != Operation::push(&redeem).to_bytes().as_slice() {
                    return fail(ScriptError::WitnessMalleatedP2sh);
                }
                verify_witness_program(witness, version, program, flags, checker)?;
                stack.truncate(1);
            }
        }
    }

    if flags.contains(RuleFlags::CLEANSTACK) && stack.len() != 1 {
        return fail(ScriptError::CleanStack);
    }

    if flags.contains(RuleFlags::WITNESS) && !had_witness && !witness.is_empty() {
        return fail(ScriptError::WitnessUnexpected);
    }

    Ok(())
}

/// Verifies a witness program against its witness stack (BIP141)
fn verify_witness_program<T: Checker>(
    witness: &[Vec<u8>],
    version: u8,
    program: &[u8],
    flags: RuleFlags,
    checker: &mut T,
) -> Result<()> {
    if version != 0 {
        if flags.contains(RuleFlags::DISCOURAGE_UPGRADABLE_WITNESS_PROGRAM) {
            return fail(ScriptError::DiscourageUpgradableWitnessProgram);
        }
        // Reserved for soft forks
        return Ok(());
    }

    let (script, stack) = match program.len() {
        32 => {
            let (script, stack) = match witness.split_last() {
                Some(split) => split,
                None => return fail(ScriptError::WitnessProgramWitnessEmpty),
            };
            if sha256(script)[..] != *program {
                return fail(ScriptError::WitnessProgramMismatch);
            }
            (script.clone(), stack.to_vec())
        }
        20 => {
            if witness.len() != 2 {
                return fail(ScriptError::WitnessProgramMismatch);
            }
            let mut script = vec![OP_DUP, OP_HASH160];
            script.extend_from_slice(&Operation::push(program).to_bytes());
            script.push(OP_EQUALVERIFY);
            script.push(OP_CHECKSIG);
            (script, witness.to_vec())
        }
        _ => return fail(ScriptError::WitnessProgramWrongLength),
    };

    if stack.iter().any(|item| item.len() > MAX_SCRIPT_ELEMENT_SIZE) {
        return fail(ScriptError::PushSize);
    }

    let mut ctx = EvaluationContext::with_stack(stack, flags, SigVersion::WitnessV0);
    eval(&script, &mut ctx, checker)?;
    // Witness scripts always require a clean stack
    if ctx.len() != 1 {
        return fail(ScriptError::CleanStack);
    }
    if !ctx.peek_bool(0)? {
        return fail(ScriptError::EvalFalse);
    }
    Ok(())
}
