#[macro_use]
extern crate log;

mod conf;

use bitscript::script::{decode_bool, eval, EvaluationContext, ScriptError, SigVersion};
use bitscript::script::{RuleFlags, Script, TransactionlessChecker};
use bitscript::transaction::{Tx, TxOut};
use bitscript::{Amount, Error, Result, Serializable};
use conf::{Command, Opt};
use std::io::Cursor;
use std::process;
use structopt::StructOpt;

/// Runs a script on the given stack and prints the final stack, top last
fn eval_script(script: &str, stack: &[String], flags: RuleFlags) -> Result<()> {
    let script = hex::decode(script)?;
    let mut items = Vec::with_capacity(stack.len());
    for item in stack.iter() {
        items.push(hex::decode(item)?);
    }
    debug!("Evaluating {:?}", Script(script.clone()));
    let mut ctx = EvaluationContext::with_stack(items, flags, SigVersion::Base);
    let mut checker = TransactionlessChecker {};
    eval(&script, &mut ctx, &mut checker)?;
    for item in ctx.stack().iter() {
        println!("{}", hex::encode(item));
    }
    match ctx.stack().last() {
        Some(top) if decode_bool(top) => Ok(()),
        _ => Err(Error::ScriptError(ScriptError::EvalFalse)),
    }
}

fn verify_input(tx: &str, input: usize, pk_script: &str, amount: i64, flags: RuleFlags) -> Result<()> {
    let bytes = hex::decode(tx)?;
    let tx = Tx::read(&mut Cursor::new(&bytes))?;
    debug!("Verifying input {} of {:?}", input, tx);
    let prevout = TxOut {
        amount: Amount(amount),
        pk_script: Script(hex::decode(pk_script)?),
    };
    tx.verify_input(input, &prevout, flags)
}

///
/// Evaluate a script or verify a transaction input.
///
pub fn main() {
    let opt = Opt::from_args();

    let logger = stderrlog::new()
        .module(module_path!())
        .quiet(opt.quiet)
        .verbosity(opt.verbose + 1)
        .init();
    if let Err(e) = logger {
        eprintln!("Failed to initialize logging: {}", e);
    }

    trace!("Options {:?}", opt);

    let flags = opt.flags.flags();
    let result = match &opt.command {
        Command::Eval { script, stack } => eval_script(script, stack, flags),
        Command::Verify {
            tx,
            input,
            pk_script,
            amount,
        } => verify_input(tx, *input, pk_script, *amount, flags),
    };

    match result {
        Ok(()) => println!("ok"),
        Err(e) => {
            warn!("{}", e);
            println!("fail: {}", e);
            process::exit(1);
        }
    }
}
