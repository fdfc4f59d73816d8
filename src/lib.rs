//! Bitcoin script evaluation and transaction input verification
//!
//! Scripts are decoded into [`script::Operation`]s and run by [`script::eval`] against an
//! [`script::EvaluationContext`]. Signature and lock time checks go through the
//! [`script::Checker`] trait so the interpreter never touches the transaction directly.
//! Full spends are verified by [`script::verify_script`], or per transaction with
//! [`transaction::Tx::verify_inputs`].

#[macro_use]
extern crate log;

pub mod amount;
pub mod hash160;
pub mod hash256;
pub mod p2pkh;
pub mod result;
pub mod script;
pub mod serdes;
pub mod sighash;
pub mod transaction;
pub mod var_int;

pub use amount::Amount;
pub use hash160::{hash160, Hash160};
pub use hash256::{sha256d, Hash256};
pub use result::{Error, Result};
pub use serdes::Serializable;
