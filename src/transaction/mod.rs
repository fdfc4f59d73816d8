//! Transactions, signing and input verification

use crate::hash256::Hash256;
use crate::result::Result;
use secp256k1::{Message, Secp256k1, SecretKey};

mod out_point;
mod tx;
mod tx_in;
mod tx_out;

pub use self::out_point::{OutPoint, COINBASE_OUTPOINT_HASH, COINBASE_OUTPOINT_INDEX};
pub use self::tx::Tx;
pub use self::tx_in::TxIn;
pub use self::tx_out::TxOut;

/// Generates a signature for a transaction sighash
///
/// The signature is DER encoded with a low S value and has the sighash type appended.
pub fn generate_signature(
    private_key: &[u8; 32],
    sighash: &Hash256,
    sighash_type: u8,
) -> Result<Vec<u8>> {
    let secp = Secp256k1::signing_only();
    let message = Message::from_slice(&sighash.0)?;
    let secret_key = SecretKey::from_slice(private_key)?;
    let mut signature = secp.sign_ecdsa(&message, &secret_key);
    signature.normalize_s();
    let mut sig = signature.serialize_der().to_vec();
    sig.push(sighash_type);
    Ok(sig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::hash160::hash160;
    use crate::hash256::sha256;
    use crate::p2pkh::{create_pk_script, create_sig_script};
    use crate::script::op_codes::*;
    use crate::script::{RuleFlags, Script, ScriptError, SigVersion};
    use crate::sighash::{sighash, SigHashCache, SIGHASH_ALL, SIGHASH_NONE};
    use secp256k1::ecdsa::Signature;
    use secp256k1::{PublicKey, SECP256K1};

    const AMOUNT: Amount = Amount(50_000);

    fn key(seed: u8) -> ([u8; 32], Vec<u8>) {
        let private_key = [seed; 32];
        let secret_key = SecretKey::from_slice(&private_key).unwrap();
        let public_key = PublicKey::from_secret_key_global(&secret_key);
        (private_key, public_key.serialize().to_vec())
    }

    fn spend(pk_script: &Script) -> (Tx, TxOut) {
        let tx = Tx {
            version: 2,
            inputs: vec![TxIn {
                prev_output: OutPoint {
                    hash: Hash256([9; 32]),
                    index: 1,
                },
                sig_script: Script::new(),
                sequence: 0xffffffff,
                witness: vec![],
            }],
            outputs: vec![TxOut {
                amount: Amount(49_000),
                pk_script: create_pk_script(&hash160(&[1; 33])),
            }],
            lock_time: 0,
        };
        let prevout = TxOut {
            amount: AMOUNT,
            pk_script: pk_script.clone(),
        };
        (tx, prevout)
    }

    fn sign(tx: &Tx, script_code: &[u8], version: SigVersion, private_key: &[u8; 32]) -> Vec<u8> {
        let mut cache = SigHashCache::new();
        let sighash_type = SIGHASH_ALL as u32;
        let hash = sighash(tx, 0, script_code, AMOUNT, sighash_type, version, &mut cache).unwrap();
        generate_signature(private_key, &hash, SIGHASH_ALL).unwrap()
    }

    fn p2sh(redeem: &[u8]) -> Script {
        let mut script = Script::new();
        script.append(OP_HASH160);
        script.append_data(&hash160(redeem).0);
        script.append(OP_EQUAL);
        script
    }

    #[test]
    fn signature_format() {
        let (private_key, public_key) = key(1);
        let hash = Hash256([3; 32]);
        let sig = generate_signature(&private_key, &hash, SIGHASH_NONE).unwrap();
        assert_eq!(sig[sig.len() - 1], SIGHASH_NONE);
        let der = &sig[..sig.len() - 1];
        let signature = Signature::from_der(der).unwrap();
        let mut normalized = signature;
        normalized.normalize_s();
        assert_eq!(normalized, signature);
        let message = Message::from_slice(&hash.0).unwrap();
        let public_key = PublicKey::from_slice(&public_key).unwrap();
        SECP256K1.verify_ecdsa(&message, &signature, &public_key).unwrap();

        let sig2 = generate_signature(&private_key, &hash, SIGHASH_NONE).unwrap();
        assert_eq!(sig, sig2);
        assert!(generate_signature(&[0; 32], &hash, SIGHASH_ALL).is_err());
    }

    #[test]
    fn pay_to_public_key_hash() {
        let (private_key, public_key) = key(2);
        let pk_script = create_pk_script(&hash160(&public_key));
        let (mut tx, prevout) = spend(&pk_script);
        let sig = sign(&tx, &pk_script.0, SigVersion::Base, &private_key);
        tx.inputs[0].sig_script = create_sig_script(&sig, &public_key);
        tx.verify_input(0, &prevout, RuleFlags::standard()).unwrap();

        let (_, other_key) = key(3);
        tx.inputs[0].sig_script = create_sig_script(&sig, &other_key);
        let e = tx.verify_input(0, &prevout, RuleFlags::standard()).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::EqualVerify));

        let (other_private_key, _) = key(3);
        let bad_sig = sign(&tx, &pk_script.0, SigVersion::Base, &other_private_key);
        tx.inputs[0].sig_script = create_sig_script(&bad_sig, &public_key);
        let e = tx.verify_input(0, &prevout, RuleFlags::standard()).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::SigNullFail));
        let e = tx.verify_input(0, &prevout, RuleFlags::consensus()).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::EvalFalse));
    }

    #[test]
    fn pay_to_script_hash_multisig() {
        let keys: Vec<([u8; 32], Vec<u8>)> = (4..7).map(key).collect();
        let mut redeem = Script::new();
        redeem.append(OP_2);
        for (_, public_key) in keys.iter() {
            redeem.append_data(public_key);
        }
        redeem.append(OP_3);
        redeem.append(OP_CHECKMULTISIG);
        let pk_script = p2sh(&redeem.0);
        let (mut tx, prevout) = spend(&pk_script);
        let sig0 = sign(&tx, &redeem.0, SigVersion::Base, &keys[0].0);
        let sig2 = sign(&tx, &redeem.0, SigVersion::Base, &keys[2].0);

        let mut sig_script = Script::new();
        sig_script.append(OP_0);
        sig_script.append_data(&sig0);
        sig_script.append_data(&sig2);
        sig_script.append_data(&redeem.0);
        tx.inputs[0].sig_script = sig_script;
        tx.verify_input(0, &prevout, RuleFlags::standard()).unwrap();
        assert_eq!(pk_script.p2sh_sigop_count(&tx.inputs[0].sig_script), 3);

        // One valid signature out of two is not enough
        let (stranger, _) = key(9);
        let stranger_sig = sign(&tx, &redeem.0, SigVersion::Base, &stranger);
        let mut one_valid = Script::new();
        one_valid.append(OP_0);
        one_valid.append_data(&sig0);
        one_valid.append_data(&stranger_sig);
        one_valid.append_data(&redeem.0);
        tx.inputs[0].sig_script = one_valid;
        let e = tx.verify_input(0, &prevout, RuleFlags::standard()).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::SigNullFail));
        let e = tx.verify_input(0, &prevout, RuleFlags::consensus()).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::EvalFalse));

        // Signatures must be in key order
        let mut swapped = Script::new();
        swapped.append(OP_0);
        swapped.append_data(&sig2);
        swapped.append_data(&sig0);
        swapped.append_data(&redeem.0);
        tx.inputs[0].sig_script = swapped;
        assert!(tx.verify_input(0, &prevout, RuleFlags::standard()).is_err());

        let mut dummy = Script::new();
        dummy.append(OP_1);
        dummy.append_data(&sig0);
        dummy.append_data(&sig2);
        dummy.append_data(&redeem.0);
        tx.inputs[0].sig_script = dummy;
        let e = tx.verify_input(0, &prevout, RuleFlags::standard()).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::SigNullDummy));
    }

    #[test]
    fn pay_to_witness_script_hash() {
        let (private_key, public_key) = key(7);
        let mut witness_script = Script::new();
        witness_script.append_data(&public_key);
        witness_script.append(OP_CHECKSIG);
        let mut pk_script = Script::new();
        pk_script.append(OP_0);
        pk_script.append_data(&sha256(&witness_script.0));
        let (mut tx, prevout) = spend(&pk_script);
        let sig = sign(&tx, &witness_script.0, SigVersion::WitnessV0, &private_key);
        tx.inputs[0].witness = vec![sig.clone(), witness_script.0.clone()];
        tx.verify_input(0, &prevout, RuleFlags::standard()).unwrap();

        // A legacy signature does not satisfy a witness script
        let legacy_sig = sign(&tx, &witness_script.0, SigVersion::Base, &private_key);
        tx.inputs[0].witness = vec![legacy_sig, witness_script.0.clone()];
        assert!(tx.verify_input(0, &prevout, RuleFlags::standard()).is_err());

        // The witness signature commits to the amount
        tx.inputs[0].witness = vec![sig, witness_script.0.clone()];
        let mut wrong_amount = prevout.clone();
        wrong_amount.amount = Amount(AMOUNT.0 + 1);
        assert!(tx.verify_input(0, &wrong_amount, RuleFlags::standard()).is_err());
    }

    #[test]
    fn nested_witness_key_hash() {
        let (private_key, public_key) = key(8);
        let key_hash = hash160(&public_key);
        let mut redeem = Script::new();
        redeem.append(OP_0);
        redeem.append_data(&key_hash.0);
        let pk_script = p2sh(&redeem.0);
        let (mut tx, prevout) = spend(&pk_script);
        let script_code = create_pk_script(&key_hash);
        let sig = sign(&tx, &script_code.0, SigVersion::WitnessV0, &private_key);
        let mut sig_script = Script::new();
        sig_script.append_data(&redeem.0);
        tx.inputs[0].sig_script = sig_script;
        tx.inputs[0].witness = vec![sig.clone(), public_key.clone()];
        tx.verify_input(0, &prevout, RuleFlags::standard()).unwrap();
        tx.verify_inputs(&[prevout.clone()], RuleFlags::consensus()).unwrap();

        // Uncompressed keys are not standard in witness scripts
        let secret_key = SecretKey::from_slice(&private_key).unwrap();
        let uncompressed = PublicKey::from_secret_key_global(&secret_key).serialize_uncompressed();
        let mut redeem = Script::new();
        redeem.append(OP_0);
        redeem.append_data(&hash160(&uncompressed).0);
        let pk_script = p2sh(&redeem.0);
        let (mut tx, prevout) = spend(&pk_script);
        let script_code = create_pk_script(&hash160(&uncompressed));
        let sig = sign(&tx, &script_code.0, SigVersion::WitnessV0, &private_key);
        let mut sig_script = Script::new();
        sig_script.append_data(&redeem.0);
        tx.inputs[0].sig_script = sig_script;
        tx.inputs[0].witness = vec![sig, uncompressed.to_vec()];
        tx.verify_input(0, &prevout, RuleFlags::consensus()).unwrap();
        let e = tx.verify_input(0, &prevout, RuleFlags::standard()).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::WitnessPubkeyType));
    }
}
