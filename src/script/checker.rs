use super::{RuleFlags, ScriptError, SigVersion};
use crate::amount::Amount;
use crate::hash256::Hash256;
use crate::result::{Error, Result};
use crate::sighash::{sighash, SigHashCache, SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_SINGLE};
use crate::transaction::Tx;
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, SECP256K1};
use std::collections::HashMap;

/// Locktimes greater than or equal to this are interpreted as timestamps. Less then, block heights.
pub const LOCKTIME_THRESHOLD: i64 = 500000000;

/// Input sequence that opts out of lock time checks
pub const SEQUENCE_FINAL: u32 = 0xffffffff;
/// Disables the relative lock time for the sequence field
pub const SEQUENCE_LOCKTIME_DISABLE_FLAG: i64 = 1 << 31;
/// When set, sequence uses time. When unset, it uses block height.
pub const SEQUENCE_LOCKTIME_TYPE_FLAG: i64 = 1 << 22;
/// Bits of the sequence holding the relative lock time
pub const SEQUENCE_LOCKTIME_MASK: i64 = 0x0000ffff;

/// Checks that external values are correct in the script
pub trait Checker {
    /// Checks that a signature and public key validate within a script
    ///
    /// The signature includes its trailing sighash byte. Script code should already have the
    /// signature removed if the version requires it.
    fn check_sig(
        &mut self,
        sig: &[u8],
        pubkey: &[u8],
        script_code: &[u8],
        version: SigVersion,
    ) -> Result<bool>;

    /// Checks that the lock time is valid according to BIP 65
    fn check_locktime(&self, locktime: i64) -> Result<bool>;

    /// Checks that the relative lock time enforced by the sequence is valid according to BIP 112
    fn check_sequence(&self, sequence: i64) -> Result<bool>;
}

/// Script checker that fails all transaction checks
pub struct TransactionlessChecker {}

impl Checker for TransactionlessChecker {
    fn check_sig(&mut self, _: &[u8], _: &[u8], _: &[u8], _: SigVersion) -> Result<bool> {
        Ok(false)
    }

    fn check_locktime(&self, _locktime: i64) -> Result<bool> {
        Ok(false)
    }

    fn check_sequence(&self, _sequence: i64) -> Result<bool> {
        Ok(false)
    }
}

/// Checks that external values in a script are correct for a specific transaction spend
pub struct TransactionChecker<'a> {
    tx: &'a Tx,
    input: usize,
    amount: Amount,
    cache: SigHashCache,
    legacy_hashes: HashMap<(u32, Vec<u8>), Hash256>,
}

impl<'a> TransactionChecker<'a> {
    /// Creates a checker for spending input `input` of `tx`, worth `amount`
    pub fn new(tx: &'a Tx, input: usize, amount: Amount) -> Result<TransactionChecker<'a>> {
        if input >= tx.inputs.len() {
            let msg = format!("input {} out of range {}", input, tx.inputs.len());
            return Err(Error::BadArgument(msg));
        }
        Ok(TransactionChecker {
            tx,
            input,
            amount,
            cache: SigHashCache::new(),
            legacy_hashes: HashMap::new(),
        })
    }

    fn sighash(&mut self, script_code: &[u8], sighash_type: u32, version: SigVersion) -> Result<Hash256> {
        if version == SigVersion::Base {
            let key = (sighash_type, script_code.to_vec());
            if let Some(hash) = self.legacy_hashes.get(&key) {
                return Ok(*hash);
            }
            let hash = sighash(self.tx, self.input, script_code, self.amount, sighash_type, version, &mut self.cache)?;
            self.legacy_hashes.insert(key, hash);
            return Ok(hash);
        }
        sighash(self.tx, self.input, script_code, self.amount, sighash_type, version, &mut self.cache)
    }
}

impl<'a> Checker for TransactionChecker<'a> {
    fn check_sig(
        &mut self,
        sig: &[u8],
        pubkey: &[u8],
        script_code: &[u8],
        version: SigVersion,
    ) -> Result<bool> {
        let public_key = match PublicKey::from_slice(pubkey) {
            Ok(public_key) => public_key,
            Err(_) => return Ok(false),
        };
        if sig.is_empty() {
            return Ok(false);
        }
        let sighash_type = sig[sig.len() - 1] as u32;
        let mut signature = match Signature::from_der_lax(&sig[..sig.len() - 1]) {
            Ok(signature) => signature,
            Err(_) => return Ok(false),
        };
        // Lax-parsed signatures may not be normalized, but libsecp256k1 requires them to be
        signature.normalize_s();
        let sig_hash = self.sighash(script_code, sighash_type, version)?;
        let message = Message::from_slice(&sig_hash.0)?;
        Ok(SECP256K1.verify_ecdsa(&message, &signature, &public_key).is_ok())
    }

    fn check_locktime(&self, locktime: i64) -> Result<bool> {
        let tx_lock_time = self.tx.lock_time as i64;
        // Both must be heights or both timestamps
        if (tx_lock_time < LOCKTIME_THRESHOLD) != (locktime < LOCKTIME_THRESHOLD) {
            return Ok(false);
        }
        if locktime > tx_lock_time {
            return Ok(false);
        }
        // A final input would let the lock time be bypassed
        if self.tx.inputs[self.input].sequence == SEQUENCE_FINAL {
            return Ok(false);
        }
        Ok(true)
    }

    fn check_sequence(&self, sequence: i64) -> Result<bool> {
        let tx_sequence = self.tx.inputs[self.input].sequence as i64;
        if self.tx.version < 2 {
            return Ok(false);
        }
        if tx_sequence & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
            return Ok(false);
        }
        let mask = SEQUENCE_LOCKTIME_TYPE_FLAG | SEQUENCE_LOCKTIME_MASK;
        let tx_sequence_masked = tx_sequence & mask;
        let sequence_masked = sequence & mask;
        if (tx_sequence_masked < SEQUENCE_LOCKTIME_TYPE_FLAG)
            != (sequence_masked < SEQUENCE_LOCKTIME_TYPE_FLAG)
        {
            return Ok(false);
        }
        if sequence_masked > tx_sequence_masked {
            return Ok(false);
        }
        Ok(true)
    }
}

/// Returns whether the signature, sighash byte included, is strict DER (BIP66)
pub fn is_valid_signature_encoding(sig: &[u8]) -> bool {
    // Format: 0x30 [total-length] 0x02 [R-length] [R] 0x02 [S-length] [S] [sighash]
    if sig.len() < 9 || sig.len() > 73 {
        return false;
    }
    if sig[0] != 0x30 || sig[1] as usize != sig.len() - 3 {
        return false;
    }
    let len_r = sig[3] as usize;
    if 5 + len_r >= sig.len() {
        return false;
    }
    let len_s = sig[5 + len_r] as usize;
    if len_r + len_s + 7 != sig.len() {
        return false;
    }

    // R must be a positive integer without excess padding
    if sig[2] != 0x02 || len_r == 0 || sig[4] & 0x80 != 0 {
        return false;
    }
    if len_r > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return false;
    }

    // Same for S
    if sig[len_r + 4] != 0x02 || len_s == 0 || sig[len_r + 6] & 0x80 != 0 {
        return false;
    }
    if len_s > 1 && sig[len_r + 6] == 0x00 && sig[len_r + 7] & 0x80 == 0 {
        return false;
    }
    true
}

fn is_low_s(sig: &[u8]) -> bool {
    let der = &sig[..sig.len() - 1];
    match Signature::from_der_lax(der) {
        Ok(signature) => {
            let mut normalized = signature;
            normalized.normalize_s();
            normalized == signature
        }
        Err(_) => false,
    }
}

fn is_defined_hashtype(sig: &[u8]) -> bool {
    if sig.is_empty() {
        return false;
    }
    let base_type = sig[sig.len() - 1] & !SIGHASH_ANYONECANPAY;
    base_type >= SIGHASH_ALL && base_type <= SIGHASH_SINGLE
}

/// Checks a signature's encoding against the DERSIG, LOW_S and STRICTENC rules
///
/// An empty signature always passes so that a failed check can be expressed compactly.
pub fn check_signature_encoding(sig: &[u8], flags: RuleFlags) -> Result<()> {
    if sig.is_empty() {
        return Ok(());
    }
    let strict = RuleFlags::DERSIG | RuleFlags::LOW_S | RuleFlags::STRICTENC;
    if flags.intersects(strict) && !is_valid_signature_encoding(sig) {
        return Err(Error::ScriptError(ScriptError::SigDer));
    }
    if flags.contains(RuleFlags::LOW_S) && !is_low_s(sig) {
        return Err(Error::ScriptError(ScriptError::SigHighS));
    }
    if flags.contains(RuleFlags::STRICTENC) && !is_defined_hashtype(sig) {
        return Err(Error::ScriptError(ScriptError::SigHashType));
    }
    Ok(())
}

fn is_compressed_or_uncompressed(pubkey: &[u8]) -> bool {
    match pubkey.first() {
        Some(0x04) => pubkey.len() == 65,
        Some(0x02) | Some(0x03) => pubkey.len() == 33,
        _ => false,
    }
}

fn is_compressed(pubkey: &[u8]) -> bool {
    pubkey.len() == 33 && (pubkey[0] == 0x02 || pubkey[0] == 0x03)
}

/// Checks a public key's encoding against the STRICTENC and WITNESS_PUBKEYTYPE rules
pub fn check_pubkey_encoding(pubkey: &[u8], flags: RuleFlags, version: SigVersion) -> Result<()> {
    if flags.contains(RuleFlags::STRICTENC) && !is_compressed_or_uncompressed(pubkey) {
        return Err(Error::ScriptError(ScriptError::PubkeyType));
    }
    if flags.contains(RuleFlags::WITNESS_PUBKEYTYPE)
        && version == SigVersion::WitnessV0
        && !is_compressed(pubkey)
    {
        return Err(Error::ScriptError(ScriptError::WitnessPubkeyType));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Script;
    use crate::transaction::{OutPoint, TxIn, TxOut};

    // Valid DER signature with SIGHASH_ALL from mainnet
    const SIG: &str = "3045022100d8e386aab795d56f9d7b7d6a51e5e79f9838227bc87b264140399fa31846cb8802203c3726092a64e6c9979e38a422a56292d76dfd0ac7fdb8201386101af5b2775901";

    fn tx(version: u32, lock_time: u32, sequence: u32) -> Tx {
        Tx {
            version,
            inputs: vec![TxIn {
                prev_output: OutPoint::default(),
                sig_script: Script::new(),
                sequence,
                witness: vec![],
            }],
            outputs: vec![TxOut {
                amount: Amount(0),
                pk_script: Script::new(),
            }],
            lock_time,
        }
    }

    #[test]
    fn der_encoding() {
        let sig = hex::decode(SIG).unwrap();
        assert!(is_valid_signature_encoding(&sig));
        // Wrong total length
        let mut bad = sig.clone();
        bad[1] += 1;
        assert!(!is_valid_signature_encoding(&bad));
        // Negative R
        let mut bad = sig.clone();
        bad[4] = 0x80;
        assert!(!is_valid_signature_encoding(&bad));
        assert!(!is_valid_signature_encoding(&sig[..8]));
    }

    #[test]
    fn signature_rules() {
        let sig = hex::decode(SIG).unwrap();
        check_signature_encoding(&sig, RuleFlags::standard()).unwrap();
        check_signature_encoding(&[], RuleFlags::standard()).unwrap();
        let e = check_signature_encoding(&[0x30, 0x01], RuleFlags::DERSIG).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::SigDer));
        check_signature_encoding(&[0x30, 0x01], RuleFlags::empty()).unwrap();
        let mut undefined = sig.clone();
        let last = undefined.len() - 1;
        undefined[last] = 0x04;
        let e = check_signature_encoding(&undefined, RuleFlags::STRICTENC).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::SigHashType));
        check_signature_encoding(&undefined, RuleFlags::DERSIG).unwrap();
        undefined[last] = 0x83;
        check_signature_encoding(&undefined, RuleFlags::STRICTENC).unwrap();
    }

    #[test]
    fn pubkey_rules() {
        let compressed = [2u8; 33];
        let mut uncompressed = [0u8; 65];
        uncompressed[0] = 4;
        let flags = RuleFlags::STRICTENC | RuleFlags::WITNESS_PUBKEYTYPE;
        check_pubkey_encoding(&compressed, flags, SigVersion::WitnessV0).unwrap();
        check_pubkey_encoding(&uncompressed, flags, SigVersion::Base).unwrap();
        let e = check_pubkey_encoding(&uncompressed, flags, SigVersion::WitnessV0).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::WitnessPubkeyType));
        let e = check_pubkey_encoding(&[5u8; 33], flags, SigVersion::Base).unwrap_err();
        assert_eq!(e.script_error(), Some(ScriptError::PubkeyType));
        check_pubkey_encoding(&[5u8; 33], RuleFlags::empty(), SigVersion::Base).unwrap();
    }

    #[test]
    fn locktime() {
        let t = tx(1, 500, 0);
        let c = TransactionChecker::new(&t, 0, Amount(0)).unwrap();
        assert!(c.check_locktime(499).unwrap());
        assert!(c.check_locktime(500).unwrap());
        assert!(!c.check_locktime(501).unwrap());
        assert!(!c.check_locktime(LOCKTIME_THRESHOLD).unwrap());

        let t = tx(1, 600000000, 0);
        let c = TransactionChecker::new(&t, 0, Amount(0)).unwrap();
        assert!(!c.check_locktime(100).unwrap());
        assert!(c.check_locktime(LOCKTIME_THRESHOLD).unwrap());

        let t = tx(1, 500, SEQUENCE_FINAL);
        let c = TransactionChecker::new(&t, 0, Amount(0)).unwrap();
        assert!(!c.check_locktime(100).unwrap());
    }

    #[test]
    fn sequence() {
        let t = tx(2, 0, 10);
        let c = TransactionChecker::new(&t, 0, Amount(0)).unwrap();
        assert!(c.check_sequence(10).unwrap());
        assert!(!c.check_sequence(11).unwrap());
        assert!(!c.check_sequence(10 | SEQUENCE_LOCKTIME_TYPE_FLAG).unwrap());

        let t = tx(1, 0, 10);
        let c = TransactionChecker::new(&t, 0, Amount(0)).unwrap();
        assert!(!c.check_sequence(10).unwrap());

        // Versions compare unsigned
        let t = tx(0xffff_ffff, 0, 10);
        let c = TransactionChecker::new(&t, 0, Amount(0)).unwrap();
        assert!(c.check_sequence(10).unwrap());

        let t = tx(2, 0, (1 << 31) | 10);
        let c = TransactionChecker::new(&t, 0, Amount(0)).unwrap();
        assert!(!c.check_sequence(10).unwrap());
    }

    #[test]
    fn input_out_of_range() {
        let t = tx(1, 0, 0);
        assert!(TransactionChecker::new(&t, 1, Amount(0)).is_err());
    }

    #[test]
    fn transactionless() {
        let mut c = TransactionlessChecker {};
        assert!(!c.check_sig(&[], &[], &[], SigVersion::Base).unwrap());
        assert!(!c.check_locktime(0).unwrap());
        assert!(!c.check_sequence(0).unwrap());
    }
}
