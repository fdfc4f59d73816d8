//! Pay-to-public-key-hash transaction scripts

use super::hash160::Hash160;
use super::result::{Error, Result};
use super::script::op_codes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160};
use super::script::{Script, ScriptPattern};

/// Creates the pubkey script to send to a public key hash
///
/// This is also the script code signed when spending a P2WPKH output.
pub fn create_pk_script(address: &Hash160) -> Script {
    let mut script = Script::new();
    script.append(OP_DUP);
    script.append(OP_HASH160);
    script.append_data(&address.0);
    script.append(OP_EQUALVERIFY);
    script.append(OP_CHECKSIG);
    script
}

/// Creates a sigscript to sign a p2pkh transaction
pub fn create_sig_script(sig: &[u8], public_key: &[u8]) -> Script {
    let mut sig_script = Script::new();
    sig_script.append_data(sig);
    sig_script.append_data(public_key);
    sig_script
}

/// Returns the public key hash this pk_script sends to
pub fn extract_pubkeyhash(pk_script: &[u8]) -> Result<Hash160> {
    if Script(pk_script.to_vec()).pattern() != ScriptPattern::PayKeyHash {
        return Err(Error::BadData("Script is not a standard P2PKH".to_string()));
    }
    let mut hash160 = Hash160([0; 20]);
    hash160.0.clone_from_slice(&pk_script[3..23]);
    Ok(hash160)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pk_script() {
        let hash = Hash160([5; 20]);
        let script = create_pk_script(&hash);
        assert_eq!(script.0.len(), 25);
        assert_eq!(script.pattern(), ScriptPattern::PayKeyHash);
        assert_eq!(extract_pubkeyhash(&script.0).unwrap(), hash);
        assert!(extract_pubkeyhash(&script.0[..24]).is_err());
    }

    #[test]
    fn sig_script() {
        let script = create_sig_script(&[3; 71], &[2; 33]);
        assert_eq!(script.0[0], 71);
        assert_eq!(script.0[72], 33);
        assert_eq!(script.0.len(), 1 + 71 + 1 + 33);
        assert!(script.is_push_only());
    }
}
