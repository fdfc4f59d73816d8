//! Script templates and static analysis

use super::op_codes::*;
use super::operation::Operation;
use super::{Opcode, MAX_PUBKEYS_PER_MULTISIG};
use std::io::Cursor;

/// Well-known output script forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptPattern {
    /// OP_RETURN followed only by pushes
    NullData,
    /// Bare m-of-n multisig
    PayMultisig { required: usize, total: usize },
    /// Public key followed by OP_CHECKSIG
    PayPublicKey,
    /// P2PKH
    PayKeyHash,
    /// P2SH (BIP16)
    PayScriptHash,
    /// P2WPKH
    PayWitnessKeyHash,
    /// P2WSH
    PayWitnessScriptHash,
    /// Witness program with a version above 0
    PayWitnessUnknown,
    NonStandard,
}

/// Walks the operations of a script, stopping silently at a truncated push
fn operations(script: &[u8]) -> impl Iterator<Item = Operation> + '_ {
    let mut cursor = Cursor::new(script);
    std::iter::from_fn(move || {
        if cursor.position() as usize >= script.len() {
            return None;
        }
        Operation::read(&mut cursor).ok()
    })
}

/// Returns whether every operation is a push and the script decodes completely
///
/// OP_RESERVED counts as a push here.
pub fn is_push_only(script: &[u8]) -> bool {
    let mut cursor = Cursor::new(script);
    while (cursor.position() as usize) < script.len() {
        match Operation::read(&mut cursor) {
            Ok(op) if op.is_push() => {}
            _ => return false,
        }
    }
    true
}

/// Returns whether the script is `OP_HASH160 <20 bytes> OP_EQUAL`
pub fn is_pay_to_script_hash(script: &[u8]) -> bool {
    script.len() == 23 && script[0] == OP_HASH160 && script[1] == 20 && script[22] == OP_EQUAL
}

/// Returns the version and program if the script is a witness program
///
/// A witness program is a version opcode, OP_0 or OP_1 through OP_16, followed by a single
/// direct push of 2 to 40 bytes.
pub fn witness_program(script: &[u8]) -> Option<(u8, &[u8])> {
    if script.len() < 4 || script.len() > 42 {
        return None;
    }
    let version = match script[0] {
        OP_0 => 0,
        v @ OP_1..=OP_16 => v - OP_1 + 1,
        _ => return None,
    };
    if script[1] as usize + 2 != script.len() {
        return None;
    }
    Some((version, &script[2..]))
}

fn is_pubkey(data: &[u8]) -> bool {
    match data.first() {
        Some(0x02) | Some(0x03) => data.len() == 33,
        Some(0x04) | Some(0x06) | Some(0x07) => data.len() == 65,
        _ => false,
    }
}

/// Classifies an output script
pub fn pattern(script: &[u8]) -> ScriptPattern {
    if is_pay_to_script_hash(script) {
        return ScriptPattern::PayScriptHash;
    }
    if let Some((version, program)) = witness_program(script) {
        return match (version, program.len()) {
            (0, 20) => ScriptPattern::PayWitnessKeyHash,
            (0, 32) => ScriptPattern::PayWitnessScriptHash,
            (0, _) => ScriptPattern::NonStandard,
            _ => ScriptPattern::PayWitnessUnknown,
        };
    }
    if !script.is_empty() && script[0] == OP_RETURN && is_push_only(&script[1..]) {
        return ScriptPattern::NullData;
    }
    if script.len() == 25
        && script[0] == OP_DUP
        && script[1] == OP_HASH160
        && script[2] == 20
        && script[23] == OP_EQUALVERIFY
        && script[24] == OP_CHECKSIG
    {
        return ScriptPattern::PayKeyHash;
    }

    let ops: Vec<Operation> = operations(script).collect();
    if ops.len() == 2
        && ops[1].opcode == Opcode::OP_CHECKSIG
        && is_pubkey(&ops[0].data)
        && encode_len(&ops) == script.len()
    {
        return ScriptPattern::PayPublicKey;
    }
    if let Some(pattern) = multisig_pattern(script, &ops) {
        return pattern;
    }
    ScriptPattern::NonStandard
}

fn encode_len(ops: &[Operation]) -> usize {
    ops.iter().map(|op| op.to_bytes().len()).sum()
}

fn multisig_pattern(script: &[u8], ops: &[Operation]) -> Option<ScriptPattern> {
    if ops.len() < 4 || encode_len(ops) != script.len() {
        return None;
    }
    if ops[ops.len() - 1].opcode != Opcode::OP_CHECKMULTISIG {
        return None;
    }
    let small = |op: &Operation| match op.opcode {
        Opcode::OP_0 | Opcode::OP_1NEGATE => None,
        opcode => opcode.small_int().map(|n| n as usize),
    };
    let required = small(&ops[0])?;
    let total = small(&ops[ops.len() - 2])?;
    let keys = &ops[1..ops.len() - 2];
    if keys.len() != total || required > total || total > MAX_PUBKEYS_PER_MULTISIG {
        return None;
    }
    if !keys.iter().all(|op| is_pubkey(&op.data)) {
        return None;
    }
    Some(ScriptPattern::PayMultisig { required, total })
}

/// Counts signature operations
///
/// CHECKSIG counts as one. CHECKMULTISIG counts as the key count when `accurate` is set and
/// it follows OP_1 through OP_16, otherwise as the maximum of 20.
pub fn sigop_count(script: &[u8], accurate: bool) -> usize {
    let mut count = 0;
    let mut last = Opcode::OP_UNKNOWN(OP_INVALIDOPCODE);
    for op in operations(script) {
        match op.opcode {
            Opcode::OP_CHECKSIG | Opcode::OP_CHECKSIGVERIFY => count += 1,
            Opcode::OP_CHECKMULTISIG | Opcode::OP_CHECKMULTISIGVERIFY => {
                count += match last.small_int() {
                    Some(n) if accurate && n >= 1 => n as usize,
                    _ => MAX_PUBKEYS_PER_MULTISIG,
                };
            }
            _ => {}
        }
        last = op.opcode;
    }
    count
}

/// Counts the signature operations of the redeem script pushed by a P2SH signature script
///
/// Outputs that are not P2SH are counted accurately on their own.
pub fn p2sh_sigop_count(script_pubkey: &[u8], script_sig: &[u8]) -> usize {
    if !is_pay_to_script_hash(script_pubkey) {
        return sigop_count(script_pubkey, true);
    }
    let mut redeem = None;
    for op in operations(script_sig) {
        if !op.is_push() {
            return 0;
        }
        redeem = Some(op.data);
    }
    match redeem {
        Some(redeem) => sigop_count(&redeem, true),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn patterns() {
        let p2pkh = h("76a9148280b37df378db99f66f85c95a783a76ac7a6d5988ac");
        assert_eq!(pattern(&p2pkh), ScriptPattern::PayKeyHash);
        let p2sh = h("a914748284390f9e263a4b766a75d0633c50426eb87587");
        assert_eq!(pattern(&p2sh), ScriptPattern::PayScriptHash);
        let p2wpkh = h("00141d0f172a0ecb48aee1be1f2687d2963ae33f71a1");
        assert_eq!(pattern(&p2wpkh), ScriptPattern::PayWitnessKeyHash);
        let p2wsh = h("0020").into_iter().chain(vec![7; 32]).collect::<Vec<u8>>();
        assert_eq!(pattern(&p2wsh), ScriptPattern::PayWitnessScriptHash);
        let v1 = h("5120").into_iter().chain(vec![7; 32]).collect::<Vec<u8>>();
        assert_eq!(pattern(&v1), ScriptPattern::PayWitnessUnknown);
        let p2pk = h("2103c9f4836b9a4f77fc0d81f7bcb01b7f1b35916864b9476c241ce9fc198bd25432ac");
        assert_eq!(pattern(&p2pk), ScriptPattern::PayPublicKey);
        assert_eq!(pattern(&[OP_RETURN, 2, 1, 2]), ScriptPattern::NullData);
        assert_eq!(pattern(&[OP_RETURN]), ScriptPattern::NullData);
        assert_eq!(pattern(&[OP_RETURN, OP_NOP]), ScriptPattern::NonStandard);
        assert_eq!(pattern(&[OP_1, OP_ADD]), ScriptPattern::NonStandard);
        assert_eq!(pattern(&[]), ScriptPattern::NonStandard);
    }

    #[test]
    fn multisig() {
        let mut script = vec![OP_2];
        for b in [2u8, 3, 2] {
            script.push(33);
            script.push(b);
            script.extend_from_slice(&[b; 32]);
        }
        script.push(OP_3);
        script.push(OP_CHECKMULTISIG);
        let expected = ScriptPattern::PayMultisig {
            required: 2,
            total: 3,
        };
        assert_eq!(pattern(&script), expected);
        let mut bad = script.clone();
        bad[0] = OP_4;
        assert_eq!(pattern(&bad), ScriptPattern::NonStandard);
        let mut bad = script.clone();
        bad[script.len() - 2] = OP_2;
        assert_eq!(pattern(&bad), ScriptPattern::NonStandard);
    }

    #[test]
    fn witness_programs() {
        let p2wpkh = h("00141d0f172a0ecb48aee1be1f2687d2963ae33f71a1");
        let (version, program) = witness_program(&p2wpkh).unwrap();
        assert_eq!(version, 0);
        assert_eq!(program, &p2wpkh[2..]);
        assert_eq!(witness_program(&[OP_16, 2, 0, 0]).unwrap().0, 16);
        assert!(witness_program(&[OP_1, 1, 0]).is_none());
        assert!(witness_program(&[OP_1NEGATE, 2, 0, 0]).is_none());
        assert!(witness_program(&[OP_0, 3, 0, 0]).is_none());
        let mut long = vec![OP_0, 41];
        long.extend_from_slice(&[0; 41]);
        assert!(witness_program(&long).is_none());
    }

    #[test]
    fn push_only() {
        assert!(is_push_only(&[]));
        assert!(is_push_only(&[OP_0, OP_1NEGATE, OP_16, OP_RESERVED, 1, 9]));
        assert!(!is_push_only(&[OP_1, OP_NOP]));
        assert!(!is_push_only(&[OP_1, 2, 0]));
    }

    #[test]
    fn sigops() {
        let multisig = [OP_1, OP_2, OP_CHECKMULTISIG, OP_CHECKSIG, OP_CHECKSIGVERIFY];
        assert_eq!(sigop_count(&multisig, true), 4);
        assert_eq!(sigop_count(&multisig, false), 22);
        assert_eq!(sigop_count(&[OP_CHECKMULTISIGVERIFY], true), 20);
        assert_eq!(sigop_count(&[OP_0, OP_CHECKMULTISIG], true), 20);
        // Stops at a truncated push
        assert_eq!(sigop_count(&[OP_CHECKSIG, 5, OP_CHECKSIG], true), 1);
    }

    #[test]
    fn p2sh_sigops() {
        let redeem = [OP_2, OP_3, OP_CHECKMULTISIG];
        let p2sh = h("a914748284390f9e263a4b766a75d0633c50426eb87587");
        let mut script_sig = vec![OP_0, 3];
        script_sig.extend_from_slice(&redeem);
        assert_eq!(p2sh_sigop_count(&p2sh, &script_sig), 3);
        assert_eq!(p2sh_sigop_count(&p2sh, &[OP_NOP, 3, OP_2, OP_3, OP_CHECKMULTISIG]), 0);
        assert_eq!(p2sh_sigop_count(&p2sh, &[]), 0);
        assert_eq!(p2sh_sigop_count(&redeem, &[]), 3);
    }
}
