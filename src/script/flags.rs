use bitflags::bitflags;

bitflags! {
    /// Script verification rules to enforce
    ///
    /// Bit positions match the reference node so that flag sets from test vectors map directly.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RuleFlags: u32 {
        /// Evaluate P2SH redeem scripts (BIP16)
        const P2SH = 1 << 0;
        /// Require strict signature and public key encodings
        const STRICTENC = 1 << 1;
        /// Require strict DER signatures (BIP66)
        const DERSIG = 1 << 2;
        /// Require low S values in signatures (BIP62 rule 5)
        const LOW_S = 1 << 3;
        /// Require the multisig dummy element to be empty (BIP147)
        const NULLDUMMY = 1 << 4;
        /// Require the signature script to be push-only
        const SIGPUSHONLY = 1 << 5;
        /// Require minimal pushes and minimal number encodings
        const MINIMALDATA = 1 << 6;
        /// Fail on NOPs reserved for soft-fork upgrades
        const DISCOURAGE_UPGRADABLE_NOPS = 1 << 7;
        /// Require exactly one stack element after evaluation
        const CLEANSTACK = 1 << 8;
        /// Enable OP_CHECKLOCKTIMEVERIFY (BIP65)
        const CHECKLOCKTIMEVERIFY = 1 << 9;
        /// Enable OP_CHECKSEQUENCEVERIFY (BIP112)
        const CHECKSEQUENCEVERIFY = 1 << 10;
        /// Verify witness programs (BIP141)
        const WITNESS = 1 << 11;
        /// Fail on witness versions reserved for soft-fork upgrades
        const DISCOURAGE_UPGRADABLE_WITNESS_PROGRAM = 1 << 12;
        /// Require the OP_IF argument in witness scripts to be empty or 0x01
        const MINIMALIF = 1 << 13;
        /// Require failed signature checks to use empty signatures
        const NULLFAIL = 1 << 14;
        /// Require compressed public keys in witness scripts
        const WITNESS_PUBKEYTYPE = 1 << 15;
        /// Fail on OP_CODESEPARATOR and signature removal in non-witness scripts
        const CONST_SCRIPTCODE = 1 << 16;
    }
}

impl RuleFlags {
    /// Rules enforced for every transaction in a block
    pub fn consensus() -> RuleFlags {
        RuleFlags::P2SH
            | RuleFlags::DERSIG
            | RuleFlags::NULLDUMMY
            | RuleFlags::CHECKLOCKTIMEVERIFY
            | RuleFlags::CHECKSEQUENCEVERIFY
            | RuleFlags::WITNESS
    }

    /// Rules enforced by default relay policy
    pub fn standard() -> RuleFlags {
        RuleFlags::consensus()
            | RuleFlags::STRICTENC
            | RuleFlags::LOW_S
            | RuleFlags::SIGPUSHONLY
            | RuleFlags::MINIMALDATA
            | RuleFlags::DISCOURAGE_UPGRADABLE_NOPS
            | RuleFlags::CLEANSTACK
            | RuleFlags::DISCOURAGE_UPGRADABLE_WITNESS_PROGRAM
            | RuleFlags::MINIMALIF
            | RuleFlags::NULLFAIL
            | RuleFlags::WITNESS_PUBKEYTYPE
            | RuleFlags::CONST_SCRIPTCODE
    }
}

/// Rule set a script is executed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigVersion {
    /// Legacy and P2SH scripts
    Base,
    /// Version 0 witness scripts (BIP143)
    WitnessV0,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_contains_consensus() {
        assert!(RuleFlags::standard().contains(RuleFlags::consensus()));
        assert!(!RuleFlags::consensus().contains(RuleFlags::CLEANSTACK));
    }

    #[test]
    fn bit_positions() {
        assert_eq!(RuleFlags::P2SH.bits(), 1);
        assert_eq!(RuleFlags::WITNESS.bits(), 2048);
        assert_eq!(RuleFlags::CONST_SCRIPTCODE.bits(), 65536);
    }
}
