use std::fmt;

/// Reason a script failed to evaluate or verify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptError {
    /// Push opcode ran past the end of the script
    BadPush,
    /// Script is longer than MAX_SCRIPT_SIZE
    ScriptSize,
    /// Pushed element is longer than MAX_SCRIPT_ELEMENT_SIZE
    PushSize,
    /// Stack and alt stack together hold more than MAX_STACK_SIZE elements
    StackSize,
    /// More than MAX_OPS_PER_SCRIPT counted operations
    OpCount,
    /// Multisig public key count out of range
    PubkeyCount,
    /// Multisig signature count out of range
    SigCount,
    /// Push was not the smallest encoding of its data
    MinimalData,
    /// Number operand longer than allowed
    NumberOverflow,
    /// Number operand not minimally encoded
    MinimalNumber,
    /// IF without ENDIF, or ELSE/ENDIF without IF
    UnbalancedConditional,
    /// Not enough elements on the stack
    InvalidStackOperation,
    /// Not enough elements on the alt stack
    InvalidAltstackOperation,
    /// Disabled opcode present
    DisabledOpcode,
    /// Unknown or reserved opcode executed
    BadOpcode,
    /// OP_RETURN executed
    OpReturn,
    /// Upgradable NOP executed while discouraged
    DiscourageUpgradableNops,
    /// OP_VERIFY failed
    Verify,
    /// OP_EQUALVERIFY failed
    EqualVerify,
    /// OP_NUMEQUALVERIFY failed
    NumEqualVerify,
    /// OP_CHECKSIGVERIFY failed
    CheckSigVerify,
    /// OP_CHECKMULTISIGVERIFY failed
    CheckMultisigVerify,
    /// Stack empty or top false after evaluation
    EvalFalse,
    /// More than one element left after evaluation
    CleanStack,
    /// Signature script contains non-push operations
    SigPushOnly,
    /// Signature is not strict DER
    SigDer,
    /// Signature has an undefined hash type
    SigHashType,
    /// Signature S value is not low
    SigHighS,
    /// Multisig dummy element is not empty
    SigNullDummy,
    /// Failed signature check with a non-empty signature
    SigNullFail,
    /// Public key is neither compressed nor uncompressed
    PubkeyType,
    /// Lock time operand is negative
    NegativeLocktime,
    /// Lock time requirement not met
    UnsatisfiedLocktime,
    /// OP_IF argument in witness script is not minimal
    MinimalIf,
    /// OP_CODESEPARATOR in a non-witness script
    CodeSeparator,
    /// Signature found in the script code
    SigFindAndDelete,
    /// Witness program has the wrong length
    WitnessProgramWrongLength,
    /// Witness program spent with an empty witness
    WitnessProgramWitnessEmpty,
    /// Witness script or key does not match the program
    WitnessProgramMismatch,
    /// Witness program spent with a non-empty signature script
    WitnessMalleated,
    /// Nested witness program spent with an extra signature script push
    WitnessMalleatedP2sh,
    /// Witness provided for a non-witness output
    WitnessUnexpected,
    /// Witness uses an uncompressed public key
    WitnessPubkeyType,
    /// Unknown witness version spent while discouraged
    DiscourageUpgradableWitnessProgram,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ScriptError::BadPush => "Opcode missing or not understood",
            ScriptError::ScriptSize => "Script is too big",
            ScriptError::PushSize => "Push value size limit exceeded",
            ScriptError::StackSize => "Stack size limit exceeded",
            ScriptError::OpCount => "Operation limit exceeded",
            ScriptError::PubkeyCount => "Pubkey count negative or limit exceeded",
            ScriptError::SigCount => "Signature count negative or greater than pubkey count",
            ScriptError::MinimalData => "Data push larger than necessary",
            ScriptError::NumberOverflow => "Script number overflow",
            ScriptError::MinimalNumber => "Non-minimally encoded script number",
            ScriptError::UnbalancedConditional => "Invalid OP_IF construction",
            ScriptError::InvalidStackOperation => "Operation not valid with the current stack size",
            ScriptError::InvalidAltstackOperation => {
                "Operation not valid with the current altstack size"
            }
            ScriptError::DisabledOpcode => "Attempted to use a disabled opcode",
            ScriptError::BadOpcode => "Opcode missing or not understood",
            ScriptError::OpReturn => "OP_RETURN was encountered",
            ScriptError::DiscourageUpgradableNops => "NOPx reserved for soft-fork upgrades",
            ScriptError::Verify => "Script failed an OP_VERIFY operation",
            ScriptError::EqualVerify => "Script failed an OP_EQUALVERIFY operation",
            ScriptError::NumEqualVerify => "Script failed an OP_NUMEQUALVERIFY operation",
            ScriptError::CheckSigVerify => "Script failed an OP_CHECKSIGVERIFY operation",
            ScriptError::CheckMultisigVerify => "Script failed an OP_CHECKMULTISIGVERIFY operation",
            ScriptError::EvalFalse => "Script evaluated without error but finished with a false/empty top stack element",
            ScriptError::CleanStack => "Stack size must be exactly one after execution",
            ScriptError::SigPushOnly => "Only push operators allowed in signatures",
            ScriptError::SigDer => "Non-canonical DER signature",
            ScriptError::SigHashType => "Signature hash type missing or not understood",
            ScriptError::SigHighS => "Non-canonical signature: S value is unnecessarily high",
            ScriptError::SigNullDummy => "Dummy CHECKMULTISIG argument must be zero",
            ScriptError::SigNullFail => "Signature must be zero for failed CHECK(MULTI)SIG operation",
            ScriptError::PubkeyType => "Public key is neither compressed or uncompressed",
            ScriptError::NegativeLocktime => "Negative locktime",
            ScriptError::UnsatisfiedLocktime => "Locktime requirement not satisfied",
            ScriptError::MinimalIf => "OP_IF/NOTIF argument must be minimal",
            ScriptError::CodeSeparator => "Using OP_CODESEPARATOR in non-witness script",
            ScriptError::SigFindAndDelete => "Signature is found in scriptCode",
            ScriptError::WitnessProgramWrongLength => "Witness program has incorrect length",
            ScriptError::WitnessProgramWitnessEmpty => "Witness program was passed an empty witness",
            ScriptError::WitnessProgramMismatch => "Witness program hash mismatch",
            ScriptError::WitnessMalleated => "Witness requires empty scriptSig",
            ScriptError::WitnessMalleatedP2sh => "Witness requires only-redeemscript scriptSig",
            ScriptError::WitnessUnexpected => "Witness provided for non-witness script",
            ScriptError::WitnessPubkeyType => "Using non-compressed keys in segwit",
            ScriptError::DiscourageUpgradableWitnessProgram => {
                "Witness version reserved for soft-fork upgrades"
            }
        };
        f.write_str(s)
    }
}
