use bitscript::script::RuleFlags;
use bitscript::Error;
use std::str::FromStr;
use structopt::StructOpt;

/// Named set of verification rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagPreset {
    Consensus,
    Standard,
    None,
}

impl FlagPreset {
    pub fn flags(&self) -> RuleFlags {
        match self {
            FlagPreset::Consensus => RuleFlags::consensus(),
            FlagPreset::Standard => RuleFlags::standard(),
            FlagPreset::None => RuleFlags::empty(),
        }
    }
}

impl FromStr for FlagPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<FlagPreset, Error> {
        match s {
            "consensus" => Ok(FlagPreset::Consensus),
            "standard" => Ok(FlagPreset::Standard),
            "none" => Ok(FlagPreset::None),
            _ => Err(Error::BadArgument(format!("Unknown flags {}", s))),
        }
    }
}

#[derive(StructOpt, Debug)]
pub enum Command {
    #[structopt(name = "eval")]
    /// Evaluate a script without a transaction.
    ///
    /// Signature and lock time checks always fail.
    Eval {
        /// Script in hex.
        script: String,
        #[structopt(long = "push")]
        /// Initial stack item in hex, bottom first. May be repeated.
        stack: Vec<String>,
    },
    #[structopt(name = "verify")]
    /// Verify one input of a transaction against the output it spends.
    Verify {
        /// Transaction in hex, legacy or segwit serialization.
        tx: String,
        #[structopt(long, default_value = "0")]
        /// Index of the input to verify.
        input: usize,
        #[structopt(long = "pk-script")]
        /// Script of the spent output in hex.
        pk_script: String,
        #[structopt(long, default_value = "0")]
        /// Amount of the spent output in satoshis. Signed by witness inputs.
        amount: i64,
    },
}

#[derive(StructOpt, Debug)]
#[structopt(name = "bitscript", raw(setting = "structopt::clap::AppSettings::ColoredHelp"))]
/// Evaluate and verify bitcoin scripts.
///
/// Exits with status 1 when the script or input fails.
pub struct Opt {
    #[structopt(long, default_value = "standard")]
    /// Rules to enforce: consensus, standard or none.
    pub flags: FlagPreset,
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    /// Log more, repeat for opcode traces.
    pub verbose: usize,
    #[structopt(short = "q", long = "quiet")]
    /// Silence all logging.
    pub quiet: bool,
    #[structopt(subcommand)]
    pub command: Command,
}
