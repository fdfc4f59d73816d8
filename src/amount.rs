//! Bitcoin amounts in satoshis

use std::fmt;

/// Number of satoshis in one bitcoin
pub const COIN: i64 = 100_000_000;

/// Maximum number of satoshis possible
pub const MAX_SATOSHIS: i64 = 21_000_000 * COIN;

/// An amount of bitcoin in satoshis
///
/// Signed because the legacy signature hash serializes blanked outputs with a value of -1.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Amount(pub i64);

impl Amount {
    /// Value used for outputs blanked out of a SIGHASH_SINGLE signature hash
    pub const NULL: Amount = Amount(-1);

    /// Creates an amount from a number of whole bitcoins
    pub fn from_btc(btc: f64) -> Amount {
        Amount((btc * COIN as f64).round() as i64)
    }

    /// Returns whether the amount is within the legal money range
    pub fn is_valid(&self) -> bool {
        self.0 >= 0 && self.0 <= MAX_SATOSHIS
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} sats", self.0)
    }
}
