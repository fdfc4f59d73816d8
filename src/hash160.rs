use digest::Digest;
use hex;
use ripemd::Ripemd160;
use std::fmt;
use super::hash256::sha256;

/// 160-bit hash for public key addresses
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash160(pub [u8; 20]);

/// Hashes a data array once with RIPEMD160
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut ripemd160 = Ripemd160::new();
    ripemd160.update(data);
    let mut hash = [0; 20];
    hash.clone_from_slice(&ripemd160.finalize());
    hash
}

/// Hashes a data array once with SHA256 and again with RIPEMD160
pub fn hash160(data: &[u8]) -> Hash160 {
    Hash160(ripemd160(&sha256(data)))
}

impl fmt::Debug for Hash160 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tohash160() {
        let pubkey = "126999eabe3f84a3a9f5c09e87faab27484818a0ec1d67b94c9a02e40268499d98538cf770198550adfb9d1d473e5e926bc00e4c58baec1fb8b5b3c0cc6d5b22";
        let pubkey = hex::decode(pubkey).unwrap();
        let h = hash160(&pubkey);
        assert_eq!(hex::encode(h.0), "3c231b5e624a42e99a87160c6e4231718a6d77c0");
    }

    #[test]
    fn ripemd160_empty() {
        assert_eq!(hex::encode(ripemd160(&[])), "9c1185a5c5e9fc54612808977ee8f548b2258d31");
    }
}
