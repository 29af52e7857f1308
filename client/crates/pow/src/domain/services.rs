//! Domain Services
//!
//! Pure digest and difficulty logic for the admission puzzle.

use sha2::{Digest, Sha256};

use crate::domain::value_objects::{Difficulty, Nonce};

/// Count leading zero hex digits (nibbles) in a SHA-256 hash
pub fn leading_zero_nibbles(hash: &[u8; 32]) -> u32 {
    let mut count = 0u32;
    for &byte in hash {
        if byte == 0 {
            count += 2;
        } else {
            if byte < 0x10 {
                count += 1;
            }
            break;
        }
    }
    count
}

/// Verify that a hash meets the difficulty requirement
pub fn meets_difficulty(hash: &[u8; 32], difficulty: Difficulty) -> bool {
    leading_zero_nibbles(hash) >= difficulty.zeros()
}

/// SHA-256 over `challenge ‖ identity ‖ decimal(counter)`
pub fn digest(challenge: &str, identity: &str, counter: u64) -> [u8; 32] {
    PrefixHasher::new(challenge, identity).digest(counter)
}

/// Verify a solved nonce by recomputation
pub fn verify(challenge: &str, identity: &str, nonce: Nonce, difficulty: Difficulty) -> bool {
    meets_difficulty(&digest(challenge, identity, nonce.counter()), difficulty)
}

/// Hasher with `challenge ‖ identity` already absorbed
///
/// Cloning the midstate is cheaper than re-hashing the prefix per candidate.
#[derive(Clone)]
pub struct PrefixHasher {
    midstate: Sha256,
}

impl PrefixHasher {
    pub fn new(challenge: &str, identity: &str) -> Self {
        let mut midstate = Sha256::new();
        midstate.update(challenge.as_bytes());
        midstate.update(identity.as_bytes());
        Self { midstate }
    }

    pub fn digest(&self, counter: u64) -> [u8; 32] {
        let mut buf = [0u8; 20];
        let mut hasher = self.midstate.clone();
        hasher.update(write_decimal(counter, &mut buf));
        hasher.finalize().into()
    }
}

/// Format `n` in decimal without allocating; u64::MAX has 20 digits
fn write_decimal(mut n: u64, buf: &mut [u8; 20]) -> &[u8] {
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    &buf[i..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zero_nibbles() {
        let hash = [0u8; 32];
        assert_eq!(leading_zero_nibbles(&hash), 64);

        let mut hash = [0u8; 32];
        hash[0] = 0x10;
        assert_eq!(leading_zero_nibbles(&hash), 0);

        hash[0] = 0x0f;
        assert_eq!(leading_zero_nibbles(&hash), 1);

        hash[0] = 0x00;
        hash[1] = 0x01;
        assert_eq!(leading_zero_nibbles(&hash), 3);

        hash[1] = 0xa0;
        assert_eq!(leading_zero_nibbles(&hash), 2);
    }

    #[test]
    fn test_nibbles_match_hex_prefix() {
        for counter in 0..2_000u64 {
            let hash = digest("chal", "addr", counter);
            let hex = hex::encode(hash);
            let expected = hex.chars().take_while(|&c| c == '0').count() as u32;
            assert_eq!(leading_zero_nibbles(&hash), expected, "counter {counter}");
        }
    }

    #[test]
    fn test_write_decimal() {
        let mut buf = [0u8; 20];
        assert_eq!(write_decimal(0, &mut buf), b"0");
        assert_eq!(write_decimal(10_000, &mut buf), b"10000");
        assert_eq!(
            write_decimal(u64::MAX, &mut buf),
            u64::MAX.to_string().as_bytes()
        );
    }

    #[test]
    fn test_digest_is_plain_concatenation() {
        let expected = platform::crypto::sha256(b"abcid142");
        assert_eq!(digest("abc", "id1", 42), expected);
    }

    #[test]
    fn test_meets_difficulty_zero_always_true() {
        let hash = [0xffu8; 32];
        assert!(meets_difficulty(&hash, Difficulty::new(0).unwrap()));
        assert!(!meets_difficulty(&hash, Difficulty::new(1).unwrap()));
    }
}
