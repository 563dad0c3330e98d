use std::fmt;
use thiserror::Error;

/// Alphabet the reference runtime draws seed characters from. Digit `0` and the
/// letters `O`/`I` are excluded because they are visually ambiguous with `1`.
pub const SEED_ALPHABET: &[u8; 34] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZ0";
pub const SEED_LEN: usize = 8;

/// `SEED_ALPHABET.len() ^ SEED_LEN`: the total number of distinct seeds.
/// Computed from the alphabet itself so the two can never drift apart.
pub const SEED_SPACE_SIZE: u64 = (SEED_ALPHABET.len() as u64).pow(SEED_LEN as u32);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedParseError {
    #[error("seed must be exactly {SEED_LEN} characters, got {0}")]
    WrongLength(usize),
    #[error("seed byte {0:#04x} at index {1} is not in the seed alphabet")]
    InvalidChar(u8, usize),
}

/// An 8-character alphanumeric seed. Every stream derived in the engine is a
/// pure function of this value (§3 Seed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    pub fn parse(raw: &str) -> Result<Self, SeedParseError> {
        let bytes = raw.as_bytes();
        if bytes.len() != SEED_LEN {
            return Err(SeedParseError::WrongLength(bytes.len()));
        }
        let mut out = [0u8; SEED_LEN];
        for (i, &b) in bytes.iter().enumerate() {
            let upper = b.to_ascii_uppercase();
            if !SEED_ALPHABET.contains(&upper) {
                return Err(SeedParseError::InvalidChar(b, i));
            }
            out[i] = upper;
        }
        Ok(Seed(out))
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).expect("seed bytes are always ASCII")
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    /// Bijects `0..SEED_SPACE_SIZE` onto every seed in a fixed, deterministic
    /// order (§5 "seeds enumerate in a deterministic order derived from the
    /// driver's counter"): base-34 digits over [`SEED_ALPHABET`], most
    /// significant character first. `index` wraps modulo the space size, so
    /// a driver's atomic counter never needs to track exhaustion itself.
    pub fn from_index(index: u64) -> Self {
        let mut n = index % SEED_SPACE_SIZE;
        let mut out = [0u8; SEED_LEN];
        for slot in (0..SEED_LEN).rev() {
            out[slot] = SEED_ALPHABET[(n % SEED_ALPHABET.len() as u64) as usize];
            n /= SEED_ALPHABET.len() as u64;
        }
        Seed(out)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Seed {
    type Err = SeedParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Seed::parse(s)
    }
}
