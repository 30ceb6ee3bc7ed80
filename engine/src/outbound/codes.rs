//! Random confirmation-code generator.

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::domain::booking::ConfirmationCode;
use crate::domain::ports::{ConfirmationCodes, ConfirmationCodesError};

/// Uppercase letters and digits with ambiguous glyphs (I, L, O, 0, 1)
/// removed, so codes survive being read over the phone.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

const DEFAULT_CODE_LENGTH: usize = 8;

/// Collision-resistant short-code generator backed by a fast RNG.
///
/// Collisions are not impossible, only unlikely; the booking repository's
/// uniqueness backstop plus the workflow retry absorb the rare clash.
#[derive(Debug, Clone, Copy)]
pub struct RandomCodes {
    length: usize,
}

impl RandomCodes {
    /// Generator producing eight-character codes.
    pub fn new() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
        }
    }

    /// Generator producing codes of a custom length. Lengths outside the
    /// confirmation-code bounds will fail at generation time.
    pub fn with_length(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodes {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfirmationCodes for RandomCodes {
    async fn generate(&self) -> Result<ConfirmationCode, ConfirmationCodesError> {
        let mut rng = SmallRng::from_entropy();
        let raw: String = (0..self.length)
            .map(|_| {
                let index = rng.gen_range(0..CODE_ALPHABET.len());
                char::from(CODE_ALPHABET[index])
            })
            .collect();
        ConfirmationCode::new(raw).map_err(|err| ConfirmationCodesError::generation(err.to_string()))
    }
}
