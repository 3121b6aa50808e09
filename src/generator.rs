//! Random password generation with per-class guarantees.
//!
//! Characters are drawn uniformly from the union of the enabled classes
//! using the thread-local CSPRNG (OS-seeded, never from time or PID).
//! When the policy demands at least one character per enabled class,
//! rejection sampling regenerates the whole candidate until the
//! constraint holds — uniform draws alone cannot promise it for short
//! lengths, and fixing up a candidate in place would bias the output.

use rand::Rng;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{EzPassError, Result};

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Minimum allowed password length.
pub const MIN_LENGTH: usize = 4;

/// Maximum allowed password length.
pub const MAX_LENGTH: usize = 128;

/// Upper bound on rejection-sampling attempts.  At the worst admissible
/// policy (length 4, all four classes required) a single candidate
/// satisfies the constraint with probability ≈ 6.6%, so 256 attempts
/// fail with probability below 1e-7.
const MAX_ATTEMPTS: usize = 256;

/// What a generated password must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Total password length (4..=128).
    pub length: usize,
    /// Include lowercase letters.
    pub lowercase: bool,
    /// Include uppercase letters.
    pub uppercase: bool,
    /// Include digits.
    pub digits: bool,
    /// Include punctuation symbols.
    pub symbols: bool,
    /// Require at least one character from every enabled class.
    pub require_all_classes: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: 16,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
            require_all_classes: true,
        }
    }
}

impl PasswordPolicy {
    fn enabled_classes(&self) -> Vec<&'static [u8]> {
        let mut classes = Vec::with_capacity(4);
        if self.lowercase {
            classes.push(LOWERCASE);
        }
        if self.uppercase {
            classes.push(UPPERCASE);
        }
        if self.digits {
            classes.push(DIGITS);
        }
        if self.symbols {
            classes.push(SYMBOLS);
        }
        classes
    }

    fn validate(&self) -> Result<Vec<&'static [u8]>> {
        if self.length < MIN_LENGTH || self.length > MAX_LENGTH {
            return Err(EzPassError::InvalidPolicy(format!(
                "length must be between {MIN_LENGTH} and {MAX_LENGTH} (got {})",
                self.length
            )));
        }

        let classes = self.enabled_classes();
        if classes.is_empty() {
            return Err(EzPassError::InvalidPolicy(
                "at least one character class must be enabled".into(),
            ));
        }

        if self.require_all_classes && classes.len() > self.length {
            return Err(EzPassError::InvalidPolicy(format!(
                "length {} cannot contain one character from each of {} classes",
                self.length,
                classes.len()
            )));
        }

        Ok(classes)
    }
}

/// Generate a random password satisfying `policy`.
///
/// Pure function of the policy and the random source; independent of any
/// open vault session.  The returned string is wiped from memory on drop.
pub fn generate_password(policy: &PasswordPolicy) -> Result<Zeroizing<String>> {
    let classes = policy.validate()?;

    // Union alphabet of all enabled classes (the classes are disjoint).
    let alphabet: Vec<u8> = classes.iter().flat_map(|c| c.iter().copied()).collect();

    let mut rng = rand::rng();

    for _ in 0..MAX_ATTEMPTS {
        let mut candidate: Vec<u8> = (0..policy.length)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect();

        if !policy.require_all_classes || satisfies_all_classes(&candidate, &classes) {
            // The alphabet is ASCII, so this conversion cannot fail.
            let password = String::from_utf8(candidate)
                .map_err(|_| EzPassError::InvalidPolicy("non-ASCII alphabet".into()))?;
            return Ok(Zeroizing::new(password));
        }

        candidate.zeroize();
    }

    Err(EzPassError::InvalidPolicy(
        "could not satisfy the per-class requirement — relax the policy".into(),
    ))
}

fn satisfies_all_classes(candidate: &[u8], classes: &[&'static [u8]]) -> bool {
    classes
        .iter()
        .all(|class| candidate.iter().any(|b| class.contains(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_alphabet() {
        let policy = PasswordPolicy {
            lowercase: false,
            uppercase: false,
            digits: false,
            symbols: false,
            ..PasswordPolicy::default()
        };
        assert!(matches!(
            generate_password(&policy),
            Err(EzPassError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn rejects_out_of_bounds_length() {
        for length in [0, 3, 129] {
            let policy = PasswordPolicy {
                length,
                ..PasswordPolicy::default()
            };
            assert!(
                matches!(generate_password(&policy), Err(EzPassError::InvalidPolicy(_))),
                "length {length} should be rejected"
            );
        }
    }

    #[test]
    fn minimum_length_with_all_classes_succeeds() {
        // The tightest admissible policy: 4 required classes in 4 chars.
        let policy = PasswordPolicy {
            length: 4,
            require_all_classes: true,
            ..PasswordPolicy::default()
        };
        let password = generate_password(&policy).expect("length 4 with 4 classes");
        assert_eq!(password.len(), 4);
    }

    #[test]
    fn single_class_policy_uses_only_that_class() {
        let policy = PasswordPolicy {
            length: 32,
            lowercase: false,
            uppercase: false,
            digits: true,
            symbols: false,
            require_all_classes: true,
        };
        let password = generate_password(&policy).expect("digits-only policy");
        assert!(password.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn consecutive_generations_differ() {
        let policy = PasswordPolicy::default();
        let a = generate_password(&policy).expect("first");
        let b = generate_password(&policy).expect("second");
        // 16 uniform draws from 94 characters colliding is ~2^-105.
        assert_ne!(*a, *b);
    }
}
