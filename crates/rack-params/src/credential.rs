// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Secure credential generation.
//!
//! Generates constraint-satisfying random secrets for auto-populated
//! parameters such as auth tokens: at least four letters, one digit, and
//! one special character, with the remainder drawn uniformly from the
//! union alphabet and the whole string shuffled. Every draw comes from
//! the OS CSPRNG; correctness is defined by the composition constraints,
//! not by reproducibility.

use crate::error::{Error, Result};
use rand::RngCore;
use rand::rngs::OsRng;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL_CHARS: &[u8] = b"$#?";

const MIN_LETTERS: usize = 4;
const MIN_DIGITS: usize = 1;
const MIN_SPECIAL_CHARS: usize = 1;

/// Generate a random password of `length` characters.
///
/// Fails with [`Error::LengthTooShort`] when `length` is below the sum of
/// the class quotas, and with [`Error::Entropy`] when the OS random
/// source fails.
pub fn generate_secure_password(length: usize) -> Result<String> {
    let min = MIN_LETTERS + MIN_DIGITS + MIN_SPECIAL_CHARS;
    if length < min {
        return Err(Error::LengthTooShort { min });
    }

    let all_chars: Vec<u8> = [LETTERS, DIGITS, SPECIAL_CHARS].concat();

    let mut password = Vec::with_capacity(length);
    for _ in 0..MIN_LETTERS {
        password.push(draw(LETTERS)?);
    }
    for _ in 0..MIN_DIGITS {
        password.push(draw(DIGITS)?);
    }
    for _ in 0..MIN_SPECIAL_CHARS {
        password.push(draw(SPECIAL_CHARS)?);
    }
    for _ in min..length {
        password.push(draw(&all_chars)?);
    }

    // Fisher-Yates, so the quota characters are not positionally
    // predictable.
    for i in (1..password.len()).rev() {
        let j = random_index(i + 1)?;
        password.swap(i, j);
    }

    Ok(password.into_iter().map(char::from).collect())
}

fn draw(char_set: &[u8]) -> Result<u8> {
    Ok(char_set[random_index(char_set.len())?])
}

/// A uniform index in `0..bound`, using rejection sampling to avoid
/// modulo bias.
fn random_index(bound: usize) -> Result<usize> {
    debug_assert!(bound > 0 && bound <= u32::MAX as usize);
    let bound = bound as u32;
    let zone = u32::MAX - (u32::MAX % bound);
    loop {
        let mut buf = [0u8; 4];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| Error::Entropy(e.to_string()))?;
        let v = u32::from_le_bytes(buf);
        if v < zone {
            return Ok((v % bound) as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_counts(s: &str) -> (usize, usize, usize) {
        let letters = s.chars().filter(|c| c.is_ascii_alphabetic()).count();
        let digits = s.chars().filter(|c| c.is_ascii_digit()).count();
        let special = s.chars().filter(|c| "$#?".contains(*c)).count();
        (letters, digits, special)
    }

    #[test]
    fn test_too_short_length_fails() {
        for length in 0..6 {
            assert!(matches!(
                generate_secure_password(length),
                Err(Error::LengthTooShort { min: 6 })
            ));
        }
    }

    #[test]
    fn test_minimum_length_satisfies_quotas() {
        let pw = generate_secure_password(6).unwrap();
        assert_eq!(pw.len(), 6);
        let (letters, digits, special) = class_counts(&pw);
        assert!(letters >= 4);
        assert!(digits >= 1);
        assert!(special >= 1);
        assert_eq!(letters + digits + special, 6);
    }

    #[test]
    fn test_composition_for_longer_lengths() {
        for length in [8, 20, 64] {
            let pw = generate_secure_password(length).unwrap();
            assert_eq!(pw.len(), length);
            let (letters, digits, special) = class_counts(&pw);
            assert!(letters >= 4, "{pw} has fewer than 4 letters");
            assert!(digits >= 1, "{pw} has no digit");
            assert!(special >= 1, "{pw} has no special character");
            assert_eq!(letters + digits + special, length, "{pw} has foreign characters");
        }
    }

    #[test]
    fn test_successive_passwords_differ() {
        // A collision at 20 characters means the random source is broken.
        let a = generate_secure_password(20).unwrap();
        let b = generate_secure_password(20).unwrap();
        assert_ne!(a, b);
    }
}
