//! # Invoice Code Generation
//!
//! Generates the human-presentable invoice codes stamped on finalized
//! transactions: the literal `TRX-` prefix followed by ten random
//! characters drawn from digits and uppercase letters.
//!
//! Uniqueness is NOT guaranteed here. The checkout engine reserves the
//! code against the database's unique index and regenerates on collision,
//! so this module stays a pure function of the supplied RNG.

use rand::Rng;

use crate::{INVOICE_PREFIX, INVOICE_SUFFIX_LEN};

// =============================================================================
// Generation
// =============================================================================

/// Generates one candidate invoice code, e.g. `TRX-7KQ20XW4A1`.
///
/// Each suffix position is independently a random digit or a random
/// letter, coin-flipped per character, so codes mix the two freely.
///
/// ## Arguments
/// * `rng` - Randomness source; tests pass a seeded generator
///
/// ## Example
/// ```rust
/// use kasir_core::invoice::generate_invoice_code;
///
/// let code = generate_invoice_code(&mut rand::thread_rng());
/// assert!(code.starts_with("TRX-"));
/// assert_eq!(code.len(), 14);
/// ```
pub fn generate_invoice_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut code = String::with_capacity(INVOICE_PREFIX.len() + INVOICE_SUFFIX_LEN);
    code.push_str(INVOICE_PREFIX);
    for _ in 0..INVOICE_SUFFIX_LEN {
        let ch = if rng.gen_bool(0.5) {
            rng.gen_range(b'0'..=b'9') as char
        } else {
            rng.gen_range(b'A'..=b'Z') as char
        };
        code.push(ch);
    }
    code
}

/// Checks whether a string is a well-formed invoice code.
///
/// Used when looking up transactions by invoice so malformed input can be
/// rejected before hitting the database.
pub fn is_valid_invoice_code(code: &str) -> bool {
    let Some(suffix) = code.strip_prefix(INVOICE_PREFIX) else {
        return false;
    };
    suffix.len() == INVOICE_SUFFIX_LEN
        && suffix.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_code_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let code = generate_invoice_code(&mut rng);
            assert_eq!(code.len(), INVOICE_PREFIX.len() + INVOICE_SUFFIX_LEN);
            assert!(code.starts_with(INVOICE_PREFIX));
            let suffix = &code[INVOICE_PREFIX.len()..];
            assert!(
                suffix
                    .bytes()
                    .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()),
                "unexpected character in {code}"
            );
        }
    }

    #[test]
    fn test_codes_vary() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = generate_invoice_code(&mut rng);
        let b = generate_invoice_code(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_is_valid_invoice_code() {
        let mut rng = StdRng::seed_from_u64(1);
        let code = generate_invoice_code(&mut rng);
        assert!(is_valid_invoice_code(&code));

        assert!(!is_valid_invoice_code("TRX-short"));
        assert!(!is_valid_invoice_code("INV-7KQ20XW4A1"));
        assert!(!is_valid_invoice_code("TRX-7kq20xw4a1")); // lowercase
        assert!(!is_valid_invoice_code(""));
    }
}
