//! Modular arithmetic primitives shared by every addressing computation.
//!
//! All arena addresses and all fields written back to the arena pass
//! through [`normalize`]; operand offsets pass through [`fold`] to honor
//! the read/write distance caps; DIV and MOD consume fields through the
//! signed view of [`to_signed`].

/// Reduces an address or field into `[0, modulus)`.
#[must_use]
pub const fn normalize(value: i32, modulus: i32) -> i32 {
    ((value % modulus) + modulus) % modulus
}

/// Folds an offset into `[-limit/2, limit/2]`.
///
/// The boundary is inclusive on the positive side only: for an even
/// `limit`, `limit/2` stays put while `-limit/2` comes back as
/// `+limit/2`. When `limit` equals the core size this is the identity
/// modulo the core.
#[must_use]
pub const fn fold(offset: i32, limit: i32) -> i32 {
    let reduced = normalize(offset, limit);
    if reduced > limit / 2 {
        reduced - limit
    } else {
        reduced
    }
}

/// Signed view of a field, as consumed by DIV and MOD.
///
/// Values at or above `modulus/2` are taken as negative. Note the
/// boundary differs from [`fold`]: `to_signed(m/2, m)` is `m/2 - m`.
#[must_use]
pub const fn to_signed(value: i32, modulus: i32) -> i32 {
    let reduced = normalize(value, modulus);
    if reduced >= modulus / 2 {
        reduced - modulus
    } else {
        reduced
    }
}

#[cfg(test)]
mod tests {
    use super::{fold, normalize, to_signed};

    #[test]
    fn normalize_maps_into_core_range() {
        assert_eq!(normalize(0, 8000), 0);
        assert_eq!(normalize(8000, 8000), 0);
        assert_eq!(normalize(-1, 8000), 7999);
        assert_eq!(normalize(-8001, 8000), 7999);
        assert_eq!(normalize(16_003, 8000), 3);
    }

    #[test]
    fn normalize_is_idempotent() {
        for value in [-9000, -1, 0, 1, 4000, 7999, 8000, 123_456] {
            let once = normalize(value, 8000);
            assert_eq!(normalize(once, 8000), once);
        }
    }

    #[test]
    fn fold_is_inclusive_on_the_positive_boundary_only() {
        assert_eq!(fold(4000, 8000), 4000);
        assert_eq!(fold(4001, 8000), -3999);
        assert_eq!(fold(-4000, 8000), 4000);
        assert_eq!(fold(-2, 8000), -2);
        assert_eq!(fold(7998, 8000), -2);
    }

    #[test]
    fn fold_respects_a_limit_below_the_core_size() {
        assert_eq!(fold(398, 400), -2);
        assert_eq!(fold(7998, 400), -2);
        assert_eq!(fold(8197, 400), 197);
        assert_eq!(fold(1, 1), 0);
        assert_eq!(fold(-1, 1), 0);
    }

    #[test]
    fn to_signed_splits_at_half_the_modulus() {
        assert_eq!(to_signed(3999, 8000), 3999);
        assert_eq!(to_signed(4000, 8000), -4000);
        assert_eq!(to_signed(7998, 8000), -2);
        assert_eq!(to_signed(0, 8000), 0);
    }
}
