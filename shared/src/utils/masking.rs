//! Masking helpers for logging user identities
//!
//! Identities are usernames or phone numbers; logs only ever carry the
//! last four characters.

/// Number of trailing characters left visible
const VISIBLE_CHARS: usize = 4;

/// Mask an identity for logging (show only the last 4 characters)
///
/// Works on characters rather than bytes so multi-byte identities never
/// split inside a code point.
///
/// # Example
///
/// ```
/// use otp_shared::mask_identity;
///
/// assert_eq!(mask_identity("+14155552671"), "+*******2671");
/// assert_eq!(mask_identity("alice"), "*lice");
/// assert_eq!(mask_identity("bob"), "***");
/// ```
pub fn mask_identity(identity: &str) -> String {
    let chars: Vec<char> = identity.chars().collect();
    if chars.len() <= VISIBLE_CHARS {
        return "*".repeat(chars.len());
    }

    let masked_count = chars.len() - VISIBLE_CHARS;
    let tail: String = chars[masked_count..].iter().collect();

    if chars[0] == '+' {
        format!("+{}{}", "*".repeat(masked_count - 1), tail)
    } else {
        format!("{}{}", "*".repeat(masked_count), tail)
    }
}
