//! Character-set and whitespace checks shared by every naming rule.
//!
//! The convention restricts artist, album, title, and genre values to small
//! ASCII alphabets. Membership is a bitmask lookup so validating a string is
//! a single pass regardless of alphabet size.

/// An ASCII character set backed by a 128-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSet {
    bits: u128,
}

impl CharSet {
    /// Build a set from a literal of ASCII characters.
    pub const fn from_ascii(chars: &str) -> Self {
        let bytes = chars.as_bytes();
        let mut bits = 0u128;
        let mut i = 0;
        while i < bytes.len() {
            bits |= 1u128 << bytes[i];
            i += 1;
        }
        Self { bits }
    }

    /// O(1) membership test. Non-ASCII characters are never members.
    pub fn contains(self, c: char) -> bool {
        (c as u32) < 128 && (self.bits >> (c as u32)) & 1 == 1
    }

    /// True when every character of `text` belongs to the set.
    pub fn contains_all(self, text: &str) -> bool {
        text.chars().all(|c| self.contains(c))
    }
}

/// Allowed characters for artist and album names.
///
/// The space is part of the alphabet: the `Last_First` folder convention
/// rewrites to `"First Last"`, so every derived display name carries one.
pub const NAME_CHARS: CharSet =
    CharSet::from_ascii("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 ");

/// Allowed characters for track titles.
pub const TITLE_CHARS: CharSet =
    CharSet::from_ascii("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 '?!");

/// Allowed characters for genres. Single alphabetic word only.
pub const GENRE_CHARS: CharSet =
    CharSet::from_ascii("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ");

/// Why a name failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameIssue {
    /// Absent, empty, or whitespace-only.
    Empty,
    /// Contains at least one character outside the allowed set.
    ForbiddenChars,
}

/// Check a possibly-absent name against an allowed character set.
///
/// Absent and whitespace-only values are invalid. The caller decides how to
/// report the issue; this function has no side effects so folder-level and
/// file-level callers can attach their own context.
pub fn validate_name(name: Option<&str>, allowed: CharSet) -> Result<(), NameIssue> {
    let name = match name {
        Some(n) if !n.trim().is_empty() => n,
        _ => return Err(NameIssue::Empty),
    };

    if !allowed.contains_all(name) {
        return Err(NameIssue::ForbiddenChars);
    }

    Ok(())
}

/// True when `text` has a leading or trailing space that a repair should
/// strip. Whitespace-only strings are left for the emptiness rules.
pub fn needs_trimming(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }

    text.starts_with(' ') || text.ends_with(' ')
}
