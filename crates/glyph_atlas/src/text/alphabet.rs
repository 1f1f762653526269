//! Fixed, ordered character set packed into an atlas

use std::fmt;

use super::{FontError, FontResult};

/// Ordered set of distinct single-byte characters
///
/// The order is load-bearing: atlas offsets are assigned in exactly this
/// order, so two atlases built from the same font, size and alphabet are
/// byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// Every printable ASCII character, space first
    pub const STANDARD: &'static str =
        " 0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ`~!@#$%^&*()-_=+[{]}\\|;:'\",<.>/?";

    /// Validate and build an alphabet from `chars`, keeping their order
    ///
    /// Fails on an empty set, a repeated character, or anything outside ASCII.
    pub fn new(chars: &str) -> FontResult<Self> {
        let mut seen = [false; 128];
        let mut ordered = Vec::with_capacity(chars.len());

        for ch in chars.chars() {
            if !ch.is_ascii() {
                return Err(FontError::UnsupportedCharacter(ch));
            }
            let slot = &mut seen[ch as usize];
            if *slot {
                return Err(FontError::DuplicateCharacter(ch));
            }
            *slot = true;
            ordered.push(ch);
        }

        if ordered.is_empty() {
            return Err(FontError::EmptyAlphabet);
        }

        Ok(Self { chars: ordered })
    }

    /// The standard printable-ASCII alphabet
    pub fn standard() -> Self {
        Self {
            chars: Self::STANDARD.chars().collect(),
        }
    }

    /// Characters in atlas order
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Iterate characters in atlas order
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Number of characters
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false for a validated alphabet
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Position of `ch` in atlas order
    pub fn index_of(&self, ch: char) -> Option<usize> {
        self.chars.iter().position(|&c| c == ch)
    }

    /// Whether `ch` belongs to this alphabet
    pub fn contains(&self, ch: char) -> bool {
        self.index_of(ch).is_some()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|ch| write!(f, "{ch}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_alphabet_is_printable_ascii() {
        let alphabet = Alphabet::standard();
        assert_eq!(alphabet.len(), 95);
        assert_eq!(alphabet.chars()[0], ' ');
        assert_eq!(alphabet.chars()[1], '0');
        assert_eq!(alphabet.chars()[94], '?');
        assert!((0x20u8..0x7f).all(|b| alphabet.contains(b as char)));
    }

    #[test]
    fn test_standard_matches_validated_constructor() {
        assert_eq!(Alphabet::new(Alphabet::STANDARD).unwrap(), Alphabet::standard());
        assert_eq!(Alphabet::standard().to_string(), Alphabet::STANDARD);
    }

    #[test]
    fn test_order_is_preserved() {
        let alphabet = Alphabet::new("zy.a").unwrap();
        assert_eq!(alphabet.index_of('z'), Some(0));
        assert_eq!(alphabet.index_of('.'), Some(2));
        assert_eq!(alphabet.index_of('b'), None);
    }

    #[test]
    fn test_empty_alphabet_is_rejected() {
        assert!(matches!(Alphabet::new(""), Err(FontError::EmptyAlphabet)));
    }

    #[test]
    fn test_duplicates_are_rejected() {
        assert!(matches!(Alphabet::new("a.b."), Err(FontError::DuplicateCharacter('.'))));
    }

    #[test]
    fn test_multibyte_characters_are_rejected() {
        assert!(matches!(Alphabet::new("aé"), Err(FontError::UnsupportedCharacter('é'))));
    }
}
