use std::fmt;

use thiserror::Error;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// Outer-totalistic Life-like rule, as found in pattern files.
///
/// # Representation
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b0s0:                 0000_0000_0000_0000_0000_0000_0000_0000
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |mask: u16| -> String {
            (0..=8)
                .filter(|n| mask & (1 << n) != 0)
                .map(|n| char::from(b'0' + n as u8))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Missing '/' between births and survivals")]
    MissingSeparator,

    #[error("Expected a neighbor count 0-8, found '{got}'")]
    InvalidDigit { got: char },
}

/// Parse a rulestring.
///
/// Accepts `B3/S23` (any case, either half first) and the older `23/3` notation, which lists
/// survivals first. A bounded grid suffix such as `:T100,100` is ignored.
pub fn parse_rule(bytes: &[u8]) -> Result<RuleSet, RuleError> {
    let bytes = bytes.trim_ascii();
    let bytes = match bytes.iter().position(|&b| b == b':') {
        Some(i) => &bytes[..i],
        None => bytes,
    };

    let Some(i) = bytes.iter().position(|&b| b == b'/') else {
        return Err(RuleError::MissingSeparator);
    };
    let (left, right) = (&bytes[..i], &bytes[i + 1..]);

    let (b, s) = match (left, right) {
        ([b'b' | b'B', b @ ..], [b's' | b'S', s @ ..]) => (b, s),
        ([b's' | b'S', s @ ..], [b'b' | b'B', b @ ..]) => (b, s),
        (s, b) => (b, s),
    };

    Ok(RuleSet::new(bytes_to_num(b)?, bytes_to_num(s)?))
}

/// Convert the human readable birth/survival number to a packed bit representation
fn bytes_to_num(bytes: &[u8]) -> Result<u16, RuleError> {
    let mut n = 0;

    for &b in bytes {
        if !(b'0'..=b'8').contains(&b) {
            return Err(RuleError::InvalidDigit { got: b as char });
        }

        n |= 1 << (b - b'0');
    }

    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn life_notations() {
        for rule in ["B3/S23", "b3/s23", "S23/B3", "23/3", " B3/S23:T100,100 "] {
            assert_eq!(parse_rule(rule.as_bytes()).unwrap(), B3S23, "{rule}");
        }
    }

    #[test]
    fn other_rules() {
        let highlife = parse_rule(b"B36/S23").unwrap();

        assert_ne!(highlife, B3S23);
        assert_eq!(highlife.births(), 0b100_1000);
        assert_eq!(highlife.survivals(), 0b1100);
        assert_eq!(highlife.to_string(), "B36/S23");
    }

    #[test]
    fn display_life() {
        assert_eq!(B3S23.to_string(), "B3/S23");
        assert_eq!(RuleSet::new(0, 0).to_string(), "B/S");
    }

    #[test]
    fn invalid_rules() {
        assert!(matches!(
            parse_rule(b"B3S23"),
            Err(RuleError::MissingSeparator)
        ));
        assert!(matches!(
            parse_rule(b"B9/S23"),
            Err(RuleError::InvalidDigit { got: '9' })
        ));
    }
}
