//! Action and operator definitions for the input engine
//!
//! Defines the closed set of binary operators and user actions that
//! drive the calculator state machine, together with the glyph and
//! keyboard mappings the JavaScript frontend feeds into it.

use serde::{Deserialize, Serialize};

/// Binary operator tokens
///
/// The set is closed: anything the frontend sends that does not map to
/// one of these four is rejected at the boundary, so the compute path
/// never sees an unknown operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    /// Display glyph used on the keypad and in rendered expressions
    pub fn glyph(&self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '×',
            Op::Div => '÷',
        }
    }

    /// Parse an operator from a keypad glyph or keyboard character
    ///
    /// Accepts both the display glyphs (`×`, `÷`) and their ASCII
    /// keyboard forms (`*`, `/`).
    pub fn from_char(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '×' | '*' => Some(Op::Mul),
            '÷' | '/' => Some(Op::Div),
            _ => None,
        }
    }

    /// Get the operator name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
        }
    }
}

// Operators cross the JS boundary inside history entries; the wire
// format is the display glyph itself.

impl Serialize for Op {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_char(self.glyph())
    }
}

impl<'de> Deserialize<'de> for Op {
    fn deserialize<D>(deserializer: D) -> Result<Op, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let c = char::deserialize(deserializer)?;
        Op::from_char(c)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown operator glyph: {}", c)))
    }
}

/// One user action, as produced by the keypad or the keyboard mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A single numeral character
    Digit(char),
    Decimal,
    Operator(Op),
    Percent,
    Equals,
    Backspace,
    Clear,
}

impl Action {
    /// Map a DOM `KeyboardEvent.key` string to an action
    ///
    /// The frontend owns the event listener; this table owns the
    /// mapping. Both `.` and `,` enter the decimal point (the frontend
    /// renders a decimal comma). Returns `None` for keys the
    /// calculator does not consume.
    pub fn from_key(key: &str) -> Option<Action> {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() {
                return Some(Action::Digit(c));
            }
            if let Some(op) = Op::from_char(c) {
                return Some(Action::Operator(op));
            }
            return match c {
                '.' | ',' => Some(Action::Decimal),
                '%' => Some(Action::Percent),
                '=' => Some(Action::Equals),
                _ => None,
            };
        }
        match key {
            "Enter" => Some(Action::Equals),
            "Backspace" => Some(Action::Backspace),
            "Escape" => Some(Action::Clear),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_from_char() {
        assert_eq!(Op::from_char('+'), Some(Op::Add));
        assert_eq!(Op::from_char('×'), Some(Op::Mul));
        assert_eq!(Op::from_char('*'), Some(Op::Mul));
        assert_eq!(Op::from_char('÷'), Some(Op::Div));
        assert_eq!(Op::from_char('/'), Some(Op::Div));
        assert_eq!(Op::from_char('x'), None);
    }

    #[test]
    fn test_glyph_roundtrip() {
        for op in [Op::Add, Op::Sub, Op::Mul, Op::Div] {
            assert_eq!(Op::from_char(op.glyph()), Some(op));
        }
    }

    #[test]
    fn test_action_from_key() {
        assert_eq!(Action::from_key("5"), Some(Action::Digit('5')));
        assert_eq!(Action::from_key("*"), Some(Action::Operator(Op::Mul)));
        assert_eq!(Action::from_key("."), Some(Action::Decimal));
        assert_eq!(Action::from_key(","), Some(Action::Decimal));
        assert_eq!(Action::from_key("%"), Some(Action::Percent));
        assert_eq!(Action::from_key("="), Some(Action::Equals));
        assert_eq!(Action::from_key("Enter"), Some(Action::Equals));
        assert_eq!(Action::from_key("Backspace"), Some(Action::Backspace));
        assert_eq!(Action::from_key("Escape"), Some(Action::Clear));
    }

    #[test]
    fn test_action_from_key_ignores_unrelated_keys() {
        assert_eq!(Action::from_key("a"), None);
        assert_eq!(Action::from_key("Shift"), None);
        assert_eq!(Action::from_key("ArrowLeft"), None);
        assert_eq!(Action::from_key(""), None);
    }
}
