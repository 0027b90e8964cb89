//! Bounded history of completed calculations
//!
//! Every successful `equals` appends one entry; the log keeps the most
//! recent six and evicts oldest-first. Entries are serializable so the
//! frontend can render the history panel.

use crate::action::Op;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of calculations retained
pub const HISTORY_CAPACITY: usize = 6;

/// One completed calculation
///
/// Immutable once appended. The right operand keeps the raw text that
/// was typed, so the history panel can show exactly what the user
/// entered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    /// Left operand at the time the operation resolved
    pub left: f64,
    /// The operator, serialized as its display glyph
    pub op: Op,
    /// Raw right operand text
    #[serde(rename = "rightText")]
    pub right: String,
    /// The computed result
    pub result: f64,
}

/// Capacity-bounded FIFO log of calculations
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: VecDeque<Calculation>,
}

impl History {
    /// Create an empty history
    pub fn new() -> History {
        History {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Append a calculation, evicting the oldest once full
    pub fn push(&mut self, entry: Calculation) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate oldest-first
    pub fn iter(&self) -> impl Iterator<Item = &Calculation> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(left: f64, right: &str, result: f64) -> Calculation {
        Calculation {
            left,
            op: Op::Add,
            right: right.to_string(),
            result,
        }
    }

    #[test]
    fn test_push_and_iterate_oldest_first() {
        let mut history = History::new();
        history.push(entry(1.0, "1", 2.0));
        history.push(entry(2.0, "2", 4.0));

        let lefts: Vec<f64> = history.iter().map(|c| c.left).collect();
        assert_eq!(lefts, vec![1.0, 2.0]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new();
        for i in 0..10 {
            history.push(entry(i as f64, "1", i as f64 + 1.0));
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        // Entries 0..4 were evicted; the oldest survivor is 4
        assert_eq!(history.iter().next().unwrap().left, 4.0);
        assert_eq!(history.iter().last().unwrap().left, 9.0);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.push(entry(1.0, "1", 2.0));
        history.clear();
        assert!(history.is_empty());
    }
}
