//! Binary arithmetic with a tagged error channel
//!
//! Replaces the classic sentinel-string error display with a typed
//! result at the compute boundary. The frontend maps the error variant
//! to its localized error text; the engine only ever sees the tag.

use crate::action::Op;
use std::fmt;

/// Why a computation failed to produce a displayable number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeError {
    /// Division by exactly zero
    DivisionByZero,
    /// The result overflowed or is otherwise not a finite number
    NonFinite,
}

impl fmt::Display for ComputeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeError::DivisionByZero => write!(f, "division by zero"),
            ComputeError::NonFinite => write!(f, "non-finite result"),
        }
    }
}

/// Apply a binary operator to two operands
///
/// Division by exactly zero and non-finite results are the only error
/// cases. The result is returned raw; rounding to display precision
/// happens in the formatting layer.
pub fn compute(a: f64, b: f64, op: Op) -> Result<f64, ComputeError> {
    let result = match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => {
            if b == 0.0 {
                return Err(ComputeError::DivisionByZero);
            }
            a / b
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(ComputeError::NonFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(compute(2.0, 3.0, Op::Add), Ok(5.0));
        assert_eq!(compute(2.0, 3.0, Op::Sub), Ok(-1.0));
        assert_eq!(compute(2.0, 3.0, Op::Mul), Ok(6.0));
        assert_eq!(compute(6.0, 3.0, Op::Div), Ok(2.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(compute(9.0, 0.0, Op::Div), Err(ComputeError::DivisionByZero));
        // Negative zero compares equal to zero
        assert_eq!(compute(9.0, -0.0, Op::Div), Err(ComputeError::DivisionByZero));
    }

    #[test]
    fn test_zero_dividend_is_fine() {
        assert_eq!(compute(0.0, 5.0, Op::Div), Ok(0.0));
    }

    #[test]
    fn test_overflow_is_non_finite() {
        assert_eq!(
            compute(f64::MAX, 2.0, Op::Mul),
            Err(ComputeError::NonFinite)
        );
        assert_eq!(
            compute(f64::MAX, f64::MAX, Op::Add),
            Err(ComputeError::NonFinite)
        );
    }

    #[test]
    fn test_float_noise_survives_compute() {
        // Rounding is the formatter's job, not compute's
        let result = compute(0.1, 0.2, Op::Add).unwrap();
        assert!(result > 0.3 && result < 0.3000000001);
    }
}
