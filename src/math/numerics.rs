/// Compares two floating point numbers for equality, with margin for error
pub fn approx_eq(first: f64, second: f64, tolerance: f64) -> bool {
    let diff = first - second;
    diff.abs() < tolerance
}

/// True if the two values lie strictly on opposite sides of zero, or either
/// is exactly zero. This is the condition for a root to lie between them.
pub fn brackets_zero(first: f64, second: f64) -> bool {
    !((first > 0.0 && second > 0.0) || (first < 0.0 && second < 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_eq_tests() {
        assert!(approx_eq(123.456, 123.4562, 0.001));
        assert!(!approx_eq(123.456, 123.4562, 0.0001));
    }

    #[test]
    fn brackets_zero_tests() {
        assert!(brackets_zero(-1.0, 2.0));
        assert!(brackets_zero(3.0, -0.5));
        assert!(brackets_zero(0.0, 4.0));
        assert!(!brackets_zero(1.0, 2.0));
        assert!(!brackets_zero(-1.0, -2.0));
    }
}
