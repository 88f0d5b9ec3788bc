/// Reference cut-off below which a roster match is not trusted.
pub const CONFIDENCE_THRESHOLD: u8 = 50;

/// Scale a `0.0..=1.0` similarity onto the `0..=100` confidence range.
pub fn to_percent(similarity: f64) -> u8 {
    if similarity.is_nan() {
        return 0;
    }
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u8
}

pub fn meets_threshold(score: u8, threshold: u8) -> bool {
    score >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_and_rounds() {
        assert_eq!(to_percent(1.0), 100);
        assert_eq!(to_percent(0.416), 42);
        assert_eq!(to_percent(-0.2), 0);
        assert_eq!(to_percent(f64::NAN), 0);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(meets_threshold(50, CONFIDENCE_THRESHOLD));
        assert!(!meets_threshold(49, CONFIDENCE_THRESHOLD));
    }
}
