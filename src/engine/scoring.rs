/// Fastest plausible typing speed, in words per minute.
pub const CEILING_WPM: f64 = 200.0;
pub const CHARS_PER_WORD: f64 = 5.0;

/// Time to type a trigram at `CEILING_WPM`, in seconds (0.18s).
pub const TRIGRAM_CEILING_SECS: f64 = 3.0 * 60.0 / (CEILING_WPM * CHARS_PER_WORD);

/// Effort spent on one trigram that took `duration` seconds.
///
/// Monotonically increasing, tends to zero as the duration approaches
/// zero (nobody types that fast), and approaches `duration` itself for
/// sequences well below the speed ceiling.
pub fn effort(duration: f64) -> f64 {
    if duration.is_nan() || duration <= 0.0 {
        return 0.0;
    }
    duration * (1.0 - (-duration / TRIGRAM_CEILING_SECS).exp())
}

/// Difficulty of a trigram: how often it occurs times how much effort it costs.
pub fn trigram_score(count: u64, duration: f64) -> f64 {
    count as f64 * effort(duration)
}

pub fn wpm(chars: usize, secs: f64) -> f64 {
    if secs <= 0.0 {
        return 0.0;
    }
    chars as f64 / CHARS_PER_WORD / secs * 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling_is_180ms() {
        assert!((TRIGRAM_CEILING_SECS - 0.18).abs() < 1e-12);
    }

    #[test]
    fn test_effort_zero_for_non_positive() {
        assert_eq!(effort(0.0), 0.0);
        assert_eq!(effort(-0.5), 0.0);
        assert_eq!(effort(f64::NAN), 0.0);
    }

    #[test]
    fn test_effort_monotonic() {
        let mut prev = 0.0;
        for i in 1..200 {
            let e = effort(i as f64 * 0.01);
            assert!(e > prev, "effort must increase, {e} <= {prev} at step {i}");
            prev = e;
        }
    }

    #[test]
    fn test_effort_approaches_duration_when_slow() {
        assert!((effort(3.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_regression_baseline() {
        let frequent_slow = trigram_score(50, 0.30);
        let rare_fast = trigram_score(1, 0.05);
        assert!((frequent_slow - 12.16687).abs() < 1e-5, "got {frequent_slow}");
        assert!((rare_fast - 0.01213).abs() < 1e-5, "got {rare_fast}");
        assert!(frequent_slow > rare_fast);
    }

    #[test]
    fn test_wpm() {
        // 50 chars in 60s = 10 words/min
        assert!((wpm(50, 60.0) - 10.0).abs() < 1e-12);
        assert_eq!(wpm(10, 0.0), 0.0);
    }
}
