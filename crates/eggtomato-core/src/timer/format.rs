//! Display helpers for countdown values.

/// Format milliseconds as `MM:SS`, rounding partial seconds up.
///
/// Minutes are not wrapped, so an hour renders as `60:00`.
pub fn format_time(ms: u64) -> String {
    let total_secs = ceil_secs(ms);
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Format as `H:MM:SS` once the value reaches an hour, otherwise `MM:SS`.
pub fn format_time_long(ms: u64) -> String {
    let total_secs = ceil_secs(ms);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// 0.0 .. 1.0 elapsed fraction of a countdown.
pub fn progress(remaining_ms: u64, total_ms: u64) -> f64 {
    if total_ms == 0 {
        return 0.0;
    }
    1.0 - (remaining_ms as f64 / total_ms as f64)
}

fn ceil_secs(ms: u64) -> u64 {
    ms.div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(65_000), "01:05");
        assert_eq!(format_time(3_600_000), "60:00");
        assert_eq!(format_time(0), "00:00");
    }

    #[test]
    fn partial_seconds_round_up() {
        assert_eq!(format_time(1), "00:01");
        assert_eq!(format_time(59_001), "01:00");
    }

    #[test]
    fn long_format_switches_at_one_hour() {
        assert_eq!(format_time_long(3_599_000), "59:59");
        assert_eq!(format_time_long(3_600_000), "1:00:00");
        assert_eq!(format_time_long(3_725_000), "1:02:05");
    }

    #[test]
    fn progress_fraction() {
        assert_eq!(progress(0, 0), 0.0);
        assert_eq!(progress(1_000, 1_000), 0.0);
        assert_eq!(progress(250, 1_000), 0.75);
        assert_eq!(progress(0, 1_000), 1.0);
    }
}
