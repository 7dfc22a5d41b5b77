// Duration policy and formatting.
//
// Live and confirmation displays use a `HH:MM:SS` clock; YouTrack only
// accepts minute granularity, so the submitted value is rounded to the
// nearest minute (half up).

/// Raises `elapsed` to the configured minimum. Both values are seconds.
pub fn apply_minimum(elapsed: u64, minimum: u64) -> u64 {
    elapsed.max(minimum)
}

/// Formats seconds as `HH:MM:SS`. Hours are not capped at 24 and grow past
/// two digits when needed.
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn round_minutes(total_secs: u64) -> u64 {
    (total_secs + 30) / 60
}

/// Duration presentation understood by the work item endpoint, e.g. `15m`.
pub fn presentation(total_secs: u64) -> String {
    format!("{}m", round_minutes(total_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_clock(s: &str) -> Option<u64> {
        let mut parts = s.split(':').map(|p| p.parse::<u64>().ok());
        let (h, m, sec) = (parts.next()??, parts.next()??, parts.next()??);
        if parts.next().is_some() || m >= 60 || sec >= 60 {
            return None;
        }
        Some(h * 3600 + m * 60 + sec)
    }

    #[test]
    fn minimum_is_a_floor() {
        for (elapsed, minimum) in [(0, 0), (0, 900), (65, 900), (900, 900), (1200, 900), (42, 0)] {
            assert_eq!(apply_minimum(elapsed, minimum), elapsed.max(minimum));
        }
        assert_eq!(apply_minimum(65, 900), 900);
        assert_eq!(apply_minimum(1200, 900), 1200);
    }

    #[test]
    fn clock_format_pads_each_field() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(65), "00:01:05");
        assert_eq!(format_clock(3600 + 2 * 60 + 9), "01:02:09");
        assert_eq!(format_clock(86_399), "23:59:59");
    }

    #[test]
    fn clock_hours_are_unbounded() {
        assert_eq!(format_clock(100 * 3600 + 1), "100:00:01");
    }

    #[test]
    fn clock_format_parses_back() {
        for secs in [0, 1, 59, 60, 61, 3599, 3600, 45_296, 86_399, 86_400, 400_000] {
            assert_eq!(parse_clock(&format_clock(secs)), Some(secs), "secs={secs}");
        }
    }

    #[test]
    fn minutes_round_half_up() {
        assert_eq!(round_minutes(0), 0);
        assert_eq!(round_minutes(29), 0);
        assert_eq!(round_minutes(30), 1);
        assert_eq!(round_minutes(89), 1);
        assert_eq!(round_minutes(90), 2);
        assert_eq!(presentation(900), "15m");
    }
}
