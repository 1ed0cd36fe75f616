pub struct Timing {}

impl Timing {
    /// format an elapsed time in milliseconds as "m:ss.mmm".
    /// the conversion is exact, `parse_lap_time` turns it back into the same
    /// integer.
    pub fn format_lap_time(time_ms: i32) -> String {
        let minutes = time_ms / 60_000;
        let seconds = (time_ms % 60_000) / 1_000;
        let millis = time_ms % 1_000;

        format!("{}:{:02}.{:03}", minutes, seconds, millis)
    }

    /// parse a "m:ss.mmm" string back into milliseconds.
    pub fn parse_lap_time(formatted: &str) -> Option<i32> {
        let (minutes, rest) = formatted.split_once(':')?;
        let (seconds, millis) = rest.split_once('.')?;

        if seconds.len() != 2 || millis.len() != 3 {
            return None;
        }

        let minutes: i32 = minutes.parse().ok()?;
        let seconds: i32 = seconds.parse().ok()?;
        let millis: i32 = millis.parse().ok()?;
        if seconds >= 60 {
            return None;
        }

        Some(minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// format a gap to the leader as "+s.mmm".
    pub fn format_gap(gap_ms: i32) -> String {
        format!("+{}.{:03}", gap_ms / 1_000, gap_ms % 1_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_seconds_millis() {
        assert_eq!(Timing::format_lap_time(95_320), "1:35.320");
        assert_eq!(Timing::format_lap_time(59_999), "0:59.999");
        assert_eq!(Timing::format_lap_time(600_005), "10:00.005");
    }

    #[test]
    fn round_trips_exactly() {
        for time_ms in [1, 999, 1_000, 59_999, 60_000, 95_320, 97_000, 3_599_999] {
            let formatted = Timing::format_lap_time(time_ms);
            assert_eq!(Timing::parse_lap_time(&formatted), Some(time_ms));
        }
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!(Timing::parse_lap_time("1:75.000"), None);
        assert_eq!(Timing::parse_lap_time("1:05.32"), None);
        assert_eq!(Timing::parse_lap_time("no time"), None);
    }

    #[test]
    fn formats_gap() {
        assert_eq!(Timing::format_gap(1_680), "+1.680");
        assert_eq!(Timing::format_gap(75_250), "+75.250");
        assert_eq!(Timing::format_gap(5), "+0.005");
    }
}
