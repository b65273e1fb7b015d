use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;

const TIMESTAMP: &str = r"\d{2}:\d{2}:\d{2}[.,]\d{1,3}";

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})[.,](\d{1,3})$").expect("timestamp pattern compiles")
});

static TIME_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"({TIMESTAMP})\s*-->\s*({TIMESTAMP})")).expect("range pattern compiles")
});

/// Display form `HH:MM:SS.fff`; negative inputs get a leading `-`.
pub fn format_seconds(seconds: f64) -> String {
    format_timestamp(seconds, '.', true)
}

/// SubRip form `HH:MM:SS,fff`; negative inputs clamp to zero.
pub fn format_srt_timestamp(seconds: f64) -> String {
    format_timestamp(seconds, ',', false)
}

fn format_timestamp(seconds: f64, ms_sep: char, signed: bool) -> String {
    let sign = if signed && seconds < 0.0 { "-" } else { "" };
    let magnitude = if signed { seconds.abs() } else { seconds.max(0.0) };

    // Round on the whole value so 59.9996 carries into the next second.
    let total_ms = (magnitude * 1000.0).round() as i64;

    let milli = total_ms % 1000;
    let total_seconds = total_ms / 1000;
    let sec = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let min = total_minutes % 60;
    let hour = total_minutes / 60;

    format!("{sign}{hour:02}:{min:02}:{sec:02}{ms_sep}{milli:03}")
}

/// Parses `HH:MM:SS{.|,}f` with 1-3 fraction digits. The fraction is taken
/// as the decimal it spells, so `.5` is half a second.
pub fn parse_timestamp(s: &str) -> Result<f64> {
    let t = s.trim();
    let caps = TIMESTAMP_RE
        .captures(t)
        .ok_or_else(|| anyhow!("unrecognized timestamp: '{t}'"))?;

    let h: f64 = caps[1].parse().map_err(|_| anyhow!("bad hours: '{t}'"))?;
    let m: f64 = caps[2].parse().map_err(|_| anyhow!("bad minutes: '{t}'"))?;
    let sec: f64 = caps[3].parse().map_err(|_| anyhow!("bad seconds: '{t}'"))?;
    let frac: f64 = format!("0.{}", &caps[4])
        .parse()
        .map_err(|_| anyhow!("bad fraction: '{t}'"))?;

    Ok(h * 3600.0 + m * 60.0 + sec + frac)
}

/// Finds a `start --> end` range anywhere in `line`. Trailing cue settings
/// after the end timestamp are ignored.
pub fn parse_time_range_arrow(line: &str) -> Option<(f64, f64)> {
    let caps = TIME_RANGE_RE.captures(line)?;
    let start = parse_timestamp(&caps[1]).ok()?;
    let end = parse_timestamp(&caps[2]).ok()?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_padded_fields() {
        assert_eq!(format_seconds(0.0), "00:00:00.000");
        assert_eq!(format_seconds(1.5), "00:00:01.500");
        assert_eq!(format_seconds(3661.25), "01:01:01.250");
        assert_eq!(format_srt_timestamp(65.0), "00:01:05,000");
    }

    #[test]
    fn rounds_milliseconds_instead_of_truncating() {
        // 1.001 is 1.000999... in binary; truncation would print .000
        assert_eq!(format_seconds(1.001), "00:00:01.001");
        assert_eq!(format_seconds(2.0119), "00:00:02.012");
    }

    #[test]
    fn rounding_carries_into_larger_fields() {
        assert_eq!(format_seconds(59.9996), "00:01:00.000");
        assert_eq!(format_seconds(3599.9999), "01:00:00.000");
    }

    #[test]
    fn negative_values_get_a_sign_for_display() {
        assert_eq!(format_seconds(-1.5), "-00:00:01.500");
        assert_eq!(format_srt_timestamp(-1.5), "00:00:00,000");
    }

    #[test]
    fn fraction_is_its_literal_decimal_value() {
        assert_eq!(parse_timestamp("00:00:01.5").unwrap(), 1.5);
        assert!((parse_timestamp("00:00:01,05").unwrap() - 1.05).abs() < 1e-9);
        assert!((parse_timestamp("00:00:01.500").unwrap() - 1.5).abs() < 1e-9);
        assert!((parse_timestamp("01:02:03,004").unwrap() - 3723.004).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_timestamps() {
        assert!(parse_timestamp("0:00:01.000").is_err());
        assert!(parse_timestamp("00:00:01").is_err());
        assert!(parse_timestamp("00:00:01.0000").is_err());
        assert!(parse_timestamp("aa:bb:cc.ddd").is_err());
    }

    #[test]
    fn format_then_parse_stays_within_a_millisecond() {
        for raw in [
            "00:00:00.000",
            "00:00:01,5",
            "00:00:59.999",
            "00:59:59,99",
            "12:34:56.789",
            "99:59:59.001",
        ] {
            let secs = parse_timestamp(raw).unwrap();
            let again = parse_timestamp(&format_seconds(secs)).unwrap();
            assert!((again - secs).abs() <= 0.001, "{raw}: {secs} vs {again}");
        }
    }

    #[test]
    fn range_allows_mixed_separators_and_settings() {
        let (start, end) =
            parse_time_range_arrow("00:00:01.000 --> 00:00:03,000 X1:10 Y1:20").unwrap();
        assert_eq!(start, 1.0);
        assert_eq!(end, 3.0);
        assert!(parse_time_range_arrow("00:00:01.000 00:00:03,000").is_none());
    }
}
