/// Render elapsed milliseconds as `HH:MM:SS:CC` (centisecond resolution).
///
/// Milliseconds are rounded to the nearest centisecond and the carry
/// propagates upward, so 59.999s renders as `00:01:00:00` rather than a
/// stuck `00:00:59:00`. Hours are unbounded and simply widen past two
/// digits.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_centis = (elapsed_ms + 5) / 10;
    let centis = total_centis % 100;
    let seconds = (total_centis / 100) % 60;
    let minutes = (total_centis / 6_000) % 60;
    let hours = total_centis / 360_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}:{centis:02}")
}

#[cfg(test)]
mod tests {
    use super::format_elapsed;

    #[test]
    fn zero_is_all_zeros() {
        assert_eq!(format_elapsed(0), "00:00:00:00");
    }

    #[test]
    fn fields_split_correctly() {
        // 1h 1m 1.5s
        assert_eq!(format_elapsed(3_661_500), "01:01:01:50");
        assert_eq!(format_elapsed(5_000), "00:00:05:00");
        assert_eq!(format_elapsed(59_990), "00:00:59:99");
    }

    #[test]
    fn rounding_carries_into_seconds() {
        assert_eq!(format_elapsed(59_999), "00:01:00:00");
        assert_eq!(format_elapsed(999), "00:00:01:00");
        assert_eq!(format_elapsed(994), "00:00:00:99");
    }

    #[test]
    fn hours_do_not_wrap() {
        // 100 hours; the field widens instead of wrapping to 00.
        assert_eq!(format_elapsed(100 * 3_600_000), "100:00:00:00");
    }
}
