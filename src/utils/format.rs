//! Display formatting for second counts

/// Format seconds as `M:SS`, minutes unpadded
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(3725), "62:05");
    }
}
