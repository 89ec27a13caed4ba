/// Rounds seconds to whole milliseconds, clamping negatives and NaN to zero.
#[must_use]
pub fn seconds_to_millis(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }

    (seconds * 1000.0).round() as u64
}

#[must_use]
pub fn format_srt_timestamp(millis: u64) -> String {
    format_timestamp(millis, ',')
}

#[must_use]
pub fn format_clock(seconds: f64) -> String {
    let total = seconds_to_millis(seconds) / 1000;
    format!("{}:{:02}", total / 60, total % 60)
}

fn format_timestamp(millis: u64, separator: char) -> String {
    let milli = millis % 1000;
    let total_seconds = millis / 1000;
    let second = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minute = total_minutes % 60;
    let hour = total_minutes / 60;

    format!("{hour:02}:{minute:02}:{second:02}{separator}{milli:03}")
}
