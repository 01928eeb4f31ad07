const MINUTES_PER_DAY: i64 = 24 * 60;

/// Maps a readiness percentage onto a "minutes before midnight" clock face.
///
/// 0% reads 9:00 PM (180 minutes out) and 100% reads 11:59 PM. The minute
/// count is truncated, not rounded.
pub fn clock_reading(percentage: f64) -> String {
    let percentage = super::rules::clamp_percentage(percentage);
    let minutes_before_midnight = (180.0 - percentage * 1.79) as i64;
    let clock_minutes = MINUTES_PER_DAY - minutes_before_midnight;

    let hours = (clock_minutes / 60) % 24;
    let minutes = clock_minutes % 60;

    let period = if hours >= 12 { "PM" } else { "AM" };
    let display_hours = match hours {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };

    format!("{display_hours}:{minutes:02} {period}")
}
