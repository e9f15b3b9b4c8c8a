//! Word counts expressed as time spent reading on the job.
//!
//! Assumes 300 words per minute over an 8 hour work-day, a 5 day work-week,
//! and a 50 week work-year.

pub const WORDS_PER_YEAR: f64 = 36_000_000.0;
pub const WORKDAY_HOURS: f64 = 8.0;
pub const WORKWEEK_DAYS: f64 = 5.0;
pub const WORKYEAR_WEEKS: f64 = 50.0;

/// Note attached to reading-time results.
pub const FOOTNOTE: &str = "Reading time calculation assumes an 8 hour work-day, \
                            a 5 day work-week, and a 50 week work-year.";

/// Formats `words` as e.g. `"23 weeks, 4 days"`.
///
/// Each unit is the fractional remainder of the previous one scaled down and
/// truncated. Hours are dropped once there is at least a year; minutes once
/// there is at least a year or a week.
pub fn reading_time(words: f64) -> String {
    let years = words / WORDS_PER_YEAR;
    let weeks = years.fract() * WORKYEAR_WEEKS;
    let days = weeks.fract() * WORKWEEK_DAYS;
    let hours = days.fract() * WORKDAY_HOURS;
    let minutes = hours.fract() * 60.0;

    let (years, weeks, days, hours, minutes) = (
        years.trunc() as i64,
        weeks.trunc() as i64,
        days.trunc() as i64,
        hours.trunc() as i64,
        minutes.trunc() as i64,
    );

    let mut parts = Vec::new();
    push_unit(&mut parts, years, "year");
    push_unit(&mut parts, weeks, "week");
    push_unit(&mut parts, days, "day");
    if years == 0 {
        push_unit(&mut parts, hours, "hour");
    }
    if years == 0 && weeks == 0 {
        push_unit(&mut parts, minutes, "minute");
    }

    if parts.is_empty() {
        "Less than a minute".to_string()
    } else {
        parts.join(", ")
    }
}

fn push_unit(parts: &mut Vec<String>, count: i64, unit: &str) {
    if count != 0 {
        let plural = if count > 1 { "s" } else { "" };
        parts.push(format!("{} {}{}", count, unit, plural));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_words() {
        assert_eq!(reading_time(0.0), "Less than a minute");
    }

    #[test]
    fn under_a_minute() {
        // 36_000_000 words per 120_000 working minutes = 300 words per minute.
        assert_eq!(reading_time(299.0), "Less than a minute");
    }

    #[test]
    fn minutes_only() {
        assert_eq!(reading_time(300.0 * 45.0), "45 minutes");
        assert_eq!(reading_time(300.0 * 1.5), "1 minute");
    }

    #[test]
    fn hours_and_minutes() {
        assert_eq!(reading_time(300.0 * 150.0), "2 hours, 30 minutes");
    }

    #[test]
    fn weeks_suppress_minutes() {
        // 2 weeks, 3 days, 4 hours, 30 minutes of reading.
        let minutes = 2.0 * 5.0 * 8.0 * 60.0 + 3.0 * 8.0 * 60.0 + 4.0 * 60.0 + 30.0;
        assert_eq!(reading_time(300.0 * minutes), "2 weeks, 3 days, 4 hours");
    }

    #[test]
    fn years_suppress_hours_and_minutes() {
        let words = WORDS_PER_YEAR * 1.0 + 300.0 * (60.0 * 8.0 * 5.0 + 60.0 * 3.0);
        assert_eq!(reading_time(words), "1 year, 1 week");
    }

    #[test]
    fn singular_and_plural() {
        assert_eq!(reading_time(WORDS_PER_YEAR * 2.0), "2 years");
        assert_eq!(reading_time(300.0 * 60.0 * 8.0), "1 day");
    }
}
