//! Display formatters for ratings and review dates
//!
//! Pure functions producing the human-readable strings returned by the
//! API: star glyphs, `N/5` rating strings, and review date lines.

use chrono::{DateTime, FixedOffset, Utc};

const FILLED_STAR: &str = "★";
const EMPTY_STAR: &str = "☆";

/// IST (UTC+05:30), the fixed display timezone for review dates.
fn india_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("static offset is in range")
}

/// Render a rating as a 5-glyph star string.
///
/// The rating is rounded half-away-from-zero (so 2.5 renders as three
/// filled stars) and clamped to 0..=5. Non-finite input yields the
/// empty string.
pub fn star_display(rating: f64) -> String {
    if !rating.is_finite() {
        return String::new();
    }
    let r = (rating.round() as i64).clamp(0, 5) as usize;
    format!("{}{}", FILLED_STAR.repeat(r), EMPTY_STAR.repeat(5 - r))
}

/// `"{round(rating)}/5"`
pub fn rating_string(rating: f64) -> String {
    format!("{}/5", rating.round() as i64)
}

/// `"{rating:.1}/5.0"`
pub fn rating_display(rating: f64) -> String {
    format!("{rating:.1}/5.0")
}

/// Friendly readable date like `"Reviewed on 27 Aug 2025"`.
pub fn friendly_timestamp(created_at: Option<DateTime<Utc>>) -> Option<String> {
    created_at.map(|ts| ts.format("Reviewed on %d %b %Y").to_string())
}

/// Full review date line like `"Reviewed in India on 30 June 2025"`,
/// rendered in IST, or `"Date not available"` without a timestamp.
pub fn formatted_date(created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(ts) => ts
            .with_timezone(&india_offset())
            .format("Reviewed in India on %d %B %Y")
            .to_string(),
        None => "Date not available".to_string(),
    }
}

/// Preview of review text truncated to 150 characters.
pub fn text_preview(text: &str) -> String {
    if text.chars().count() > 150 {
        let head: String = text.chars().take(150).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Round to two decimal places, for aggregate ratings.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stars_are_always_five_glyphs() {
        for rating in [1.0, 1.4, 2.5, 3.0, 4.9, 5.0] {
            assert_eq!(star_display(rating).chars().count(), 5, "rating {rating}");
        }
    }

    #[test]
    fn stars_round_half_away_from_zero() {
        assert_eq!(star_display(2.5), "★★★☆☆");
        assert_eq!(star_display(4.0), "★★★★☆");
        assert_eq!(star_display(5.0), "★★★★★");
        assert_eq!(star_display(0.0), "☆☆☆☆☆");
    }

    #[test]
    fn stars_empty_for_non_finite() {
        assert_eq!(star_display(f64::NAN), "");
        assert_eq!(star_display(f64::INFINITY), "");
    }

    #[test]
    fn rating_strings() {
        assert_eq!(rating_string(4.4), "4/5");
        assert_eq!(rating_string(4.5), "5/5");
        assert_eq!(rating_display(4.0), "4.0/5.0");
        assert_eq!(rating_display(3.67), "3.7/5.0");
    }

    #[test]
    fn date_lines() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
        assert_eq!(
            friendly_timestamp(Some(ts)).unwrap(),
            "Reviewed on 30 Jun 2025"
        );
        assert_eq!(formatted_date(Some(ts)), "Reviewed in India on 30 June 2025");
        assert!(friendly_timestamp(None).is_none());
        assert_eq!(formatted_date(None), "Date not available");
    }

    #[test]
    fn ist_offset_can_move_the_calendar_day() {
        // 20:00 UTC on the 30th is already July 1st in IST
        let ts = Utc.with_ymd_and_hms(2025, 6, 30, 20, 0, 0).unwrap();
        assert_eq!(formatted_date(Some(ts)), "Reviewed in India on 01 July 2025");
    }

    #[test]
    fn preview_truncates_long_text() {
        let short = "tasty";
        assert_eq!(text_preview(short), "tasty");

        let long = "x".repeat(200);
        let preview = text_preview(&long);
        assert_eq!(preview.chars().count(), 153);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(11.0 / 3.0), 3.67);
        assert_eq!(round2(3.0), 3.0);
    }
}
