//! Presentation formatting for board entries.
//!
//! The board renders plain strings; all date arithmetic stays here so the
//! classification core never carries display concerns.

use crate::types::{ShiftRecord, ShiftWindow};
use chrono::{Duration, NaiveDateTime};

/// Shift times are shown as hour:minute.
const TIME_FORMAT: &str = "%H:%M";

/// Format a window's duty times, e.g. `"09:00-13:00"`.
///
/// Zero-duration windows are all-day duties and labelled `"All day"` —
/// the one place the all-day special case surfaces.
pub fn time_label(window: &ShiftWindow) -> String {
    if window.is_all_day() {
        "All day".into()
    } else {
        format!(
            "{}-{}",
            window.start.format(TIME_FORMAT),
            window.end.format(TIME_FORMAT)
        )
    }
}

/// Build the display name for a shift: rota name, optional title, and a
/// day prefix when the shift starts tomorrow or started yesterday
/// relative to `now`.
pub fn display_name(shift: &ShiftRecord, now: NaiveDateTime) -> String {
    let mut name = match &shift.title {
        Some(title) => format!("{} - {}", shift.rota_name, title),
        None => shift.rota_name.clone(),
    };
    let start_date = shift.start.date();
    if start_date == (now + Duration::days(1)).date() {
        name = format!("Tomorrow's {name}");
    } else if start_date == (now - Duration::days(1)).date() {
        name = format!("Yesterday's {name}");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Relation;
    use chrono::NaiveDate;

    fn dt(d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .expect("valid date")
            .and_hms_opt(h, mi, 0)
            .expect("valid time")
    }

    fn shift(title: Option<&str>, start: NaiveDateTime, duration_seconds: u64) -> ShiftRecord {
        ShiftRecord {
            id: 1,
            rota_id: 10,
            rota_name: "Listening".into(),
            title: title.map(Into::into),
            start,
            duration_seconds,
            occupant_ids: vec![],
        }
    }

    fn window_for(record: ShiftRecord) -> ShiftWindow {
        let start = record.start;
        let end = start + Duration::seconds(record.duration_seconds as i64);
        ShiftWindow {
            shift: record,
            start,
            end,
            relation: Relation::Current,
        }
    }

    #[test]
    fn time_label_hour_minute_range() {
        let window = window_for(shift(None, dt(1, 9, 0), 14_400));
        assert_eq!(time_label(&window), "09:00-13:00");
    }

    #[test]
    fn time_label_all_day_for_zero_duration() {
        let window = window_for(shift(None, dt(1, 8, 0), 0));
        assert_eq!(time_label(&window), "All day");
    }

    #[test]
    fn name_without_title_is_rota_name() {
        let record = shift(None, dt(1, 9, 0), 14_400);
        assert_eq!(display_name(&record, dt(1, 10, 0)), "Listening");
    }

    #[test]
    fn name_with_title_appended() {
        let record = shift(Some("Overnight"), dt(1, 9, 0), 14_400);
        assert_eq!(display_name(&record, dt(1, 10, 0)), "Listening - Overnight");
    }

    #[test]
    fn tomorrows_shift_prefixed() {
        let record = shift(None, dt(2, 9, 0), 14_400);
        assert_eq!(display_name(&record, dt(1, 22, 0)), "Tomorrow's Listening");
    }

    #[test]
    fn yesterdays_shift_prefixed() {
        let record = shift(None, dt(1, 21, 0), 14_400);
        assert_eq!(display_name(&record, dt(2, 1, 0)), "Yesterday's Listening");
    }

    #[test]
    fn same_day_shift_has_no_prefix() {
        let record = shift(Some("Late"), dt(1, 21, 0), 14_400);
        assert_eq!(display_name(&record, dt(1, 9, 0)), "Listening - Late");
    }
}
