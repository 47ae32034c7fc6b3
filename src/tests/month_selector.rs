use crate::{schedule, schedule_at};

use crate::rules::RuleKind::Open;

#[test]
fn whole_month() {
    assert_eq!(
        schedule_at!("Dec 10:00-12:00", "2024-12-15"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(schedule_at!("Dec 10:00-12:00", "2024-11-15"), schedule! {});
}

#[test]
fn month_range() {
    let raw = "Jan-Apr 10:00-12:00";

    assert_eq!(
        schedule_at!(raw, "2024-03-15"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(schedule_at!(raw, "2024-05-15"), schedule! {});
}

#[test]
fn wrapping_month_range() {
    let raw = "Jul-Jan: 10:00-12:00";

    for date in ["2024-07-15", "2024-12-15", "2024-01-15"] {
        assert_eq!(
            schedule_at!(raw, date),
            schedule! { 10,00 => Open => 12,00 },
            "expected a match on {date}",
        );
    }

    assert_eq!(schedule_at!(raw, "2024-03-15"), schedule! {});
}

#[test]
fn date_range() {
    let raw = "Jan 23-Feb 11 10:00-12:00";

    assert_eq!(
        schedule_at!(raw, "2024-02-01"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(schedule_at!(raw, "2024-02-12"), schedule! {});
    assert_eq!(schedule_at!(raw, "2024-01-22"), schedule! {});
}

#[test]
fn date_range_wrapping_new_year() {
    let raw = "Dec 24-Jan 3 10:00-12:00";

    for date in ["2024-12-25", "2025-01-02", "2024-01-02"] {
        assert_eq!(
            schedule_at!(raw, date),
            schedule! { 10,00 => Open => 12,00 },
            "expected a match on {date}",
        );
    }

    assert_eq!(schedule_at!(raw, "2024-06-01"), schedule! {});
}

#[test]
fn year_qualified_dates() {
    let raw = "2020 Dec 24-26 10:00-12:00";

    assert_eq!(
        schedule_at!(raw, "2020-12-25"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(schedule_at!(raw, "2021-12-25"), schedule! {});
}

#[test]
fn easter_anchor() {
    // Easter Sunday 2020 was April 12th.
    assert_eq!(
        schedule_at!("easter 10:00-12:00", "2020-04-12"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(schedule_at!("easter 10:00-12:00", "2020-04-13"), schedule! {});
}

#[test]
fn easter_offset_range() {
    let raw = "easter -2 days-easter +2 days 10:00-12:00";

    for date in ["2020-04-10", "2020-04-12", "2020-04-14"] {
        assert_eq!(
            schedule_at!(raw, date),
            schedule! { 10,00 => Open => 12,00 },
            "expected a match on {date}",
        );
    }

    assert_eq!(schedule_at!(raw, "2020-04-15"), schedule! {});
}

#[test]
fn composite_rules() {
    let raw = "Mo-Su 08:00-18:00; Apr 10-15 off; Jun 08:00-14:00; Aug off; Dec 25 off";

    assert_eq!(
        schedule_at!(raw, "2024-03-05"),
        schedule! { 8,00 => Open => 18,00 }
    );

    assert_eq!(
        schedule_at!(raw, "2024-04-12"),
        schedule! { 0,00 => crate::rules::RuleKind::Closed => 24,00 }
    );

    assert_eq!(
        schedule_at!(raw, "2024-06-15"),
        schedule! { 8,00 => Open => 14,00 }
    );

    assert_eq!(
        schedule_at!(raw, "2024-08-05"),
        schedule! { 0,00 => crate::rules::RuleKind::Closed => 24,00 }
    );
}
