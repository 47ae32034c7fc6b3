use crate::{schedule, schedule_at};

use crate::rules::RuleKind::{Closed, Open};

#[test]
fn public_holiday() {
    assert_eq!(
        schedule_at!("PH 10:00-12:00", "2024-01-01", region = "fr"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(
        schedule_at!("PH 10:00-12:00", "2024-01-02", region = "fr"),
        schedule! {}
    );
}

#[test]
fn public_holiday_with_offset() {
    // The day before a public holiday.
    assert_eq!(
        schedule_at!("PH -1 day 10:00-12:00", "2023-12-31", region = "fr"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(
        schedule_at!("PH -1 day 10:00-12:00", "2024-01-01", region = "fr"),
        schedule! {}
    );
}

#[test]
fn holidays_override_weekdays() {
    // 2024-01-01 is both a Monday and a public holiday.
    let raw = "Mo-Fr 08:00-12:00,13:00-17:30; Sa 08:00-12:00; PH off";

    assert_eq!(
        schedule_at!(raw, "2024-01-01", region = "fr"),
        schedule! { 0,00 => Closed => 24,00 }
    );

    assert_eq!(
        schedule_at!(raw, "2024-01-02", region = "fr"),
        schedule! {
            8,00 => Open => 12,00;
            13,00 => Open => 17,30;
        }
    );
}

#[test]
fn holiday_in_a_weekday_list() {
    // Open Wednesdays and holidays.
    let raw = "We,PH 10:00-12:00";

    assert_eq!(
        schedule_at!(raw, "2024-01-01", region = "fr"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(
        schedule_at!(raw, "2024-01-03", region = "fr"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(schedule_at!(raw, "2024-01-02", region = "fr"), schedule! {});
}

#[test]
fn holiday_conjoined_with_weekdays() {
    // Only holidays that fall on a working day.
    let raw = "PH Mo-Fr 10:00-12:00";

    // 2024-01-01 is a Monday, 2024-05-01 a Wednesday.
    assert_eq!(
        schedule_at!(raw, "2024-01-01", region = "fr"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(
        schedule_at!(raw, "2024-05-01", region = "fr"),
        schedule! { 10,00 => Open => 12,00 }
    );

    // A regular Monday is not enough.
    assert_eq!(schedule_at!(raw, "2024-01-08", region = "fr"), schedule! {});

    // Neither is a holiday outside Mo-Fr: none in the sample, but a
    // non-holiday Saturday stays closed too.
    assert_eq!(schedule_at!(raw, "2024-01-06", region = "fr"), schedule! {});
}

#[test]
fn school_holidays_never_match() {
    assert_eq!(schedule_at!("SH 10:00-12:00", "2024-01-01", region = "fr"), schedule! {});
}
