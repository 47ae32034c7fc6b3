use crate::{schedule, schedule_at};

use crate::rules::RuleKind::Open;

#[test]
fn single_year() {
    assert_eq!(
        schedule_at!("2021 10:00-12:00", "2021-06-01"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(schedule_at!("2021 10:00-12:00", "2020-06-01"), schedule! {});
}

#[test]
fn year_range() {
    let raw = "2020-2021 10:00-12:00";

    assert_eq!(
        schedule_at!(raw, "2021-06-01"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(schedule_at!(raw, "2022-06-01"), schedule! {});
}

#[test]
fn year_range_with_step() {
    let raw = "2020-2030/2 10:00-12:00";

    for date in ["2020-06-01", "2022-06-01", "2030-06-01"] {
        assert_eq!(
            schedule_at!(raw, date),
            schedule! { 10,00 => Open => 12,00 },
            "expected a match on {date}",
        );
    }

    for date in ["2021-06-01", "2031-06-01"] {
        assert_eq!(schedule_at!(raw, date), schedule! {}, "unexpected match on {date}");
    }
}

#[test]
fn open_ended_year_range() {
    let raw = "2020+ 10:00-12:00";

    assert_eq!(
        schedule_at!(raw, "2035-06-01"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(schedule_at!(raw, "2019-06-01"), schedule! {});
}

#[test]
fn year_list() {
    let raw = "2010,2020,2030 10:00-12:00";

    assert_eq!(
        schedule_at!(raw, "2020-06-01"),
        schedule! { 10,00 => Open => 12,00 }
    );

    assert_eq!(schedule_at!(raw, "2021-06-01"), schedule! {});
}
