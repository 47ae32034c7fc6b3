use crate::{schedule, schedule_at};

use crate::rules::RuleKind::{Closed, Open, Unknown};

#[test]
fn always_open() {
    assert_eq!(
        schedule_at!("24/7", "2024-11-18"),
        schedule! { 0,00 => Open => 24,00 }
    );
}

#[test]
fn always_closed() {
    assert_eq!(
        schedule_at!("off", "2024-11-18"),
        schedule! { 0,00 => Closed => 24,00 }
    );

    assert_eq!(
        schedule_at!("24/7 closed \"always closed\"", "2024-11-18"),
        schedule! { 0,00 => Closed, "always closed" => 24,00 }
    );
}

#[test]
fn state_defaults_to_open() {
    assert_eq!(
        schedule_at!("Mo-Fr 10:00-20:00", "2024-11-19"),
        schedule! { 10,00 => Open => 20,00 }
    );

    // A comment alone keeps the open state.
    assert_eq!(
        schedule_at!("\"on demand\"", "2024-11-19"),
        schedule! { 0,00 => Open, "on demand" => 24,00 }
    );
}

#[test]
fn explicit_states() {
    assert_eq!(
        schedule_at!("Mo-Fr 10:00-20:00 unknown", "2024-11-19"),
        schedule! { 10,00 => Unknown => 20,00 }
    );

    assert_eq!(
        schedule_at!("Mo-Fr 10:00-20:00 closed", "2024-11-19"),
        schedule! { 10,00 => Closed => 20,00 }
    );
}

#[test]
fn normal_rule_overrides_the_day() {
    let raw = "Mo-Fr 08:00-12:00; We 14:00-18:00";

    assert_eq!(
        schedule_at!(raw, "2024-11-20"),
        schedule! { 14,00 => Open => 18,00 }
    );

    assert_eq!(
        schedule_at!(raw, "2024-11-19"),
        schedule! { 8,00 => Open => 12,00 }
    );
}

#[test]
fn closed_normal_rule_only_cuts_its_range() {
    assert_eq!(
        schedule_at!("Mo-Sa 10:00-20:00; Tu off", "2024-11-19"),
        schedule! { 0,00 => Closed => 24,00 }
    );

    assert_eq!(
        schedule_at!("open; Mo 15:00-16:00 off", "2024-11-18"),
        schedule! {
            0,00 => Open => 15,00 => Closed => 16,00 => Open => 24,00
        }
    );

    assert_eq!(
        schedule_at!("00:00-24:00; Tu-Su 08:30-09:00 off", "2024-11-19"),
        schedule! {
            0,00 => Open => 8,30 => Closed => 9,00 => Open => 24,00
        }
    );
}

#[test]
fn additional_rule_extends_the_day() {
    assert_eq!(
        schedule_at!("Mo-Fr 08:00-12:00, We 14:00-18:00", "2024-11-20"),
        schedule! {
            8,00 => Open => 12,00;
            14,00 => Open => 18,00;
        }
    );
}

#[test]
fn additional_rules_keep_their_comments_apart() {
    assert_eq!(
        schedule_at!(
            "Mo 12:00-14:00 open \"female only\", Mo 14:00-16:00 open \"male only\"",
            "2024-11-18"
        ),
        schedule! {
            12,00 => Open, "female only" => 14,00 => Open, "male only" => 16,00
        }
    );
}

#[test]
fn fallback_applies_when_nothing_matched() {
    let raw = "Mo-Sa 08:00-13:00 || \"by appointment\"";

    assert_eq!(
        schedule_at!(raw, "2024-11-18"),
        schedule! { 8,00 => Open => 13,00 }
    );

    assert_eq!(
        schedule_at!(raw, "2024-11-17"),
        schedule! { 0,00 => Open, "by appointment" => 24,00 }
    );
}

#[test]
fn fallback_does_not_shadow_a_matching_closed_rule() {
    let open_day = schedule_at!("PH off || open", "2024-01-02", region = "fr");
    assert_eq!(open_day, schedule! { 0,00 => Open => 24,00 });

    let holiday = schedule_at!("PH off || open", "2024-01-01", region = "fr");
    assert_eq!(holiday, schedule! { 0,00 => Closed => 24,00 });
}
