use crate::precondition::precondition;

fn cleaned(raw: &str) -> String {
    precondition(raw).text
}

#[test]
fn untouched_input_is_not_corrected() {
    let result = precondition("Mo-Fr 08:00-17:30");
    assert_eq!(result.text, "Mo-Fr 08:00-17:30");
    assert!(!result.corrected);
}

#[test]
fn unicode_punctuation_folds_to_ascii() {
    assert_eq!(cleaned("Mo–Tu"), "Mo-Tu");
    assert_eq!(cleaned("13：41"), "13:41");
    assert_eq!(cleaned("11:30-14:00、16:30-22:00"), "11:30-14:00,16:30-22:00");
    assert_eq!(cleaned("10：00〜19：00"), "10:00-19:00");
    assert_eq!(cleaned("We\u{a0}09:00-18:00"), "We 09:00-18:00");
}

#[test]
fn hour_markers() {
    assert_eq!(cleaned("9h00-12h00"), "09:00-12:00");
    assert_eq!(cleaned("9h-12h"), "09:00-12:00");
    assert_eq!(cleaned("5H"), "05:00");
    assert_eq!(cleaned("08:00h"), "08:00");
    assert_eq!(cleaned("17時00分～23時30分"), "17:00-23:30");
}

#[test]
fn am_pm_times() {
    assert_eq!(cleaned("06:00am"), "06:00");
    assert_eq!(cleaned("06:30pm"), "18:30");
    assert_eq!(cleaned("12:00 am"), "00:00");
    assert_eq!(cleaned("12:00pm"), "12:00");
    assert_eq!(cleaned("9:00 am - 12:00 am"), "09:00-24:00");
    assert_eq!(cleaned("10.30am - 4.30pm"), "10:30-16:30");
    assert_eq!(cleaned("1 a.m"), "01:00");
    assert_eq!(cleaned("12:01a.m."), "00:01");

    // Not a time marker at all.
    assert_eq!(cleaned("10 Apr"), "10 Apr");
    assert_eq!(cleaned("60p"), "60p");
}

#[test]
fn word_translation() {
    assert_eq!(cleaned("monday"), "Mo");
    assert_eq!(cleaned("Sat"), "Sa");
    assert_eq!(cleaned("So"), "Su");
    assert_eq!(cleaned("december"), "Dec");
    assert_eq!(cleaned("lundi"), "Mo");
    assert_eq!(cleaned("Domingo"), "Su");
    assert_eq!(cleaned("FERMÉ"), "closed");
    assert_eq!(cleaned("Ph"), "PH");
    assert_eq!(cleaned("SUNRISE"), "sunrise");
    assert_eq!(cleaned("月,木,金,土,日 11:00-19:00"), "Mo,Th,Fr,Sa,Su 11:00-19:00");
    assert_eq!(cleaned("水曜日"), "We");

    // Unknown words stay, so they can fail the parse loudly.
    assert_eq!(cleaned("BAR"), "BAR");
}

#[test]
fn range_words() {
    assert_eq!(cleaned("10:00 to 19:00"), "10:00-19:00");
    assert_eq!(cleaned("Monday to Friday"), "Mo-Fr");
    assert_eq!(cleaned("13:00-15:00 and 19:00-23:00"), "13:00-15:00,19:00-23:00");
    assert_eq!(cleaned("Friday & Saturday"), "Fr,Sa");
    assert_eq!(cleaned("8h00 à 12h00 et 13h30 à 18h00"), "08:00-12:00,13:30-18:00");
}

#[test]
fn separator_recovery() {
    assert_eq!(cleaned("09:00-12:00/13:00-19:00"), "09:00-12:00,13:00-19:00");
    assert_eq!(cleaned("Mo-Fr 6:00-18:00 / Sa 6:00-13:00"), "Mo-Fr 6:00-18:00 ; Sa 6:00-13:00");
    assert_eq!(cleaned("08:00 - 12:30 14:00 - 19:00"), "08:00-12:30,14:00-19:00");
    assert_eq!(cleaned("10:00-16:00/15"), "10:00-16:00/15");
    assert_eq!(cleaned("24/7"), "24/7");
}

#[test]
fn trailing_noise_is_stripped() {
    assert_eq!(cleaned("08:00-12:00;"), "08:00-12:00");
    assert_eq!(cleaned("14:00-20:00,"), "14:00-20:00");
    assert_eq!(cleaned("02:00-22:00,\n"), "02:00-22:00");
    assert_eq!(cleaned("  08:00-12:00  "), "08:00-12:00");
}

#[test]
fn quoted_comments_are_preserved() {
    assert_eq!(cleaned("\"saturday – by appointment\""), "\"saturday – by appointment\"");
    assert_eq!(
        cleaned("mo \"12:00 am, monday\" "),
        "Mo \"12:00 am, monday\""
    );
}
