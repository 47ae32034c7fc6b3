use crate::error::Error;

/// The input is already canonical and must survive a round trip untouched.
fn assert_identity(input: &str) {
    assert_normalizes(input, input);
}

/// The input normalizes to `expected`, twice over, and reparsing the
/// canonical form yields a structurally equal rule set.
fn assert_normalizes(input: &str, expected: &str) {
    let expr = crate::parse(input);

    assert!(
        !matches!(expr.error(), Some(Error::Syntax(_))),
        "unexpected syntax error for {input:?}: {:?}",
        expr.error(),
    );

    assert_eq!(expr.normalized(), expected, "for input {input:?}");

    let reparsed = crate::parse(expected);

    assert_eq!(
        reparsed.normalized(),
        expected,
        "normalization of {input:?} is not idempotent",
    );

    assert_eq!(
        reparsed.rules(),
        expr.rules(),
        "reparsing the canonical form of {input:?} changed the tree",
    );
}

fn assert_syntax_error(input: &str) {
    assert!(
        matches!(crate::parse(input).error(), Some(Error::Syntax(_))),
        "expected a syntax error for {input:?}",
    );
}

#[test]
fn canonical_simple() {
    assert_identity("24/7");
    assert_identity("24/7 \"comment\"");
    assert_identity("24/7 closed");
    assert_identity("24/7 unknown \"comment\"");
    assert_identity("unknown \"comment\"");
    assert_identity("off");
    assert_identity("\"comment\"");
    assert_identity("Mo-Fr 08:00-17:30");
    assert_identity("Mo-Fr 08:00-12:00,13:00-17:30");
    assert_identity("Mo-Fr 08:00-12:00,13:00-17:30; Sa 08:00-12:00");
    assert_identity("Mo-Fr 08:00-12:00,13:00-17:30; Sa 08:00-12:00; PH off");
    assert_identity("Mo-Fr 08:00-12:00,13:00-17:30; Sa 08:00-12:00; PH 09:00-12:00");
    assert_identity("Sa-Su 00:00-24:00");
    assert_identity("Mo-Sa 10:00-20:00; Tu off");
    assert_identity("Mo-Sa 10:00-20:00; Tu 10:00-14:00");
    assert_identity("\"only after registration\"; PH off");
    assert_identity("open; Mo 15:00-16:00 off; PH off");
    assert_identity("24/7 closed \"always closed\"");
}

#[test]
fn canonical_wide_ranges() {
    assert_identity("Dec off");
    assert_identity("Dec 25 off");
    assert_identity("Dec 25-26 off");
    assert_normalizes("Dec 24-26,31 off", "Dec 24-26,Dec 31 off");
    assert_normalizes("Jan 1,6 off", "Jan 01,Jan 06 off");
    assert_normalizes("Dec 24,25,26", "Dec 24,Dec 25,Dec 26");
    assert_identity("Dec 08:00");
    assert_identity("Dec 08:00-14:00");
    assert_identity("easter off");
    assert_identity("easter +1 day off");
    assert_identity("easter -2 days off");
    assert_identity("2020");
    assert_identity("2020-2021");
    assert_identity("1970-2022/2");
    assert_identity("2020+");
    assert_identity("2010,2020,2030");
    assert_identity("2010-2015,2020-2025,2030");
    assert_identity("2020-2022 Dec");
    assert_identity("2020 Dec-2022 Dec");
    assert_identity("2020-2022 Dec 24-26");
    assert_identity("2020 Dec 24-26");
    assert_identity("2021 10:00-20:00");
    assert_identity("2020 Jan-Apr");
    assert_identity("1980-2030/4");
    assert_identity("Jun 15-Aug 15 Mo-Fr 10:00-12:30");
    assert_identity("Apr: 22:00-23:00; PH off");
    assert_identity("Jul-Jan: 22:00-23:00; PH off");
    assert_identity("Jan-Jul: 22:00-23:00; PH off");
    assert_normalizes(
        "Jul 23-Jan 3: \"needs reservation by phone\"; PH off",
        "Jul 23-Jan 03: \"needs reservation by phone\"; PH off",
    );
    assert_normalizes(
        "Jan 23-Jul 3: 22:00-23:00 \"Please make a reservation by phone.\"; PH off",
        "Jan 23-Jul 03: 22:00-23:00 \"Please make a reservation by phone.\"; PH off",
    );
    assert_identity("2012 easter -2 days-2012 easter +2 days: open \"Around easter\"; PH off");
    assert_identity("Jan 23-Feb 11,Feb 12 00:00-24:00; PH off");
    assert_identity("Mo-Su 08:00-18:00; Apr 10-15 off; Jun 08:00-14:00; Aug off; Dec 25 off");
    assert_identity("Oct: We[1]");
    assert_normalizes(
        "week 1-53/2 Fr 09:00-12:00; week 2-52/2 We 09:00-12:00",
        "week 01-53/2 Fr 09:00-12:00; week 02-52/2 We 09:00-12:00",
    );
    assert_normalizes(
        "week 4-16 We 00:00-24:00; week 38-42 Sa 00:00-24:00; PH off",
        "week 04-16 We 00:00-24:00; week 38-42 Sa 00:00-24:00; PH off",
    );
}

#[test]
fn canonical_weekdays() {
    assert_identity("We; PH off");
    assert_identity("PH");
    assert_identity("PH Mo-Fr");
    assert_identity("PH -1 day");
    assert_identity("SH");
    assert_identity("SH,PH");
    assert_identity("PH,SH");
    assert_identity("We[1-3]");
    assert_identity("We[3-5]");
    assert_identity("Sa");
    assert_identity("Sa[1]");
    assert_identity("Sa[1-3]");
    assert_identity("Tu-Th");
    assert_identity("Fr-Mo");
    assert_identity("Mo[1-2,4]");
    assert_normalizes("We[-1] + 2 days", "We[-1] +2 days");
    assert_identity("Mo-Su; We \"only after registration\"");
    assert_identity("Mo,Tu,Th,Fr 12:00-18:00; Sa,PH 12:00-17:00; Th[3],Th[-1] off");
    assert_identity("Mo-Su,PH 15:00-03:00; easter -2 days off");
    assert_identity("Mo-Su 22:00-23:00; We,PH off");
    assert_identity("Sa[1],Sa[1] +1 day 10:00-12:00 open \"first weekend in the month\"; PH off");
    assert_identity("Sa[-1],Sa[-1] +1 day 10:00-12:00 open \"last weekend in the month\"; PH off");
    assert_identity("SH Tu,Th 10:00-19:00");
}

#[test]
fn canonical_times() {
    assert_identity("sunrise-sunset");
    assert_identity("Su 10:00+");
    assert_identity("22:00+; PH off");
    assert_identity("10:00-16:00/15");
    assert_normalizes("10:00-16:00/90", "10:00-16:00/01:30");
    assert_normalizes("10:00-16:00/1:30", "10:00-16:00/01:30");
    assert_identity("10:00-10:00");
    assert_identity("10:00-12:00+");
    assert_identity("sunrise-sunset open \"Beware of sunburn!\"; PH off");
    assert_identity("sunset-sunrise open \"Beware of vampires!\"; PH off");
    assert_identity("(sunrise-00:30)-(sunrise+00:30)");
    assert_identity("(sunset+01:00)-24:00 || closed \"No drink before sunset!\"; PH off");
    assert_identity("Tu,PH 23:59-22:59");
    assert_identity("We-Mo,PH 23:59-22:59");
    assert_identity("Fr-Sa 18:00-06:00; PH off");
    assert_identity("22:00-23:00; PH off");
    assert_identity("08:00-11:00; PH off");
    assert_identity("00:00-24:00; Tu-Su,PH 08:30-09:00 off; Tu-Su 14:00-14:30 off; Mo 08:00-13:00 off");
}

#[test]
fn canonical_rule_composition() {
    assert_identity("PH off || open");
    assert_identity("PH off || unknown \"foo\"");
    assert_identity("PH off || open || unknown");
    assert_identity("PH off || 2020 open");
    assert_identity("Mo-Sa 08:00-13:00,14:00-17:00 || \"by appointment\"");
    assert_identity("Su-Tu 11:00-01:00, We-Th 11:00-03:00, Fr 11:00-06:00, Sa 11:00-07:00");
    assert_identity("Mo 10:00-12:00,12:30-15:00");
    assert_identity("Mo 10:00-12:00,12:30-15:00; Tu-Fr 08:00-12:00,12:30-15:00; Sa 08:00-12:00");
    assert_identity("We-Fr 10:00-24:00 open \"it is open\" || \"please call\"; PH off");
    assert_identity("Mo-Fr 08:00-11:00 || Tu-Th,PH open \"Emergency only\"");
    assert_identity("Tu-Th,We 22:00-23:00 open \"Hot meals\"; PH off");
    assert_identity("Mo 12:00-14:00 open \"female only\", Mo 14:00-16:00 open \"male only\"; PH off");
    assert_identity("Mo-Fr 08:00-12:00, We 14:00-18:00; Su,PH off");
    assert_identity("Mo-Fr 08:00-12:00; We 14:00-18:00; Su,PH off");
    assert_identity("Tu-Fr 11:30-14:30 open, 14:30-18:00 open \"pickup only\", 18:00-22:00 open");
    assert_identity(
        "Mo-Tu,Th-Fr 09:30-12:00; 2020 Dec 28 off; 2020 Dec 22,2020 Dec 29 off; We 15:00-17:00; \
         2020 Dec 23,2020 Dec 30 off; 2020 Dec 24,2020 Dec 31 off; Sa 10:00-12:00; \
         2020 Dec 26,2021 Jan 02 off; PH off",
    );
}

#[test]
fn recovery_casing_and_words() {
    assert_normalizes("So", "Su");
    assert_normalizes("Ph", "PH");
    assert_normalizes("Sat", "Sa");
    assert_normalizes("december", "Dec");
    assert_normalizes("Friday 08:00-12:00", "Fr 08:00-12:00");
    assert_normalizes("mo-fr 10:00-20:00", "Mo-Fr 10:00-20:00");
    assert_normalizes("jan-feb 10:00-20:00", "Jan-Feb 10:00-20:00");
    assert_normalizes("jan-feb,aug 10:00-20:00", "Jan-Feb,Aug 10:00-20:00");
    assert_normalizes("SUNRISE-SUNSET", "sunrise-sunset");
    assert_normalizes("(SUNrISE-01:00)-(SUnsET+01:00)", "(sunrise-01:00)-(sunset+01:00)");
    assert_normalizes("su,sh off", "Su,SH off");
    assert_normalizes("mo-fr CLOSED", "Mo-Fr closed");
    assert_normalizes("we-mo 11:30-14:00, 17:30-22:00; tu off", "We-Mo 11:30-14:00,17:30-22:00; Tu off");
    assert_normalizes(
        "April-September; Mo-Fr 09:00-13:00, 14:00-18:00, Sa 10:00-13:00",
        "Apr-Sep; Mo-Fr 09:00-13:00,14:00-18:00, Sa 10:00-13:00",
    );
}

#[test]
fn recovery_times() {
    assert_normalizes("9:00-12:00", "09:00-12:00");
    assert_normalizes("9h00-12h00", "09:00-12:00");
    assert_normalizes("9h-12h", "09:00-12:00");
    assert_normalizes("5H", "05:00");
    assert_normalizes("06:00am", "06:00");
    assert_normalizes("06:30pm", "18:30");
    assert_normalizes("07:00 am", "07:00");
    assert_normalizes("07:00 pm", "19:00");
    assert_normalizes("5:00AM", "05:00");
    assert_normalizes("5:02 PM", "17:02");
    assert_normalizes("10a", "10:00");
    assert_normalizes("10p", "22:00");
    assert_normalizes("12:00 am", "00:00");
    assert_normalizes("12:00pm", "12:00");
    assert_normalizes("1 a.m", "01:00");
    assert_normalizes("3p.m", "15:00");
    assert_normalizes("12:01a.m.", "00:01");
    assert_normalizes("12:01p.m.", "12:01");
    assert_normalizes("11:59a", "11:59");
    assert_normalizes("11:59p", "23:59");
    assert_normalizes("9h00-12h00,14:00-17:00", "09:00-12:00,14:00-17:00");
    assert_normalizes("9:00 am - 12:00 am", "09:00-24:00");
    assert_normalizes("9 am - 12 am", "09:00-24:00");
    assert_normalizes("11:00 am - 11:00 pm", "11:00-23:00");
    assert_normalizes("09 : 00 - 12 : 00 , 13 : 00 - 19 : 00", "09:00-12:00,13:00-19:00");
    assert_normalizes("10.30am - 4.30pm", "10:30-16:30");
    assert_normalizes("4:00-8:00", "04:00-08:00");
    assert_normalizes("04:00 - 08:00", "04:00-08:00");
}

#[test]
fn recovery_unicode() {
    assert_normalizes("Mo–Tu", "Mo-Tu");
    assert_normalizes("13：41", "13:41");
    assert_normalizes("10：00〜19：00", "10:00-19:00");
    assert_normalizes("10：00－17：00", "10:00-17:00");
    assert_normalizes("11:00−23:00", "11:00-23:00");
    assert_normalizes("11:00ー15:00", "11:00-15:00");
    assert_normalizes("11:30-14:00、16:30-22:00", "11:30-14:00,16:30-22:00");
    assert_normalizes("We 09:00-18:00\u{a0}; Sa-Su 09:00-18:00", "We 09:00-18:00; Sa-Su 09:00-18:00");
    assert_normalizes("17時00分～23時30分", "17:00-23:30");
    assert_normalizes("月,木,金,土,日 11:00-19:00", "Mo,Th,Fr,Sa,Su 11:00-19:00");
    assert_normalizes("月-土 09:00-18:00", "Mo-Sa 09:00-18:00");
    assert_normalizes("水曜日～土曜日10:00～19:00", "We-Sa 10:00-19:00");
    assert_normalizes("月～土 　17:00～23:00", "Mo-Sa 17:00-23:00");
}

#[test]
fn recovery_languages() {
    assert_normalizes("LUNDI 08:30 – 17:00", "Mo 08:30-17:00");
    assert_normalizes(
        "Mo-Fri 10am to 7pm, Saturday 11am to 6pm, Sun 11am to 4pm",
        "Mo-Fr 10:00-19:00, Sa 11:00-18:00, Su 11:00-16:00",
    );
    assert_normalizes("Monday to Friday 8:00AM to 4:30PM", "Mo-Fr 08:00-16:30");
    assert_normalizes("1pm-3pm and 7pm-11pm", "13:00-15:00,19:00-23:00");
    assert_normalizes("8h00 à 12h00 et 13h30 à 18h00", "08:00-12:00,13:30-18:00");
    assert_normalizes(
        "Samedi et Dimanche 5h30 - 12h30 Lundi 13h45 - 15h15",
        "Sa,Su 05:30-12:30; Mo 13:45-15:15",
    );
    assert_normalizes(
        "Mo-Th 11:00-20:00 Friday & Saturday 11:00-21:00 Sunday 12:00-19:00",
        "Mo-Th 11:00-20:00; Fr,Sa 11:00-21:00; Su 12:00-19:00",
    );
    assert_normalizes("Domingo de 9: 00 am. a 1:00 pm", "Su 09:00-13:00");
    assert_normalizes("Segunda a Sexta 08:00h a 16:00h", "Mo-Fr 08:00-16:00");
    assert_normalizes("Du lundi au vendredi : 9:00-18:00", "Mo-Fr 09:00-18:00");
}

#[test]
fn recovery_separators() {
    assert_normalizes("Fr: 17:00-19:00", "Fr 17:00-19:00");
    assert_normalizes("Tu-Su:07:00-00:00", "Tu-Su 07:00-24:00");
    assert_normalizes("08:00-12:00;", "08:00-12:00");
    assert_normalizes("14:00-20:00,", "14:00-20:00");
    assert_normalizes("01:00-23:00; ", "01:00-23:00");
    assert_normalizes("02:00-22:00,\n", "02:00-22:00");
    assert_normalizes("Mo-Fr 09:00-18:30;Sa 09:00-17:00", "Mo-Fr 09:00-18:30; Sa 09:00-17:00");
    assert_normalizes("Mo-Fr 06:30-12:00, 13:00-18:00", "Mo-Fr 06:30-12:00,13:00-18:00");
    assert_normalizes(
        "Mo, We, Fr 06:30-21:30; Tu, Th 09:00-21:30; Sa 09:00-17:00; Su 09:00-14:00",
        "Mo,We,Fr 06:30-21:30; Tu,Th 09:00-21:30; Sa 09:00-17:00; Su 09:00-14:00",
    );
    assert_normalizes(
        "Fr-Sa 10:00-02:00,Su 10:00-20:00",
        "Fr-Sa 10:00-02:00, Su 10:00-20:00",
    );
    assert_normalizes(
        "tu-sa 12:00-14:30,mo-sa 18:30-22:00",
        "Tu-Sa 12:00-14:30, Mo-Sa 18:30-22:00",
    );
    assert_normalizes(
        "Mo 07:00-12:00,Tu 15:00-20:00,We 07:00-12:00,Fr 15:00-20:00",
        "Mo 07:00-12:00, Tu 15:00-20:00, We 07:00-12:00, Fr 15:00-20:00",
    );
    assert_normalizes("Mo-Fr 09:00-17:00 Sa 09:00-14:00", "Mo-Fr 09:00-17:00; Sa 09:00-14:00");
    assert_normalizes(
        "Friday 11AM–2:30AM Saturday 10AM–3:30AM Sunday 9AM–4:30AM",
        "Fr 11:00-02:30; Sa 10:00-03:30; Su 09:00-04:30",
    );
    assert_normalizes(
        "Mo 14:00-21:00; Tu-Th 10:00-21:00; Fr 10:00-18:00;Su, PH off|| \"Samstag zweimal im Monat, Details siehe Webseite\"",
        "Mo 14:00-21:00; Tu-Th 10:00-21:00; Fr 10:00-18:00; Su,PH off || \"Samstag zweimal im Monat, Details siehe Webseite\"",
    );
    assert_normalizes(
        "Dimanche Fermé Lundi 08:00 – 12:30 14:00 – 19:00 Mardi 08:00 – 12:30 14:00 – 19:00",
        "Su closed; Mo 08:00-12:30,14:00-19:00; Tu 08:00-12:30,14:00-19:00",
    );
    assert_normalizes("09:00-12:00/13:00-19:00", "09:00-12:00,13:00-19:00");
    assert_normalizes("10:00 - 13:30 / 17:00 - 20:30", "10:00-13:30,17:00-20:30");
    assert_normalizes(
        "Mo-Fr 6:00-18:00 / Sa 6:00-13:00 / So 7:00-17:00",
        "Mo-Fr 06:00-18:00; Sa 06:00-13:00; Su 07:00-17:00",
    );
}

#[test]
fn invalid_inputs() {
    assert_syntax_error("");
    assert_syntax_error("this is not a valid expression");
    assert_syntax_error("23/7");
    assert_syntax_error("24/7 geöffnet");
    assert_syntax_error("2020-2000");
    assert_syntax_error("Jan-Apr 1");
    assert_syntax_error("Feb-2020 Apr 1");
    assert_syntax_error("Apr 1-Nov");
    assert_syntax_error("Su[0]");
    assert_syntax_error("Mo[6]");
    assert_syntax_error("Mo[-0]");
    assert_syntax_error("Tu[-6]");
    assert_syntax_error("Mo[0-5]");
    assert_syntax_error("We[4-2]");
    assert_syntax_error("49:00");
    assert_syntax_error("10:00-100:00");
    assert_syntax_error("12:61");
    assert_syntax_error("60p");
    assert_syntax_error("Dec 6,4");
    assert_syntax_error("Dec 24-Jan 1,6");
    assert_syntax_error("Dec 3,2,1");
    assert_syntax_error("7/8-23");
    assert_syntax_error("0600-1800");
    assert_syntax_error("07;00-2;00pm");
    assert_syntax_error("08.00-16.00, public room till 03.00 a.m");
    assert_syntax_error("09:00-21:00 TEL/072(360)3200");
    assert_syntax_error("Dining in: 6am to 11pm; Drive thru: 24/7");
    assert_syntax_error("MWThF: 1200-1800; SaSu: 1200-1700");
    assert_syntax_error("10:00-12:00 tomorrow");
    assert_syntax_error("monday, Tu, wE, TH 12:00 - 20:00 ; 14:00-16:00 Off ; closed public Holiday");
}

#[test]
fn corrections_are_reported() {
    assert!(!crate::parse("Mo-Fr 10:00-20:00").was_corrected());
    assert!(crate::parse("mo-fr 10:00-20:00").was_corrected());
    assert!(crate::parse("9h00-12h00").was_corrected());
}
