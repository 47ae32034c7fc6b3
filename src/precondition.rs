//! Input preconditioner: rewrites real-world mis-encodings into the narrow
//! ASCII grammar the parser accepts. Rewrites run in a fixed order and never
//! touch quoted comments. Each pass only fires on patterns whose intent is
//! unambiguous, so that normalizing the result parses back to the same rule
//! set.

use std::mem::take;

pub(crate) struct Cleaned {
    pub(crate) text: String,
    pub(crate) corrected: bool,
}

pub(crate) fn precondition(raw: &str) -> Cleaned {
    let mut text = String::with_capacity(raw.len());

    for (quoted, segment) in split_segments(raw) {
        if quoted {
            text.push_str(&segment);
        } else {
            text.push_str(&transform(&segment));
        }
    }

    let text = tidy(&text);
    let corrected = text != raw;

    if corrected {
        log::debug!("preconditioned {raw:?} into {text:?}");
    }

    Cleaned { text, corrected }
}

/// Cut the input into quoted and unquoted segments; quoted segments keep
/// their surrounding quotes and escapes untouched.
fn split_segments(raw: &str) -> Vec<(bool, String)> {
    let mut segments = Vec::new();
    let mut curr = String::new();
    let mut quoted = false;
    let mut escaped = false;

    for c in raw.chars() {
        if quoted {
            curr.push(c);

            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                segments.push((true, take(&mut curr)));
                quoted = false;
            }
        } else if c == '"' {
            segments.push((false, take(&mut curr)));
            curr.push('"');
            quoted = true;
        } else {
            curr.push(c);
        }
    }

    segments.push((quoted, curr));
    segments
}

fn transform(segment: &str) -> String {
    let text = fold_unicode(segment);
    let text = join_spaced_colons(&text);
    let text = convert_am_pm(&text);
    let text = convert_hour_markers(&text);
    let text = translate_words(&text);
    let text = convert_range_words(&text);
    let text = recover_separators(&text);
    text
}

// ---
// --- Unicode folding
// ---

fn fold_unicode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '–' | '—' | '−' | '‐' | '‑' | 'ー' | '〜' | '～' | '－' => out.push('-'),
            '：' => out.push(':'),
            '，' | '、' => out.push(','),
            '；' => out.push(';'),
            '（' => out.push('('),
            '）' => out.push(')'),
            '＋' => out.push('+'),
            '\u{00A0}' | '\u{2009}' | '\u{200A}' | '\u{3000}' => out.push(' '),
            '\u{200B}' | '\u{FEFF}' => {}
            '\t' | '\n' | '\r' => out.push(' '),
            // Japanese hour/minute markers reduce to the `17h00` form.
            '時' => out.push('h'),
            '分' => {}
            '０'..='９' => {
                let digit = (c as u32 - '０' as u32) as u8;
                out.push((b'0' + digit) as char);
            }
            _ => out.push(c),
        }
    }

    out
}

// ---
// --- Clock normalization
// ---

/// Join colons spaced out inside a time, as in `09 : 00`.
fn join_spaced_colons(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == ' ' || chars[i] == ':' {
            // Look for `<digit> sp* ':' sp* <digit>` starting from the last
            // emitted digit.
            if out.ends_with(|c: char| c.is_ascii_digit()) {
                let mut j = i;

                while j < chars.len() && chars[j] == ' ' {
                    j += 1;
                }

                if j < chars.len() && chars[j] == ':' {
                    let mut k = j + 1;

                    while k < chars.len() && chars[k] == ' ' {
                        k += 1;
                    }

                    if k < chars.len() && chars[k].is_ascii_digit() {
                        out.push(':');
                        i = k;
                        continue;
                    }
                }
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Convert the many spellings of AM/PM times to 24 hour times. A "12 am"
/// written as the end of a range stands for the end of the day.
fn convert_am_pm(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_ascii_digit() && !out.ends_with(|c: char| c.is_ascii_digit() || c == ':') {
            if let Some((next, hour, minute, is_pm)) = match_am_pm(&chars, i) {
                if (1..=12).contains(&hour) {
                    let hour = match (is_pm, hour) {
                        (true, 12) => 12,
                        (true, hour) => hour + 12,
                        (false, 12) => {
                            // Midnight, or the end of the day after a dash.
                            if out.trim_end().ends_with('-') {
                                24
                            } else {
                                0
                            }
                        }
                        (false, hour) => hour,
                    };

                    out.push_str(&format!("{hour:02}:{minute:02}"));
                    i = next;
                    continue;
                }
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Try to read `H[:MM]? (am|pm)` with all its spellings at position `i`;
/// returns the position after the pattern, the hour, minutes and whether it
/// was PM.
fn match_am_pm(chars: &[char], mut i: usize) -> Option<(usize, u32, u32, bool)> {
    let mut hour = 0u32;
    let mut digits = 0;

    while i < chars.len() && chars[i].is_ascii_digit() && digits < 2 {
        hour = hour * 10 + chars[i].to_digit(10).unwrap();
        digits += 1;
        i += 1;
    }

    if digits == 0 || (i < chars.len() && chars[i].is_ascii_digit()) {
        return None;
    }

    let mut minute = 0u32;

    if i + 2 < chars.len()
        && (chars[i] == ':' || chars[i] == '.')
        && chars[i + 1].is_ascii_digit()
        && chars[i + 2].is_ascii_digit()
    {
        minute = chars[i + 1].to_digit(10).unwrap() * 10 + chars[i + 2].to_digit(10).unwrap();
        i += 3;
    }

    let mut j = i;

    while j < chars.len() && chars[j] == ' ' {
        j += 1;
    }

    let is_pm = match chars.get(j).map(|c| c.to_ascii_lowercase()) {
        Some('a') => false,
        Some('p') => true,
        _ => return None,
    };

    j += 1;

    if chars.get(j) == Some(&'.') {
        j += 1;
    }

    if matches!(chars.get(j).map(|c| c.to_ascii_lowercase()), Some('m')) {
        j += 1;

        if chars.get(j) == Some(&'.') {
            j += 1;
        }
    }

    // Reject when the marker is the start of a word, e.g. `10 Apr`.
    if chars.get(j).map(|c| c.is_alphabetic()).unwrap_or(false) {
        return None;
    }

    if minute >= 60 {
        return None;
    }

    Some((j, hour, minute, is_pm))
}

/// Convert `9h00`, `9h` and `5H` hour markers, and drop a dangling `h` right
/// after a well formed time (`08:00h`).
fn convert_hour_markers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        // `HH:MMh` keeps only the time.
        if (chars[i] == 'h' || chars[i] == 'H')
            && ends_with_time(&out)
            && !matches!(chars.get(i + 1), Some(c) if c.is_alphanumeric())
        {
            i += 1;
            continue;
        }

        if chars[i].is_ascii_digit() && !out.ends_with(|c: char| c.is_ascii_digit() || c == ':') {
            let mut j = i;
            let mut hour = 0u32;
            let mut digits = 0;

            while j < chars.len() && chars[j].is_ascii_digit() && digits < 2 {
                hour = hour * 10 + chars[j].to_digit(10).unwrap();
                digits += 1;
                j += 1;
            }

            if j < chars.len()
                && (chars[j] == 'h' || chars[j] == 'H')
                && !matches!(chars.get(j + 1), Some(c) if c.is_alphabetic())
                && hour <= 48
            {
                j += 1;
                let mut minute = 0u32;

                if j + 1 < chars.len()
                    && chars[j].is_ascii_digit()
                    && chars[j + 1].is_ascii_digit()
                    && !matches!(chars.get(j + 2), Some(c) if c.is_ascii_digit())
                {
                    minute = chars[j].to_digit(10).unwrap() * 10 + chars[j + 1].to_digit(10).unwrap();
                    j += 2;
                }

                if minute < 60 {
                    out.push_str(&format!("{hour:02}:{minute:02}"));
                    i = j;
                    continue;
                }
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

fn ends_with_time(out: &str) -> bool {
    let tail: Vec<char> = out.chars().rev().take(5).collect();

    tail.len() >= 4
        && tail[0].is_ascii_digit()
        && tail[1].is_ascii_digit()
        && tail[2] == ':'
        && tail[3].is_ascii_digit()
}

// ---
// --- Token translation
// ---

enum Replacement {
    Tok(&'static str),
    Drop,
}

fn translate_words(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if let Some(day) = cjk_weekday(chars[i]) {
            i += 1;

            // Strip a `曜日` or `曜` suffix.
            if chars.get(i) == Some(&'曜') {
                i += 1;

                if chars.get(i) == Some(&'日') {
                    i += 1;
                }
            }

            out.push_str(day);

            if matches!(chars.get(i), Some(c) if c.is_alphanumeric()) {
                out.push(' ');
            }

            continue;
        }

        if chars[i].is_alphabetic() {
            let mut j = i;

            while j < chars.len() && chars[j].is_alphabetic() && cjk_weekday(chars[j]).is_none() {
                j += 1;
            }

            let word: String = chars[i..j].iter().collect();

            match lookup_word(&word.to_lowercase()) {
                Some(Replacement::Tok(tok)) => {
                    out.push_str(tok);

                    if matches!(chars.get(j), Some(c) if c.is_ascii_digit()) {
                        out.push(' ');
                    }
                }
                Some(Replacement::Drop) => {
                    // Swallow one surrounding space to keep things tight.
                    if chars.get(j) == Some(&' ') {
                        j += 1;
                    }
                }
                None => out.push_str(&word),
            }

            i = j;
            continue;
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

fn cjk_weekday(c: char) -> Option<&'static str> {
    Some(match c {
        '月' => "Mo",
        '火' => "Tu",
        '水' => "We",
        '木' => "Th",
        '金' => "Fr",
        '土' => "Sa",
        '日' => "Su",
        _ => return None,
    })
}

fn lookup_word(lower: &str) -> Option<Replacement> {
    use Replacement::{Drop, Tok};

    Some(match lower {
        // Weekdays: English, German abbreviation, French, Spanish and
        // Portuguese.
        "mo" | "mon" | "monday" | "lundi" | "lunes" | "segunda" => Tok("Mo"),
        "tu" | "tue" | "tues" | "tuesday" | "mardi" | "martes" | "terca" | "terça" => Tok("Tu"),
        "we" | "wed" | "wednesday" | "mercredi" | "miercoles" | "miércoles" | "quarta" => {
            Tok("We")
        }
        "th" | "thu" | "thur" | "thurs" | "thursday" | "jeudi" | "jueves" | "quinta" => Tok("Th"),
        "fr" | "fri" | "friday" | "vendredi" | "viernes" | "sexta" => Tok("Fr"),
        "sa" | "sat" | "saturday" | "samedi" | "sabado" | "sábado" => Tok("Sa"),
        "su" | "sun" | "sunday" | "so" | "dimanche" | "domingo" => Tok("Su"),

        // Months.
        "jan" | "january" | "janvier" | "enero" => Tok("Jan"),
        "feb" | "february" | "fevrier" | "février" | "febrero" => Tok("Feb"),
        "mar" | "march" | "mars" | "marzo" => Tok("Mar"),
        "apr" | "april" | "avril" | "abril" => Tok("Apr"),
        "may" | "mai" | "mayo" => Tok("May"),
        "jun" | "june" | "juin" | "junio" => Tok("Jun"),
        "jul" | "july" | "juillet" | "julio" => Tok("Jul"),
        "aug" | "august" | "aout" | "août" | "agosto" => Tok("Aug"),
        "sep" | "sept" | "september" | "septembre" | "septiembre" => Tok("Sep"),
        "oct" | "october" | "octobre" | "octubre" => Tok("Oct"),
        "nov" | "november" | "novembre" | "noviembre" => Tok("Nov"),
        "dec" | "december" | "decembre" | "décembre" | "diciembre" => Tok("Dec"),

        // States and keywords, case folded.
        "open" => Tok("open"),
        "closed" | "ferme" | "fermé" | "fermee" | "fermée" | "cerrado" => Tok("closed"),
        "off" => Tok("off"),
        "unknown" => Tok("unknown"),
        "ph" => Tok("PH"),
        "sh" => Tok("SH"),
        "week" => Tok("week"),
        "day" => Tok("day"),
        "days" => Tok("days"),
        "easter" => Tok("easter"),
        "sunrise" => Tok("sunrise"),
        "sunset" => Tok("sunset"),
        "dawn" => Tok("dawn"),
        "dusk" => Tok("dusk"),

        // Range words, resolved by context in a later pass.
        "to" | "au" | "a" | "à" => Tok("to"),
        "and" | "et" | "y" | "e" => Tok("and"),

        // Fillers carrying no meaning.
        "du" | "de" | "des" | "le" | "la" | "les" | "feira" => Drop,

        _ => return None,
    })
}

// ---
// --- Range words
// ---

/// Resolve `to`/`and` (and `&`) between two times or two weekdays into the
/// matching range or list punctuation.
fn convert_range_words(text: &str) -> String {
    let tokens = tokenize(text);
    let mut out = String::with_capacity(text.len());
    let mut skip_space = false;

    for (idx, token) in tokens.iter().enumerate() {
        let replacement = match token.as_str() {
            "to" | "and" | "&" => {
                let prev = previous_word(&tokens, idx);
                let next = following_word(&tokens, idx);

                let compatible = (is_time_word(prev) && is_time_word(next))
                    || (is_day_word(prev) && is_day_word(next));

                match (token.as_str(), compatible) {
                    ("to", true) => Some("-"),
                    (_, true) => Some(","),
                    _ => None,
                }
            }
            _ => None,
        };

        match replacement {
            Some(punct) => {
                // Drop the spaces around the replaced word.
                while out.ends_with(' ') {
                    out.pop();
                }

                out.push_str(punct);
                skip_space = true;
            }
            None => {
                if skip_space && token.as_str() == " " {
                    skip_space = false;
                    continue;
                }

                skip_space = false;
                out.push_str(token);
            }
        }
    }

    out
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() || c == ':' {
            word.push(c);
        } else {
            if !word.is_empty() {
                tokens.push(take(&mut word));
            }

            tokens.push(c.to_string());
        }
    }

    if !word.is_empty() {
        tokens.push(word);
    }

    tokens
}

fn previous_word<'a>(tokens: &'a [String], idx: usize) -> &'a str {
    tokens[..idx]
        .iter()
        .rev()
        .find(|token| token.as_str() != " ")
        .map(|token| token.as_str())
        .unwrap_or("")
}

fn following_word<'a>(tokens: &'a [String], idx: usize) -> &'a str {
    tokens[idx + 1..]
        .iter()
        .find(|token| token.as_str() != " ")
        .map(|token| token.as_str())
        .unwrap_or("")
}

fn is_time_word(token: &str) -> bool {
    let Some((hours, minutes)) = token.split_once(':') else {
        return false;
    };

    hours.len() <= 2
        && minutes.len() == 2
        && hours.chars().all(|c| c.is_ascii_digit())
        && minutes.chars().all(|c| c.is_ascii_digit())
}

fn is_day_word(token: &str) -> bool {
    matches!(token, "Mo" | "Tu" | "We" | "Th" | "Fr" | "Sa" | "Su")
}

// ---
// --- Separator recovery
// ---

fn recover_separators(text: &str) -> String {
    let text = collapse_dashes(text);
    let text = split_slashes(&text);
    join_adjacent_timespans(&text)
}

/// Collapse spaces around a dash joining two times.
fn collapse_dashes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == ' ' || chars[i] == '-' {
            if out.ends_with(|c: char| c.is_ascii_digit()) {
                let mut j = i;

                while j < chars.len() && chars[j] == ' ' {
                    j += 1;
                }

                if j < chars.len() && chars[j] == '-' {
                    j += 1;

                    let mut k = j;

                    while k < chars.len() && chars[k] == ' ' {
                        k += 1;
                    }

                    if k < chars.len() && (chars[k].is_ascii_digit() || chars[k] == '(') {
                        out.push('-');
                        i = k;
                        continue;
                    }
                }
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Rewrite slashes abused as separators: `/` between two time ranges means
/// an extra span, `/` before a weekday starts a new rule.
fn split_slashes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '/' && ends_with_time(out.trim_end()) {
            let rest: String = chars[i + 1..].iter().collect();
            let trimmed = rest.trim_start();

            if starts_with_time_range(trimmed) {
                out.push(',');
                i += 1;
                continue;
            }

            if is_day_word(&trimmed.chars().take(2).collect::<String>()) {
                out.push(';');
                i += 1;
                continue;
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

fn starts_with_time_range(text: &str) -> bool {
    let Some((head, _)) = text.split_once('-') else {
        return false;
    };

    is_time_word(head.trim_end())
}

/// Two complete timespans separated by spaces only belong to the same list:
/// `08:00-12:30 14:00-19:00`.
fn join_adjacent_timespans(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == ' ' && ends_with_time(&out) {
            let mut j = i;

            while j < chars.len() && chars[j] == ' ' {
                j += 1;
            }

            let rest: String = chars[j..].iter().collect();

            if starts_with_time_range(&rest) {
                out.push(',');
                i = j;
                continue;
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

// ---
// --- Final cleanup
// ---

fn tidy(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        if c == ' ' && out.ends_with(' ') {
            continue;
        }

        out.push(c);
    }

    let mut out = out.trim().to_string();

    while matches!(out.chars().last(), Some(';' | ',' | ' ')) {
        out.pop();
    }

    out
}
