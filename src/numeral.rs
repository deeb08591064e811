//! Ordinal extraction from headings and file names.
//!
//! Arabic digits win over Sino numerals when both appear. Anything that does
//! not yield a positive number normalizes to 0, which callers read as
//! "unknown ordinal".

const SINO_DIGITS: [char; 10] = ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

fn sino_digit(ch: char) -> Option<u64> {
    match ch {
        '零' | '〇' => Some(0),
        '一' => Some(1),
        '二' | '两' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

fn sino_unit(ch: char) -> Option<u64> {
    match ch {
        '十' => Some(10),
        '百' => Some(100),
        '千' => Some(1000),
        '万' => Some(10_000),
        _ => None,
    }
}

pub fn is_sino_numeral_char(ch: char) -> bool {
    sino_digit(ch).is_some() || sino_unit(ch).is_some()
}

fn arabic_digit(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => ch.to_digit(10),
        '０'..='９' => Some(ch as u32 - '０' as u32),
        _ => None,
    }
}

/// Extract the first numeral embedded in `text` as an integer.
pub fn normalize_numeral(text: &str) -> u32 {
    let arabic: String = text
        .chars()
        .skip_while(|c| arabic_digit(*c).is_none())
        .take_while(|c| arabic_digit(*c).is_some())
        .filter_map(arabic_digit)
        .filter_map(|d| char::from_digit(d, 10))
        .collect();
    if !arabic.is_empty() {
        if let Ok(n) = arabic.parse::<u32>() {
            if n > 0 {
                return n;
            }
        }
    }

    let run: String = text
        .chars()
        .skip_while(|c| !is_sino_numeral_char(*c))
        .take_while(|c| is_sino_numeral_char(*c))
        .collect();
    if run.is_empty() {
        return 0;
    }
    parse_sino(&run)
}

/// Parse a run of Sino numerals ("一百二十三", "十二万").
pub fn parse_sino(run: &str) -> u32 {
    let mut total: u64 = 0;
    let mut section: u64 = 0;
    let mut digit: u64 = 0;

    for ch in run.chars() {
        if let Some(d) = sino_digit(ch) {
            digit = d;
            continue;
        }
        match sino_unit(ch) {
            Some(10_000) => {
                let lower = section + digit;
                total += lower.max(1) * 10_000;
                section = 0;
                digit = 0;
            }
            Some(unit) => {
                // a bare unit ("十二") reads as one of that unit
                section += digit.max(1) * unit;
                digit = 0;
            }
            None => {}
        }
        if total > u64::from(u32::MAX) {
            return 0;
        }
    }

    u32::try_from(total + section + digit).unwrap_or(0)
}

fn sino_group(n: u32) -> String {
    let mut out = String::new();
    let mut started = false;
    let mut pending_zero = false;
    for (unit, name) in [(1000, "千"), (100, "百"), (10, "十"), (1, "")] {
        let d = (n / unit % 10) as usize;
        if d == 0 {
            if started {
                pending_zero = true;
            }
            continue;
        }
        if pending_zero {
            out.push('零');
            pending_zero = false;
        }
        out.push(SINO_DIGITS[d]);
        out.push_str(name);
        started = true;
    }
    out
}

fn sino_inner(n: u32) -> String {
    let high = n / 10_000;
    let low = n % 10_000;
    if high == 0 {
        return sino_group(low);
    }
    let mut out = sino_inner(high);
    out.push('万');
    if low > 0 {
        if low < 1000 {
            out.push('零');
        }
        out.push_str(&sino_group(low));
    }
    out
}

/// Render `n` in Sino numerals, the inverse of [`parse_sino`].
pub fn to_sino(n: u32) -> String {
    if n == 0 {
        return "零".to_string();
    }
    let out = sino_inner(n);
    match out.strip_prefix("一十") {
        Some(rest) => format!("十{}", rest),
        None => out,
    }
}
