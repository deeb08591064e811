use manuscript_to_doc::{normalize_numeral, to_sino};

#[test]
fn standard_reading_rules() {
    let cases = [
        ("一", 1),
        ("十一", 11),
        ("二十", 20),
        ("一百二十三", 123),
        ("三千", 3000),
        ("九千九百九十九", 9999),
        ("一万", 10_000),
        ("三万零五", 30_005),
        ("两千零二十", 2020),
    ];
    for (text, expected) in cases {
        assert_eq!(normalize_numeral(text), expected, "{}", text);
    }
}

#[test]
fn arabic_digits_parse_directly() {
    assert_eq!(normalize_numeral("123"), 123);
    assert_eq!(normalize_numeral("第０５章"), 5);
    assert_eq!(normalize_numeral("Volume 12"), 12);
}

#[test]
fn missing_or_malformed_numeral_is_zero() {
    for text in ["", "后记", "Chapter", "第章", "---"] {
        assert_eq!(normalize_numeral(text), 0, "{:?}", text);
    }
}

#[test]
fn sino_rendering_round_trips() {
    for n in 1..=1200u32 {
        assert_eq!(normalize_numeral(&to_sino(n)), n, "{}", to_sino(n));
    }
}
