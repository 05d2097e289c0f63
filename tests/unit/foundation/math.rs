use super::*;

#[test]
fn parses_leading_numbers_like_parse_float() {
    assert_eq!(parse_css_length("20px"), Some(20.0));
    assert_eq!(parse_css_length("  -3.5px"), Some(-3.5));
    assert_eq!(parse_css_length("1.5em"), Some(1.5));
    assert_eq!(parse_css_length(".25rem"), Some(0.25));
    assert_eq!(parse_css_length("4."), Some(4.0));
    assert_eq!(parse_css_length("1e2px"), Some(100.0));
    assert_eq!(parse_css_length("2em3"), Some(2.0));
    assert_eq!(parse_css_length("0"), Some(0.0));
}

#[test]
fn rejects_non_numeric_text() {
    assert_eq!(parse_css_length("auto"), None);
    assert_eq!(parse_css_length(""), None);
    assert_eq!(parse_css_length("-"), None);
    assert_eq!(parse_css_length("."), None);
    assert_eq!(parse_css_length("px20"), None);
}

#[test]
fn approx_eq_is_strict_at_tolerance() {
    assert!(approx_eq(1.0, 1.4, 0.5));
    assert!(!approx_eq(1.0, 1.5, 0.5));
}
