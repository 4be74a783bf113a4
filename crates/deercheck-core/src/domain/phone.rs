use crate::error::CoreError;
use regex::Regex;
use std::sync::OnceLock;

pub const CANONICAL_PHONE_LEN: usize = 10;
pub const MIN_FUZZY_DIGITS: usize = 4;
/// Longest digit run that still gets a fuzzy pattern. Matches the E.164
/// maximum; anything longer is not a phone number.
pub const MAX_FUZZY_DIGITS: usize = 15;

/// Strips everything but ASCII digits and drops a leading US country code.
///
/// Never fails. Inputs with too few or too many digits come back as-is, so
/// callers that need a dialable number check [`is_valid_length`].
pub fn normalize(input: &str) -> String {
    let digits: String = input.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.len() == CANONICAL_PHONE_LEN + 1 && digits.starts_with('1') {
        return digits[1..].to_string();
    }
    digits
}

pub fn is_valid_length(input: &str) -> bool {
    normalize(input).len() == CANONICAL_PHONE_LEN
}

/// Renders `(AAA) PPP-LLLL`, or returns the input untouched when it does not
/// normalize to exactly ten digits.
pub fn format_for_display(input: &str) -> String {
    let digits = normalize(input);
    if digits.len() != CANONICAL_PHONE_LEN {
        return input.to_string();
    }
    format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..])
}

/// Builds the matcher for a search input.
///
/// Between [`MIN_FUZZY_DIGITS`] and [`MAX_FUZZY_DIGITS`] digits the digits
/// must appear in order with anything between them. Outside that range they
/// must appear as one contiguous run and be the only digits in the value.
pub fn build_search_pattern(input: &str) -> SearchPattern {
    let digits = normalize(input);
    if !(MIN_FUZZY_DIGITS..=MAX_FUZZY_DIGITS).contains(&digits.len()) {
        let pattern = format!("^[^0-9]*{}[^0-9]*$", regex::escape(&digits));
        return SearchPattern::new(digits, pattern, true);
    }

    let mut pattern = String::from("(?i)");
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 {
            pattern.push_str(".*");
        }
        pattern.push(ch);
    }
    SearchPattern::new(digits, pattern, false)
}

/// Query-time matcher for free-text phone values.
///
/// The pattern text is plain `regex` syntax so the store can hand it to its
/// `REGEXP` function unchanged. The compiled form is built on first use.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    digits: String,
    pattern: String,
    exact: bool,
    compiled: OnceLock<Result<Regex, String>>,
}

impl SearchPattern {
    fn new(digits: String, pattern: String, exact: bool) -> Self {
        Self {
            digits,
            pattern,
            exact,
            compiled: OnceLock::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// True when the digits must match as one contiguous run.
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn to_regex(&self) -> Result<Regex, CoreError> {
        self.compiled()
            .clone()
            .map_err(CoreError::InvalidSearchPattern)
    }

    /// A pattern too large to compile matches nothing.
    pub fn is_match(&self, candidate: &str) -> bool {
        match self.compiled() {
            Ok(re) => re.is_match(candidate),
            Err(_) => false,
        }
    }

    fn compiled(&self) -> &Result<Regex, String> {
        self.compiled
            .get_or_init(|| Regex::new(&self.pattern).map_err(|err| err.to_string()))
    }
}

impl PartialEq for SearchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.exact == other.exact
    }
}

impl Eq for SearchPattern {}

#[cfg(test)]
mod tests {
    use super::{
        build_search_pattern, format_for_display, is_valid_length, normalize, MAX_FUZZY_DIGITS,
    };

    #[test]
    fn normalize_strips_formatting() {
        assert_eq!(normalize("(555) 123-4567"), "5551234567");
        assert_eq!(normalize("555.123.4567"), "5551234567");
        assert_eq!(normalize("  555 123 4567  "), "5551234567");
    }

    #[test]
    fn normalize_drops_us_country_code() {
        assert_eq!(normalize("1-555-123-4567"), "5551234567");
        assert_eq!(normalize("+1 (555) 123-4567"), "5551234567");
    }

    #[test]
    fn normalize_keeps_other_eleven_digit_values() {
        assert_eq!(normalize("25551234567"), "25551234567");
    }

    #[test]
    fn normalize_is_total_on_junk() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("call me"), "");
        assert_eq!(normalize("555"), "555");
        assert_eq!(normalize("٥٥٥1234567"), "1234567");
    }

    #[test]
    fn normalize_is_idempotent_on_digit_strings() {
        for input in ["5551234567", "15551234567", "555", "", "123456789012"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input}");
        }
    }

    #[test]
    fn valid_length_tracks_normalized_length() {
        let samples = [
            ("(555) 123-4567", true),
            ("1-555-123-4567", true),
            ("+1.555.123.4567", true),
            ("555", false),
            ("555-1234", false),
            ("55512345678", false),
            ("", false),
            ("5-5-5-1-2-3-4-5-6-7", true),
        ];
        for (input, expected) in samples {
            assert_eq!(is_valid_length(input), expected, "input {input}");
            assert_eq!(is_valid_length(input), normalize(input).len() == 10);
        }
    }

    #[test]
    fn fuzzy_pattern_matches_punctuated_renderings() {
        let pattern = build_search_pattern("5551234567");
        assert!(!pattern.is_exact());
        for stored in [
            "5551234567",
            "(555) 123-4567",
            "555.123.4567",
            "+1 555 123 4567",
            "555-123-4567 ext 9",
            "5 5 5 1 2 3 4 5 6 7",
        ] {
            assert!(pattern.is_match(stored), "stored {stored}");
        }
        assert!(!pattern.is_match("(555) 123-4566"));
        assert!(!pattern.is_match("555-123"));
    }

    #[test]
    fn fuzzy_pattern_interleaves_every_digit() {
        let pattern = build_search_pattern("(555) 123-4567");
        assert_eq!(pattern.as_str(), "(?i)5.*5.*5.*1.*2.*3.*4.*5.*6.*7");
        assert_eq!(pattern.digits(), "5551234567");
    }

    #[test]
    fn short_input_requires_exact_sequence() {
        let pattern = build_search_pattern("555");
        assert!(pattern.is_exact());
        assert!(pattern.is_match("555"));
        assert!(pattern.is_match("(555)"));
        assert!(!pattern.is_match("5-5-5"));
        assert!(!pattern.is_match("5555"));
        assert!(!pattern.is_match("1555"));
        assert!(!pattern.is_match("515"));
        assert!(!pattern.is_match("(555) 123-4567"));
    }

    #[test]
    fn short_input_rejects_out_of_order_digits() {
        let pattern = build_search_pattern("12");
        assert!(pattern.is_match("12"));
        assert!(!pattern.is_match("21"));
        assert!(!pattern.is_match("1x2"));
    }

    #[test]
    fn four_digits_switch_to_fuzzy() {
        let pattern = build_search_pattern("4567");
        assert!(!pattern.is_exact());
        assert!(pattern.is_match("(555) 123-4567"));
    }

    #[test]
    fn format_for_display_renders_ten_digits() {
        assert_eq!(format_for_display("5551234567"), "(555) 123-4567");
        assert_eq!(format_for_display("1.555.123.4567"), "(555) 123-4567");
    }

    #[test]
    fn format_for_display_leaves_other_lengths_alone() {
        assert_eq!(format_for_display("555-1234"), "555-1234");
        assert_eq!(format_for_display("+44 20 7946 0958"), "+44 20 7946 0958");
    }

    #[test]
    fn format_for_display_round_trips() {
        for digits in ["5551234567", "2125550000", "9999999999"] {
            assert_eq!(normalize(&format_for_display(digits)), digits);
        }
    }

    #[test]
    fn over_long_input_falls_back_to_exact_sequence() {
        let digits = "12345678901234567";
        assert!(digits.len() > MAX_FUZZY_DIGITS);
        let pattern = build_search_pattern(digits);
        assert!(pattern.is_exact());
        assert!(pattern.is_match(digits));
        assert!(!pattern.is_match("1-2345678901234567"));
        assert!(!pattern.is_match("(555) 123-4567"));
    }

    #[test]
    fn huge_input_never_panics() {
        let pattern = build_search_pattern(&"5".repeat(200_000));
        assert!(pattern.is_exact());
        assert!(!pattern.is_match("555"));
        assert!(!pattern.is_match("(555) 123-4567"));
        let _ = pattern.to_regex();
    }

    #[test]
    fn compiled_regex_agrees_with_is_match() {
        let pattern = build_search_pattern("555-123-4567");
        let re = pattern.to_regex().expect("fuzzy pattern compiles");
        assert!(re.is_match("(555) 123-4567"));
        assert_eq!(re.as_str(), pattern.as_str());
    }
}
