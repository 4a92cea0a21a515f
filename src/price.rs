//! Display formatting of prices typed in as plain numbers.
//!
//! ```
//! use price_tag::format_price;
//!
//! assert_eq!(format_price("900000"), "900\u{a0}000");
//! assert_eq!(format_price("abc"), "abc");
//! ```

/// Separators used to print a number the way a locale does
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NumberLocale {
    /// Placed between groups of three integer digits
    pub group_separator: char,
    pub decimal_separator: char,
    /// Fractional digits beyond this are rounded away; trailing zeros are never printed
    pub max_fraction_digits: usize,
}

impl NumberLocale {
    /// Russian conventions: `1 234 567,5` with a no-break space between groups
    pub const RU: NumberLocale = NumberLocale {
        group_separator: '\u{a0}',
        decimal_separator: ',',
        max_fraction_digits: 3,
    };

    /// English conventions: `1,234,567.5`
    pub const EN: NumberLocale = NumberLocale {
        group_separator: ',',
        decimal_separator: '.',
        max_fraction_digits: 3,
    };
}

impl Default for NumberLocale {
    fn default() -> Self {
        NumberLocale::RU
    }
}

/// Format a raw price with the default (Russian) locale. See [format_price_with].
pub fn format_price(raw: &str) -> String {
    format_price_with(raw, &NumberLocale::default())
}

/// Turn raw price text into a grouped display string.
///
/// Everything except digits and '.' is dropped first, then the longest leading number
/// is read. If no finite number can be read, the raw text is returned unchanged.
pub fn format_price_with(raw: &str, locale: &NumberLocale) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match leading_number(&cleaned) {
        Some(value) if value.is_finite() => group(value, locale),
        _ => raw.to_string(),
    }
}

/// Read the longest prefix of `digits[.digits]`, which needs at least one digit
fn leading_number(s: &str) -> Option<f64> {
    let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
    let mut end = int_len;
    let mut frac_len = 0;
    if s.as_bytes().get(int_len) == Some(&b'.') {
        frac_len = s[int_len + 1..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        end = int_len + 1 + frac_len;
    }
    if int_len + frac_len == 0 {
        return None;
    }
    s[..end].parse::<f64>().ok()
}

fn group(value: f64, locale: &NumberLocale) -> String {
    let fixed = format!("{:.*}", locale.max_fraction_digits, value);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut out = String::with_capacity(fixed.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(locale.group_separator);
        }
        out.push(*d);
    }
    if !frac_part.is_empty() {
        out.push(locale.decimal_separator);
        out.push_str(frac_part);
    }
    out
}
