use serde_json::Value;

/// Extract the first number from a nutrient display string.
///
/// Finds the first run of ASCII digits, optionally followed by a decimal
/// point and more digits, anywhere in the input. Returns 0 when there is no
/// number. Signs and exponents are not recognised.
pub fn parse_leading_number(input: &str) -> f64 {
    let bytes = input.as_bytes();
    let Some(start) = bytes.iter().position(u8::is_ascii_digit) else {
        return 0.0;
    };

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }

    // Only take the fraction when at least one digit follows the point
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    input[start..end].parse().unwrap_or(0.0)
}

/// Like [`parse_leading_number`], but for arbitrary JSON. Non-strings give 0.
pub fn parse_leading_number_value(value: &Value) -> f64 {
    value.as_str().map(parse_leading_number).unwrap_or(0.0)
}
