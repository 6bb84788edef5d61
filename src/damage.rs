// Decoding of the PROPDMGEXP / CROPDMGEXP magnitude codes.
//
// Only the three letter codes carry a documented meaning. Everything else in
// the column (digits, "+", "-", "?", "H", blanks) is treated as a plain tens
// multiplier.

/// Multiplier for a damage exponent code, case-insensitive.
pub fn decode_exponent(code: &str) -> f64 {
    match code.trim().to_ascii_uppercase().as_str() {
        "B" => 1e9,
        "M" => 1e6,
        "K" => 1e3,
        _ => 1e1,
    }
}

pub fn damage_amount(magnitude: f64, code: &str) -> f64 {
    magnitude * decode_exponent(code)
}
