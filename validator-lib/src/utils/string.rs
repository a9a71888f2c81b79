/// Text values that spreadsheets and their exporters use to mean "no value"
pub const NA_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Exact match against [`NA_MARKERS`]; surrounding whitespace is significant.
pub fn is_na_marker(value: &str) -> bool {
    NA_MARKERS.contains(&value)
}

/// Trim surrounding whitespace (including newlines and tabs)
pub fn trim_text(value: &str) -> String {
    value.trim().to_string()
}

/// Normalize a separation scenario for comparison: trimmed and uppercased
pub fn normalize_scenario(value: &str) -> String {
    value.trim().to_uppercase()
}
