mod datetime;
mod filesystem;
mod string;

pub use datetime::get_utc_iso_datetime;
pub use filesystem::write_error_to_log;
pub use string::{NA_MARKERS, is_na_marker, normalize_scenario, trim_text};
