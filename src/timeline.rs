use chrono::NaiveDate;

pub const PRESENT: &str = "Present";

/// A record that occupies a span of days, open-ended while `end_date` is `None`.
pub trait Dated {
    fn start_date(&self) -> NaiveDate;
    fn end_date(&self) -> Option<NaiveDate>;
}

/// Latest start first. Equal starts keep their input order; the input is left untouched.
pub fn sort_by_start_date_descending<T: Dated + Clone>(records: &[T]) -> Vec<T> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.start_date().cmp(&a.start_date()));
    sorted
}

/// Short month and year, e.g. `Jan 2024`; `Present` for an open end.
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%b %Y").to_string(),
        None => PRESENT.to_string(),
    }
}

pub fn format_duration(start: NaiveDate, end: Option<NaiveDate>) -> String {
    format!("{} - {}", format_date(Some(start)), format_date(end))
}
