use chrono::NaiveDate;
use js_sys::Date;

/// Format of `<input type="date">` values
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the browser's local time zone.
pub fn today() -> NaiveDate {
    let now = Date::new_0();
    local_date(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
}

/// Falls back to the Unix epoch for components no calendar has.
pub fn local_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Value for a date input element
pub fn format_input_date(date: NaiveDate) -> String {
    date.format(INPUT_DATE_FORMAT).to_string()
}
