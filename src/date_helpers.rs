/// Converts a [`time::Date`] to a [`chrono::NaiveDate`], as they don't provide any direct
/// interconversion methods.
#[must_use]
pub fn time_to_chrono_date(time_date: time::Date) -> chrono::NaiveDate {
    let iso_date = time_date.to_iso_week_date();
    let chrono_weekday = match time_date.weekday() {
        time::Weekday::Monday => chrono::Weekday::Mon,
        time::Weekday::Tuesday => chrono::Weekday::Tue,
        time::Weekday::Wednesday => chrono::Weekday::Wed,
        time::Weekday::Thursday => chrono::Weekday::Thu,
        time::Weekday::Friday => chrono::Weekday::Fri,
        time::Weekday::Saturday => chrono::Weekday::Sat,
        time::Weekday::Sunday => chrono::Weekday::Sun,
    };

    chrono::NaiveDate::from_isoywd_opt(iso_date.0, u32::from(iso_date.1), chrono_weekday).unwrap()
}

#[must_use]
pub fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%A, %d %B %Y").to_string()
}

/// Formats a server-assigned timestamp for the admin tables.
#[must_use]
pub fn format_datetime(datetime: chrono::NaiveDateTime) -> String {
    datetime.format("%d.%m.%Y %H:%M").to_string()
}
