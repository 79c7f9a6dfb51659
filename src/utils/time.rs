use chrono::{DateTime, FixedOffset, NaiveDate};

/// Presentation timezone for schedules and the search day window (UTC+7).
pub fn jakarta_offset() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).expect("UTC+7 is a valid offset")
}

/// First instant of the given calendar day in the presentation timezone.
pub fn day_start(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|dt| dt.and_local_timezone(jakarta_offset()).single())
        .expect("midnight exists for a fixed offset")
}

/// First instant of the following day, the exclusive upper bound of the
/// day window.
pub fn day_after(date: NaiveDate) -> DateTime<FixedOffset> {
    day_start(date.succ_opt().expect("date is not at the calendar limit"))
}
