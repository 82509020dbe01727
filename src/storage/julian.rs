use chrono::{Datelike, NaiveDate};

/// Julian day number of 0001-01-01 minus one, i.e. the offset between
/// `NaiveDate::num_days_from_ce` and the chronological Julian day.
const CE_OFFSET: i64 = 1_721_425;

/// Convert a calendar date to the Julian day number stored in `datejd`.
pub fn to_jd(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) + CE_OFFSET
}

/// Convert a Julian day number back to a calendar date.
///
/// Returns `None` when the day lies outside the range chrono can represent.
pub fn from_jd(jd: i64) -> Option<NaiveDate> {
    let days = i32::try_from(jd - CE_OFFSET).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days)
}
