//! Parsing of the `month` query parameter shared by the read endpoints.

use time::Month;

use crate::Error;

/// Parse the raw `month` query parameter into a calendar month.
///
/// Accepts the numbers 1-12, with or without a leading zero, so both `3` and
/// `03` mean March. The month is mandatory, a missing parameter is an error.
///
/// # Errors
/// Returns [Error::MissingMonth] if `month` is `None`, or [Error::InvalidMonth]
/// if the value is not a number between 1 and 12.
pub fn parse_month_param(month: Option<&str>) -> Result<Month, Error> {
    let raw_month = month.ok_or(Error::MissingMonth)?;

    raw_month
        .parse::<u8>()
        .ok()
        .and_then(|number| Month::try_from(number).ok())
        .ok_or_else(|| Error::InvalidMonth(raw_month.to_owned()))
}
