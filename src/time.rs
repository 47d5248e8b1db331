use hifitime::{Duration, Epoch, Unit};
use std::str::FromStr;

use crate::{
    cometrail_errors::CometrailError,
    constants::{JulianDate, JDTOMJD, MJD},
};

/// Transformation from an ISO-8601 date (`YYYY-MM-DDTHH:MM:SS[.fff][Z]`) to an [`Epoch`] in UTC
///
/// Argument
/// --------
/// * `date`: the date string, a trailing `Z` designator is accepted
///
/// Return
/// ------
/// * the parsed epoch, or [`CometrailError::DateParse`] if the string is not a date
pub fn parse_iso8601(date: &str) -> Result<Epoch, CometrailError> {
    let trimmed = date.trim();
    let without_zulu = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    Epoch::from_str(without_zulu).map_err(|e| CometrailError::DateParse(format!("{date}: {e}")))
}

/// Format an epoch as an ISO-8601 UTC string with millisecond precision (`2025-10-29T11:33:16.000Z`).
pub fn to_iso8601(epoch: &Epoch) -> String {
    let (y, m, d, hh, mm, ss, ns) = epoch.to_gregorian_utc();
    format!(
        "{y:04}-{m:02}-{d:02}T{hh:02}:{mm:02}:{ss:02}.{:03}Z",
        ns / 1_000_000
    )
}

/// Transformation from an epoch to julian date (JD, UTC)
pub fn epoch_to_jd(epoch: &Epoch) -> JulianDate {
    epoch.to_jde_utc_days()
}

/// Transformation from julian date (JD, UTC) to an epoch
pub fn jd_to_epoch(jd: JulianDate) -> Epoch {
    Epoch::from_jde_utc(jd)
}

/// Transformation from modified julian date (MJD) in julian date (JD)
pub fn mjd_to_jd(mjd: MJD) -> JulianDate {
    mjd + JDTOMJD
}

/// Transformation from julian date (JD) in modified julian date (MJD)
pub fn jd_to_mjd(jd: JulianDate) -> MJD {
    jd - JDTOMJD
}

/// Signed number of days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: &Epoch, to: &Epoch) -> f64 {
    (*to - *from).to_unit(Unit::Day)
}

/// Shift an epoch by a signed number of days.
pub fn add_days(epoch: &Epoch, days: f64) -> Epoch {
    *epoch + Duration::from_days(days)
}
