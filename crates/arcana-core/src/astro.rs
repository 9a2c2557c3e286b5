//! Closed-form astronomical values used as slowly varying entropy inputs.
//!
//! All functions take a timestamp in (possibly fractional, possibly negative)
//! seconds since the Unix epoch, UTC. They are approximations: good to a
//! fraction of a day, which is all the entropy string needs.

use std::time::{SystemTime, UNIX_EPOCH};

/// New moon of 2000-01-06 18:14 UTC.
pub const NEW_MOON_EPOCH_SECS: f64 = 947_182_440.0;
/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_67;
/// Julian day of the Unix epoch.
pub const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;
/// Earth's axial tilt in degrees.
const AXIAL_TILT_DEG: f64 = 23.44;

const SECS_PER_DAY: f64 = 86_400.0;

/// Current wall-clock time as fractional Unix seconds.
pub fn now_unix_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Lunar phase in `[0, 1)`: 0 = new moon, 0.5 = full moon.
pub fn moon_phase(unix_secs: f64) -> f64 {
    let cycle_secs = SYNODIC_MONTH_DAYS * SECS_PER_DAY;
    let cycles = (unix_secs - NEW_MOON_EPOCH_SECS) / cycle_secs;
    let phase = cycles - cycles.floor();
    // floor() of a value just below an integer can round the difference up to 1.0
    if phase >= 1.0 { 0.0 } else { phase }
}

/// Solar declination in degrees from the day of the year.
pub fn solar_declination(unix_secs: f64) -> f64 {
    let day = day_of_year(unix_secs) as f64;
    -AXIAL_TILT_DEG * ((360.0 / 365.0) * (day + 10.0)).to_radians().cos()
}

/// Julian day number (fractional).
pub fn julian_day(unix_secs: f64) -> f64 {
    unix_secs / SECS_PER_DAY + UNIX_EPOCH_JULIAN_DAY
}

/// 1-based ordinal day of the UTC year.
pub fn day_of_year(unix_secs: f64) -> u32 {
    let days = (unix_secs / SECS_PER_DAY).floor() as i64;
    let (year, month, day) = civil_from_days(days);
    let cumulative: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    let leap_shift = if month > 2 && is_leap(year) { 1 } else { 0 };
    cumulative[(month - 1) as usize] + day + leap_shift
}

/// Convert days since 1970-01-01 to a (year, month, day) civil date.
/// Valid for negative day counts as well.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Format Unix seconds as an ISO-8601 UTC timestamp with millisecond precision.
/// Example: `2026-02-15T01:30:00.250Z`
pub fn format_iso8601(unix_secs: f64) -> String {
    let total_ms = (unix_secs * 1000.0).floor() as i64;
    let ms = total_ms.rem_euclid(1000);
    let secs = total_ms.div_euclid(1000);
    let days = secs.div_euclid(86_400);
    let sod = secs.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        month,
        day,
        sod / 3600,
        (sod / 60) % 60,
        sod % 60,
        ms
    )
}
