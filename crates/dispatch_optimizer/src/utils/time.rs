//! Conversion between wall-clock `HH:MM` strings and integer seconds counted
//! from the start of the shift.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeCodecError {
    #[error("invalid HH:MM time {value:?}")]
    InvalidTime { value: String },
}

/// Hours may exceed 23 so that times past midnight read back what `to_hhmm`
/// writes. Minutes are two digits below 60.
fn minutes_of_day(hhmm: &str) -> Result<i64, TimeCodecError> {
    let invalid = || TimeCodecError::InvalidTime {
        value: hhmm.to_owned(),
    };
    let is_number = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    let (hours, minutes) = hhmm.split_once(':').ok_or_else(invalid)?;
    if !is_number(hours) || !is_number(minutes) || minutes.len() != 2 {
        return Err(invalid());
    }

    let hours: i64 = hours.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

/// Seconds elapsed between `base` and `hhmm`, negative when `hhmm` is earlier.
pub fn to_seconds(hhmm: &str, base: &str) -> Result<i64, TimeCodecError> {
    Ok((minutes_of_day(hhmm)? - minutes_of_day(base)?) * 60)
}

/// Formats `base + seconds` as `HH:MM`. Seconds are floored to the minute and
/// hours keep counting past 24.
pub fn to_hhmm(seconds: i64, base: &str) -> Result<String, TimeCodecError> {
    let total_minutes = minutes_of_day(base)? + seconds.div_euclid(60);

    Ok(format!(
        "{:02}:{:02}",
        total_minutes.div_euclid(60),
        total_minutes.rem_euclid(60)
    ))
}
