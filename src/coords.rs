//! Coordinate decoding: rational DMS fields → signed decimal degrees.
//!
//! GPS metadata stores each angle as three exact rationals — degrees, minutes,
//! seconds — plus a one-character hemisphere reference. Cameras that want to
//! store `23.5` minutes encode it as `235/10`: the denominator is a power-of-ten
//! marker for decimal places, not a true divisor. Decoding therefore
//! reconstructs the intended decimal string instead of dividing:
//!
//! ```text
//! places = floor(log10(denominator))
//! value  = numerator digits with the last `places` digits as the fraction
//! ```
//!
//! so `235/10` is `23.5` and `5023/100` is `50.23`, never `235` or `5023`.
//! With zero places the numerator is taken as-is. The three components combine
//! as `deg + min/60 + sec/3600`, negated for `S`/`W` references.
//!
//! ## Hemisphere tolerance
//!
//! A reference character that is none of `N`/`S`/`E`/`W` decodes as the
//! positive hemisphere. This is inherited behavior — almost certainly a
//! default branch rather than a contract — and is kept for compatibility.
//! See `unrecognized_reference_decodes_positive`.

use crate::geotag::{GpsRational, RawGeoFields};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{0} has a zero-denominator rational")]
    ZeroDenominator(&'static str),
    #[error("{0} has {1} rational components, expected 3")]
    MissingComponent(&'static str, usize),
}

/// A decoded geographic position in signed decimal degrees.
///
/// Latitude is positive north, longitude positive east. Range is *not*
/// validated — the decoder trusts the source data, and out-of-range values
/// pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Decode a raw GPS field set into a signed coordinate pair.
pub fn decode(fields: &RawGeoFields) -> Result<Coordinate, DecodeError> {
    let lat = decode_axis(&fields.latitude, fields.latitude_ref, 'S', "latitude")?;
    let lon = decode_axis(&fields.longitude, fields.longitude_ref, 'W', "longitude")?;
    Ok(Coordinate { lat, lon })
}

fn decode_axis(
    dms: &[GpsRational],
    reference: char,
    negative_ref: char,
    axis: &'static str,
) -> Result<f64, DecodeError> {
    if dms.len() < 3 {
        return Err(DecodeError::MissingComponent(axis, dms.len()));
    }
    let degrees = component_value(dms[0], axis)?;
    let minutes = component_value(dms[1], axis)?;
    let seconds = component_value(dms[2], axis)?;
    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;

    // Anything that is not the negative reference — including an
    // unrecognized character — is the positive hemisphere.
    if reference == negative_ref {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

fn component_value(rational: GpsRational, axis: &'static str) -> Result<f64, DecodeError> {
    if rational.den == 0 {
        return Err(DecodeError::ZeroDenominator(axis));
    }
    Ok(reconstruct_decimal(rational.num, rational.den))
}

/// Decimal places implied by a denominator: `floor(log10(den))`.
fn decimal_places(den: u32) -> usize {
    let mut places = 0;
    let mut d = den;
    while d >= 10 {
        d /= 10;
        places += 1;
    }
    places
}

/// Reinterpret the numerator's decimal string with `decimal_places(den)`
/// trailing digits as the fraction. When the place count meets or exceeds
/// the digit count, the entire numerator string becomes the fraction
/// (`5/100` → `0.5`).
fn reconstruct_decimal(num: u32, den: u32) -> f64 {
    let places = decimal_places(den);
    if places == 0 {
        return f64::from(num);
    }
    let digits = num.to_string();
    let (whole, frac) = if places >= digits.len() {
        ("", digits.as_str())
    } else {
        digits.split_at(digits.len() - places)
    };
    let whole = if whole.is_empty() { "0" } else { whole };
    // A string of ASCII digits with a single point always parses.
    format!("{whole}.{frac}").parse().unwrap_or(0.0)
}
