//! `<point>` lat/lon/hae/ce/le codec (§4.2).
//!
//! Grounded on `cot_events.rs::Point` (string-preserving fields) and
//! `xml_utils.rs::format_cot_float` for shortest round-trippable formatting.

use crate::error::{ConversionError, CotError};
use crate::policy::{ConversionPolicy, CoordinatePolicy};
use ryu::Buffer;

/// A parsed `<point>` element. Source strings are kept so that reconstructing
/// an event the engine didn't itself modify reproduces the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub lat: String,
    pub lon: String,
    pub hae: String,
    pub ce: String,
    pub le: String,
}

impl Default for Point {
    fn default() -> Self {
        Self {
            lat: "0.0".to_string(),
            lon: "0.0".to_string(),
            hae: "0.0".to_string(),
            ce: "9999999.0".to_string(),
            le: "9999999.0".to_string(),
        }
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<f64, CotError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| CotError::InvalidNumeric {
            field: field.to_string(),
            value: value.to_string(),
            source: Box::new(e),
        })
}

impl Point {
    /// Parses a point from its five source strings, preserving them verbatim.
    pub fn parse(lat: &str, lon: &str, hae: &str, ce: &str, le: &str) -> Point {
        Point {
            lat: lat.to_string(),
            lon: lon.to_string(),
            hae: hae.to_string(),
            ce: ce.to_string(),
            le: le.to_string(),
        }
    }

    /// Builds a point from reconstructed numeric fields (§4.6 reverse path),
    /// formatting each with [`format_cot_float`] for shortest round-trippable text.
    pub fn from_numeric(lat: f64, lon: f64, hae: f64, ce: f64, le: f64) -> Point {
        Point {
            lat: format_cot_float(lat),
            lon: format_cot_float(lon),
            hae: format_cot_float(hae),
            ce: format_cot_float(ce),
            le: format_cot_float(le),
        }
    }

    /// Converts all five fields to `f64`, applying the range/finiteness policy.
    ///
    /// Strict mode rejects non-finite values and out-of-range lat/lon with
    /// [`ConversionError::Coordinate`]. Safe mode clamps lat to `[-90, 90]`,
    /// lon to `[-180, 180]`, and replaces non-finite values with `0.0`,
    /// logging a diagnostic each time. A malformed numeric string (not a
    /// range violation) surfaces as a parse error instead.
    pub fn to_numeric(
        &self,
        policy: ConversionPolicy,
    ) -> Result<(f64, f64, f64, f64, f64), ConversionError> {
        let lat = parse_field("lat", &self.lat)?;
        let lon = parse_field("lon", &self.lon)?;
        let hae = parse_field("hae", &self.hae)?;
        let ce = parse_field("ce", &self.ce)?;
        let le = parse_field("le", &self.le)?;

        let lat = clamp_or_reject("lat", lat, -90.0, 90.0, policy)?;
        let lon = clamp_or_reject("lon", lon, -180.0, 180.0, policy)?;
        let hae = sanitize_non_finite("hae", hae, policy)?;
        let ce = sanitize_non_finite("ce", ce, policy)?;
        let le = sanitize_non_finite("le", le, policy)?;

        Ok((lat, lon, hae, ce, le))
    }
}

fn clamp_or_reject(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    policy: ConversionPolicy,
) -> Result<f64, ConversionError> {
    if !value.is_finite() {
        return sanitize_non_finite(field, value, policy);
    }
    if value < min || value > max {
        match policy.coordinates {
            CoordinatePolicy::Strict => Err(ConversionError::Coordinate { field, value }),
            CoordinatePolicy::Safe => {
                let clamped = value.clamp(min, max);
                log::warn!("field '{field}' value {value} clamped to {clamped}");
                Ok(clamped)
            }
        }
    } else {
        Ok(value)
    }
}

fn sanitize_non_finite(
    field: &'static str,
    value: f64,
    policy: ConversionPolicy,
) -> Result<f64, ConversionError> {
    if value.is_finite() {
        return Ok(value);
    }
    match policy.coordinates {
        CoordinatePolicy::Strict => Err(ConversionError::Coordinate { field, value }),
        CoordinatePolicy::Safe => {
            log::warn!("field '{field}' value {value} replaced with 0.0");
            Ok(0.0)
        }
    }
}

/// Formats a CoT numeric field with the shortest round-trippable representation,
/// always keeping a decimal point (e.g. `100` -> `"100.0"`).
pub fn format_cot_float(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        let mut buf = Buffer::new();
        buf.format(value).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_mode_rejects_out_of_range() {
        let p = Point::parse("200", "-118.0", "0", "0", "0");
        assert!(p.to_numeric(ConversionPolicy::strict()).is_err());
    }

    #[test]
    fn safe_mode_clamps() {
        let p = Point::parse("200", "-999", "0", "0", "0");
        let (lat, lon, ..) = p.to_numeric(ConversionPolicy::safe()).unwrap();
        assert_eq!(lat, 90.0);
        assert_eq!(lon, -180.0);
    }

    #[test]
    fn formats_whole_numbers_with_decimal() {
        assert_eq!(format_cot_float(100.0), "100.0");
        assert_eq!(format_cot_float(34.052235), "34.052235");
    }
}
