//! Geolocation variable values
//!
//! A `geoloc` variable has no options; its runtime value is a
//! `"<lat>,<lon>"` string with latitude in [-90, 90] and longitude in
//! [-180, 180].

use crate::error::{FicheError, Result};
use std::fmt;

/// A validated latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Degrees north, in [-90, 90]
    pub latitude: f64,
    /// Degrees east, in [-180, 180]
    pub longitude: f64,
}

impl Coordinates {
    /// Validate a pair of numeric coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let shown = format!("{},{}", latitude, longitude);
        check_latitude(latitude, &shown)?;
        check_longitude(longitude, &shown)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse a `"<lat>,<lon>"` value.
    pub fn parse(value: &str) -> Result<Self> {
        let (lat, lon) = value
            .split_once(',')
            .ok_or_else(|| invalid(value, "expected '<lat>,<lon>'"))?;
        Self::from_parts(lat, lon)
    }

    /// Parse latitude and longitude given as separate strings.
    pub fn from_parts(lat: &str, lon: &str) -> Result<Self> {
        let shown = format!("{},{}", lat.trim(), lon.trim());
        let latitude = parse_degrees(lat, &shown)?;
        let longitude = parse_degrees(lon, &shown)?;
        check_latitude(latitude, &shown)?;
        check_longitude(longitude, &shown)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Validate separate latitude/longitude text and join it as a variable
/// value, keeping the digits exactly as typed.
pub fn join_value(lat: &str, lon: &str) -> Result<String> {
    Coordinates::from_parts(lat, lon)?;
    Ok(format!("{},{}", lat.trim(), lon.trim()))
}

/// Validate a `"<lat>,<lon>"` value, returning it trimmed.
pub fn normalize_value(value: &str) -> Result<String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| invalid(value, "expected '<lat>,<lon>'"))?;
    join_value(lat, lon)
}

fn parse_degrees(text: &str, shown: &str) -> Result<f64> {
    let degrees: f64 = text
        .trim()
        .parse()
        .map_err(|_| invalid(shown, "not a number"))?;
    if degrees.is_finite() {
        Ok(degrees)
    } else {
        Err(invalid(shown, "not a finite number"))
    }
}

fn check_latitude(latitude: f64, shown: &str) -> Result<()> {
    if (-90.0..=90.0).contains(&latitude) {
        Ok(())
    } else {
        Err(invalid(shown, "latitude must be within [-90, 90]"))
    }
}

fn check_longitude(longitude: f64, shown: &str) -> Result<()> {
    if (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(invalid(shown, "longitude must be within [-180, 180]"))
    }
}

fn invalid(value: &str, reason: &'static str) -> FicheError {
    FicheError::InvalidCoordinates {
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pair() {
        let c = Coordinates::parse("48.8566, 2.3522").unwrap();
        assert_eq!(c.latitude, 48.8566);
        assert_eq!(c.longitude, 2.3522);
        assert_eq!(c.to_string(), "48.8566,2.3522");
    }

    #[test]
    fn accepts_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinates::parse("90.1,0").is_err());
        assert!(Coordinates::parse("0,-180.5").is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Coordinates::parse("48.85").is_err());
        assert!(Coordinates::parse("north,east").is_err());
        assert!(Coordinates::parse("NaN,1").is_err());
        assert!(Coordinates::from_parts("", "2").is_err());
    }

    #[test]
    fn join_keeps_typed_digits() {
        assert_eq!(
            join_value(" 48.856600 ", "2.352200").unwrap(),
            "48.856600,2.352200"
        );
        assert_eq!(normalize_value("-12.5 , 130").unwrap(), "-12.5,130");
    }
}
