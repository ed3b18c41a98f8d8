//! Platform position source for the CLI surface.
//!
//! Coordinates come from `SKYCAST_LAT`/`SKYCAST_LON` when both are set;
//! there is no other location backend on this surface, so anything else
//! reports geolocation as unsupported and the caller falls back to a
//! manual city search.

use skycast_core::GeolocationError;

pub fn current_position() -> Result<(f64, f64), GeolocationError> {
    let (Ok(lat), Ok(lon)) = (std::env::var("SKYCAST_LAT"), std::env::var("SKYCAST_LON")) else {
        return Err(GeolocationError::Unsupported);
    };

    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| GeolocationError::Unavailable(format!("invalid SKYCAST_LAT {lat:?}")))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| GeolocationError::Unavailable(format!("invalid SKYCAST_LON {lon:?}")))?;

    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    // One test covers all cases: the process environment is shared, so
    // parallel tests mutating it would race.
    #[test]
    fn test_current_position_from_environment() {
        std::env::remove_var("SKYCAST_LAT");
        std::env::remove_var("SKYCAST_LON");
        assert!(matches!(current_position(), Err(GeolocationError::Unsupported)));

        std::env::set_var("SKYCAST_LAT", "51.5");
        assert!(matches!(current_position(), Err(GeolocationError::Unsupported)));

        std::env::set_var("SKYCAST_LON", "-0.12");
        let (lat, lon) = current_position().unwrap();
        assert!((lat - 51.5).abs() < f64::EPSILON);
        assert!((lon + 0.12).abs() < f64::EPSILON);

        std::env::set_var("SKYCAST_LAT", "not-a-number");
        assert!(matches!(current_position(), Err(GeolocationError::Unavailable(_))));

        std::env::remove_var("SKYCAST_LAT");
        std::env::remove_var("SKYCAST_LON");
    }
}
