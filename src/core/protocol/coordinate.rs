//! NMEA coordinate codec
//!
//! Converts between the protocol's sexagesimal-with-hemisphere encoding
//! (DDDMM.MMMM plus N/S/E/W) and signed decimal degrees, in both directions.

/// Decode an NMEA coordinate field plus hemisphere into signed decimal
/// degrees.
///
/// An empty numeric field decodes to 0.0 rather than erroring, and a
/// malformed one is logged and also decodes to 0.0: one bad field must never
/// stop the pipeline.
pub fn decode(value: &str, hemisphere: &str) -> f64 {
    if value.is_empty() {
        return 0.0;
    }

    let raw: f64 = match value.parse() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!("invalid coordinate field: {:?}", value);
            return 0.0;
        }
    };

    // NMEA packs degrees and minutes into one number: DDDMM.MMMM
    let degrees = (raw / 100.0).floor();
    let minutes = raw - degrees * 100.0;
    let decimal = degrees + minutes / 60.0;

    match hemisphere {
        "S" | "W" => -decimal,
        _ => decimal,
    }
}

/// Encode signed decimal degrees as an NMEA coordinate field plus hemisphere
/// character.
///
/// The degrees part is zero-padded to 2 digits for latitude and 3 for
/// longitude; minutes carry 4 fractional digits.
pub fn encode(decimal_degrees: f64, is_latitude: bool) -> (String, char) {
    let hemisphere = if is_latitude {
        if decimal_degrees >= 0.0 {
            'N'
        } else {
            'S'
        }
    } else if decimal_degrees >= 0.0 {
        'E'
    } else {
        'W'
    };

    let abs = decimal_degrees.abs();
    let degrees = abs.floor();
    let minutes = (abs - degrees) * 60.0;

    let text = if is_latitude {
        format!("{:02}{:07.4}", degrees as u32, minutes)
    } else {
        format!("{:03}{:07.4}", degrees as u32, minutes)
    };

    (text, hemisphere)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_known_values() {
        assert!((decode("4807.038", "N") - 48.1173).abs() < 1e-4);
        assert!((decode("01131.000", "E") - 11.5167).abs() < 1e-4);
        assert!((decode("4807.038", "S") + 48.1173).abs() < 1e-4);
        assert!((decode("01131.000", "W") + 11.5167).abs() < 1e-4);
    }

    #[test]
    fn decode_empty_and_garbage_yield_zero() {
        assert_eq!(decode("", "N"), 0.0);
        assert_eq!(decode("not-a-number", "N"), 0.0);
    }

    #[test]
    fn encode_pads_degrees() {
        let (lat, hemi) = encode(48.1173, true);
        assert_eq!(hemi, 'N');
        assert!(lat.starts_with("4807."));
        assert_eq!(lat.len(), "4807.0380".len());

        let (lon, hemi) = encode(11.5167, false);
        assert_eq!(hemi, 'E');
        assert!(lon.starts_with("01131."));

        let (_, hemi) = encode(-48.0, true);
        assert_eq!(hemi, 'S');
        let (_, hemi) = encode(-11.0, false);
        assert_eq!(hemi, 'W');
    }

    #[test]
    fn round_trip_within_tolerance() {
        for &deg in &[-89.9, -45.123456, -0.5, 0.0, 0.5, 22.9519, 48.1173, 89.9] {
            let (text, hemi) = encode(deg, true);
            let back = decode(&text, &hemi.to_string());
            assert!((back - deg).abs() < 1e-4, "latitude {deg} -> {back}");
        }
        for &deg in &[-179.9, -43.2105, -1.0, 0.0, 11.5167, 121.0, 179.9] {
            let (text, hemi) = encode(deg, false);
            let back = decode(&text, &hemi.to_string());
            assert!((back - deg).abs() < 1e-4, "longitude {deg} -> {back}");
        }
    }
}
