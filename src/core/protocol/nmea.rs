//! NMEA sentence parsing into fix records
//!
//! Supported sentences:
//! - GGA: Global Positioning System Fix Data
//! - RMC: Recommended Minimum Navigation Information
//!
//! Each sentence type updates only its own fields of the [`FixRecord`]; the
//! rest keep their previous values. A GGA frame therefore does not clear the
//! speed set by an earlier RMC frame. This merge semantic is deliberate and
//! must be preserved.

use super::coordinate;

/// Knots to meters per second
const KNOTS_TO_MPS: f64 = 0.514;

/// Minimum field count for a usable GGA sentence
const GGA_MIN_FIELDS: usize = 10;

/// Minimum field count for a usable RMC sentence
const RMC_MIN_FIELDS: usize = 8;

/// Decoded state of the most recently parsed sentence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixRecord {
    /// UTC time as received, "hhmmss.ss"
    pub time_utc: String,
    /// Latitude in signed decimal degrees, positive = North
    pub latitude_deg: f64,
    /// Longitude in signed decimal degrees, positive = East
    pub longitude_deg: f64,
    /// Altitude in meters, populated by GGA sentences only
    pub altitude_m: f64,
    /// Speed in meters per second, populated by RMC sentences only
    pub speed_mps: f64,
    /// Number of satellites used, GGA sentences only
    pub satellites_used: u32,
    /// Horizontal dilution of precision, GGA sentences only
    pub hdop: f64,
}

impl FixRecord {
    /// Serialize as the telemetry wire line:
    /// `time_utc,lat,lon,speed,altitude,satellites,hdop`
    pub fn to_csv(&self) -> String {
        format!(
            "{},{:.6},{:.6},{:.2},{:.1},{},{:.1}",
            self.time_utc,
            self.latitude_deg,
            self.longitude_deg,
            self.speed_mps,
            self.altitude_m,
            self.satellites_used,
            self.hdop,
        )
    }
}

/// Apply one raw frame to the fix record.
///
/// The frame is split on commas with empty fields preserved, since field
/// position encodes meaning. Returns `true` when the record was updated.
/// Unrecognized sentence types and short frames are skipped, never fatal.
pub fn apply_sentence(record: &mut FixRecord, frame: &str) -> bool {
    let fields: Vec<&str> = frame.split(',').collect();
    let header = fields[0];

    if header.contains("GGA") {
        apply_gga(record, &fields)
    } else if header.contains("RMC") {
        apply_rmc(record, &fields)
    } else {
        tracing::debug!("skipping unrecognized sentence: {}", header);
        false
    }
}

/// Fix-data sentence: time, position, satellite count, HDOP, altitude
fn apply_gga(record: &mut FixRecord, fields: &[&str]) -> bool {
    if fields.len() < GGA_MIN_FIELDS {
        tracing::debug!("short GGA frame ({} fields), ignoring", fields.len());
        return false;
    }

    record.time_utc = fields[1].to_string();
    record.latitude_deg = coordinate::decode(fields[2], fields[3]);
    record.longitude_deg = coordinate::decode(fields[4], fields[5]);
    record.satellites_used = parse_or_zero_u32(fields[7]);
    record.hdop = parse_or_zero_f64(fields[8]);
    record.altitude_m = parse_or_zero_f64(fields[9]);

    true
}

/// Minimum-navigation sentence: time, position, speed over ground
fn apply_rmc(record: &mut FixRecord, fields: &[&str]) -> bool {
    if fields.len() < RMC_MIN_FIELDS {
        tracing::debug!("short RMC frame ({} fields), ignoring", fields.len());
        return false;
    }

    record.time_utc = fields[1].to_string();
    record.latitude_deg = coordinate::decode(fields[3], fields[4]);
    record.longitude_deg = coordinate::decode(fields[5], fields[6]);
    record.speed_mps = parse_or_zero_f64(fields[7]) * KNOTS_TO_MPS;

    true
}

/// Numeric conversion failures never raise past the parser: substitute 0 and
/// continue with the remaining fields.
fn parse_or_zero_f64(field: &str) -> f64 {
    if field.is_empty() {
        return 0.0;
    }
    field.parse().unwrap_or_else(|_| {
        tracing::warn!("non-numeric field {:?}, substituting 0", field);
        0.0
    })
}

fn parse_or_zero_u32(field: &str) -> u32 {
    if field.is_empty() {
        return 0;
    }
    field.parse().unwrap_or_else(|_| {
        tracing::warn!("non-numeric field {:?}, substituting 0", field);
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    const RMC: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";

    #[test]
    fn gga_populates_fix_fields() {
        let mut record = FixRecord::default();
        assert!(apply_sentence(&mut record, GGA));

        assert_eq!(record.time_utc, "123519");
        assert!((record.latitude_deg - 48.1173).abs() < 1e-4);
        assert!((record.longitude_deg - 11.5167).abs() < 1e-4);
        assert_eq!(record.satellites_used, 8);
        assert!((record.hdop - 0.9).abs() < 1e-9);
        assert!((record.altitude_m - 545.4).abs() < 1e-9);
    }

    #[test]
    fn rmc_populates_navigation_fields() {
        let mut record = FixRecord::default();
        assert!(apply_sentence(&mut record, RMC));

        assert_eq!(record.time_utc, "123519");
        assert!((record.latitude_deg - 48.1173).abs() < 1e-4);
        assert!((record.longitude_deg - 11.5167).abs() < 1e-4);
        assert!((record.speed_mps - 22.4 * 0.514).abs() < 1e-6);
    }

    #[test]
    fn rmc_after_gga_merges_instead_of_resetting() {
        let mut record = FixRecord::default();
        assert!(apply_sentence(&mut record, GGA));
        assert!(apply_sentence(&mut record, RMC));

        // GGA-only fields survive the RMC update
        assert!((record.altitude_m - 545.4).abs() < 1e-9);
        assert_eq!(record.satellites_used, 8);
        assert!((record.hdop - 0.9).abs() < 1e-9);
        // and the RMC speed landed
        assert!((record.speed_mps - 11.5136).abs() < 1e-4);
    }

    #[test]
    fn short_frames_leave_record_untouched() {
        let mut record = FixRecord::default();
        assert!(apply_sentence(&mut record, GGA));
        let before = record.clone();

        assert!(!apply_sentence(&mut record, "$GPGGA,123519,4807.038,N"));
        assert!(!apply_sentence(&mut record, "$GPRMC,123519,A"));
        assert_eq!(record, before);
    }

    #[test]
    fn unrecognized_sentences_are_skipped() {
        let mut record = FixRecord::default();
        assert!(!apply_sentence(
            &mut record,
            "$GPGSV,2,1,08,01,40,083,46,02,17,308,41*75"
        ));
        assert!(!apply_sentence(&mut record, "$GPTXT,01,01,02,ANTSTATUS=OK*3B"));
        assert_eq!(record, FixRecord::default());
    }

    #[test]
    fn non_numeric_fields_become_zero() {
        let mut record = FixRecord::default();
        assert!(apply_sentence(
            &mut record,
            "$GPGGA,123519,garbage,N,01131.000,E,1,xx,0.9,545.4,M,46.9,M,,*47"
        ));

        assert_eq!(record.latitude_deg, 0.0);
        assert_eq!(record.satellites_used, 0);
        assert!((record.longitude_deg - 11.5167).abs() < 1e-4);
        assert!((record.altitude_m - 545.4).abs() < 1e-9);
    }

    #[test]
    fn csv_uses_fixed_precision() {
        let mut record = FixRecord::default();
        apply_sentence(&mut record, GGA);
        apply_sentence(&mut record, RMC);

        let line = record.to_csv();
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0], "123519");
        assert_eq!(fields[1], "48.117300");
        assert_eq!(fields[2], "11.516667");
        assert_eq!(fields[3], "11.51");
        assert_eq!(fields[4], "545.4");
        assert_eq!(fields[5], "8");
        assert_eq!(fields[6], "0.9");
    }
}
