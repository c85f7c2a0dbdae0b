//! Latitude/longitude bounding-box filter.
//!
//! Both axes are open intervals: a record lying exactly on a bound is
//! rejected. The default box spans -400..400 on both axes, which admits every
//! real coordinate (longitudes are stored 0..360).

use serde::Serialize;

use crate::record::DecodedRecord;

pub const UNRESTRICTED_MIN: f64 = -400.0;
pub const UNRESTRICTED_MAX: f64 = 400.0;

/// Bounding box in decimal degrees.
///
/// # Examples
/// ```
/// use lvis_core::BoundingBox;
///
/// let bounds = BoundingBox::default().with_lat(44.74, 44.76);
/// assert!(bounds.contains(44.75, 290.5));
/// assert!(!bounds.contains(44.76, 290.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min_lat: UNRESTRICTED_MIN,
            max_lat: UNRESTRICTED_MAX,
            min_lon: UNRESTRICTED_MIN,
            max_lon: UNRESTRICTED_MAX,
        }
    }
}

impl BoundingBox {
    pub fn with_lat(mut self, min: f64, max: f64) -> Self {
        self.min_lat = min;
        self.max_lat = max;
        self
    }

    pub fn with_lon(mut self, min: f64, max: f64) -> Self {
        self.min_lon = min;
        self.max_lon = max;
        self
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat > self.min_lat && lat < self.max_lat && lon > self.min_lon && lon < self.max_lon
    }

    /// Test a record's governing latitude/longitude against the box.
    pub fn accepts(&self, record: &DecodedRecord) -> bool {
        record
            .governing_position()
            .is_some_and(|(lat, lon)| self.contains(lat, lon))
    }
}
