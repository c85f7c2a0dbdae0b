//! Schema catalog for LVIS release records.
//!
//! Three record families (LCE elevation, LGE canopy, LGW waveform) were
//! published in five dated releases, 1.00 through 1.04. Each (family,
//! version) pair has one packed layout; the catalog holds all fifteen,
//! built once from the field tables in `layout` and never mutated.
//!
//! Newer releases only add fields. The waveform family also moves its
//! reference elevation sample (`lat431`/`lon431`/`z431` before 1.04,
//! `lat527`/`lon527`/`z527` at 1.04), so the geolocation roles are part of
//! each layout instead of fixed names.

pub mod error;
mod layout;

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Serialize;

pub use error::SchemaError;

/// Record family, fixed for the lifetime of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RecordFamily {
    /// Canopy-top elevation only (`.lce`).
    #[serde(rename = "lce")]
    Elevation,
    /// Ground elevation plus canopy height metrics (`.lge`).
    #[serde(rename = "lge")]
    Canopy,
    /// Geolocated waveforms (`.lgw`).
    #[serde(rename = "lgw")]
    Waveform,
}

impl RecordFamily {
    pub const ALL: [RecordFamily; 3] = [
        RecordFamily::Elevation,
        RecordFamily::Canopy,
        RecordFamily::Waveform,
    ];

    /// Short code, also the conventional file extension.
    pub fn code(&self) -> &'static str {
        match self {
            RecordFamily::Elevation => "lce",
            RecordFamily::Canopy => "lge",
            RecordFamily::Waveform => "lgw",
        }
    }
}

impl fmt::Display for RecordFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RecordFamily {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('.').to_ascii_lowercase();
        RecordFamily::ALL
            .into_iter()
            .find(|family| family.code() == name)
            .ok_or(SchemaError::UnknownFamily {
                name: s.to_string(),
            })
    }
}

/// Release version, ordered by introduction date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SchemaVersion {
    #[serde(rename = "1.00")]
    V1_00,
    #[serde(rename = "1.01")]
    V1_01,
    #[serde(rename = "1.02")]
    V1_02,
    #[serde(rename = "1.03")]
    V1_03,
    #[serde(rename = "1.04")]
    V1_04,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 5] = [
        SchemaVersion::V1_00,
        SchemaVersion::V1_01,
        SchemaVersion::V1_02,
        SchemaVersion::V1_03,
        SchemaVersion::V1_04,
    ];

    /// Version assumed when a family is forced without a version.
    pub const DEFAULT: SchemaVersion = SchemaVersion::V1_03;

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1_00 => "1.00",
            SchemaVersion::V1_01 => "1.01",
            SchemaVersion::V1_02 => "1.02",
            SchemaVersion::V1_03 => "1.03",
            SchemaVersion::V1_04 => "1.04",
        }
    }

    fn hundredths(&self) -> i64 {
        match self {
            SchemaVersion::V1_00 => 100,
            SchemaVersion::V1_01 => 101,
            SchemaVersion::V1_02 => 102,
            SchemaVersion::V1_03 => 103,
            SchemaVersion::V1_04 => 104,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaError;

    /// Accepts any decimal spelling of a cataloged release (`1.03`, `1.030`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || SchemaError::UnknownVersion {
            name: s.to_string(),
        };
        let value: f64 = s.trim().parse().map_err(|_| unknown())?;
        if !value.is_finite() {
            return Err(unknown());
        }
        let hundredths = (value * 100.0).round();
        if (value * 100.0 - hundredths).abs() > 1e-6 {
            return Err(unknown());
        }
        SchemaVersion::ALL
            .into_iter()
            .find(|version| version.hundredths() as f64 == hundredths)
            .ok_or_else(unknown)
    }
}

/// Numeric interpretation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// 4-byte unsigned integer.
    UnsignedInt,
    /// 4-byte IEEE float.
    Float,
    /// 8-byte IEEE double.
    Double,
    /// Fixed-length array of unsigned samples, `width` bytes each.
    Samples,
}

/// One field of a packed record.
///
/// `width` is the width of one element; scalars have `count == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
    pub count: usize,
}

impl FieldSpec {
    /// Total bytes occupied by the field.
    pub fn byte_len(&self) -> usize {
        self.width * self.count
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.byte_len()
    }

    /// True when the stored value depends on byte order.
    pub fn is_swap_sensitive(&self) -> bool {
        self.width > 1
    }
}

/// Field names filling a geolocation role (latitude, longitude, elevation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeoRoles {
    pub lat: &'static str,
    pub lon: &'static str,
    pub elevation: &'static str,
}

/// Resolved fields for a [`GeoRoles`] entry.
#[derive(Debug, Clone, Copy)]
pub struct GeoFields<'a> {
    pub lat: &'a FieldSpec,
    pub lon: &'a FieldSpec,
    pub elevation: &'a FieldSpec,
}

/// Packed layout of one (family, version) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordLayout {
    pub family: RecordFamily,
    pub version: SchemaVersion,
    /// Record length in bytes: the unit of sequential reads.
    pub len: usize,
    pub fields: Vec<FieldSpec>,
    /// Fields scored by format detection.
    pub detection: GeoRoles,
    /// Fields the geofence applies to.
    pub governing: GeoRoles,
}

impl RecordLayout {
    fn from_def(def: &layout::LayoutDef) -> Self {
        let mut offset = 0;
        let fields = def
            .fields
            .iter()
            .map(|field| {
                let spec = FieldSpec {
                    name: field.name,
                    offset,
                    width: field.width,
                    kind: field.kind,
                    count: field.count,
                };
                offset += spec.byte_len();
                spec
            })
            .collect();
        Self {
            family: def.family,
            version: def.version,
            len: offset,
            fields,
            detection: def.detection,
            governing: def.governing,
        }
    }

    pub fn field(&self, name: &'static str) -> Result<&FieldSpec, SchemaError> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or(SchemaError::MissingField {
                family: self.family.to_string(),
                version: self.version.to_string(),
                field: name,
            })
    }

    pub fn resolve(&self, roles: &GeoRoles) -> Result<GeoFields<'_>, SchemaError> {
        Ok(GeoFields {
            lat: self.field(roles.lat)?,
            lon: self.field(roles.lon)?,
            elevation: self.field(roles.elevation)?,
        })
    }

    pub fn detection_fields(&self) -> Result<GeoFields<'_>, SchemaError> {
        self.resolve(&self.detection)
    }

    pub fn governing_fields(&self) -> Result<GeoFields<'_>, SchemaError> {
        self.resolve(&self.governing)
    }
}

/// All cataloged layouts, family-major then version order.
pub fn catalog() -> &'static [RecordLayout] {
    static CATALOG: OnceLock<Vec<RecordLayout>> = OnceLock::new();
    CATALOG.get_or_init(|| layout::CATALOG.iter().map(RecordLayout::from_def).collect())
}

/// Look up the layout of a (family, version) pair.
///
/// # Examples
/// ```
/// use lvis_core::{RecordFamily, SchemaVersion, layout_of};
///
/// let layout = layout_of(RecordFamily::Waveform, SchemaVersion::V1_04)?;
/// assert_eq!(layout.len, 1384);
/// # Ok::<(), lvis_core::SchemaError>(())
/// ```
///
/// # Errors
/// Returns `SchemaError::UnknownSchema` when the pair is not cataloged.
pub fn layout_of(
    family: RecordFamily,
    version: SchemaVersion,
) -> Result<&'static RecordLayout, SchemaError> {
    catalog()
        .iter()
        .find(|layout| layout.family == family && layout.version == version)
        .ok_or(SchemaError::UnknownSchema {
            family: family.to_string(),
            version: version.to_string(),
        })
}

/// Parse a textual (family, version) pair and look up its layout.
pub fn layout_named(family: &str, version: &str) -> Result<&'static RecordLayout, SchemaError> {
    let family = family.parse::<RecordFamily>()?;
    let version = version.parse::<SchemaVersion>()?;
    layout_of(family, version)
}

/// Largest record length across the catalog.
pub fn max_record_len() -> usize {
    catalog().iter().map(|layout| layout.len).max().unwrap_or(0)
}
