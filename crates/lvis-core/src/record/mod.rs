//! Record decoding.
//!
//! The decoder is written once against [`RecordLayout`]: every field of the
//! layout is sliced at its offset, normalized to host order at its width, and
//! stored in declaration order. Sample arrays are normalized per element
//! (1-byte samples pass through unchanged).
//!
//! Decoded records are produced fresh per block and owned by the caller; no
//! buffer is shared between records.

pub mod error;
pub mod parser;
pub mod reader;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::schema::{FieldSpec, RecordFamily, RecordLayout, SchemaVersion};

pub use error::DecodeError;
pub use parser::decode_record;
pub use reader::RecordReader;

/// Host-order value of one decoded field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    UnsignedInt(u32),
    Float(f32),
    Double(f64),
    Samples(Vec<u16>),
}

impl FieldValue {
    /// Scalar value widened to `f64`; `None` for sample arrays.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::UnsignedInt(value) => Some(f64::from(*value)),
            FieldValue::Float(value) => Some(f64::from(*value)),
            FieldValue::Double(value) => Some(*value),
            FieldValue::Samples(_) => None,
        }
    }
}

/// One decoded record: field values in layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    layout: &'static RecordLayout,
    values: Vec<FieldValue>,
}

impl DecodedRecord {
    pub(crate) fn new(layout: &'static RecordLayout, values: Vec<FieldValue>) -> Self {
        Self { layout, values }
    }

    pub fn layout(&self) -> &'static RecordLayout {
        self.layout
    }

    pub fn family(&self) -> RecordFamily {
        self.layout.family
    }

    pub fn version(&self) -> SchemaVersion {
        self.layout.version
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        self.fields().map(|(field, value)| (field.name, value))
    }

    /// Field definitions paired with their decoded values.
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldSpec, &FieldValue)> + '_ {
        self.layout.fields.iter().zip(self.values.iter())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn real(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    /// Latitude and longitude of the layout's governing geolocation fields.
    ///
    /// For waveforms this is the reference elevation sample, not the first
    /// sample point.
    pub fn governing_position(&self) -> Option<(f64, f64)> {
        let roles = &self.layout.governing;
        Some((self.real(roles.lat)?, self.real(roles.lon)?))
    }
}

impl Serialize for DecodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
