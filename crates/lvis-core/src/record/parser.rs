use super::error::DecodeError;
use super::reader::RecordReader;
use super::{DecodedRecord, FieldValue};
use crate::byte_order::Normalizer;
use crate::schema::{FieldKind, RecordLayout};

/// Decode one fixed-size block into a host-order record.
///
/// The block must be exactly `layout.len` bytes; a short read is end of
/// stream and never reaches the decoder. Values are not range-checked.
///
/// # Examples
/// ```
/// use lvis_core::{Normalizer, RecordFamily, SchemaVersion, decode_record, layout_of};
///
/// let layout = layout_of(RecordFamily::Elevation, SchemaVersion::V1_00)?;
/// let mut block = Vec::new();
/// block.extend_from_slice(&290.5f64.to_be_bytes());
/// block.extend_from_slice(&44.75f64.to_be_bytes());
/// block.extend_from_slice(&120.0f32.to_be_bytes());
///
/// let record = decode_record(&block, layout, Normalizer::default())?;
/// assert_eq!(record.real("tlat"), Some(44.75));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
/// Returns `DecodeError::LengthMismatch` when the block length differs from
/// the layout length.
pub fn decode_record(
    block: &[u8],
    layout: &'static RecordLayout,
    normalizer: Normalizer,
) -> Result<DecodedRecord, DecodeError> {
    if block.len() != layout.len {
        return Err(DecodeError::LengthMismatch {
            expected: layout.len,
            actual: block.len(),
        });
    }

    let reader = RecordReader::new(block, normalizer);
    let mut values = Vec::with_capacity(layout.fields.len());
    for field in &layout.fields {
        let value = match field.kind {
            FieldKind::UnsignedInt => FieldValue::UnsignedInt(reader.read_u32(field.offset)?),
            FieldKind::Float => FieldValue::Float(reader.read_f32(field.offset)?),
            FieldKind::Double => FieldValue::Double(reader.read_f64(field.offset)?),
            FieldKind::Samples => FieldValue::Samples(reader.read_samples(field)?),
        };
        values.push(value);
    }

    Ok(DecodedRecord::new(layout, values))
}
