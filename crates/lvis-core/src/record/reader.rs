use std::ops::Range;

use super::error::DecodeError;
use crate::byte_order::Normalizer;
use crate::schema::FieldSpec;

/// Bounds-checked, order-normalizing reads over one record-sized block.
///
/// Offsets are relative to the start of the block, so the same reader type
/// serves the decoder (one block per record) and the detector (one slot of
/// the detection window per candidate).
pub struct RecordReader<'a> {
    block: &'a [u8],
    normalizer: Normalizer,
}

impl<'a> RecordReader<'a> {
    pub fn new(block: &'a [u8], normalizer: Normalizer) -> Self {
        Self { block, normalizer }
    }

    pub fn len(&self) -> usize {
        self.block.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], DecodeError> {
        self.block.get(range.clone()).ok_or(DecodeError::TooShort {
            needed: range.end,
            actual: self.block.len(),
        })
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_slice(offset..offset + N)?;
        let mut raw = [0u8; N];
        raw.copy_from_slice(bytes);
        Ok(raw)
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16, DecodeError> {
        Ok(self.normalizer.u16(self.read_array(offset)?))
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32, DecodeError> {
        Ok(self.normalizer.u32(self.read_array(offset)?))
    }

    pub fn read_f32(&self, offset: usize) -> Result<f32, DecodeError> {
        Ok(self.normalizer.f32(self.read_array(offset)?))
    }

    pub fn read_f64(&self, offset: usize) -> Result<f64, DecodeError> {
        Ok(self.normalizer.f64(self.read_array(offset)?))
    }

    /// Read a float or double field widened to `f64`.
    pub fn read_real(&self, field: &FieldSpec) -> Result<f64, DecodeError> {
        match field.width {
            4 => Ok(f64::from(self.read_f32(field.offset)?)),
            8 => self.read_f64(field.offset),
            width => Err(DecodeError::UnsupportedWidth {
                field: field.name,
                width,
            }),
        }
    }

    /// Read a sample array, normalizing each element at the field's width.
    pub fn read_samples(&self, field: &FieldSpec) -> Result<Vec<u16>, DecodeError> {
        let bytes = self.read_slice(field.range())?;
        if !field.is_swap_sensitive() {
            return Ok(bytes.iter().map(|&sample| u16::from(sample)).collect());
        }
        match field.width {
            2 => Ok(bytes
                .chunks_exact(2)
                .map(|pair| self.normalizer.u16([pair[0], pair[1]]))
                .collect()),
            width => Err(DecodeError::UnsupportedWidth {
                field: field.name,
                width,
            }),
        }
    }
}
