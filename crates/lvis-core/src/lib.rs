//! LVIS core library for decoding laser altimetry release files.
//!
//! This crate implements the decoding pipeline used by the CLI: a schema
//! catalog describes every (family, version) record layout, the format
//! detector picks one for untagged files, and the record decoder turns
//! fixed-size big-endian blocks into host-order field sets that pass through
//! a geofence before reaching a sink. Byte access is bounds-checked and
//! side-effect free; all I/O is isolated in `source` and `pipeline`.
//!
//! Invariants:
//! - Every layout's length equals the sum of its field widths.
//! - Records are emitted in file order with 1-based pre-filter indexes.
//! - A trailing partial record ends a run without an error.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use lvis_core::{BoundingBox, DecodeOptions, RecordEvent, decode_file};
//!
//! let options = DecodeOptions {
//!     bounds: BoundingBox::default().with_lat(44.0, 45.0),
//!     ..DecodeOptions::default()
//! };
//! let mut events: Vec<RecordEvent> = Vec::new();
//! let summary = decode_file(Path::new("flight.lge"), &options, &mut events)?;
//! println!("{} {} records: {}", summary.family, summary.version, events.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod byte_order;
mod detect;
mod geofence;
mod pipeline;
mod record;
mod schema;
mod source;

pub use byte_order::{ByteOrder, Normalizer, ParseByteOrderError};
pub use detect::{
    CandidateScore, DEFAULT_DETECTION_WINDOW, DetectError, Detection, detect_bytes, detect_reader,
};
pub use geofence::{BoundingBox, UNRESTRICTED_MAX, UNRESTRICTED_MIN};
pub use pipeline::{
    DecodeOptions, DecodeSummary, PipelineError, RecordEvent, RecordSink, Resolution, SinkError,
    decode_file, decode_source, detect_file, hint_from_path,
};
pub use record::{DecodeError, DecodedRecord, FieldValue, RecordReader, decode_record};
pub use schema::{
    FieldKind, FieldSpec, GeoFields, GeoRoles, RecordFamily, RecordLayout, SchemaError,
    SchemaVersion, catalog, layout_named, layout_of, max_record_len,
};
pub use source::{BlockReader, BlockSource, FileBlockSource, SourceError};
