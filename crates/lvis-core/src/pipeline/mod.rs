//! Read-decode-filter-emit loop over one release file.
//!
//! The format is resolved once per input (explicit override, partial
//! override completed from the file name, or detection over the leading
//! window). The file is then read sequentially in fixed-size blocks; each
//! block is decoded, tested against the geofence, and handed to a
//! [`RecordSink`] together with its 1-based pre-filter index.

mod resolve;

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::byte_order::{ByteOrder, Normalizer};
use crate::detect::{DEFAULT_DETECTION_WINDOW, DetectError, Detection, detect_reader};
use crate::geofence::BoundingBox;
use crate::record::{DecodeError, DecodedRecord, decode_record};
use crate::schema::{RecordFamily, RecordLayout, SchemaError, SchemaVersion, layout_of};
use crate::source::{BlockSource, FileBlockSource, SourceError};

pub use resolve::hint_from_path;

/// Error type sinks may return to abort a run.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Options consumed by [`decode_file`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOptions {
    /// Forced family; detection is skipped when this or `version` is set.
    pub family: Option<RecordFamily>,
    /// Forced version.
    pub version: Option<SchemaVersion>,
    /// Host byte order override; the native order when `None`.
    pub host_order: Option<ByteOrder>,
    pub bounds: BoundingBox,
    /// Stop after this many records have been read; `None` or 0 reads all.
    pub max_records: Option<u64>,
    pub detection_window: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            family: None,
            version: None,
            host_order: None,
            bounds: BoundingBox::default(),
            max_records: None,
            detection_window: DEFAULT_DETECTION_WINDOW,
        }
    }
}

impl DecodeOptions {
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(
            ByteOrder::STORED,
            self.host_order.unwrap_or_else(ByteOrder::native),
        )
    }
}

/// One accepted record and its position in the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordEvent {
    /// 1-based index counting every record read, accepted or not.
    pub index: u64,
    pub record: DecodedRecord,
}

/// Consumer of accepted records.
pub trait RecordSink {
    /// Called once with the resolved layout, before any record.
    fn begin(&mut self, _layout: &'static RecordLayout) -> Result<(), SinkError> {
        Ok(())
    }

    fn accept(&mut self, event: RecordEvent) -> Result<(), SinkError>;
}

impl<F> RecordSink for F
where
    F: FnMut(RecordEvent) -> Result<(), SinkError>,
{
    fn accept(&mut self, event: RecordEvent) -> Result<(), SinkError> {
        self(event)
    }
}

impl RecordSink for Vec<RecordEvent> {
    fn accept(&mut self, event: RecordEvent) -> Result<(), SinkError> {
        self.push(event);
        Ok(())
    }
}

/// How the layout of a run was chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Resolution {
    /// Family and version were both given.
    Explicit,
    /// One half was given; the other came from the file name or defaults.
    Completed,
    Detected(Detection),
}

/// Totals of a decode run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeSummary {
    pub family: RecordFamily,
    pub version: SchemaVersion,
    pub record_len: usize,
    pub records_read: u64,
    pub records_emitted: u64,
    /// Bytes of a trailing partial record that ended the run; 0 when none.
    pub truncated_tail_bytes: usize,
    pub resolution: Resolution,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot read input {}: {source}", .path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("record sink failed: {0}")]
    Sink(SinkError),
}

impl PipelineError {
    fn unavailable(path: &Path, source: std::io::Error) -> Self {
        PipelineError::InputUnavailable {
            path: path.to_path_buf(),
            source,
        }
    }

    fn from_detect(path: &Path, err: DetectError) -> Self {
        match err {
            DetectError::Io(source) => PipelineError::unavailable(path, source),
            DetectError::Decode(err) => PipelineError::Decode(err),
        }
    }
}

fn open_input(path: &Path) -> Result<File, PipelineError> {
    File::open(path).map_err(|source| PipelineError::unavailable(path, source))
}

/// Run format detection over the leading window of a file.
///
/// # Errors
/// Returns `PipelineError::InputUnavailable` when the file cannot be opened
/// or read.
pub fn detect_file(path: &Path, options: &DecodeOptions) -> Result<Detection, PipelineError> {
    let mut file = open_input(path)?;
    detect_reader(&mut file, options.detection_window, options.normalizer())
        .map_err(|err| PipelineError::from_detect(path, err))
}

fn resolve_layout(
    path: &Path,
    file: &mut File,
    options: &DecodeOptions,
) -> Result<(&'static RecordLayout, Resolution), PipelineError> {
    match (options.family, options.version) {
        (Some(family), Some(version)) => Ok((layout_of(family, version)?, Resolution::Explicit)),
        (None, None) => {
            let detection =
                detect_reader(&mut *file, options.detection_window, options.normalizer())
                    .map_err(|err| PipelineError::from_detect(path, err))?;
            let layout = layout_of(detection.family, detection.version)?;
            Ok((layout, Resolution::Detected(detection)))
        }
        (family, version) => {
            let (family, version) = resolve::complete_override(path, family, version);
            debug!(%family, %version, "partial override completed");
            Ok((layout_of(family, version)?, Resolution::Completed))
        }
    }
}

/// Decode every block of a release file and emit the accepted records.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
///
/// use lvis_core::{DecodeOptions, RecordEvent, decode_file};
///
/// let mut events: Vec<RecordEvent> = Vec::new();
/// let summary = decode_file(Path::new("flight.lce"), &DecodeOptions::default(), &mut events)?;
/// println!("{} of {} records accepted", summary.records_emitted, summary.records_read);
/// # Ok::<(), lvis_core::PipelineError>(())
/// ```
///
/// # Errors
/// Returns `PipelineError::InputUnavailable` when the file cannot be opened,
/// `PipelineError::Schema` for an uncataloged override and
/// `PipelineError::Sink` when the sink rejects a record. A trailing partial
/// record is not an error.
pub fn decode_file<S>(
    path: &Path,
    options: &DecodeOptions,
    sink: &mut S,
) -> Result<DecodeSummary, PipelineError>
where
    S: RecordSink + ?Sized,
{
    let mut file = open_input(path)?;
    let (layout, resolution) = resolve_layout(path, &mut file, options)?;
    debug!(
        family = %layout.family,
        version = %layout.version,
        record_len = layout.len,
        "decoding {}",
        path.display()
    );
    let mut source = FileBlockSource::from_file(file, layout.len)?;
    let mut summary = decode_source(&mut source, layout, options, sink)?;
    summary.resolution = resolution;
    Ok(summary)
}

/// Decode blocks from any source with a known layout.
pub fn decode_source<B, S>(
    source: &mut B,
    layout: &'static RecordLayout,
    options: &DecodeOptions,
    sink: &mut S,
) -> Result<DecodeSummary, PipelineError>
where
    B: BlockSource + ?Sized,
    S: RecordSink + ?Sized,
{
    let normalizer = options.normalizer();
    let limit = options.max_records.filter(|&max| max > 0);
    let mut records_read = 0u64;
    let mut records_emitted = 0u64;
    sink.begin(layout).map_err(PipelineError::Sink)?;

    while limit.is_none_or(|max| records_read < max) {
        let Some(block) = source.next_block()? else {
            break;
        };
        records_read += 1;
        let record = decode_record(block, layout, normalizer)?;
        if !options.bounds.accepts(&record) {
            continue;
        }
        sink.accept(RecordEvent {
            index: records_read,
            record,
        })
        .map_err(PipelineError::Sink)?;
        records_emitted += 1;
    }

    let truncated_tail_bytes = source.truncated_tail();
    if truncated_tail_bytes > 0 {
        warn!(
            records_read,
            truncated_tail_bytes,
            record_len = layout.len,
            "input ends with a partial record; stopping"
        );
    }

    Ok(DecodeSummary {
        family: layout.family,
        version: layout.version,
        record_len: layout.len,
        records_read,
        records_emitted,
        truncated_tail_bytes,
        resolution: Resolution::Explicit,
    })
}
