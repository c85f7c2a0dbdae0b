//! Release format detection.
//!
//! Release files carry no type or version tag. Detection reads a bounded
//! prefix of the file and test-decodes it against every cataloged layout:
//! a misaligned layout lands its latitude, longitude and elevation fields on
//! arbitrary bytes, which overwhelmingly decode to huge magnitudes or NaN.
//! The candidate with the smallest finite sum of absolute values wins.
//!
//! Every candidate scores the same number of slots, `window / max record
//! length`; candidate slot `i` starts at `i * candidate length`. This is a
//! heuristic: short files (fewer slots) and layouts sharing geolocation
//! offsets can tie, in which case catalog order decides.

use std::io::Read;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::byte_order::Normalizer;
use crate::record::{DecodeError, RecordReader};
use crate::schema::{RecordFamily, RecordLayout, SchemaVersion, catalog, max_record_len};

/// Bytes read from the start of a file for detection.
pub const DEFAULT_DETECTION_WINDOW: usize = 128 * 1024;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to read detection window: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Accumulated plausibility score of one candidate layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub family: RecordFamily,
    pub version: SchemaVersion,
    /// Sum of absolute lat/lon/elevation values; `None` when NaN.
    pub total: Option<f64>,
}

/// Outcome of format detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub family: RecordFamily,
    pub version: SchemaVersion,
    /// Bytes available in the detection window.
    pub window_bytes: usize,
    /// Test records scored per candidate.
    pub slots: usize,
    /// True when nothing could be scored and the default was chosen.
    pub fallback: bool,
    /// Scores in catalog order.
    pub candidates: Vec<CandidateScore>,
}

/// Detect the format of an in-memory detection window.
///
/// # Examples
/// ```
/// use lvis_core::{Normalizer, RecordFamily, SchemaVersion, detect_bytes};
///
/// let detection = detect_bytes(&[], Normalizer::default())?;
/// assert!(detection.fallback);
/// assert_eq!(detection.family, RecordFamily::Elevation);
/// assert_eq!(detection.version, SchemaVersion::V1_00);
/// # Ok::<(), lvis_core::DecodeError>(())
/// ```
pub fn detect_bytes(window: &[u8], normalizer: Normalizer) -> Result<Detection, DecodeError> {
    let max_len = max_record_len();
    let slots = if max_len == 0 { 0 } else { window.len() / max_len };

    let layouts = catalog();
    let mut candidates = Vec::with_capacity(layouts.len());
    for layout in layouts {
        let total = score_candidate(window, layout, slots, normalizer)?;
        debug!(
            family = %layout.family,
            version = %layout.version,
            total,
            "detection candidate scored"
        );
        candidates.push(CandidateScore {
            family: layout.family,
            version: layout.version,
            total: (!total.is_nan()).then_some(total),
        });
    }

    let best = select_minimum(&candidates);
    let fallback = slots == 0 || best.is_none();
    let chosen = best.unwrap_or(0);
    let (family, version) = layouts
        .get(chosen)
        .map(|layout| (layout.family, layout.version))
        .unwrap_or((RecordFamily::Elevation, SchemaVersion::V1_00));

    if fallback {
        warn!(
            window_bytes = window.len(),
            slots,
            "format detection inconclusive, defaulting to {family} {version}"
        );
    } else {
        debug!(%family, %version, slots, "format detected");
    }

    Ok(Detection {
        family,
        version,
        window_bytes: window.len(),
        slots,
        fallback,
        candidates,
    })
}

/// Read up to `window` bytes from `reader` and detect the format.
pub fn detect_reader<R: Read>(
    reader: R,
    window: usize,
    normalizer: Normalizer,
) -> Result<Detection, DetectError> {
    let mut buffer = Vec::with_capacity(window.min(DEFAULT_DETECTION_WINDOW));
    reader.take(window as u64).read_to_end(&mut buffer)?;
    Ok(detect_bytes(&buffer, normalizer)?)
}

fn score_candidate(
    window: &[u8],
    layout: &RecordLayout,
    slots: usize,
    normalizer: Normalizer,
) -> Result<f64, DecodeError> {
    let fields = layout.detection_fields()?;
    let mut lat_total = 0.0;
    let mut lon_total = 0.0;
    let mut elevation_total = 0.0;

    for slot in 0..slots {
        let start = slot * layout.len;
        let block = window
            .get(start..start + layout.len)
            .ok_or(DecodeError::TooShort {
                needed: start + layout.len,
                actual: window.len(),
            })?;
        let reader = RecordReader::new(block, normalizer);
        lat_total += reader.read_real(fields.lat)?.abs();
        lon_total += reader.read_real(fields.lon)?.abs();
        elevation_total += reader.read_real(fields.elevation)?.abs();
    }

    Ok(lat_total + lon_total + elevation_total)
}

/// Index of the smallest finite total; the earliest candidate keeps a tie.
fn select_minimum(candidates: &[CandidateScore]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let Some(total) = candidate.total else {
            continue;
        };
        match best {
            Some((_, min)) if total >= min => {}
            _ => best = Some((index, total)),
        }
    }
    best.map(|(index, _)| index)
}
