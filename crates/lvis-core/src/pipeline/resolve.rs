use std::path::Path;

use crate::schema::{RecordFamily, SchemaVersion};

/// Family and version suggested by a release file name.
///
/// Release products are conventionally named like
/// `LVIS_US_2003_0412_R1.03.lgw` or `site.lge.1.02`; any `.`/`_`/`-`
/// separated token equal to a family code names the family, and the first
/// `1.0N` run not embedded in a longer number names the version.
///
/// # Examples
/// ```
/// use std::path::Path;
///
/// use lvis_core::{RecordFamily, SchemaVersion, hint_from_path};
///
/// let hint = hint_from_path(Path::new("/data/site.lge.1.02"));
/// assert_eq!(hint, (Some(RecordFamily::Canopy), Some(SchemaVersion::V1_02)));
/// ```
pub fn hint_from_path(path: &Path) -> (Option<RecordFamily>, Option<SchemaVersion>) {
    let Some(name) = path.file_name().map(|name| name.to_string_lossy().to_ascii_lowercase())
    else {
        return (None, None);
    };
    (family_token(&name), version_token(&name))
}

fn family_token(name: &str) -> Option<RecordFamily> {
    name.split(['.', '_', '-'])
        .find_map(|token| RecordFamily::ALL.into_iter().find(|family| family.code() == token))
}

fn version_token(name: &str) -> Option<SchemaVersion> {
    let bytes = name.as_bytes();
    name.match_indices("1.0").find_map(|(start, _)| {
        let end = start + 4;
        let minor = *bytes.get(start + 3)?;
        let preceded = start > 0 && bytes[start - 1].is_ascii_digit();
        let followed = bytes.get(end).is_some_and(u8::is_ascii_digit);
        if preceded || followed || !minor.is_ascii_digit() {
            return None;
        }
        name.get(start..end)?.parse().ok()
    })
}

/// Complete a partial override, filling the missing half from the file name
/// or the defaults (elevation, [`SchemaVersion::DEFAULT`]).
pub(crate) fn complete_override(
    path: &Path,
    family: Option<RecordFamily>,
    version: Option<SchemaVersion>,
) -> (RecordFamily, SchemaVersion) {
    let (hinted_family, hinted_version) = hint_from_path(path);
    (
        family.or(hinted_family).unwrap_or(RecordFamily::Elevation),
        version.or(hinted_version).unwrap_or(SchemaVersion::DEFAULT),
    )
}

#[cfg(test)]
mod tests {
    use super::{complete_override, hint_from_path};
    use crate::schema::{RecordFamily, SchemaVersion};
    use std::path::Path;

    #[test]
    fn reads_family_and_version_tokens() {
        assert_eq!(
            hint_from_path(Path::new("LVIS_US_2003_0412_R1.03.lgw")),
            (Some(RecordFamily::Waveform), Some(SchemaVersion::V1_03))
        );
        assert_eq!(
            hint_from_path(Path::new("dir.lgw/flight.LCE")),
            (Some(RecordFamily::Elevation), None)
        );
    }

    #[test]
    fn ignores_embedded_numbers() {
        assert_eq!(hint_from_path(Path::new("run21.05.lce")).1, None);
        assert_eq!(hint_from_path(Path::new("x.1.012.lce")).1, None);
        assert_eq!(hint_from_path(Path::new("x.1.07.lce")).1, None);
    }

    #[test]
    fn plain_names_have_no_hint() {
        assert_eq!(hint_from_path(Path::new("flight.bin")), (None, None));
        assert_eq!(hint_from_path(Path::new("lgwx.dat")), (None, None));
    }

    #[test]
    fn override_completes_from_name_then_defaults() {
        let path = Path::new("site.lge.1.01");
        assert_eq!(
            complete_override(path, Some(RecordFamily::Waveform), None),
            (RecordFamily::Waveform, SchemaVersion::V1_01)
        );
        assert_eq!(
            complete_override(Path::new("flight.bin"), None, Some(SchemaVersion::V1_00)),
            (RecordFamily::Elevation, SchemaVersion::V1_00)
        );
        assert_eq!(
            complete_override(Path::new("flight.bin"), Some(RecordFamily::Canopy), None),
            (RecordFamily::Canopy, SchemaVersion::V1_03)
        );
    }
}
