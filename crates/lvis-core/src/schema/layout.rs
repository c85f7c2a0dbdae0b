//! Field tables for every cataloged record layout (source of truth).
//!
//! Fields are listed in on-disk order; offsets are derived from the running
//! sum of widths when the catalog is built. All records are packed.

use super::{FieldKind, GeoRoles, RecordFamily, SchemaVersion};

#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub width: usize,
    pub count: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LayoutDef {
    pub family: RecordFamily,
    pub version: SchemaVersion,
    pub fields: &'static [FieldDef],
    pub detection: GeoRoles,
    pub governing: GeoRoles,
}

const fn uint(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        kind: FieldKind::UnsignedInt,
        width: 4,
        count: 1,
    }
}

const fn float(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        kind: FieldKind::Float,
        width: 4,
        count: 1,
    }
}

const fn double(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        kind: FieldKind::Double,
        width: 8,
        count: 1,
    }
}

const fn samples(name: &'static str, width: usize, count: usize) -> FieldDef {
    FieldDef {
        name,
        kind: FieldKind::Samples,
        width,
        count,
    }
}

const RX_SAMPLES_V1_00: usize = 432;
const TX_SAMPLES_V1_03: usize = 80;
const TX_SAMPLES_V1_04: usize = 128;
const RX_SAMPLES_V1_04: usize = 528;

const LCE_V1_00: &[FieldDef] = &[double("tlon"), double("tlat"), float("zt")];

const LCE_V1_01: &[FieldDef] = &[
    uint("lfid"),
    uint("shotnumber"),
    double("tlon"),
    double("tlat"),
    float("zt"),
];

const LCE_V1_02: &[FieldDef] = &[
    uint("lfid"),
    uint("shotnumber"),
    double("lvistime"),
    double("tlon"),
    double("tlat"),
    float("zt"),
];

const LCE_V1_03: &[FieldDef] = &[
    uint("lfid"),
    uint("shotnumber"),
    float("azimuth"),
    float("incidentangle"),
    float("range"),
    double("lvistime"),
    double("tlon"),
    double("tlat"),
    float("zt"),
];

const LGE_V1_00: &[FieldDef] = &[
    double("glon"),
    double("glat"),
    float("zg"),
    float("rh25"),
    float("rh50"),
    float("rh75"),
    float("rh100"),
];

const LGE_V1_01: &[FieldDef] = &[
    uint("lfid"),
    uint("shotnumber"),
    double("glon"),
    double("glat"),
    float("zg"),
    float("rh25"),
    float("rh50"),
    float("rh75"),
    float("rh100"),
];

const LGE_V1_02: &[FieldDef] = &[
    uint("lfid"),
    uint("shotnumber"),
    double("lvistime"),
    double("glon"),
    double("glat"),
    float("zg"),
    float("rh25"),
    float("rh50"),
    float("rh75"),
    float("rh100"),
];

const LGE_V1_03: &[FieldDef] = &[
    uint("lfid"),
    uint("shotnumber"),
    float("azimuth"),
    float("incidentangle"),
    float("range"),
    double("lvistime"),
    double("glon"),
    double("glat"),
    float("zg"),
    float("rh25"),
    float("rh50"),
    float("rh75"),
    float("rh100"),
];

const LGW_V1_00: &[FieldDef] = &[
    double("lon0"),
    double("lat0"),
    float("z0"),
    double("lon431"),
    double("lat431"),
    float("z431"),
    float("sigmean"),
    samples("rxwave", 1, RX_SAMPLES_V1_00),
];

const LGW_V1_01: &[FieldDef] = &[
    uint("lfid"),
    uint("shotnumber"),
    double("lon0"),
    double("lat0"),
    float("z0"),
    double("lon431"),
    double("lat431"),
    float("z431"),
    float("sigmean"),
    samples("rxwave", 1, RX_SAMPLES_V1_00),
];

const LGW_V1_02: &[FieldDef] = &[
    uint("lfid"),
    uint("shotnumber"),
    double("lvistime"),
    double("lon0"),
    double("lat0"),
    float("z0"),
    double("lon431"),
    double("lat431"),
    float("z431"),
    float("sigmean"),
    samples("rxwave", 1, RX_SAMPLES_V1_00),
];

const LGW_V1_03: &[FieldDef] = &[
    uint("lfid"),
    uint("shotnumber"),
    float("azimuth"),
    float("incidentangle"),
    float("range"),
    double("lvistime"),
    double("lon0"),
    double("lat0"),
    float("z0"),
    double("lon431"),
    double("lat431"),
    float("z431"),
    float("sigmean"),
    samples("txwave", 1, TX_SAMPLES_V1_03),
    samples("rxwave", 1, RX_SAMPLES_V1_00),
];

const LGW_V1_04: &[FieldDef] = &[
    uint("lfid"),
    uint("shotnumber"),
    float("azimuth"),
    float("incidentangle"),
    float("range"),
    double("lvistime"),
    double("lon0"),
    double("lat0"),
    float("z0"),
    double("lon527"),
    double("lat527"),
    float("z527"),
    float("sigmean"),
    samples("txwave", 2, TX_SAMPLES_V1_04),
    samples("rxwave", 2, RX_SAMPLES_V1_04),
];

const LCE_POINT: GeoRoles = GeoRoles {
    lat: "tlat",
    lon: "tlon",
    elevation: "zt",
};

const LGE_POINT: GeoRoles = GeoRoles {
    lat: "glat",
    lon: "glon",
    elevation: "zg",
};

const LGW_FIRST_SAMPLE: GeoRoles = GeoRoles {
    lat: "lat0",
    lon: "lon0",
    elevation: "z0",
};

const LGW_REFERENCE_431: GeoRoles = GeoRoles {
    lat: "lat431",
    lon: "lon431",
    elevation: "z431",
};

const LGW_REFERENCE_527: GeoRoles = GeoRoles {
    lat: "lat527",
    lon: "lon527",
    elevation: "z527",
};

const fn lce(version: SchemaVersion, fields: &'static [FieldDef]) -> LayoutDef {
    LayoutDef {
        family: RecordFamily::Elevation,
        version,
        fields,
        detection: LCE_POINT,
        governing: LCE_POINT,
    }
}

const fn lge(version: SchemaVersion, fields: &'static [FieldDef]) -> LayoutDef {
    LayoutDef {
        family: RecordFamily::Canopy,
        version,
        fields,
        detection: LGE_POINT,
        governing: LGE_POINT,
    }
}

const fn lgw(
    version: SchemaVersion,
    fields: &'static [FieldDef],
    reference: GeoRoles,
) -> LayoutDef {
    LayoutDef {
        family: RecordFamily::Waveform,
        version,
        fields,
        detection: LGW_FIRST_SAMPLE,
        governing: reference,
    }
}

/// Catalog order: family-major, then version. Detection tie-breaks rely on it.
pub(crate) const CATALOG: [LayoutDef; 15] = [
    lce(SchemaVersion::V1_00, LCE_V1_00),
    lce(SchemaVersion::V1_01, LCE_V1_01),
    lce(SchemaVersion::V1_02, LCE_V1_02),
    lce(SchemaVersion::V1_03, LCE_V1_03),
    lce(SchemaVersion::V1_04, LCE_V1_03),
    lge(SchemaVersion::V1_00, LGE_V1_00),
    lge(SchemaVersion::V1_01, LGE_V1_01),
    lge(SchemaVersion::V1_02, LGE_V1_02),
    lge(SchemaVersion::V1_03, LGE_V1_03),
    lge(SchemaVersion::V1_04, LGE_V1_03),
    lgw(SchemaVersion::V1_00, LGW_V1_00, LGW_REFERENCE_431),
    lgw(SchemaVersion::V1_01, LGW_V1_01, LGW_REFERENCE_431),
    lgw(SchemaVersion::V1_02, LGW_V1_02, LGW_REFERENCE_431),
    lgw(SchemaVersion::V1_03, LGW_V1_03, LGW_REFERENCE_431),
    lgw(SchemaVersion::V1_04, LGW_V1_04, LGW_REFERENCE_527),
];
