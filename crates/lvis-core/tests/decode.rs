mod common;

use std::path::Path;

use lvis_core::{
    BoundingBox, ByteOrder, DecodeOptions, DecodedRecord, FieldValue, Normalizer, PipelineError,
    RecordEvent, RecordFamily, Resolution, SchemaError, SchemaVersion, decode_file, decode_record,
    layout_named, layout_of,
};

use common::{elevation, lat, lon, release_bytes, sample, write_release};

fn explicit(family: RecordFamily, version: SchemaVersion) -> DecodeOptions {
    DecodeOptions {
        family: Some(family),
        version: Some(version),
        ..DecodeOptions::default()
    }
}

fn run(path: &Path, options: &DecodeOptions) -> (lvis_core::DecodeSummary, Vec<RecordEvent>) {
    let mut events: Vec<RecordEvent> = Vec::new();
    let summary = decode_file(path, options, &mut events).unwrap();
    (summary, events)
}

fn samples<'a>(event: &'a RecordEvent, name: &str) -> &'a [u16] {
    match event.record.get(name) {
        Some(FieldValue::Samples(samples)) => samples.as_slice(),
        other => panic!("unexpected {name}: {other:?}"),
    }
}

#[test]
fn decodes_elevation_fields_in_host_order() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Elevation, SchemaVersion::V1_03, 5);
    let path = write_release(dir.path(), "flight.lce", &data);

    let (summary, events) = run(&path, &explicit(RecordFamily::Elevation, SchemaVersion::V1_03));
    assert_eq!(summary.resolution, Resolution::Explicit);
    assert_eq!(summary.record_len, 48);
    assert_eq!(events.len(), 5);

    let third = &events[2].record;
    assert_eq!(events[2].index, 3);
    assert_eq!(third.real("tlon"), Some(lon(2)));
    assert_eq!(third.real("tlat"), Some(lat(2)));
    assert_eq!(third.get("zt"), Some(&FieldValue::Float(elevation(2) as f32)));
    assert_eq!(third.get("lfid"), Some(&FieldValue::UnsignedInt(1_500_000_000)));
    assert_eq!(third.real("lvistime"), Some(40000.5 + 2.0 * 0.001));
}

#[test]
fn trailing_partial_record_stops_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = release_bytes(RecordFamily::Elevation, SchemaVersion::V1_03, 25);
    data.truncate(data.len() - 5);
    let path = write_release(dir.path(), "cut.lce", &data);

    let (summary, events) = run(&path, &explicit(RecordFamily::Elevation, SchemaVersion::V1_03));
    assert_eq!(summary.records_read, (data.len() / 48) as u64);
    assert_eq!(summary.records_read, 24);
    assert_eq!(summary.truncated_tail_bytes, 43);
    assert_eq!(events.len(), 24);
}

#[test]
fn limit_stops_after_k_records() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Canopy, SchemaVersion::V1_01, 50);
    let path = write_release(dir.path(), "flight.lge", &data);

    let options = DecodeOptions {
        max_records: Some(7),
        ..explicit(RecordFamily::Canopy, SchemaVersion::V1_01)
    };
    let (summary, events) = run(&path, &options);
    assert_eq!(summary.records_read, 7);
    let indexes: Vec<_> = events.iter().map(|event| event.index).collect();
    assert_eq!(indexes, (1..=7).collect::<Vec<u64>>());
}

#[test]
fn zero_limit_reads_everything() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Canopy, SchemaVersion::V1_00, 12);
    let path = write_release(dir.path(), "flight.lge", &data);

    let options = DecodeOptions {
        max_records: Some(0),
        ..explicit(RecordFamily::Canopy, SchemaVersion::V1_00)
    };
    let (summary, _) = run(&path, &options);
    assert_eq!(summary.records_read, 12);
}

#[test]
fn geofence_excludes_records_on_the_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Elevation, SchemaVersion::V1_01, 40);
    let path = write_release(dir.path(), "flight.lce", &data);

    let options = DecodeOptions {
        bounds: BoundingBox::default().with_lat(lat(10), lat(20)),
        ..explicit(RecordFamily::Elevation, SchemaVersion::V1_01)
    };
    let (summary, events) = run(&path, &options);
    assert_eq!(summary.records_read, 40);
    assert_eq!(summary.records_emitted, 9);
    let indexes: Vec<_> = events.iter().map(|event| event.index).collect();
    assert_eq!(indexes, (12..=20).collect::<Vec<u64>>());
}

#[test]
fn geofence_on_both_axes() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Canopy, SchemaVersion::V1_03, 40);
    let path = write_release(dir.path(), "flight.lge", &data);

    let options = DecodeOptions {
        bounds: BoundingBox::default()
            .with_lat(lat(0) - 1.0, lat(30))
            .with_lon(lon(5), lon(39) + 1.0),
        ..explicit(RecordFamily::Canopy, SchemaVersion::V1_03)
    };
    let (_, events) = run(&path, &options);
    let indexes: Vec<_> = events.iter().map(|event| event.index).collect();
    assert_eq!(indexes, (7..=30).collect::<Vec<u64>>());
}

#[test]
fn waveform_geofence_uses_reference_sample() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Waveform, SchemaVersion::V1_02, 12);
    let path = write_release(dir.path(), "flight.lgw", &data);

    let options = DecodeOptions {
        bounds: BoundingBox::default().with_lat(lat(5) + 0.00005, lat(5) + 0.0002),
        ..explicit(RecordFamily::Waveform, SchemaVersion::V1_02)
    };
    let (_, events) = run(&path, &options);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].index, 6);
    assert_eq!(events[0].record.real("lat0"), Some(lat(5)));
}

fn foreign_order() -> ByteOrder {
    match ByteOrder::native() {
        ByteOrder::Little => ByteOrder::Big,
        ByteOrder::Big => ByteOrder::Little,
    }
}

fn record_samples<'a>(record: &'a DecodedRecord, name: &str) -> &'a [u16] {
    match record.get(name) {
        Some(FieldValue::Samples(samples)) => samples.as_slice(),
        other => panic!("unexpected {name}: {other:?}"),
    }
}

#[test]
fn waveform_1_03_samples_ignore_host_order() {
    let layout = layout_of(RecordFamily::Waveform, SchemaVersion::V1_03).unwrap();
    let data = release_bytes(RecordFamily::Waveform, SchemaVersion::V1_03, 3);
    let decode_all = |host: ByteOrder| -> Vec<DecodedRecord> {
        data.chunks_exact(layout.len)
            .map(|block| decode_record(block, layout, Normalizer::for_host(host)).unwrap())
            .collect()
    };
    let native = decode_all(ByteOrder::native());
    let foreign = decode_all(foreign_order());
    assert_eq!(native.len(), 3);

    for (ours, theirs) in native.iter().zip(&foreign) {
        for name in ["txwave", "rxwave"] {
            assert_eq!(record_samples(ours, name), record_samples(theirs, name));
        }
        let tx = record_samples(ours, "txwave");
        let rx = record_samples(ours, "rxwave");
        assert_eq!(tx.len(), 80);
        assert_eq!(rx.len(), 432);
        assert!(tx.iter().chain(rx).all(|&value| value <= 255));
    }
    assert_eq!(record_samples(&native[1], "rxwave")[20], sample(1, 20, 1));
}

#[test]
fn waveform_1_03_file_renders_three_records() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Waveform, SchemaVersion::V1_03, 3);
    let path = write_release(dir.path(), "flight.lgw", &data);

    let (summary, events) = run(&path, &explicit(RecordFamily::Waveform, SchemaVersion::V1_03));
    assert_eq!(summary.records_read, 3);
    assert_eq!(events.len(), 3);
    assert_eq!(samples(&events[2], "txwave")[79], sample(2, 79, 1));
}

#[test]
fn waveform_1_04_swaps_two_byte_samples() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Waveform, SchemaVersion::V1_04, 3);
    let path = write_release(dir.path(), "flight.lgw", &data);

    let (summary, events) = run(&path, &explicit(RecordFamily::Waveform, SchemaVersion::V1_04));
    assert_eq!(summary.record_len, 1384);
    let rx = samples(&events[2], "rxwave");
    assert_eq!(rx.len(), 528);
    assert_eq!(rx[100], sample(2, 100, 2));
    assert_eq!(samples(&events[2], "txwave")[127], sample(2, 127, 2));
    assert_eq!(events[2].record.real("lat527"), Some(lat(2) + 0.0001));
}

#[test]
fn wrong_host_order_scrambles_values() {
    let layout = layout_of(RecordFamily::Elevation, SchemaVersion::V1_00).unwrap();
    let data = release_bytes(RecordFamily::Elevation, SchemaVersion::V1_00, 2);
    let normalizer = Normalizer::for_host(foreign_order());

    let record = decode_record(&data[..layout.len], layout, normalizer).unwrap();
    let scrambled = f64::from_bits(lat(0).to_bits().swap_bytes());
    assert_eq!(record.real("tlat").map(f64::to_bits), Some(scrambled.to_bits()));
    assert_ne!(record.real("tlat"), Some(lat(0)));
}

#[test]
fn wrong_host_order_rejects_every_record_at_the_geofence() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Elevation, SchemaVersion::V1_00, 3);
    let path = write_release(dir.path(), "flight.lce", &data);

    let options = DecodeOptions {
        host_order: Some(foreign_order()),
        ..explicit(RecordFamily::Elevation, SchemaVersion::V1_00)
    };
    let (summary, events) = run(&path, &options);
    assert_eq!(summary.records_read, 3);
    assert_eq!(summary.records_emitted, 0);
    assert!(events.is_empty());
}

#[test]
fn partial_override_completes_from_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Canopy, SchemaVersion::V1_01, 6);
    let path = write_release(dir.path(), "site.lge.1.01", &data);

    let options = DecodeOptions {
        family: Some(RecordFamily::Canopy),
        ..DecodeOptions::default()
    };
    let (summary, events) = run(&path, &options);
    assert_eq!(summary.resolution, Resolution::Completed);
    assert_eq!(summary.version, SchemaVersion::V1_01);
    assert_eq!(events.len(), 6);
    assert_eq!(events[4].record.real("glon"), Some(lon(4)));
}

#[test]
fn partial_override_defaults_family() {
    let dir = tempfile::tempdir().unwrap();
    let data = release_bytes(RecordFamily::Elevation, SchemaVersion::V1_02, 4);
    let path = write_release(dir.path(), "flight.bin", &data);

    let options = DecodeOptions {
        version: Some(SchemaVersion::V1_02),
        ..DecodeOptions::default()
    };
    let (summary, events) = run(&path, &options);
    assert_eq!(summary.family, RecordFamily::Elevation);
    assert_eq!(events.len(), 4);
    assert_eq!(events[3].record.real("tlat"), Some(lat(3)));
}

#[test]
fn missing_input_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.lce");
    let mut events: Vec<RecordEvent> = Vec::new();
    let err = decode_file(&path, &DecodeOptions::default(), &mut events).unwrap_err();
    match err {
        PipelineError::InputUnavailable { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn uncataloged_names_are_rejected() {
    assert!(matches!(
        layout_named("lgw", "1.05"),
        Err(SchemaError::UnknownVersion { .. })
    ));
    assert!(matches!(
        layout_named("lvx", "1.03"),
        Err(SchemaError::UnknownFamily { .. })
    ));
    assert_eq!(layout_named("LGE", "1.0").unwrap().len, 36);
}
