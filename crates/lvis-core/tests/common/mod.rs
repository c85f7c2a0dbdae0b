#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use lvis_core::{FieldKind, FieldSpec, RecordFamily, RecordLayout, SchemaVersion, layout_of};

// Synthetic release records. Geolocation stays in a plausible range and the
// frame id is large, so misaligned layouts decode to implausible values.

pub fn lon(index: u64) -> f64 {
    280.0 + (index % 1000) as f64 * 0.00123456789 + 0.000000123
}

pub fn lat(index: u64) -> f64 {
    38.0 + (index % 1000) as f64 * 0.000987654321
}

pub fn elevation(index: u64) -> f64 {
    100.0 + (index % 50) as f64 * 1.25
}

pub fn sample(index: u64, position: usize, width: usize) -> u16 {
    let modulus = if width == 1 { 256 } else { 1024 };
    ((index * 7 + position as u64 * 13) % modulus) as u16
}

fn scalar(name: &str, index: u64) -> f64 {
    match name {
        "tlon" | "glon" | "lon0" => lon(index),
        "tlat" | "glat" | "lat0" => lat(index),
        "zt" | "zg" | "z0" => elevation(index),
        "lon431" | "lon527" => lon(index) + 0.0001,
        "lat431" | "lat527" => lat(index) + 0.0001,
        "z431" | "z527" => elevation(index) - 20.0,
        "lfid" => (1_500_000_000 + index / 10) as f64,
        "shotnumber" => (500_000 + index) as f64,
        "lvistime" => 40000.5 + index as f64 * 0.001,
        "azimuth" => 45.5 + (index % 360) as f64,
        "incidentangle" => 2.5,
        "range" => 9500.25,
        "rh25" => 3.5 + (index % 10) as f64,
        "rh50" => 7.25 + (index % 10) as f64,
        "rh75" => 11.0 + (index % 10) as f64,
        "rh100" => 15.5 + (index % 10) as f64,
        "sigmean" => 12.5,
        other => panic!("no synthetic value for field {other}"),
    }
}

fn push_field(out: &mut Vec<u8>, field: &FieldSpec, index: u64) {
    match field.kind {
        FieldKind::UnsignedInt => {
            out.extend_from_slice(&(scalar(field.name, index) as u32).to_be_bytes())
        }
        FieldKind::Float => {
            out.extend_from_slice(&(scalar(field.name, index) as f32).to_be_bytes())
        }
        FieldKind::Double => out.extend_from_slice(&scalar(field.name, index).to_be_bytes()),
        FieldKind::Samples => {
            for position in 0..field.count {
                let value = sample(index, position, field.width);
                if field.width == 1 {
                    out.push(value as u8);
                } else {
                    out.extend_from_slice(&value.to_be_bytes());
                }
            }
        }
    }
}

/// Big-endian bytes of synthetic record `index` (0-based).
pub fn record_bytes(layout: &RecordLayout, index: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(layout.len);
    for field in &layout.fields {
        push_field(&mut out, field, index);
    }
    assert_eq!(out.len(), layout.len);
    out
}

pub fn release_bytes(family: RecordFamily, version: SchemaVersion, count: u64) -> Vec<u8> {
    let layout = layout_of(family, version).unwrap();
    (0..count).flat_map(|index| record_bytes(layout, index)).collect()
}

pub fn write_release(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}
