use std::io::Write;

use clap::ValueEnum;
use lvis_core::{FieldKind, FieldSpec, FieldValue, RecordEvent, RecordLayout, RecordSink, SinkError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Delimiter-separated columns, one row per record
    Text,
    /// One JSON object per record
    Json,
}

/// Column names for a layout; sample arrays expand to `txNNN`/`rxNNN`.
pub fn header_columns(layout: &RecordLayout, index: bool) -> Vec<String> {
    let mut columns = Vec::new();
    if index {
        columns.push("INDEX".to_string());
    }
    for field in &layout.fields {
        match field.kind {
            FieldKind::Samples => {
                let prefix = field.name.strip_suffix("wave").unwrap_or(field.name);
                columns.extend((0..field.count).map(|position| format!("{prefix}{position:03}")));
            }
            _ => columns.push(field.name.to_ascii_uppercase()),
        }
    }
    columns
}

fn push_value(row: &mut Vec<String>, field: &FieldSpec, value: &FieldValue) {
    match value {
        FieldValue::UnsignedInt(value) => row.push(value.to_string()),
        FieldValue::Float(value) => row.push(format!("{value:9.4}")),
        FieldValue::Double(value) if field.name == "lvistime" => row.push(format!("{value:12.6}")),
        FieldValue::Double(value) => row.push(format!("{value:14.10}")),
        FieldValue::Samples(samples) if field.width == 1 => {
            row.extend(samples.iter().map(|sample| format!("{sample:03}")));
        }
        FieldValue::Samples(samples) => {
            row.extend(samples.iter().map(|sample| format!("{sample:04}")));
        }
    }
}

/// Render one record as text columns.
pub fn row_columns(event: &RecordEvent, index: bool) -> Vec<String> {
    let mut row = Vec::new();
    if index {
        row.push(format!("{:10}", event.index));
    }
    for (field, value) in event.record.fields() {
        push_value(&mut row, field, value);
    }
    row
}

pub struct TextSink<W> {
    out: W,
    delimiter: &'static str,
    index: bool,
    header: bool,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W, delimiter: &'static str, index: bool, header: bool) -> Self {
        Self {
            out,
            delimiter,
            index,
            header,
        }
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> RecordSink for TextSink<W> {
    fn begin(&mut self, layout: &'static RecordLayout) -> Result<(), SinkError> {
        if self.header {
            writeln!(self.out, "{}", header_columns(layout, self.index).join(self.delimiter))?;
        }
        Ok(())
    }

    fn accept(&mut self, event: RecordEvent) -> Result<(), SinkError> {
        writeln!(self.out, "{}", row_columns(&event, self.index).join(self.delimiter))?;
        Ok(())
    }
}

/// Newline-delimited JSON records.
pub struct JsonLinesSink<W> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn accept(&mut self, event: RecordEvent) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.out, &event)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}
