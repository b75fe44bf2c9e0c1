//! Aligned plain-text output

use std::io::Write;

use crate::schema::Record;
use crate::writer::RecordWriter;
use crate::Result;

/// Writes records as aligned text columns.
///
/// Each column is as wide as the larger of the field's declared length and its name, so headers
/// and values line up. A header row and rule are emitted whenever the record shape changes.
pub struct TextWriter<W: Write> {
    out: W,
    last_record: String,
}

impl<W: Write> TextWriter<W> {
    /// Create a new text writer over the given sink.
    pub fn new(out: W) -> TextWriter<W> {
        TextWriter {
            out,
            last_record: String::new(),
        }
    }

    /// Write a record as `NAME="value"` pairs prefixed by the record name, one line per record.
    ///
    /// # Errors
    /// Propagates I/O failures from the sink.
    pub fn write_tagged(&mut self, record: &Record) -> Result<()> {
        let tags: Vec<String> = record
            .iter()
            .map(|f| format!("{}=\"{}\"", f.name(), f.value()))
            .collect();
        writeln!(self.out, "{}:{}", record.name(), tags.join(" "))?;
        Ok(())
    }

    fn cell_width(name: &str, length: usize) -> usize {
        name.len().max(length)
    }
}

impl<W: Write> RecordWriter for TextWriter<W> {
    fn write_record(&mut self, record: &Record) -> Result<()> {
        if self.last_record != record.name() {
            let headers: Vec<String> = record
                .iter()
                .map(|f| format!("{:<width$}", f.name(), width = Self::cell_width(f.name(), f.length())))
                .collect();
            let header = headers.join("|");

            writeln!(self.out, "{header}")?;
            writeln!(self.out, "{}", "-".repeat(header.len()))?;
            self.last_record = record.name().to_string();
        }

        let values: Vec<String> = record
            .iter()
            .map(|f| format!("{:<width$}", f.value(), width = Self::cell_width(f.name(), f.length())))
            .collect();
        writeln!(self.out, "{}", values.join("|"))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType};
    use std::sync::Arc;

    fn record() -> Record {
        let ft = Arc::new(FieldType::new("A/N", "string").unwrap());
        let mut rec = Record::new("CONT", "").unwrap();
        rec.push(Field::new("NAME", "", ft.clone(), 6).unwrap());
        rec.push(Field::new("POPULATION", "", ft, 4).unwrap());
        rec
    }

    #[test]
    fn aligned_columns() {
        let mut rec = record();
        rec.set_line("Europe30  ").unwrap();

        let mut out = Vec::new();
        let mut writer = TextWriter::new(&mut out);
        writer.write_record(&rec).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "NAME  |POPULATION");
        assert_eq!(lines[1], "-".repeat(17));
        assert_eq!(lines[2], "Europe|30        ");
    }

    #[test]
    fn tagged_form() {
        let mut rec = record();
        rec.set_line("Europe30  ").unwrap();

        let mut out = Vec::new();
        TextWriter::new(&mut out).write_tagged(&rec).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "CONT:NAME=\"Europe\" POPULATION=\"30\"\n"
        );
    }
}
