//! Delimited text output (CSV-style)

use std::io::Write;

use crate::schema::Record;
use crate::writer::RecordWriter;
use crate::Result;

/// Writes one record per line, trimmed field values joined by a separator.
///
/// With `with_names` enabled, a header line of field names precedes the values whenever the
/// record shape changes.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use rbf::schema::{Field, FieldType, Record};
/// use rbf::writer::{DelimitedWriter, RecordWriter};
///
/// let ft = Arc::new(FieldType::new("A/N", "string").unwrap());
/// let mut rec = Record::new("R", "").unwrap();
/// rec.push(Field::new("A", "", ft.clone(), 3).unwrap());
/// rec.push(Field::new("B", "", ft, 3).unwrap());
/// rec.set_line("foobar").unwrap();
///
/// let mut out = Vec::new();
/// DelimitedWriter::new(&mut out, ";", false).write_record(&rec).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "foo;bar\n");
/// ```
pub struct DelimitedWriter<W: Write> {
    out: W,
    separator: String,
    with_names: bool,
    last_record: String,
}

impl<W: Write> DelimitedWriter<W> {
    /// Create a new delimited writer.
    ///
    /// ## Arguments
    /// * 'out'        - The sink records are rendered to
    /// * 'separator'  - Separator between field values (e.g. ";")
    /// * 'with_names' - Emit a field-name header when the record shape changes
    pub fn new(out: W, separator: &str, with_names: bool) -> DelimitedWriter<W> {
        DelimitedWriter {
            out,
            separator: separator.to_string(),
            with_names,
            last_record: String::new(),
        }
    }
}

impl<W: Write> RecordWriter for DelimitedWriter<W> {
    fn write_record(&mut self, record: &Record) -> Result<()> {
        if self.with_names && self.last_record != record.name() {
            let names: Vec<&str> = record.iter().map(|f| f.name()).collect();
            writeln!(self.out, "{}", names.join(&self.separator))?;
            self.last_record = record.name().to_string();
        }

        let values: Vec<&str> = record.iter().map(|f| f.value()).collect();
        writeln!(self.out, "{}", values.join(&self.separator))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
