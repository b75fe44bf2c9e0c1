//! HTML table output

use std::io::Write;

use crate::schema::Record;
use crate::writer::RecordWriter;
use crate::Result;

/// Writes records as HTML, one `<table>` per record shape with a header row of field names.
///
/// [`RecordWriter::finish`] emits the closing `</body></html>` markup; rendering is not valid
/// HTML until it runs.
pub struct HtmlWriter<W: Write> {
    out: W,
    with_descriptions: bool,
    last_record: String,
    started: bool,
}

impl<W: Write> HtmlWriter<W> {
    /// Create a new HTML writer.
    ///
    /// ## Arguments
    /// * 'out'               - The sink records are rendered to
    /// * 'with_descriptions' - Add a row of field descriptions under the header
    pub fn new(out: W, with_descriptions: bool) -> HtmlWriter<W> {
        HtmlWriter {
            out,
            with_descriptions,
            last_record: String::new(),
            started: false,
        }
    }

    fn open_table(&mut self, record: &Record) -> Result<()> {
        if !self.last_record.is_empty() {
            writeln!(self.out, "</table>")?;
        }

        writeln!(
            self.out,
            "<h2>{} - {}</h2>",
            record.name(),
            record.description()
        )?;
        writeln!(self.out, "<table>")?;

        let headers: Vec<String> = record
            .iter()
            .map(|f| format!("<th>{}</th>", f.name()))
            .collect();
        writeln!(self.out, "<tr>{}</tr>", headers.concat())?;

        if self.with_descriptions {
            let cells: Vec<String> = record
                .iter()
                .map(|f| format!("<td>{}</td>", f.description()))
                .collect();
            writeln!(self.out, "<tr>{}</tr>", cells.concat())?;
        }

        self.last_record = record.name().to_string();
        Ok(())
    }
}

impl<W: Write> RecordWriter for HtmlWriter<W> {
    fn write_record(&mut self, record: &Record) -> Result<()> {
        if !self.started {
            writeln!(self.out, "<html><body>")?;
            self.started = true;
        }
        if self.last_record != record.name() {
            self.open_table(record)?;
        }

        let cells: Vec<String> = record
            .iter()
            .map(|f| format!("<td><pre>{}</pre></td>", f.raw_value()))
            .collect();
        writeln!(self.out, "<tr>{}</tr>", cells.concat())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if !self.last_record.is_empty() {
            writeln!(self.out, "</table>")?;
        }
        if self.started {
            writeln!(self.out, "</body></html>")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType};
    use std::sync::Arc;

    #[test]
    fn table_per_record_shape() {
        let ft = Arc::new(FieldType::new("A/N", "string").unwrap());
        let mut rec = Record::new("CONT", "Continent").unwrap();
        rec.push(Field::new("NAME", "Continent name", ft, 6).unwrap());
        rec.set_line("Europe").unwrap();

        let mut out = Vec::new();
        let mut writer = HtmlWriter::new(&mut out, true);
        writer.write_record(&rec).unwrap();
        writer.finish().unwrap();

        let html = String::from_utf8(out).unwrap();
        assert!(html.starts_with("<html><body>"));
        assert!(html.contains("<h2>CONT - Continent</h2>"));
        assert!(html.contains("<tr><th>NAME</th></tr>"));
        assert!(html.contains("<tr><td>Continent name</td></tr>"));
        assert!(html.contains("<tr><td><pre>Europe</pre></td></tr>"));
        assert!(html.trim_end().ends_with("</body></html>"));
    }
}
