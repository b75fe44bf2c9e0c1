//! Output adapters for decoded records
//!
//! Writers render a fully decoded [`crate::schema::Record`] into a target format, consuming only
//! the documented accessors (field name, description, trimmed and raw value, type). Every writer
//! works over any [`std::io::Write`] sink and implements [`RecordWriter`].
//!
//! - [`DelimitedWriter`] - one record per line, values joined by a separator
//! - [`TextWriter`] - aligned fixed-width columns with a header per record shape
//! - [`HtmlWriter`] - one HTML table per record shape

mod delimited;
mod html;
mod text;

pub use delimited::DelimitedWriter;
pub use html::HtmlWriter;
pub use text::TextWriter;

use crate::schema::Record;
use crate::Result;

/// Common surface of all record writers.
pub trait RecordWriter {
    /// Render one decoded record to the underlying sink.
    ///
    /// # Errors
    /// Propagates I/O failures from the sink.
    fn write_record(&mut self, record: &Record) -> Result<()>;

    /// Flush and emit any closing markup. Call once after the last record.
    ///
    /// # Errors
    /// Propagates I/O failures from the sink.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
