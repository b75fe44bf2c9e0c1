//! Line-by-line reading of record-based files
//!
//! A record-based file carries one record per physical line, with no markers beyond the line's
//! own content. The caller therefore supplies a *mapper*: a closure classifying each raw line to
//! a record name (typically a fixed slice of the line, e.g. its first four bytes). Lines whose
//! mapped name is unknown to the layout are silently skipped.
//!
//! Reading is streaming and destructive: each matched line is decoded into the layout's record
//! *in place*, so a lent record is only valid until the next call.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rbf::reader::Reader;
//! use rbf::schema::Layout;
//!
//! let layout = Layout::from_file("world_data.xml")?;
//! let mut reader = Reader::new("world_data.txt", layout, |line| line[0..4].to_string())?;
//!
//! while let Some(rec) = reader.next_record()? {
//!     println!("{}", rec.project_named("value")?.join(";"));
//! }
//! # Ok::<(), rbf::Error>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::schema::{Layout, Record};
use crate::Result;

/// Streaming reader over one record-based file.
///
/// Owns the layout for the duration of the read; [`Reader::into_layout`] hands it back.
pub struct Reader<M>
where
    M: FnMut(&str) -> String,
{
    layout: Layout,
    mapper: M,
    input: BufReader<File>,
    buf: String,
}

impl<M> Reader<M>
where
    M: FnMut(&str) -> String,
{
    /// Open a record-based file for reading.
    ///
    /// ## Arguments
    /// * 'path'   - The data file, one record per line, matching the layout
    /// * 'layout' - The schema the file follows
    /// * 'mapper' - Classifier from raw line to record name
    ///
    /// # Errors
    /// Returns [`crate::Error::DataFileNotFound`] when the file does not exist.
    pub fn new<P: AsRef<Path>>(path: P, layout: Layout, mapper: M) -> Result<Reader<M>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(crate::Error::DataFileNotFound(path.display().to_string()));
        }

        Ok(Reader {
            layout,
            mapper,
            input: BufReader::new(File::open(path)?),
            buf: String::new(),
        })
    }

    /// Decode the next line that maps to a known record.
    ///
    /// Returns `Ok(None)` at end of file. The lent record stays valid until the next call.
    ///
    /// # Errors
    /// Propagates I/O failures and [`crate::schema::Record::set_line`] errors.
    pub fn next_record(&mut self) -> Result<Option<&Record>> {
        self.next_filtered(None)
    }

    /// Like [`Reader::next_record`], but only yields records whose name is in `names`.
    ///
    /// # Errors
    /// Same failure modes as [`Reader::next_record`].
    pub fn next_record_named(&mut self, names: &[&str]) -> Result<Option<&Record>> {
        self.next_filtered(Some(names))
    }

    fn next_filtered(&mut self, names: Option<&[&str]>) -> Result<Option<&Record>> {
        loop {
            self.buf.clear();
            if self.input.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }

            let line = self.buf.trim_end_matches(['\n', '\r']).to_string();
            let record_name = (self.mapper)(&line);

            if !self.layout.contains(&record_name) {
                continue;
            }
            if let Some(names) = names {
                if !names.contains(&record_name.as_str()) {
                    continue;
                }
            }

            let record = self.layout.get_mut(&record_name)?;
            record.set_line(&line)?;
            return Ok(Some(&*record));
        }
    }

    /// The layout this reader decodes against.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Consume the reader, handing the layout back.
    pub fn into_layout(self) -> Layout {
        self.layout
    }
}
