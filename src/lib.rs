// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # rbf
//!
//! A schema-driven engine for **record-based files** (RBF): flat text files whose lines are
//! divided into named, typed, fixed-length fields according to an externally supplied XML
//! schema. `rbf` models the schema (field types, fields, records, layouts), computes the byte
//! offsets and bounds that map a schema definition onto positions in a line, decodes lines into
//! typed values and renders decoded records back out in several formats.
//!
//! ## Features
//!
//! - **Schema model** - field types aliasing a fixed base-kind registry, fields with computed
//!   offsets and bounds, records tiling a fixed line width, layouts addressable by record name
//! - **Typed conversion** - string, integer, decimal, date and time kinds with strict
//!   (`Result`-returning) and lenient (log-and-fall-back) conversion paths
//! - **Duplicate-name aware** - repeated field names are legal; lookups return every occurrence
//!   and scalar access refuses ambiguity instead of guessing
//! - **Structural projection** - keep/delete/prune/simplify operations on records and layouts,
//!   with offsets rebuilt automatically so reduced shapes stay decodable
//! - **Streaming reads** - line-by-line decoding against a caller-supplied record classifier
//! - **Writers** - delimited text, aligned text and HTML renderings of decoded records
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rbf::prelude::*;
//!
//! let layout = Layout::from_file("world_data.xml")?;
//! let mut reader = Reader::new("world_data.txt", layout, |line: &str| line[0..4].to_string())?;
//!
//! while let Some(rec) = reader.next_record()? {
//!     println!("{} -> {}", rec.name(), rec.scalar("NAME")?);
//! }
//! # Ok::<(), rbf::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`schema`] - the layout engine: base kinds, field types, fields, records, layouts
//! - [`reader`] - line-by-line decoding of record-based data files
//! - [`writer`] - output adapters over decoded records
//! - [`Error`] and [`Result`] - crate-wide error handling
//!
//! The on-disk format is plain fixed-width text: one record per physical line, fields packed
//! contiguously with no separators. Which record a line decodes as is decided by a caller
//! supplied mapper (typically a fixed slice of the line).
//!
//! ## Threading
//!
//! The core is single-threaded by design. Decoding mutates a record's per-line state, so each
//! [`schema::Layout`] tree must be treated as exclusively owned by one worker at a time.

#[macro_use]
pub(crate) mod error;

pub mod prelude;
pub mod reader;
pub mod schema;
pub mod writer;

pub use error::{Error, Result};
