//! Layouts: the full schema of a record-based file
//!
//! A [`Layout`] is a named set of [`crate::schema::Record`] definitions plus free-form metadata,
//! loaded from an XML description. The document shape is:
//!
//! ```xml
//! <rbf>
//!     <meta version="1.0" description="Continents, countries, cities" schema="world_data"/>
//!     <fieldtype name="A/N" type="string"/>
//!     <fieldtype name="D" type="date" date_format="%Y%m%d"/>
//!     <record name="CONT" description="Continent record">
//!         <field name="TYPE" description="Record type" type="A/N" length="4"/>
//!         <field name="NAME" description="Continent name" type="A/N" length="20"/>
//!     </record>
//! </rbf>
//! ```
//!
//! Every `<meta>` attribute lands in the layout metadata as-is. Field types must be declared
//! before any record references them. Iteration over a layout is name-sorted for determinism,
//! independent of the order records appear in the document.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::schema::element::Element;
use crate::schema::field::Field;
use crate::schema::fieldtype::FieldType;
use crate::schema::record::Record;
use crate::Result;

/// The full schema of a record-based file: records by name, shared field types, metadata.
///
/// # Examples
///
/// ```rust,no_run
/// use rbf::schema::Layout;
///
/// let layout = Layout::from_file("world_data.xml")?;
/// assert!(layout.contains("CONT"));
/// for rec in layout.iter() {
///     println!("{}: {} fields", rec.name(), rec.count());
/// }
/// # Ok::<(), rbf::Error>(())
/// ```
#[derive(Debug)]
pub struct Layout {
    /// Identity triple; name is the schema source name
    pub element: Element,
    records: BTreeMap<String, Record>,
    ftypes: HashMap<String, Arc<FieldType>>,
    metadata: HashMap<String, String>,
}

impl Layout {
    /// Load a layout from an XML schema file.
    ///
    /// ## Arguments
    /// * 'path' - Path of the XML layout description
    ///
    /// # Errors
    /// - [`crate::Error::SchemaNotFound`] when the file does not exist
    /// - [`crate::Error::UnknownFieldType`] when a field references an undeclared type
    /// - [`crate::Error::Malformed`] / [`crate::Error::XmlError`] on structural problems
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Layout> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(crate::Error::SchemaNotFound(path.display().to_string()));
        }

        let xml = std::fs::read_to_string(path)?;
        Layout::from_xml(&xml, &path.display().to_string())
    }

    /// Load a layout from an in-memory XML schema.
    ///
    /// ## Arguments
    /// * 'xml'  - The schema document
    /// * 'name' - Name given to the layout (stands in for the file name)
    ///
    /// # Errors
    /// Same failure modes as [`Layout::from_file`], minus the existence check.
    pub fn from_xml(xml: &str, name: &str) -> Result<Layout> {
        let mut layout = Layout {
            element: Element::new(name, "", 0)?,
            records: BTreeMap::new(),
            ftypes: HashMap::new(),
            metadata: HashMap::new(),
        };

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        // records are filled in as their <field> children stream by
        let mut current_record = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    let attrs = attributes(&e)?;
                    match e.name().as_ref() {
                        b"meta" => layout.read_meta(attrs),
                        b"fieldtype" => layout.read_fieldtype(attrs)?,
                        b"record" => current_record = layout.read_record(attrs)?,
                        b"field" => layout.read_field(&current_record, attrs)?,
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(description) = layout.metadata.get("description") {
            layout.element.description = description.clone();
        }

        Ok(layout)
    }

    fn read_meta(&mut self, attrs: HashMap<String, String>) {
        self.metadata.extend(attrs);
    }

    fn read_fieldtype(&mut self, mut attrs: HashMap<String, String>) -> Result<()> {
        let name = take_required(&mut attrs, "name", "fieldtype")?;
        let kind = take_required(&mut attrs, "type", "fieldtype")?;

        let mut ft = FieldType::new(&name, &kind)?;
        if let Some(v) = attrs.remove("date_format") {
            ft.date_format = v;
        }
        if let Some(v) = attrs.remove("time_format") {
            ft.time_format = v;
        }
        if let Some(v) = attrs.remove("pattern") {
            ft.pattern_override = Some(v);
        }
        if let Some(v) = attrs.remove("format") {
            ft.format_override = Some(v);
        }
        // anything else the schema carries rides along in the extra bag
        ft.extra = attrs;

        self.ftypes.insert(name, Arc::new(ft));
        Ok(())
    }

    fn read_record(&mut self, mut attrs: HashMap<String, String>) -> Result<String> {
        let name = take_required(&mut attrs, "name", "record")?;
        let description = attrs.remove("description").unwrap_or_default();

        self.records
            .insert(name.clone(), Record::new(&name, &description)?);
        Ok(name)
    }

    fn read_field(&mut self, record_name: &str, mut attrs: HashMap<String, String>) -> Result<()> {
        let name = take_required(&mut attrs, "name", "field")?;
        let type_name = take_required(&mut attrs, "type", "field")?;
        let description = attrs.remove("description").unwrap_or_default();

        let length = match attrs.remove("length") {
            Some(v) => v.parse::<usize>().map_err(|_| {
                malformed_error!("field '{}': invalid length '{}'", name, v)
            })?,
            None => return Err(malformed_error!("field '{}' has no length", name)),
        };

        let record = self.records.get_mut(record_name).ok_or_else(|| {
            malformed_error!("field '{}' declared outside of any record", name)
        })?;

        let ftype = match self.ftypes.get(&type_name) {
            Some(ft) => ft.clone(),
            None => {
                return Err(crate::Error::UnknownFieldType {
                    record: record_name.to_string(),
                    field: name,
                    ftype: type_name,
                })
            }
        };

        record.push(Field::new(&name, &description, ftype, length)?);
        Ok(())
    }

    /// Layout name (the schema source name).
    pub fn name(&self) -> &str {
        &self.element.name
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the layout holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when a record bears the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Look up a record by name.
    ///
    /// # Errors
    /// Returns [`crate::Error::KeyNotFound`] when no record bears the name.
    pub fn get(&self, name: &str) -> Result<&Record> {
        self.records.get(name).ok_or_else(|| self.key_not_found(name))
    }

    /// Mutable lookup of a record by name.
    ///
    /// # Errors
    /// Returns [`crate::Error::KeyNotFound`] when no record bears the name.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Record> {
        let missing = self.key_not_found(name);
        self.records.get_mut(name).ok_or(missing)
    }

    /// The raw record map, keyed by record name.
    pub fn records(&self) -> &BTreeMap<String, Record> {
        &self.records
    }

    /// Iterate over records in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// A field type declared by the schema, by nickname.
    pub fn ftype(&self, name: &str) -> Option<&Arc<FieldType>> {
        self.ftypes.get(name)
    }

    /// A metadata value from the schema's `<meta>` block.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// All metadata from the schema's `<meta>` block.
    pub fn metadata_map(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Keep only the records whose name appears in `names`.
    pub fn keep(&mut self, names: &[&str]) {
        self.records.retain(|name, _| names.contains(&name.as_str()));
    }

    /// Delete every record whose name appears in `names`.
    pub fn delete(&mut self, names: &[&str]) {
        self.records.retain(|name, _| !names.contains(&name.as_str()));
    }

    /// Delete the given field names from every record ([`Record::delete`] everywhere).
    pub fn prune(&mut self, field_names: &[&str]) {
        for record in self.records.values_mut() {
            record.delete(field_names);
        }
    }

    /// Reduce the layout to a set of `"RECORD:FIELD1,FIELD2,..."` specs.
    ///
    /// For each spec the named record is reduced to the listed fields, then the layout itself is
    /// reduced to the spec'd record names. Field-level reduction runs first, over the record name
    /// set taken from the specs rather than from surviving records.
    ///
    /// # Errors
    /// - [`crate::Error::Malformed`] when a spec has no `:` separator
    /// - [`crate::Error::KeyNotFound`] when a spec names an unknown record
    pub fn simplify(&mut self, specs: &[&str]) -> Result<()> {
        let mut keep_records = Vec::with_capacity(specs.len());

        for spec in specs {
            let (record_name, field_part) = spec.split_once(':').ok_or_else(|| {
                malformed_error!("simplify spec '{}' has no ':' separator", spec)
            })?;
            let record_name = record_name.trim();
            let field_names: Vec<&str> = field_part.split(',').map(str::trim).collect();

            self.get_mut(record_name)?.keep(&field_names);
            keep_records.push(record_name);
        }

        self.keep(&keep_records);
        Ok(())
    }

    fn key_not_found(&self, key: &str) -> crate::Error {
        crate::Error::KeyNotFound {
            key: key.to_string(),
            container: self.element.name.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a Record;
    type IntoIter = std::collections::btree_map::Values<'a, String, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for attr in e.attributes() {
        let attr =
            attr.map_err(|e| malformed_error!("bad attribute in schema document: {}", e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed_error!("bad attribute value in schema document: {}", e))?
            .to_string();
        map.insert(key, value);
    }

    Ok(map)
}

fn take_required(
    attrs: &mut HashMap<String, String>,
    key: &str,
    tag: &str,
) -> Result<String> {
    attrs
        .remove(key)
        .ok_or_else(|| malformed_error!("<{}> tag is missing the '{}' attribute", tag, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::basetype::BaseKind;

    const WORLD: &str = r#"
        <rbf>
            <meta version="1.0" description="Continents, countries, cities"
                  schema="world_data" ignoreLine="^#" mapper="type:1 map:0..4"/>
            <fieldtype name="A/N" type="string"/>
            <fieldtype name="I" type="integer"/>
            <record name="COUN" description="Country record">
                <field name="TYPE" description="Record type" type="A/N" length="4"/>
                <field name="NAME" description="Country name" type="A/N" length="20"/>
                <field name="POPULATION" description="Population count" type="I" length="10"/>
            </record>
            <record name="CONT" description="Continent record">
                <field name="TYPE" description="Record type" type="A/N" length="4"/>
                <field name="NAME" description="Continent name" type="A/N" length="20"/>
                <field name="AREA" description="Surface area" type="I" length="10"/>
            </record>
        </rbf>
    "#;

    #[test]
    fn missing_file() {
        assert!(matches!(
            Layout::from_file("foo.xml"),
            Err(crate::Error::SchemaNotFound(_))
        ));
    }

    #[test]
    fn metadata_and_records() {
        let layout = Layout::from_xml(WORLD, "world_data.xml").unwrap();

        assert_eq!(layout.name(), "world_data.xml");
        assert_eq!(layout.element.description, "Continents, countries, cities");
        assert_eq!(layout.metadata("version"), Some("1.0"));
        assert_eq!(layout.metadata("schema"), Some("world_data"));
        assert_eq!(layout.metadata("ignoreLine"), Some("^#"));
        assert_eq!(layout.metadata("missing"), None);

        assert_eq!(layout.len(), 2);
        assert!(layout.contains("CONT"));
        assert!(!layout.contains("FOO"));
        assert_eq!(layout.get("CONT").unwrap().len(), 34);
        assert_eq!(layout.get("COUN").unwrap().count(), 3);
        assert!(matches!(
            layout.get("FOO"),
            Err(crate::Error::KeyNotFound { .. })
        ));
    }

    #[test]
    fn iteration_is_name_sorted() {
        let layout = Layout::from_xml(WORLD, "world_data.xml").unwrap();
        let names: Vec<&str> = layout.iter().map(|r| r.name()).collect();
        // CONT is declared after COUN but sorts first
        assert_eq!(names, ["CONT", "COUN"]);
    }

    #[test]
    fn fieldtype_resolution() {
        let layout = Layout::from_xml(WORLD, "w").unwrap();
        assert_eq!(layout.ftype("A/N").unwrap().kind, BaseKind::String);
        let pop = &layout.get("COUN").unwrap().get_named("POPULATION").unwrap()[0];
        assert_eq!(pop.ftype.kind, BaseKind::Integer);
    }

    #[test]
    fn fieldtype_extras() {
        let xml = r#"
            <rbf>
                <fieldtype name="D" type="date" date_format="%d%m%Y" pattern="[0-9]+" custom="x"/>
                <record name="R" description="">
                    <field name="WHEN" description="" type="D" length="8"/>
                </record>
            </rbf>
        "#;
        let layout = Layout::from_xml(xml, "w").unwrap();
        let ft = layout.ftype("D").unwrap();
        assert_eq!(ft.date_format, "%d%m%Y");
        assert_eq!(ft.pattern_override.as_deref(), Some("[0-9]+"));
        assert_eq!(ft.extra.get("custom").map(String::as_str), Some("x"));
    }

    #[test]
    fn undeclared_fieldtype() {
        let xml = r#"
            <rbf>
                <record name="R" description="">
                    <field name="F" description="" type="GHOST" length="4"/>
                </record>
            </rbf>
        "#;
        assert!(matches!(
            Layout::from_xml(xml, "w"),
            Err(crate::Error::UnknownFieldType { .. })
        ));
    }

    #[test]
    fn invalid_base_kind() {
        let xml = r#"<rbf><fieldtype name="X" type="blob"/></rbf>"#;
        assert!(matches!(
            Layout::from_xml(xml, "w"),
            Err(crate::Error::InvalidType(_))
        ));
    }

    #[test]
    fn keep_and_delete() {
        let mut layout = Layout::from_xml(WORLD, "w").unwrap();
        layout.delete(&["COUN"]);
        assert_eq!(layout.len(), 1);
        assert!(layout.contains("CONT"));

        let mut layout = Layout::from_xml(WORLD, "w").unwrap();
        layout.keep(&["COUN"]);
        assert_eq!(layout.len(), 1);
        assert!(layout.contains("COUN"));
    }

    #[test]
    fn prune_fields_everywhere() {
        let mut layout = Layout::from_xml(WORLD, "w").unwrap();
        layout.prune(&["TYPE"]);
        for rec in &layout {
            assert!(!rec.contains("TYPE"));
            assert_eq!(rec.count(), 2);
        }
    }

    #[test]
    fn simplify() {
        let mut layout = Layout::from_xml(WORLD, "w").unwrap();
        layout
            .simplify(&["CONT:NAME,AREA", "COUN:POPULATION"])
            .unwrap();

        assert_eq!(layout.len(), 2);
        assert_eq!(
            layout.get("CONT").unwrap().project_named("name").unwrap(),
            ["NAME", "AREA"]
        );
        assert_eq!(
            layout.get("COUN").unwrap().project_named("name").unwrap(),
            ["POPULATION"]
        );
    }

    #[test]
    fn simplify_to_single_record() {
        let mut layout = Layout::from_xml(WORLD, "w").unwrap();
        layout.simplify(&["CONT:NAME,AREA"]).unwrap();

        assert_eq!(layout.len(), 1);
        assert!(layout.contains("CONT"));
        let names = layout.get("CONT").unwrap().project_named("name").unwrap();
        assert_eq!(names, ["NAME", "AREA"]);
    }
}
