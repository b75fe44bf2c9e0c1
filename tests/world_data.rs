//! End-to-end tests over the world data sample: schema loading, line decoding, typed
//! conversion, layout projection and the output writers.

use chrono::NaiveDate;

use rbf::prelude::*;

const SCHEMA: &str = "tests/samples/world_data.xml";
const DATA: &str = "tests/samples/world_data.txt";

fn mapper(line: &str) -> String {
    line.get(0..4).unwrap_or_default().to_string()
}

#[test]
fn layout_loads_with_metadata() {
    let layout = Layout::from_file(SCHEMA).unwrap();

    assert_eq!(layout.len(), 2);
    assert_eq!(layout.metadata("version"), Some("1.0"));
    assert_eq!(layout.metadata("schema"), Some("world_data"));
    assert_eq!(layout.metadata("ignoreLine"), Some("^#"));
    assert_eq!(layout.metadata("mapper"), Some("type:1 map:0..4"));
    assert_eq!(layout.element.description, "Continents, countries, cities");

    assert_eq!(layout.get("CONT").unwrap().len(), 34);
    assert_eq!(layout.get("COUN").unwrap().len(), 62);
    assert!(!layout.contains("FOO"));
}

#[test]
fn read_all_records() {
    let layout = Layout::from_file(SCHEMA).unwrap();
    let mut reader = Reader::new(DATA, layout, mapper).unwrap();

    let mut seen = Vec::new();
    while let Some(rec) = reader.next_record().unwrap() {
        seen.push((rec.name().to_string(), rec.scalar("NAME").unwrap().to_string()));
    }

    // the comment line maps to no record and is skipped
    assert_eq!(
        seen,
        [
            ("CONT".to_string(), "Europe".to_string()),
            ("CONT".to_string(), "Asia".to_string()),
            ("COUN".to_string(), "France".to_string()),
            ("COUN".to_string(), "Japan".to_string()),
        ]
    );
}

#[test]
fn decoded_record_has_typed_values() {
    let layout = Layout::from_file(SCHEMA).unwrap();
    let mut reader = Reader::new(DATA, layout, mapper).unwrap();

    let rec = reader.next_record_named(&["COUN"]).unwrap().unwrap();
    assert_eq!(rec.scalar("NAME").unwrap(), "France");
    assert_eq!(rec.scalar("CAPITAL").unwrap(), "Paris");

    let population = &rec.get_named("POPULATION").unwrap()[0];
    assert_eq!(population.convert().unwrap(), TypedValue::Int(68_000_000));

    let census = &rec.get_named("CENSUS").unwrap()[0];
    assert_eq!(
        census.convert().unwrap(),
        TypedValue::Date(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap())
    );
}

#[test]
fn short_line_normalizes_before_slicing() {
    let mut layout = Layout::from_file(SCHEMA).unwrap();
    let rec = layout.get_mut("CONT").unwrap();

    rec.set_line("CONTEurope   30000000").unwrap();
    assert_eq!(rec.line().len(), 34);
    assert_eq!(rec.scalar("TYPE").unwrap(), "CONT");
    assert_eq!(rec.scalar("NAME").unwrap(), "Europe   30000000");
}

#[test]
fn round_trip_full_width_line() {
    let mut layout = Layout::from_file(SCHEMA).unwrap();
    let rec = layout.get_mut("CONT").unwrap();

    let line = format!("CONT{:<20}{:<10}", "Europe", "30000000");
    rec.set_line(&line).unwrap();
    assert_eq!(rec.line(), line);
    assert_eq!(rec.scalar("NAME").unwrap(), "Europe");
    assert_eq!(rec.scalar("AREA").unwrap(), "30000000");
}

#[test]
fn simplify_reduces_layout_and_fields() {
    let mut layout = Layout::from_file(SCHEMA).unwrap();
    layout.simplify(&["CONT:NAME,AREA"]).unwrap();

    assert_eq!(layout.len(), 1);
    let cont = layout.get("CONT").unwrap();
    assert_eq!(cont.project_named("name").unwrap(), ["NAME", "AREA"]);
    assert_eq!(cont.len(), 30);

    // the reduced record still decodes, against its new 30-byte shape
    let rec = layout.get_mut("CONT").unwrap();
    rec.set_line(&format!("{:<20}{:<10}", "Europe", "30000000")).unwrap();
    assert_eq!(rec.scalar("NAME").unwrap(), "Europe");
    assert_eq!(rec.scalar("AREA").unwrap(), "30000000");
}

#[test]
fn delimited_output_of_whole_file() {
    let layout = Layout::from_file(SCHEMA).unwrap();
    let mut reader = Reader::new(DATA, layout, mapper).unwrap();

    let mut out = Vec::new();
    let mut writer = DelimitedWriter::new(&mut out, ";", false);
    while let Some(rec) = reader.next_record_named(&["CONT"]).unwrap() {
        writer.write_record(rec).unwrap();
    }
    writer.finish().unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "CONT;Europe;30000000\nCONT;Asia;44000000\n"
    );
}

#[test]
fn html_output_of_whole_file() {
    let layout = Layout::from_file(SCHEMA).unwrap();
    let mut reader = Reader::new(DATA, layout, mapper).unwrap();

    let mut out = Vec::new();
    let mut writer = HtmlWriter::new(&mut out, false);
    while let Some(rec) = reader.next_record().unwrap() {
        writer.write_record(rec).unwrap();
    }
    writer.finish().unwrap();

    let html = String::from_utf8(out).unwrap();
    assert!(html.contains("<h2>CONT - Continent record</h2>"));
    assert!(html.contains("<h2>COUN - Country record</h2>"));
    // one table per record shape change
    assert_eq!(html.matches("<table>").count(), 2);
    assert!(html.contains("<td><pre>Paris               </pre></td>"));
}
