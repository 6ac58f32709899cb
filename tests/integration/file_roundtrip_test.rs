//! Integration tests for the load -> convert -> save pipeline over real
//! temporary files.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

use occonv::content::{derived_output_path, load};
use occonv::gateway::{Script, Variant};
use occonv::{CellValue, ColumnSelection, ContentModel, ConversionSettings};

fn settings(source: Script, target: Script, variant: Variant, phrases: bool) -> ConversionSettings {
    ConversionSettings::new(source, target, variant, phrases)
}

fn s2t() -> ConversionSettings {
    settings(Script::Simplified, Script::Traditional, Variant::Standard, false)
}

fn identity() -> ConversionSettings {
    settings(Script::Simplified, Script::Simplified, Variant::Standard, false)
}

fn select(names: &[&str]) -> ColumnSelection {
    names.iter().map(|n| n.to_string()).collect()
}

fn write_city_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "name").unwrap();
    worksheet.write_string(0, 1, "city").unwrap();
    worksheet.write_string(1, 0, "alice").unwrap();
    worksheet.write_string(1, 1, "汉口").unwrap();
    worksheet.write_string(2, 0, "bob").unwrap();
    worksheet.write_number(2, 1, 42.0).unwrap();
    worksheet.write_string(3, 0, "carol").unwrap();
    worksheet.write_string(3, 1, "广州").unwrap();
    workbook.save(path).unwrap();
}

fn write_docx(path: &Path) {
    let docx = Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("这是一个简单的测试")))
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("")))
        .add_table(Table::new(vec![TableRow::new(vec![
            TableCell::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("数据"))),
            TableCell::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("转换"))),
        ])]));

    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    fs::write(path, cursor.into_inner()).unwrap();
}

#[test]
fn test_plain_text_file_conversion_uses_derived_name() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "汉字内容").unwrap();

    let (output, stats) =
        occonv::convert_file_quiet(&input, None, &s2t(), &ColumnSelection::new()).unwrap();

    assert_eq!(output, dir.path().join("notes_s2t.txt"));
    assert!(output.exists());
    assert_eq!(stats.total_units, 1);
    assert_eq!(stats.converted_units, 1);

    let converted = fs::read_to_string(&output).unwrap();
    assert!(!converted.is_empty());
}

#[test]
fn test_plain_text_identity_round_trips_exactly() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "汉字内容\n第二行").unwrap();

    let (output, _) =
        occonv::convert_file_quiet(&input, None, &identity(), &ColumnSelection::new()).unwrap();

    assert_eq!(output, dir.path().join("notes_简体.txt"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "汉字内容\n第二行");
}

#[test]
fn test_workbook_conversion_preserves_shape_and_unselected_columns() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cities.xlsx");
    write_city_workbook(&input);

    let (output, stats) =
        occonv::convert_file_quiet(&input, None, &s2t(), &select(&["city"])).unwrap();
    assert_eq!(output, dir.path().join("cities_s2t.xlsx"));

    let reloaded = match load(&output).unwrap() {
        ContentModel::Tabular(data) => data,
        other => panic!("wrong shape: {}", other.kind_name()),
    };

    assert_eq!(
        reloaded.columns(),
        &["name".to_string(), "city".to_string()]
    );
    assert_eq!(reloaded.row_count(), 3);

    // Unselected column untouched through a full save/load cycle
    assert_eq!(reloaded.cell(0, "name"), Some(&CellValue::Text("alice".to_string())));
    assert_eq!(reloaded.cell(1, "name"), Some(&CellValue::Text("bob".to_string())));
    assert_eq!(reloaded.cell(2, "name"), Some(&CellValue::Text("carol".to_string())));

    // The numeric cell stayed numeric
    assert_eq!(reloaded.cell(1, "city"), Some(&CellValue::Number(42.0)));

    // 3 rows x 1 selected column
    assert_eq!(stats.total_units, 3);
    assert_eq!(stats.converted_units, 2);
    assert_eq!(stats.skipped_units, 1);
}

#[test]
fn test_workbook_conversion_with_explicit_output_path() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cities.xlsx");
    let explicit = dir.path().join("out/converted.xlsx");
    fs::create_dir_all(explicit.parent().unwrap()).unwrap();
    write_city_workbook(&input);

    let (output, _) =
        occonv::convert_file_quiet(&input, Some(&explicit), &s2t(), &select(&["city"])).unwrap();
    assert_eq!(output, explicit);
    assert!(explicit.exists());
}

#[test]
fn test_document_conversion_preserves_structure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.docx");
    write_docx(&input);

    let (output, stats) =
        occonv::convert_file_quiet(&input, None, &s2t(), &ColumnSelection::new()).unwrap();
    assert_eq!(output, dir.path().join("report_s2t.docx"));

    let reloaded = match load(&output).unwrap() {
        ContentModel::Document(data) => data,
        other => panic!("wrong shape: {}", other.kind_name()),
    };

    assert_eq!(reloaded.paragraphs.len(), 2);
    assert_eq!(reloaded.tables.len(), 1);
    assert_eq!(reloaded.tables[0].len(), 1);
    assert_eq!(reloaded.tables[0][0].len(), 2);

    // 2 paragraphs + 2 table cells; the empty paragraph is skipped
    assert_eq!(stats.total_units, 4);
    assert_eq!(stats.converted_units, 3);
    assert_eq!(stats.skipped_units, 1);
}

#[test]
fn test_missing_input_surfaces_load_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.txt");

    let err =
        occonv::convert_file_quiet(&input, None, &s2t(), &ColumnSelection::new()).unwrap_err();
    assert!(matches!(err, occonv::ConvertError::Load(_)));
}

#[test]
fn test_derived_names_follow_mode_codes() {
    let cases = [
        (s2t(), "data_s2t.xlsx"),
        (
            settings(Script::Simplified, Script::Traditional, Variant::Taiwan, true),
            "data_s2twp.xlsx",
        ),
        (
            settings(Script::Traditional, Script::Simplified, Variant::Hongkong, false),
            "data_hk2s.xlsx",
        ),
        (identity(), "data_简体.xlsx"),
    ];
    for (settings, expected) in cases {
        assert_eq!(
            derived_output_path(Path::new("data.xlsx"), &settings),
            Path::new(expected)
        );
    }
}
