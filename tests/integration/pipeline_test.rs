//! Integration tests for the batch conversion pipeline with the real
//! conversion backend.

use std::sync::mpsc;

use occonv::conversion::progress::RecordingSink;
use occonv::gateway::{build_converter, ConversionMode, OpenccConverter, Script, Variant};
use occonv::{
    BatchConverter, CellValue, ColumnSelection, ContentModel, ConversionSettings, ConvertError,
    RunEvent, TabularData, TextConverter,
};

fn settings(source: Script, target: Script, variant: Variant, phrases: bool) -> ConversionSettings {
    ConversionSettings::new(source, target, variant, phrases)
}

fn city_table() -> TabularData {
    TabularData::new(
        vec!["name".to_string(), "city".to_string()],
        vec![
            vec![
                CellValue::Text("alice".to_string()),
                CellValue::Text("汉口".to_string()),
            ],
            vec![
                CellValue::Text("bob".to_string()),
                CellValue::Text("".to_string()),
            ],
            vec![
                CellValue::Text("carol".to_string()),
                CellValue::Text("广州".to_string()),
            ],
        ],
    )
}

fn select(names: &[&str]) -> ColumnSelection {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_selected_column_converts_and_name_column_is_untouched() {
    let converter = OpenccConverter::new(ConversionMode::S2t).unwrap();
    let model = ContentModel::Tabular(city_table());
    let batch = BatchConverter::new(Some(&converter));
    let mut sink = RecordingSink::default();

    let (output, stats) = batch.run(&model, &select(&["city"]), &mut sink).unwrap();
    let data = match output {
        ContentModel::Tabular(data) => data,
        other => panic!("wrong shape: {}", other.kind_name()),
    };

    // Unselected column byte-for-byte identical
    for row in 0..3 {
        assert_eq!(data.cell(row, "name"), city_table().cell(row, "name"));
    }

    // Non-blank selected cells went through the converter; the dictionary
    // owns the exact mapping, so only assert they are still non-empty text
    for row in [0, 2] {
        match data.cell(row, "city") {
            Some(CellValue::Text(text)) => assert!(!text.is_empty()),
            other => panic!("expected text cell, got {:?}", other),
        }
    }

    // The blank cell survived untouched
    assert_eq!(data.cell(1, "city"), Some(&CellValue::Text("".to_string())));

    assert_eq!(stats.total_units, 3);
    assert_eq!(stats.converted_units, 2);
    assert_eq!(stats.skipped_units, 1);
}

#[test]
fn test_identity_law_for_every_simplified_pair() {
    let model = ContentModel::PlainText("汉字与文本".to_string());

    for variant in [Variant::Standard, Variant::Hongkong, Variant::Taiwan] {
        for phrases in [false, true] {
            let settings = settings(Script::Simplified, Script::Simplified, variant, phrases);
            assert_eq!(settings.resolve_mode(), None);

            let converter = build_converter(&settings).unwrap();
            assert!(converter.is_none());

            let batch = BatchConverter::new(None);
            let mut sink = RecordingSink::default();
            let (output, _) = batch
                .run(&model, &ColumnSelection::new(), &mut sink)
                .unwrap();
            assert_eq!(output, model);
        }
    }
}

#[test]
fn test_blank_units_survive_every_mode() {
    let table = TabularData::new(
        vec!["value".to_string()],
        vec![
            vec![CellValue::Text("   ".to_string())],
            vec![CellValue::Text("nan".to_string())],
            vec![CellValue::Empty],
        ],
    );
    let model = ContentModel::Tabular(table.clone());

    for mode in ConversionMode::ALL {
        let converter = OpenccConverter::new(mode).unwrap();
        let batch = BatchConverter::new(Some(&converter));
        let mut sink = RecordingSink::default();
        let (output, stats) = batch.run(&model, &select(&["value"]), &mut sink).unwrap();

        assert_eq!(
            output,
            model,
            "mode {} should leave blank units unchanged",
            mode.code()
        );
        assert_eq!(stats.converted_units, 0);
    }
}

#[test]
fn test_already_simplified_text_round_trips_through_t2s() {
    // Converting simplified text with a traditional-to-simplified mode
    // relies on the dictionary's idempotence; assert shape, not glyphs.
    let converter = OpenccConverter::new(ConversionMode::T2s).unwrap();
    let model = ContentModel::PlainText("汉字".to_string());
    let batch = BatchConverter::new(Some(&converter));
    let mut sink = RecordingSink::default();

    let (output, _) = batch.run(&model, &ColumnSelection::new(), &mut sink).unwrap();
    match output {
        ContentModel::PlainText(text) => assert!(!text.is_empty()),
        other => panic!("wrong shape: {}", other.kind_name()),
    }
}

#[test]
fn test_batch_refuses_empty_selection_on_tabular() {
    let converter = OpenccConverter::new(ConversionMode::S2t).unwrap();
    let model = ContentModel::Tabular(city_table());
    let batch = BatchConverter::new(Some(&converter));
    let mut sink = RecordingSink::default();

    let err = batch
        .run(&model, &ColumnSelection::new(), &mut sink)
        .unwrap_err();
    assert!(matches!(err, ConvertError::Usage(_)));
}

#[test]
fn test_worker_emits_ordered_progress_and_one_terminal_event() {
    let model = ContentModel::Tabular(city_table());
    let run_settings = settings(Script::Simplified, Script::Traditional, Variant::Standard, false);

    let (tx, rx) = mpsc::channel();
    let handle = occonv::spawn_run(model, run_settings, select(&["name", "city"]), tx);

    let mut progress = Vec::new();
    let mut terminals = 0;
    let mut finished_shape = None;
    for event in rx {
        match event {
            RunEvent::Progress(state) => progress.push(state),
            RunEvent::Finished { model, .. } => {
                terminals += 1;
                finished_shape = Some(model);
            }
            RunEvent::Failed(e) => panic!("run failed: {}", e),
        }
    }
    handle.join().unwrap();

    assert_eq!(terminals, 1);
    assert_eq!(progress.len(), 6);
    let counts: Vec<usize> = progress.iter().map(|s| s.completed_units).collect();
    assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*counts.last().unwrap(), 6);

    let data = match finished_shape.unwrap() {
        ContentModel::Tabular(data) => data,
        other => panic!("wrong shape: {}", other.kind_name()),
    };
    assert_eq!(data.columns(), city_table().columns());
    assert_eq!(data.row_count(), 3);
}

#[test]
fn test_worker_reports_usage_failure_as_terminal_event() {
    let model = ContentModel::Tabular(city_table());
    let run_settings = settings(Script::Simplified, Script::Traditional, Variant::Taiwan, true);

    let (tx, rx) = mpsc::channel();
    let handle = occonv::spawn_run(model, run_settings, ColumnSelection::new(), tx);

    let mut failures = 0;
    for event in rx {
        match event {
            RunEvent::Failed(ConvertError::Usage(message)) => {
                failures += 1;
                assert!(message.contains("column"));
            }
            RunEvent::Failed(other) => panic!("unexpected failure kind: {:?}", other),
            RunEvent::Progress(_) => panic!("no progress expected before the refusal"),
            RunEvent::Finished { .. } => panic!("run should not finish"),
        }
    }
    handle.join().unwrap();
    assert_eq!(failures, 1);
}

#[test]
fn test_convert_text_helper() {
    let identity = settings(Script::Simplified, Script::Simplified, Variant::Standard, false);
    assert_eq!(occonv::convert_text("汉字", &identity).unwrap(), "汉字");

    let s2t = settings(Script::Simplified, Script::Traditional, Variant::Standard, false);
    let converted = occonv::convert_text("hello 123", &s2t).unwrap();
    assert_eq!(converted, "hello 123");
}

#[test]
fn test_traditional_standard_pair_is_identity_not_reversal() {
    let pair = settings(Script::Traditional, Script::Traditional, Variant::Standard, true);
    assert_eq!(pair.resolve_mode(), None);

    let converter = build_converter(&pair).unwrap();
    assert!(converter.is_none());
}

#[test]
fn test_gateway_converter_reused_across_units() {
    // One construction, many convert calls: the seam the batch relies on.
    let converter = OpenccConverter::new(ConversionMode::S2twp).unwrap();
    for _ in 0..50 {
        converter.convert("软件").unwrap();
    }
}
