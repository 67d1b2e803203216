use motif_core::counters::output_grammar;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrammarFixtures {
    grammar_cases: Vec<GrammarCase>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrammarCase {
    id: String,
    grammar: String,
    file: String,
    rows: usize,
    columns: Vec<String>,
    first_row: BTreeMap<String, serde_json::Value>,
}

fn load_fixtures() -> GrammarFixtures {
    let path = fixtures_dir().join("grammar_cases.json");
    let source = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("fixture manifest {} should be readable", path.display()));
    serde_json::from_str(&source).expect("fixture manifest should deserialize")
}

#[test]
fn grammar_fixtures_parse_to_expected_tables() {
    let fixtures = load_fixtures();
    assert!(!fixtures.grammar_cases.is_empty());

    for case in fixtures.grammar_cases {
        let grammar = output_grammar(&case.grammar)
            .unwrap_or_else(|error| panic!("{}: grammar should resolve: {}", case.id, error));
        let table = grammar
            .parse_file(&fixtures_dir().join(&case.file))
            .unwrap_or_else(|error| panic!("{}: fixture should parse: {}", case.id, error));

        assert_eq!(table.len(), case.rows, "{} row count", case.id);
        assert_eq!(table.columns(), case.columns.as_slice(), "{} columns", case.id);

        let first = serde_json::to_value(&table.rows()[0]).expect("row should serialize");
        for (column, expected) in &case.first_row {
            assert_eq!(
                first.get(column),
                Some(expected),
                "{} first row column '{}'",
                case.id,
                column
            );
        }
    }
}

#[test]
fn netmode_fixture_keeps_non_finite_statistics() {
    let grammar = output_grammar("netmode").expect("grammar should resolve");
    let table = grammar
        .parse_file(&fixtures_dir().join("netmode_stdout.txt"))
        .expect("fixture should parse");
    let zscores = table.column("f-ZScore");
    let second = zscores[1]
        .and_then(|value| value.as_f64())
        .expect("second z-score should be a float");
    assert!(second.is_infinite() && second.is_sign_negative());
    let third = zscores[2]
        .and_then(|value| value.as_f64())
        .expect("third z-score should be a float");
    assert!(third.is_nan());
}

#[test]
fn missing_fixture_file_is_io_error() {
    let grammar = output_grammar("pgd").expect("grammar should resolve");
    let error = grammar
        .parse_file(&fixtures_dir().join("does_not_exist.txt"))
        .expect_err("missing file should fail");
    assert_eq!(error.placeholder(), "IO.OUTPUT_READ");
    assert_eq!(error.exit_code(), 7);
}
