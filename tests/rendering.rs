//! Rendering properties and parameter tokenizing

use std::time::Duration;

use sqlsh::formatter::{OutputFormat, OutputFormatter, NULL_DISPLAY};
use sqlsh::parser::{Pipeline, Tokenizer};
use sqlsh::results::{ResultBundle, ResultSet};
use unicode_width::UnicodeWidthStr;

const ALL_FORMATS: [OutputFormat; 6] = [
    OutputFormat::Horizontal,
    OutputFormat::Vertical,
    OutputFormat::Csv,
    OutputFormat::Tsv,
    OutputFormat::List,
    OutputFormat::Flat,
];

fn render(bundle: &ResultBundle, format: OutputFormat) -> String {
    let mut out = Vec::new();
    OutputFormatter::new(format).render(bundle, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn users() -> ResultBundle {
    let mut set = ResultSet::with_columns(["id", "name", "note"]);
    set.push_values([Some("1"), Some("ann"), None]).unwrap();
    set.push_values([Some("2"), Some("björn"), Some("line one\nline two")])
        .unwrap();
    set.push_values([Some("3"), Some("漢字"), Some("")]).unwrap();
    ResultBundle::single(set.with_elapsed(Duration::from_micros(1500)))
        .with_warning("1 value truncated")
}

#[test]
fn test_rendering_is_deterministic() {
    let bundle = users();
    for format in ALL_FORMATS {
        assert_eq!(render(&bundle, format), render(&bundle, format), "{}", format);
    }
}

#[test]
fn test_warnings_follow_all_sets_once() {
    let mut bundle = users();
    bundle.push_set(ResultSet::affected(2));
    for format in ALL_FORMATS {
        let out = render(&bundle, format);
        assert_eq!(out.matches("Warning: 1 value truncated").count(), 1);
        assert!(out.ends_with("Warning: 1 value truncated\n"));
    }
}

#[test]
fn test_zero_rows_render_header_and_footer() {
    let set = ResultSet::with_columns(["id", "name"]);
    let out = render(&ResultBundle::single(set), OutputFormat::Horizontal);
    assert_eq!(
        out,
        "┌────┬──────┐\n│ id │ name │\n├────┼──────┤\n└────┴──────┘\n0 rows in set (0.000000 sec)\n"
    );
}

#[test]
fn test_embedded_newlines_make_sub_rows() {
    let mut set = ResultSet::with_columns(["a", "b"]);
    set.push_values([Some("x"), Some("1\n2\n3")]).unwrap();
    let out = render(&ResultBundle::single(set), OutputFormat::Horizontal);
    let lines: Vec<&str> = out.lines().collect();

    // top, header, separator, three sub-rows, bottom, footer
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[3], "│ x │ 1 │");
    assert_eq!(lines[4], "│   │ 2 │");
    assert_eq!(lines[5], "│   │ 3 │");
}

#[test]
fn test_wide_characters_align() {
    let out = render(&users(), OutputFormat::Horizontal);
    let widths: Vec<usize> = out
        .lines()
        .take_while(|l| !l.starts_with("└"))
        .map(|l| l.width())
        .collect();
    assert!(widths.windows(2).all(|w| w[0] == w[1]), "{}", out);
}

#[test]
fn test_null_sentinel_per_format() {
    let mut set = ResultSet::with_columns(["a", "b", "c"]);
    set.push_values([Some("x"), None, Some("y")]).unwrap();
    let bundle = ResultBundle::single(set);

    for format in [
        OutputFormat::Horizontal,
        OutputFormat::Vertical,
        OutputFormat::List,
        OutputFormat::Flat,
    ] {
        assert!(render(&bundle, format).contains(NULL_DISPLAY), "{}", format);
    }

    let csv = render(&bundle, OutputFormat::Csv);
    assert!(csv.contains("\"x\",,\"y\"\n"));
    assert!(!csv.contains(NULL_DISPLAY));

    let tsv = render(&bundle, OutputFormat::Tsv);
    assert!(tsv.contains("x\t\ty\n"));
}

#[test]
fn test_footers() {
    let mut bundle = ResultBundle::new();
    bundle.push_set(ResultSet::affected(1));
    bundle.push_set(ResultSet::affected(0));
    bundle.push_set(ResultSet::success());
    assert_eq!(
        render(&bundle, OutputFormat::Csv),
        "1 row affected\n\n0 rows affected\n\nSuccess\n"
    );
    assert_eq!(
        render(&bundle, OutputFormat::Vertical),
        "1 row affected (0.000000 sec)\n\n0 rows affected (0.000000 sec)\n\nSuccess (0.000000 sec)\n"
    );
}

#[test]
fn test_elapsed_has_microsecond_precision() {
    let set = ResultSet::success().with_elapsed(Duration::from_micros(2_000_345));
    let out = render(&ResultBundle::single(set), OutputFormat::Horizontal);
    assert_eq!(out, "Success (2.000345 sec)\n");
}

#[test]
fn test_tokenize_quoted_tokens_and_pipe() {
    let parsed = Tokenizer::default().tokenize("\"a b\" c|less");
    assert_eq!(parsed.tokens(), &["a b".to_string(), "c".to_string()]);
    assert_eq!(parsed.pipeline(), Some(&Pipeline::Pipe("less".into())));
}

#[test]
fn test_tokenize_escapes_and_redirect() {
    let parsed = Tokenizer::default().tokenize(r#" it\'s 'x "y"' a\>b > out.txt"#);
    assert_eq!(
        parsed.tokens(),
        &["it's".to_string(), "x \"y\"".to_string(), "a>b".to_string()]
    );
    assert_eq!(parsed.pipeline(), Some(&Pipeline::Redirect("out.txt".into())));
}
