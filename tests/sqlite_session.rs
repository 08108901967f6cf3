//! End-to-end sessions against SQLite

mod common;

use common::*;
use sqlsh::SqliteExecutor;

fn sqlite_harness() -> Harness<SqliteExecutor> {
    Harness::new(SqliteExecutor::open(":memory:").unwrap())
}

#[test]
fn test_create_insert_select() {
    let mut h = sqlite_harness();
    h.run(&[
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, note TEXT)\\T",
        "INSERT INTO users (name, note) VALUES ('ann', NULL), ('bob', 'x')\\T",
        "SELECT id, name, note FROM users ORDER BY id\\C",
    ]);

    assert_eq!(
        h.output(),
        "Success\n2 rows affected\n\"id\",\"name\",\"note\"\n\"1\",\"ann\",\n\"2\",\"bob\",\"x\"\n2 rows in set\n"
    );
    assert!(h.errors().is_empty(), "{}", h.errors());
}

#[test]
fn test_default_table_output() {
    let mut h = sqlite_harness();
    h.run(&["SELECT 1;"]);
    assert!(h
        .output()
        .starts_with("┌───┐\n│ 1 │\n├───┤\n│ 1 │\n└───┘\n1 row in set ("));
}

#[test]
fn test_parameters_bind_positionally() {
    let mut h = sqlite_harness();
    h.run(&["SELECT ? AS a, ? IS NULL AS b\\T 7 NULL"]);
    assert_eq!(h.output(), "a\tb\n7\t1\n1 row in set\n");
}

#[test]
fn test_syntax_error_is_reported() {
    let mut h = sqlite_harness();
    let (flow, _) = h.run(&["SELEC 1;", "SELECT 2\\T"]);

    assert_eq!(flow, Flow::Continue);
    assert!(h.errors().contains("syntax error"), "{}", h.errors());
    assert_eq!(h.output(), "2\n2\n1 row in set\n");
}

#[test]
fn test_introspection_commands() {
    let mut h = sqlite_harness();
    h.run(&[
        "CREATE TABLE orders (id INTEGER PRIMARY KEY, total REAL NOT NULL)\\T",
        "*tables\\T",
    ]);
    assert!(h.output().contains("main\torders\ttable\n"), "{}", h.output());

    h.out.clear();
    h.run(&["*columns orders\\T"]);
    let out = h.output();
    assert!(out.starts_with("column\ttype\tnullable\tdefault\tprimary key\n"), "{}", out);
    assert!(out.contains("total\tREAL\t"));

    h.out.clear();
    h.run(&["*columns missing\\T"]);
    assert!(h.errors().contains("No such table"));
}

#[test]
fn test_redirected_csv_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("report.csv");
    let mut h = sqlite_harness();
    let line = format!("SELECT 'a,b' AS v, NULL AS n\\C > {}", target.display());
    h.run(&[line.as_str()]);

    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "\"v\",\"n\"\n\"a,b\",\n1 row in set\n"
    );
}

#[test]
fn test_reconnect_switches_database() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("other.db");
    let mut h = sqlite_harness();
    let line = format!("\\r {}", file.display());
    h.run(&["SELECT 1\\T", line.as_str(), "CREATE TABLE t (x)\\T"]);

    assert!(h.errors().is_empty(), "{}", h.errors());
    assert!(file.exists());
    assert_eq!(h.session.executor().display_name(), "other.db");
}
