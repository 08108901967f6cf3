//! Command-mode buffers (`*name args` followed by any executing action)

mod common;

use common::*;
use sqlsh::commands::{HELP_INTRO, HELP_NOT_FOUND};

#[test]
fn test_introspection_commands_route_to_executor() {
    let mut h = Harness::new(FakeExecutor::new());
    h.run(&["*catalogs;", "*SCHEMAS;", "*tab;", "*tables aux.us%;", "*col users;", "*in;"]);

    assert_eq!(
        h.session.executor().calls,
        vec![
            Call::Catalogs,
            Call::Schemas,
            Call::Tables(ObjectSpec::default()),
            Call::Tables(ObjectSpec {
                catalog: Some("aux".into()),
                name: Some("us%".into())
            }),
            Call::Columns(ObjectSpec {
                catalog: None,
                name: Some("users".into())
            }),
            Call::Info,
        ]
    );
    assert!(h.errors().is_empty());
}

#[test]
fn test_command_output_uses_action_format() {
    let mut h = Harness::new(FakeExecutor::new());
    h.run(&["*tables\\C"]);
    assert_eq!(h.output(), "\"name\"\n\"users\"\n1 row in set\n");
}

#[test]
fn test_command_is_recorded_and_repeatable() {
    let mut h = Harness::new(FakeExecutor::new());
    let (_, reader) = h.run(&["  *catalogs", ";", "\\T"]);

    assert_eq!(
        h.session.executor().calls,
        vec![Call::Catalogs, Call::Catalogs]
    );
    assert_eq!(
        reader.history(),
        &["  *catalogs ;".to_string(), "  *catalogs \\T".to_string()]
    );
}

#[test]
fn test_ambiguous_and_unknown_commands() {
    let mut h = Harness::new(FakeExecutor::new());
    h.run(&["*s;", "*bogus;"]);

    let errors = h.errors();
    assert!(errors.contains("Ambiguous command 's' (could be schemas, set)"));
    assert!(errors.contains("Unrecognised command: bogus"));
    assert!(h.session.executor().calls.is_empty());
}

#[test]
fn test_columns_requires_table() {
    let mut h = Harness::new(FakeExecutor::new());
    h.run(&["*columns;"]);
    assert!(h.errors().contains("Usage: columns"));
}

#[test]
fn test_help_overview_and_topics() {
    let mut h = Harness::new(FakeExecutor::new());
    h.run(&["*help;"]);
    assert_eq!(h.output(), format!("{}\n", HELP_INTRO));

    h.out.clear();
    h.run(&["*help nothing;"]);
    assert_eq!(h.output(), format!("{}\n", HELP_NOT_FOUND));

    h.out.clear();
    h.run(&["*;"]);
    assert_eq!(h.output(), format!("{}\n", HELP_INTRO));
}

#[test]
fn test_set_and_unset_variables() {
    let mut h = Harness::new(FakeExecutor::new());
    h.run(&["*set pager more\\C"]);
    assert_eq!(
        h.output(),
        "\"name\",\"value\"\n\"pager\",\"more\"\n1 row in set\n"
    );
    assert_eq!(h.session.variables().pager(), "more");

    h.out.clear();
    h.run(&["*unset PAGER\\C"]);
    assert_eq!(
        h.output(),
        "\"name\",\"value\"\n\"pager\",\"less -S\"\n1 row in set\n"
    );
    assert_eq!(h.session.variables().pager(), "less -S");

    h.out.clear();
    h.run(&["*unset pager\\C"]);
    assert!(h.output().ends_with("Warning: No session value for pager\n"));
}

#[test]
fn test_set_shows_missing_variable() {
    let mut h = Harness::new(FakeExecutor::new());
    h.run(&["*set editor\\C"]);
    assert_eq!(
        h.output(),
        "\"name\",\"value\"\n\"editor\",\n1 row in set\nWarning: Variable not set\n"
    );
}

#[test]
fn test_set_lists_variables() {
    let mut h = Harness::new(FakeExecutor::new());
    h.run(&["*set\\L"]);
    let out = h.output();
    assert!(out.starts_with("name: action_chars, color, command_chars, default_action"));
    assert!(out.contains("value: \\;, false, *, g"));
}

#[test]
fn test_set_changes_triggers_for_next_line() {
    let mut h = Harness::new(FakeExecutor::new());
    h.run(&["*set action_chars /;", "SELECT 1/", "SELECT 2;", "/"]);

    assert_eq!(h.session.executor().executed(), vec!["SELECT 1", "SELECT 2;\n"]);
}

#[test]
fn test_reconnect_command() {
    let mut h = Harness::new(FakeExecutor::new());
    h.run(&["*reconnect next.db;"]);

    assert_eq!(
        h.session.executor().calls,
        vec![Call::Reconnect(Some("next.db".into())), Call::Info]
    );
    assert_eq!(h.session.executor().display_name(), "next.db");
}
