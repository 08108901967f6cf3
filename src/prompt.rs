//! Prompt rendering
//!
//! `{db}` expands to the connection's display name and `{line}` to the
//! number of the buffer line being typed. `{{` and `}}` are literal braces;
//! unknown placeholders are kept as written.

pub fn render_prompt(template: &str, db: &str, line: usize) -> String {
    let mut out = String::with_capacity(template.len() + db.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with("{{") || rest.starts_with("}}") {
            out.push_str(&rest[..1]);
            rest = &rest[2..];
        } else if let Some(tail) = rest.strip_prefix("{db}") {
            out.push_str(db);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("{line}") {
            out.push_str(&line.to_string());
            rest = tail;
        } else {
            out.push_str(&rest[..1]);
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}
