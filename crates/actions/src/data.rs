//! Helpers for reading the run data bag.
//!
//! Defined here (in the actions crate) so both the engine's condition
//! evaluator and the message templates can use them without a circular
//! dependency.

use serde_json::{Map, Value};

/// Resolve a dotted field path (`"task.assignee.name"`) against the data bag.
///
/// A missing intermediate key — or indexing into a non-object — yields `None`
/// rather than an error.
pub fn resolve_path<'a>(data: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// String form of a JSON value: strings unquoted, everything else via its
/// JSON rendering.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render `{{field}}` placeholders against the data bag.
///
/// Placeholders support dotted paths; an unresolvable field renders as the
/// empty string. Unterminated braces pass through verbatim.
pub fn render_template(template: &str, data: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let field = after[..end].trim();
                if let Some(value) = resolve_path(data, field) {
                    out.push_str(&stringify(value));
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
