//! Plain-text rendering of resources, driven by each kind's field schema.

use std::io::{self, Write};

use itorg_core::{FieldInput, Resource, ResourceKind};
use serde_json::Value;

/// Placeholder for empty optional fields.
const EMPTY: &str = "—";

/// Write one record as `#id` followed by one `label: value` line per field.
pub fn record<R: Resource>(out: &mut impl Write, item: &R) -> io::Result<()> {
    let value = serde_json::to_value(item).map_err(io::Error::other)?;

    writeln!(out, "#{}", item.id())?;
    for field in R::KIND.fields() {
        let text = match value.get(field.name) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_) | Value::Null) | None => EMPTY.to_string(),
            Some(other) => other.to_string(),
        };
        writeln!(out, "  {}: {text}", field.label)?;
    }
    Ok(())
}

/// Write a whole list, or a placeholder line when it is empty.
pub fn list<R: Resource>(out: &mut impl Write, items: &[R], stale: bool) -> io::Result<()> {
    if stale {
        writeln!(out, "(could not refresh; showing last known {})", R::KIND)?;
    }
    if items.is_empty() {
        return writeln!(out, "No {} yet.", R::KIND);
    }
    for item in items {
        record(out, item)?;
    }
    Ok(())
}

/// Describe the fields of a resource kind.
pub fn schema(out: &mut impl Write, kind: ResourceKind) -> io::Result<()> {
    writeln!(out, "{kind}:")?;
    for field in kind.fields() {
        let input = match field.input {
            FieldInput::Text => "text".to_string(),
            FieldInput::LongText => "long text".to_string(),
            FieldInput::Choice(values) => format!("one of {}", values.join(" | ")),
        };
        let optional = if field.optional { " (optional)" } else { "" };
        writeln!(out, "  {:<16} {}{optional} - {}", field.name, input, field.label)?;
    }
    Ok(())
}
