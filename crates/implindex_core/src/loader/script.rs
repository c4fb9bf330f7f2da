//! Parser for rustdoc implementor scripts.
//!
//! A script assigns one object literal to `implementors`, keyed by crate name,
//! and hands it to the page registry (or parks it for later):
//!
//! ```text
//! (function() {var implementors = {
//! "oxc_ast":[["impl <a ..>Default</a> for <a ..>Span</a>"]],
//! };if (window.register_implementors) {...} else {...}})()
//! ```
//!
//! Only the object literal is read; the surrounding registration code is
//! replaced by [`crate::registry::ImplementorRegistry`].

use crate::loader::LoadError;
use crate::model::descriptor::Descriptor;
use crate::model::fragment::Fragment;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;
use std::fmt::Formatter;

static IMPLEMENTORS_ASSIGNMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:var|let|const)\s+implementors\s*=\s*").expect("valid assignment regex")
});

/// Parses one implementor script into a fragment.
///
/// Symbol order follows the object literal. Each entry is either a string or
/// an array whose first element is the rendered markup string.
///
/// # Errors
/// - `MissingImplementorTable` when no `implementors` assignment is found.
/// - `Json` when the object literal is not valid JSON.
/// - `InvalidSymbolValue` / `InvalidEntry` for unexpected entry shapes.
/// - `Malformed` when the resulting fragment fails validation.
pub fn parse_implementors_script(scope: Option<&str>, text: &str) -> Result<Fragment, LoadError> {
    let assignment = IMPLEMENTORS_ASSIGNMENT_RE
        .find(text)
        .ok_or(LoadError::MissingImplementorTable)?;
    let literal = &text[assignment.end()..];

    let mut stream = serde_json::Deserializer::from_str(literal).into_iter::<ImplementorTable>();
    let table = match stream.next() {
        Some(table) => table.map_err(LoadError::Json)?,
        None => return Err(LoadError::MissingImplementorTable),
    };

    let mut fragment = match scope {
        Some(scope) => Fragment::scoped(scope),
        None => Fragment::new(),
    };
    for (symbol, value) in table.0 {
        let descriptors = parse_entries(&symbol, value)?;
        fragment = fragment.with_symbol(symbol, descriptors);
    }

    fragment.validate().map_err(LoadError::Malformed)?;
    Ok(fragment)
}

/// Object literal read as ordered `(key, value)` pairs.
///
/// Repeated keys are kept so validation can reject them instead of letting the
/// later value overwrite the earlier one.
struct ImplementorTable(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for ImplementorTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ImplementorTableVisitor)
    }
}

struct ImplementorTableVisitor;

impl<'de> Visitor<'de> for ImplementorTableVisitor {
    type Value = ImplementorTable;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("an object mapping crate names to implementor entries")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(pair) = map.next_entry::<String, Value>()? {
            pairs.push(pair);
        }
        Ok(ImplementorTable(pairs))
    }
}

fn parse_entries(symbol: &str, value: Value) -> Result<Vec<Descriptor>, LoadError> {
    let Value::Array(entries) = value else {
        return Err(LoadError::InvalidSymbolValue(symbol.to_string()));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            markup_of(entry).map(Descriptor::new).ok_or_else(|| LoadError::InvalidEntry {
                symbol: symbol.to_string(),
                index,
            })
        })
        .collect()
}

fn markup_of(entry: Value) -> Option<String> {
    match entry {
        Value::String(markup) => Some(markup),
        Value::Array(parts) => match parts.into_iter().next() {
            Some(Value::String(markup)) => Some(markup),
            _ => None,
        },
        _ => None,
    }
}
