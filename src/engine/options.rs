//! Ordered option maps and their DuckDB literal rendering
//!
//! Secret declarations, `COPY ... TO` statements, and `read_*` table
//! functions all take option lists, but with two different syntaxes:
//! statement options are `name value` pairs (`format csv, header true`),
//! table-function arguments are `name = value` pairs
//! (`read_csv('f.csv', delim = ';')`). Both renderings live here.
//!
//! The engine is the authority on which option names are legal; this module
//! is a pure syntactic transform and validates nothing. Key order is
//! preserved from the configuration so output is deterministic.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single option value in engine-native literal syntax
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<OptionValue>),
}

impl OptionValue {
    /// Render for statement-style option lists (secrets, COPY options).
    ///
    /// Identifier-like strings are emitted bare (`type s3`), anything else is
    /// single-quoted with `''` escaping. Lists are parenthesized.
    pub fn statement_literal(&self) -> String {
        match self {
            OptionValue::Bool(b) => b.to_string(),
            OptionValue::Int(i) => i.to_string(),
            OptionValue::Float(f) => f.to_string(),
            OptionValue::Str(s) if is_bare_word(s) => s.clone(),
            OptionValue::Str(s) => quote(s),
            OptionValue::List(items) => {
                let rendered: Vec<String> =
                    items.iter().map(OptionValue::statement_literal).collect();
                format!("({})", rendered.join(", "))
            }
        }
    }

    /// Render for table-function named arguments (`read_csv(..., name = value)`).
    ///
    /// Strings are always quoted here; a bare word in argument position would
    /// parse as a column reference. Lists use bracket syntax.
    pub fn argument_literal(&self) -> String {
        match self {
            OptionValue::Bool(b) => b.to_string(),
            OptionValue::Int(i) => i.to_string(),
            OptionValue::Float(f) => f.to_string(),
            OptionValue::Str(s) => quote(s),
            OptionValue::List(items) => {
                let rendered: Vec<String> =
                    items.iter().map(OptionValue::argument_literal).collect();
                format!("[{}]", rendered.join(", "))
            }
        }
    }

    /// Render as plain text, for literal placeholder substitution into query
    /// text. Strings are emitted verbatim, unquoted.
    pub fn plain(&self) -> String {
        match self {
            OptionValue::Str(s) => s.clone(),
            OptionValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(OptionValue::plain).collect();
                rendered.join(", ")
            }
            other => other.statement_literal(),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Int(i)
    }
}

impl From<f64> for OptionValue {
    fn from(f: f64) -> Self {
        OptionValue::Float(f)
    }
}

/// Single-quote a string with `''` escaping
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// True for strings the engine accepts as bare identifiers
fn is_bare_word(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// An insertion-ordered option map
///
/// # Example
/// ```
/// use mallard::engine::Options;
///
/// let mut options = Options::new();
/// options.push("type", "s3");
/// options.push("provider", "credential_chain");
///
/// assert_eq!(options.to_copy_options(), "type s3, provider credential_chain");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options(Vec<(String, OptionValue)>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option, preserving insertion order
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as a statement-style option list: `name value` pairs joined by
    /// `", "`, in insertion order
    pub fn to_copy_options(&self) -> String {
        let pairs: Vec<String> = self
            .0
            .iter()
            .map(|(name, value)| format!("{} {}", name, value.statement_literal()))
            .collect();
        pairs.join(", ")
    }

    /// Render as table-function named arguments: `name = value` pairs joined
    /// by `", "`, in insertion order
    pub fn to_function_args(&self) -> String {
        let pairs: Vec<String> = self
            .0
            .iter()
            .map(|(name, value)| format!("{} = {}", name, value.argument_literal()))
            .collect();
        pairs.join(", ")
    }
}

impl FromIterator<(String, OptionValue)> for Options {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Options(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for Options {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Options(ordered_pairs(deserializer)?))
    }
}

/// Deserialize a map into a `Vec` of pairs, preserving key order
///
/// Standard map types lose insertion order; option and secret declarations
/// are order-sensitive, so config mappings deserialize through this instead.
pub(crate) fn ordered_pairs<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct PairsVisitor<V>(std::marker::PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                pairs.push(entry);
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor(std::marker::PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_options_order_and_content() {
        let mut options = Options::new();
        options.push("type", "s3");
        options.push("provider", "credential_chain");

        let rendered = options.to_copy_options();
        assert_eq!(rendered, "type s3, provider credential_chain");

        // key order is insertion order
        let type_pos = rendered.find("type s3").unwrap();
        let provider_pos = rendered.find("provider credential_chain").unwrap();
        assert!(type_pos < provider_pos);
    }

    #[test]
    fn test_non_identifier_strings_are_quoted() {
        let mut options = Options::new();
        options.push("scope", "s3://bucket/prefix");
        options.push("key_id", "AKIA123");

        assert_eq!(
            options.to_copy_options(),
            "scope 's3://bucket/prefix', key_id AKIA123"
        );
    }

    #[test]
    fn test_quote_escaping() {
        let value = OptionValue::from("it's");
        assert_eq!(value.statement_literal(), "'it''s'");
    }

    #[test]
    fn test_function_args_always_quote_strings() {
        let mut options = Options::new();
        options.push("delim", ";");
        options.push("header", true);
        options.push("sample_size", 1024_i64);

        assert_eq!(
            options.to_function_args(),
            "delim = ';', header = true, sample_size = 1024"
        );
    }

    #[test]
    fn test_list_rendering() {
        let list = OptionValue::List(vec![OptionValue::from("a"), OptionValue::from("b c")]);
        assert_eq!(list.statement_literal(), "(a, 'b c')");
        assert_eq!(list.argument_literal(), "['a', 'b c']");
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let options: Options =
            json5::from_str(r#"{ zebra: 1, alpha: "two", mid: true }"#).unwrap();

        let keys: Vec<&str> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zebra", "alpha", "mid"]);
        assert_eq!(options.to_copy_options(), "zebra 1, alpha two, mid true");
    }

    #[test]
    fn test_empty_options_render_empty() {
        let options = Options::new();
        assert_eq!(options.to_copy_options(), "");
        assert!(options.is_empty());
    }
}
