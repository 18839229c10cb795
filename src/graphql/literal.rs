//! Rendering of GraphQL input values.
//!
//! Documents sent to the API carry their arguments inline. Every user-supplied
//! value reaches the document text through [`Literal`], so string escaping
//! happens here and nowhere else.

use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    /// Enum values come from closed Rust enums, never from user text.
    Enum(&'static str),
    Null,
    List(Vec<Literal>),
    Object(Vec<(&'static str, Literal)>),
}

impl Literal {
    pub fn string(s: impl Into<String>) -> Self {
        Literal::String(s.into())
    }

    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Literal::List(items.into_iter().map(|s| Literal::String(s.into())).collect())
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Float(n)
    }
}

/// Escape a string for use between double quotes in a GraphQL document.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{}\"", escape(s)),
            Literal::Int(n) => write!(f, "{n}"),
            // Non-finite floats have no GraphQL spelling.
            Literal::Float(n) if !n.is_finite() => f.write_str("null"),
            Literal::Float(n) => write!(f, "{n}"),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Enum(name) => f.write_str(name),
            Literal::Null => f.write_str("null"),
            Literal::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Literal::Object(fields) => {
                if fields.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                write_arguments(f, fields)?;
                f.write_str(" }")
            }
        }
    }
}

fn write_arguments(f: &mut fmt::Formatter<'_>, fields: &[(&'static str, Literal)]) -> fmt::Result {
    for (i, (name, value)) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}: {value}")?;
    }
    Ok(())
}

/// An ordered argument list, rendered as `a: 1, b: "x"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Vec<(&'static str, Literal)>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<Literal>) -> &mut Self {
        self.0.push((name, value.into()));
        self
    }

    pub fn extend(&mut self, fields: impl IntoIterator<Item = (&'static str, Literal)>) -> &mut Self {
        self.0.extend(fields);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_object(self) -> Literal {
        Literal::Object(self.0)
    }

    pub fn into_fields(self) -> Vec<(&'static str, Literal)> {
        self.0
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_arguments(f, &self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_newlines() {
        let lit = Literal::string("say \"hi\"\nthen\rleave");
        assert_eq!(lit.to_string(), r#""say \"hi\"\nthen\rleave""#);
    }

    #[test]
    fn escapes_backslash_before_quote() {
        // A trailing backslash must not swallow the closing quote.
        let lit = Literal::string("C:\\temp\\");
        assert_eq!(lit.to_string(), r#""C:\\temp\\""#);
    }

    #[test]
    fn injection_attempt_stays_inside_the_string() {
        let lit = Literal::string("x\") { id } mutation { deleteTodo(id: \"y");
        let rendered = lit.to_string();
        assert!(rendered.starts_with('"') && rendered.ends_with('"'));
        assert_eq!(rendered.matches("\\\"").count(), 2);
    }

    #[test]
    fn escapes_other_control_characters() {
        assert_eq!(escape("a\u{0007}b\tc"), "a\\u0007b\\tc");
    }

    #[test]
    fn floats_render_without_trailing_zero() {
        assert_eq!(Literal::Float(42.0).to_string(), "42");
        assert_eq!(Literal::Float(-122.4194).to_string(), "-122.4194");
        assert_eq!(Literal::Float(f64::NAN).to_string(), "null");
    }

    #[test]
    fn renders_nested_structures() {
        let mut args = Arguments::new();
        args.push("todoId", "rec1")
            .push("customFieldOptionIds", Literal::strings(["a", "b"]))
            .push("placement", Literal::Enum("BOTTOM"))
            .push("tags", Literal::List(vec![Literal::Object(vec![("id", "t1".into())])]));
        assert_eq!(
            args.to_string(),
            r#"todoId: "rec1", customFieldOptionIds: ["a", "b"], placement: BOTTOM, tags: [{ id: "t1" }]"#
        );
    }

    #[test]
    fn empty_object_and_list() {
        assert_eq!(Literal::Object(vec![]).to_string(), "{}");
        assert_eq!(Literal::List(vec![]).to_string(), "[]");
    }
}
