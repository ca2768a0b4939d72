//! Raw algorithm input and its best-effort normalization.
//!
//! Normalization never fails. Whatever cannot be read as a number is kept
//! as a text token.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Input as supplied by a caller, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInput {
    /// A lone number
    Number(#[serde(serialize_with = "serialize_number")] f64),
    /// A JSON list
    List(Vec<Value>),
    /// Free text: a JSON document or comma-separated values
    Text(String),
    /// An array together with an explicit search target
    Query(SearchQuery),
    /// Anything else
    Other(Value),
}

/// Array plus target for search algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub array: Vec<Value>,
    #[serde(serialize_with = "serialize_number")]
    pub target: f64,
}

impl RawInput {
    /// True for blank text, the only input the HTTP boundary rejects.
    pub fn is_empty(&self) -> bool {
        match self {
            RawInput::Text(text) => text.trim().is_empty(),
            RawInput::Other(Value::Null) => true,
            _ => false,
        }
    }

    /// Normalize into tokens.
    pub fn normalize(&self) -> NormalizedInput {
        match self {
            RawInput::Number(n) => NormalizedInput::from_tokens(vec![Token::Number(*n)]),
            RawInput::List(values) => {
                NormalizedInput::from_tokens(values.iter().map(Token::from_value).collect())
            }
            RawInput::Text(text) => normalize_text(text),
            RawInput::Query(query) => NormalizedInput {
                values: query.array.iter().map(Token::from_value).collect(),
                target: Some(query.target),
            },
            RawInput::Other(value) => normalize_value(value),
        }
    }
}

impl From<f64> for RawInput {
    fn from(n: f64) -> Self {
        RawInput::Number(n)
    }
}

impl From<Vec<f64>> for RawInput {
    fn from(values: Vec<f64>) -> Self {
        RawInput::List(values.into_iter().map(Value::from).collect())
    }
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        RawInput::Text(text.to_owned())
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        RawInput::Text(text)
    }
}

/// One normalized input element.
///
/// Serializes as a bare JSON number or string; integral numbers go out
/// without a fractional part.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Number(f64),
    Text(String),
}

impl Serialize for Token {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Token::Number(n) => serialize_number(n, serializer),
            Token::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Write `64.0` as `64`, matching [`format_number`].
pub(crate) fn serialize_number<S>(n: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if is_integral(*n) {
        serializer.serialize_i64(*n as i64)
    } else {
        serializer.serialize_f64(*n)
    }
}

pub(crate) fn serialize_opt_number<S>(n: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match n {
        Some(n) => serialize_number(n, serializer),
        None => serializer.serialize_none(),
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15
}

impl Token {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(Token::Number).unwrap_or_else(|| Token::Text(n.to_string())),
            Value::String(s) => Token::Text(s.clone()),
            other => Token::Text(other.to_string()),
        }
    }

    /// Coerce one comma-separated piece.
    fn coerce(piece: &str) -> Self {
        match piece.parse::<f64>() {
            Ok(n) if n.is_finite() => Token::Number(n),
            _ => Token::Text(piece.to_owned()),
        }
    }

    /// The numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Token::Number(n) => Some(*n),
            Token::Text(_) => None,
        }
    }

    /// Strict ordering used by comparison sorts.
    ///
    /// Numbers compare numerically and text lexicographically. A number and
    /// a text token are never greater than one another.
    pub fn is_greater_than(&self, other: &Token) -> bool {
        match (self, other) {
            (Token::Number(a), Token::Number(b)) => a > b,
            (Token::Text(a), Token::Text(b)) => a > b,
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => f.write_str(&format_number(*n)),
            Token::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Token {
    fn from(n: f64) -> Self {
        Token::Number(n)
    }
}

/// Render a number the way the trace messages show it: integral values
/// without a fractional part.
pub fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Render a sequence as `[a, b, c]`.
pub fn format_list<T: fmt::Display>(items: &[T]) -> String {
    let joined = items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
    format!("[{joined}]")
}

/// Result of normalizing a [`RawInput`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedInput {
    pub values: Vec<Token>,
    /// Only set when the caller supplied an explicit search target.
    pub target: Option<f64>,
}

impl NormalizedInput {
    pub fn from_tokens(values: Vec<Token>) -> Self {
        Self { values, target: None }
    }

    /// The numeric tokens, in input order.
    pub fn numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(Token::as_number).collect()
    }

    /// The single number when the input is exactly one numeric token.
    pub fn lone_number(&self) -> Option<f64> {
        match self.values.as_slice() {
            [Token::Number(n)] => Some(*n),
            _ => None,
        }
    }
}

fn normalize_text(text: &str) -> NormalizedInput {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return normalize_value(&value);
    }

    let values: Vec<Token> = text
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(Token::coerce)
        .collect();

    if values.is_empty() {
        return NormalizedInput::from_tokens(vec![Token::Text(text.to_owned())]);
    }
    NormalizedInput::from_tokens(values)
}

fn normalize_value(value: &Value) -> NormalizedInput {
    match value {
        Value::Array(items) => NormalizedInput::from_tokens(items.iter().map(Token::from_value).collect()),
        Value::Object(map) => match (map.get("array"), map.get("target").and_then(Value::as_f64)) {
            (Some(Value::Array(items)), Some(target)) => NormalizedInput {
                values: items.iter().map(Token::from_value).collect(),
                target: Some(target),
            },
            _ => NormalizedInput::from_tokens(vec![Token::Text(value.to_string())]),
        },
        scalar => NormalizedInput::from_tokens(vec![Token::from_value(scalar)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_serialize_like_their_display() {
        let tokens = [
            Token::Number(64.0),
            Token::Number(-3.0),
            Token::Number(2.5),
            Token::Text("x".into()),
        ];
        assert_eq!(serde_json::to_string(&tokens).unwrap(), r#"[64,-3,2.5,"x"]"#);

        let back: Vec<Token> = serde_json::from_str("[64,2.5,\"x\"]").unwrap();
        assert_eq!(back, [Token::Number(64.0), Token::Number(2.5), Token::Text("x".into())]);
    }

    fn numbers(values: &[f64]) -> Vec<Token> {
        values.iter().copied().map(Token::Number).collect()
    }

    #[test]
    fn list_is_taken_as_is() {
        let input = RawInput::from(vec![3.0, 1.0, 2.0]);
        assert_eq!(input.normalize().values, numbers(&[3.0, 1.0, 2.0]));
    }

    #[test]
    fn number_is_wrapped() {
        let normalized = RawInput::Number(23.0).normalize();
        assert_eq!(normalized.values, numbers(&[23.0]));
        assert_eq!(normalized.lone_number(), Some(23.0));
        assert_eq!(normalized.target, None);
    }

    #[test]
    fn text_json_array() {
        let normalized = RawInput::from("[64, 34, 25]").normalize();
        assert_eq!(normalized.values, numbers(&[64.0, 34.0, 25.0]));
    }

    #[test]
    fn text_json_scalar_is_wrapped() {
        assert_eq!(RawInput::from("23").normalize().values, numbers(&[23.0]));
        assert_eq!(
            RawInput::from("\"a,b\"").normalize().values,
            vec![Token::Text("a,b".into())]
        );
    }

    #[test]
    fn text_comma_split_with_coercion() {
        let normalized = RawInput::from("5, 3,x , 1.5").normalize();
        assert_eq!(
            normalized.values,
            vec![
                Token::Number(5.0),
                Token::Number(3.0),
                Token::Text("x".into()),
                Token::Number(1.5),
            ]
        );
    }

    #[test]
    fn empty_pieces_are_dropped() {
        assert_eq!(RawInput::from("1,,2").normalize().values, numbers(&[1.0, 2.0]));
    }

    #[test]
    fn unusable_text_is_one_opaque_token() {
        let normalized = RawInput::from(" , ").normalize();
        assert_eq!(normalized.values, vec![Token::Text(" , ".into())]);
    }

    #[test]
    fn non_finite_text_stays_text() {
        assert_eq!(
            RawInput::from("NaN, inf").normalize().values,
            vec![Token::Text("NaN".into()), Token::Text("inf".into())]
        );
    }

    #[test]
    fn query_carries_target() {
        let raw: RawInput =
            serde_json::from_str(r#"{"array":[2,5,8],"target":5}"#).unwrap();
        assert!(matches!(raw, RawInput::Query(_)));

        let normalized = raw.normalize();
        assert_eq!(normalized.values, numbers(&[2.0, 5.0, 8.0]));
        assert_eq!(normalized.target, Some(5.0));
    }

    #[test]
    fn query_inside_text() {
        let normalized = RawInput::from(r#"{"array":[1,2],"target":2}"#).normalize();
        assert_eq!(normalized.target, Some(2.0));
    }

    #[test]
    fn other_json_becomes_text() {
        let raw: RawInput = serde_json::from_str(r#"{"A":["B"]}"#).unwrap();
        assert!(matches!(raw, RawInput::Other(_)));
        assert_eq!(raw.normalize().values, vec![Token::Text(r#"{"A":["B"]}"#.into())]);

        let raw: RawInput = serde_json::from_str("true").unwrap();
        assert_eq!(raw.normalize().values, vec![Token::Text("true".into())]);
    }

    #[test]
    fn untagged_deserialization_picks_shape() {
        let raw: RawInput = serde_json::from_str("7").unwrap();
        assert_eq!(raw, RawInput::Number(7.0));
        let raw: RawInput = serde_json::from_str(r#"[1,"a"]"#).unwrap();
        assert!(matches!(raw, RawInput::List(_)));
        let raw: RawInput = serde_json::from_str(r#""1,2""#).unwrap();
        assert_eq!(raw, RawInput::Text("1,2".into()));
    }

    #[test]
    fn emptiness() {
        assert!(RawInput::from("   ").is_empty());
        assert!(!RawInput::from("0").is_empty());
        assert!(!RawInput::Number(0.0).is_empty());
        assert!(!RawInput::List(vec![]).is_empty());
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(64.0), "64");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_list(&numbers(&[11.0, 12.5])), "[11, 12.5]");
        assert_eq!(format_list::<Token>(&[]), "[]");
    }

    #[test]
    fn mixed_tokens_never_compare_greater() {
        let n = Token::Number(5.0);
        let t = Token::Text("a".into());
        assert!(!n.is_greater_than(&t));
        assert!(!t.is_greater_than(&n));
        assert!(Token::Text("b".into()).is_greater_than(&t));
        assert!(Token::Number(6.0).is_greater_than(&n));
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn text_normalization_is_total_and_stable(text in ".*") {
                let raw = RawInput::Text(text);
                prop_assert_eq!(raw.normalize(), raw.normalize());
            }

            #[test]
            fn comma_text_keeps_every_piece(pieces in prop::collection::vec("[a-z0-9]{1,4}", 2..6)) {
                let normalized = RawInput::Text(pieces.join(", ")).normalize();
                prop_assert_eq!(normalized.values.len(), pieces.len());
            }
        }
    }
}
