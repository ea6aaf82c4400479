// Query AST
// Typed form of the query object. Serialization produces the exact JSON shape
// the query endpoint expects: WHERE, OPTIONS and an optional TRANSFORMATIONS

use crate::error::QueryError;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Serializes as a one-entry JSON object `{key: value}`
/// Most of the grammar is built out of these
struct SingleEntry<'a, V: ?Sized>(&'a str, &'a V);

impl<V: Serialize + ?Sized> Serialize for SingleEntry<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, self.1)?;
        map.end()
    }
}

/// Comparison operators. LT, GT and EQ compare numbers, IS compares strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Gt,
    Eq,
    Is,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Lt => "LT",
            Comparator::Gt => "GT",
            Comparator::Eq => "EQ",
            Comparator::Is => "IS",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Comparator::Is)
    }
}

impl FromStr for Comparator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LT" => Ok(Comparator::Lt),
            "GT" => Ok(Comparator::Gt),
            "EQ" => Ok(Comparator::Eq),
            "IS" => Ok(Comparator::Is),
            _ => Err(QueryError::UnknownOperator(s.to_string())),
        }
    }
}

/// The right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Comparand {
    Number(f64),
    Text(String),
    /// Text that does not read as a number; serialized as null
    Invalid,
}

impl Serialize for Comparand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Largest integer an f64 holds exactly
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

        match self {
            Comparand::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT => {
                serializer.serialize_i64(*n as i64)
            }
            Comparand::Number(n) => serializer.serialize_f64(*n),
            Comparand::Text(s) => serializer.serialize_str(s),
            Comparand::Invalid => serializer.serialize_unit(),
        }
    }
}

/// AND / OR over a list of filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// The WHERE body
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// No conditions: matches everything, serialized as `{}`
    Empty,
    Comparison {
        op: Comparator,
        key: String,
        value: Comparand,
    },
    Not(Box<Filter>),
    Logic {
        connective: Connective,
        filters: Vec<Filter>,
    },
}

impl Filter {
    pub fn negate(self) -> Filter {
        Filter::Not(Box::new(self))
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Filter::Empty => serializer.serialize_map(Some(0))?.end(),
            Filter::Comparison { op, key, value } => {
                SingleEntry(op.as_str(), &SingleEntry(key, value)).serialize(serializer)
            }
            Filter::Not(inner) => SingleEntry("NOT", inner.as_ref()).serialize(serializer),
            Filter::Logic {
                connective,
                filters,
            } => SingleEntry(connective.as_str(), filters).serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

/// ORDER is either a single key or a direction with a list of keys
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Order {
    Key(String),
    Sort { dir: Direction, keys: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Options {
    #[serde(rename = "COLUMNS")]
    pub columns: Vec<String>,
    #[serde(rename = "ORDER", skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// Aggregations usable in APPLY rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyToken {
    Max,
    Min,
    Avg,
    Count,
    Sum,
}

impl ApplyToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyToken::Max => "MAX",
            ApplyToken::Min => "MIN",
            ApplyToken::Avg => "AVG",
            ApplyToken::Count => "COUNT",
            ApplyToken::Sum => "SUM",
        }
    }
}

impl FromStr for ApplyToken {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MAX" => Ok(ApplyToken::Max),
            "MIN" => Ok(ApplyToken::Min),
            "AVG" => Ok(ApplyToken::Avg),
            "COUNT" => Ok(ApplyToken::Count),
            "SUM" => Ok(ApplyToken::Sum),
            _ => Err(QueryError::UnknownApplyToken(s.to_string())),
        }
    }
}

/// `{name: {TOKEN: key}}`
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyRule {
    pub name: String,
    pub token: ApplyToken,
    pub key: String,
}

impl Serialize for ApplyRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SingleEntry(&self.name, &SingleEntry(self.token.as_str(), &self.key))
            .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transformations {
    #[serde(rename = "GROUP")]
    pub group: Vec<String>,
    #[serde(rename = "APPLY")]
    pub apply: Vec<ApplyRule>,
}

/// A complete query object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    #[serde(rename = "WHERE")]
    pub where_: Filter,
    #[serde(rename = "OPTIONS")]
    pub options: Options,
    #[serde(rename = "TRANSFORMATIONS", skip_serializing_if = "Option::is_none")]
    pub transformations: Option<Transformations>,
}

impl Query {
    /// Render with indentation, for display
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Compact JSON, the same text that goes over the wire
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gt_avg(n: f64) -> Filter {
        Filter::Comparison {
            op: Comparator::Gt,
            key: "courses_avg".to_string(),
            value: Comparand::Number(n),
        }
    }

    #[test]
    fn test_comparison_shape() {
        let value = serde_json::to_value(gt_avg(95.0)).unwrap();
        assert_eq!(value, json!({"GT": {"courses_avg": 95}}));

        let value = serde_json::to_value(gt_avg(97.5)).unwrap();
        assert_eq!(value, json!({"GT": {"courses_avg": 97.5}}));
    }

    #[test]
    fn test_integral_numbers_have_no_fraction() {
        assert_eq!(serde_json::to_string(&gt_avg(95.0)).unwrap(), r#"{"GT":{"courses_avg":95}}"#);
    }

    #[test]
    fn test_invalid_comparand_is_null() {
        let filter = Filter::Comparison {
            op: Comparator::Eq,
            key: "courses_year".to_string(),
            value: Comparand::Invalid,
        };
        assert_eq!(serde_json::to_value(filter).unwrap(), json!({"EQ": {"courses_year": null}}));
    }

    #[test]
    fn test_nested_logic() {
        let filter = Filter::Logic {
            connective: Connective::Or,
            filters: vec![
                gt_avg(90.0),
                Filter::Comparison {
                    op: Comparator::Is,
                    key: "courses_dept".to_string(),
                    value: Comparand::Text("cpsc".to_string()),
                }
                .negate(),
            ],
        }
        .negate();

        assert_eq!(
            serde_json::to_value(filter).unwrap(),
            json!({"NOT": {"OR": [
                {"GT": {"courses_avg": 90}},
                {"NOT": {"IS": {"courses_dept": "cpsc"}}}
            ]}})
        );
    }

    #[test]
    fn test_order_variants() {
        assert_eq!(
            serde_json::to_value(Order::Key("courses_avg".to_string())).unwrap(),
            json!("courses_avg")
        );
        let sort = Order::Sort {
            dir: Direction::Down,
            keys: vec!["maxSeats".to_string()],
        };
        assert_eq!(
            serde_json::to_value(sort).unwrap(),
            json!({"dir": "DOWN", "keys": ["maxSeats"]})
        );
    }

    #[test]
    fn test_query_key_order_and_optional_sections() {
        let query = Query {
            where_: Filter::Empty,
            options: Options {
                columns: vec!["rooms_name".to_string()],
                order: None,
            },
            transformations: None,
        };
        assert_eq!(query.to_string(), r#"{"WHERE":{},"OPTIONS":{"COLUMNS":["rooms_name"]}}"#);

        let query = Query {
            transformations: Some(Transformations {
                group: vec!["rooms_shortname".to_string()],
                apply: vec![ApplyRule {
                    name: "maxSeats".to_string(),
                    token: ApplyToken::Max,
                    key: "rooms_seats".to_string(),
                }],
            }),
            ..query
        };
        assert_eq!(
            query.to_string(),
            r#"{"WHERE":{},"OPTIONS":{"COLUMNS":["rooms_name"]},"TRANSFORMATIONS":{"GROUP":["rooms_shortname"],"APPLY":[{"maxSeats":{"MAX":"rooms_seats"}}]}}"#
        );
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("IS".parse::<Comparator>().unwrap(), Comparator::Is);
        assert!("GE".parse::<Comparator>().is_err());
        assert_eq!("SUM".parse::<ApplyToken>().unwrap(), ApplyToken::Sum);
        assert!(matches!(
            "MEDIAN".parse::<ApplyToken>(),
            Err(QueryError::UnknownApplyToken(_))
        ));
    }
}
