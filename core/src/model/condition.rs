//! Boolean condition trees over attribute predicates.
//!
//! Wire shape (shared with the decision service):
//! `{"allOf": [{"user.ai_advice_opted_in": {"equals": true}}]}`

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrScope {
    User,
    Resource,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePath {
    pub scope: AttrScope,
    pub attribute: String,
}

impl AttributePath {
    pub fn user(attribute: impl Into<String>) -> Self {
        Self {
            scope: AttrScope::User,
            attribute: attribute.into(),
        }
    }

    pub fn resource(attribute: impl Into<String>) -> Self {
        Self {
            scope: AttrScope::Resource,
            attribute: attribute.into(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (scope, attribute) = s.split_once('.')?;
        if attribute.is_empty() {
            return None;
        }
        let scope = match scope {
            "user" => AttrScope::User,
            "resource" => AttrScope::Resource,
            _ => return None,
        };
        Some(Self {
            scope,
            attribute: attribute.to_string(),
        })
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.scope {
            AttrScope::User => "user",
            AttrScope::Resource => "resource",
        };
        write!(f, "{}.{}", scope, self.attribute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
}

impl Operator {
    fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not-equals",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "equals" => Some(Operator::Equals),
            "not-equals" => Some(Operator::NotEquals),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub path: AttributePath,
    pub op: Operator,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Condition {
    AllOf(Vec<Condition>),
    AnyOf(Vec<Condition>),
    Predicate(Predicate),
}

impl Condition {
    pub fn equals(path: AttributePath, value: impl Into<Value>) -> Self {
        Condition::Predicate(Predicate {
            path,
            op: Operator::Equals,
            value: value.into(),
        })
    }

    pub fn all_of(children: impl IntoIterator<Item = Condition>) -> Self {
        Condition::AllOf(children.into_iter().collect())
    }

    /// Every attribute path referenced anywhere in the tree.
    pub fn attribute_paths(&self) -> Vec<&AttributePath> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);
        out
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a AttributePath>) {
        match self {
            Condition::AllOf(children) | Condition::AnyOf(children) => {
                for child in children {
                    child.collect_paths(out);
                }
            }
            Condition::Predicate(p) => out.push(&p.path),
        }
    }
}

impl From<Condition> for Value {
    fn from(c: Condition) -> Self {
        let mut obj = Map::new();
        match c {
            Condition::AllOf(children) => {
                obj.insert(
                    "allOf".into(),
                    Value::Array(children.into_iter().map(Value::from).collect()),
                );
            }
            Condition::AnyOf(children) => {
                obj.insert(
                    "anyOf".into(),
                    Value::Array(children.into_iter().map(Value::from).collect()),
                );
            }
            Condition::Predicate(p) => {
                let mut op = Map::new();
                op.insert(p.op.as_str().into(), p.value);
                obj.insert(p.path.to_string(), Value::Object(op));
            }
        }
        Value::Object(obj)
    }
}

impl TryFrom<Value> for Condition {
    type Error = String;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        let Value::Object(obj) = v else {
            return Err("condition must be an object".into());
        };
        if obj.len() != 1 {
            return Err(format!(
                "condition must have exactly one key, found {}",
                obj.len()
            ));
        }
        let Some((key, inner)) = obj.into_iter().next() else {
            return Err("condition must have exactly one key".into());
        };

        match key.as_str() {
            "allOf" | "anyOf" => {
                let Value::Array(items) = inner else {
                    return Err(format!("`{key}` must be an array"));
                };
                let children = items
                    .into_iter()
                    .map(Condition::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(if key == "allOf" {
                    Condition::AllOf(children)
                } else {
                    Condition::AnyOf(children)
                })
            }
            path => {
                let path = AttributePath::parse(path)
                    .ok_or_else(|| format!("invalid attribute path `{path}`"))?;
                let Value::Object(op_obj) = inner else {
                    return Err(format!("predicate on `{path}` must be an object"));
                };
                let mut ops = op_obj.into_iter();
                let (Some((op, value)), None) = (ops.next(), ops.next()) else {
                    return Err(format!("predicate on `{path}` needs exactly one operator"));
                };
                let op = Operator::parse(&op)
                    .ok_or_else(|| format!("unsupported operator `{op}` on `{path}`"))?;
                Ok(Condition::Predicate(Predicate { path, op, value }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_wire_shape() {
        let c = Condition::all_of([Condition::equals(
            AttributePath::user("ai_advice_opted_in"),
            true,
        )]);
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            json!({"allOf": [{"user.ai_advice_opted_in": {"equals": true}}]})
        );
    }

    #[test]
    fn parses_nested_trees() {
        let v = json!({"anyOf": [
            {"resource.classification": {"equals": "confidential"}},
            {"allOf": [{"resource.doc_type": {"not-equals": "memo"}}]}
        ]});
        let c: Condition = serde_json::from_value(v).unwrap();
        let paths: Vec<String> = c.attribute_paths().iter().map(|p| p.to_string()).collect();
        assert_eq!(paths, vec!["resource.classification", "resource.doc_type"]);
    }

    #[test]
    fn rejects_unknown_scope_and_operator() {
        assert!(serde_json::from_value::<Condition>(json!({"env.x": {"equals": 1}})).is_err());
        assert!(
            serde_json::from_value::<Condition>(json!({"user.x": {"greater": 1}})).is_err()
        );
        assert!(serde_json::from_value::<Condition>(json!({"a": 1, "b": 2})).is_err());
    }
}
