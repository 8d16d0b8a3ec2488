//! Contract clause records and the shape check applied to AI output.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const MAX_RISK_SCORE: u8 = 10;

/// One provision of a contract, as extracted by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractClause {
    pub clause_number: String,
    pub clause_title: String,
    /// 0 – 10; 0 means "no evidence".
    pub risk_score: u8,
    pub issues: String,
    pub who_it_benefits: String,
    pub ambiguities: String,
    pub summary: String,
}

/// Ordered clauses for one `/analyze-text` call.
pub type ContractAnalysis = Vec<ContractClause>;

const TEXT_FIELDS: [&str; 6] = [
    "clause_number",
    "clause_title",
    "issues",
    "who_it_benefits",
    "ambiguities",
    "summary",
];
const RISK_SCORE: &str = "risk_score";

/// A single offending field in the model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Position in the clause array; `None` when the top-level value is wrong.
    pub index: Option<usize>,
    pub field: String,
    pub problem: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "[{i}].{}: {}", self.field, self.problem),
            None => write!(f, "{}: {}", self.field, self.problem),
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response violates clause schema: {}", join_violations(.0))]
    Violations(Vec<FieldViolation>),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parses raw model output and checks it against the clause schema.
pub fn parse_analysis(raw: &str) -> Result<ContractAnalysis, SchemaError> {
    let value: Value = serde_json::from_str(raw)?;
    validate_analysis(&value)
}

/// Checks that `value` is an array of complete clause objects.
///
/// Every violation across every element is collected; nothing is repaired.
/// Keys outside the schema are ignored and dropped.
pub fn validate_analysis(value: &Value) -> Result<ContractAnalysis, SchemaError> {
    let Some(items) = value.as_array() else {
        return Err(SchemaError::Violations(vec![FieldViolation {
            index: None,
            field: "$".to_string(),
            problem: format!("expected array, found {}", type_name(value)),
        }]));
    };

    let mut clauses = Vec::with_capacity(items.len());
    let mut violations = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(obj) => {
                if let Some(clause) = validate_clause(index, obj, &mut violations) {
                    clauses.push(clause);
                }
            }
            None => violations.push(FieldViolation {
                index: Some(index),
                field: "$".to_string(),
                problem: format!("expected object, found {}", type_name(item)),
            }),
        }
    }

    if violations.is_empty() {
        Ok(clauses)
    } else {
        Err(SchemaError::Violations(violations))
    }
}

fn validate_clause(
    index: usize,
    obj: &Map<String, Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<ContractClause> {
    let before = violations.len();
    let mut violation = |field: &str, problem: String| {
        violations.push(FieldViolation {
            index: Some(index),
            field: field.to_string(),
            problem,
        })
    };

    let mut text = |field: &str| -> String {
        match obj.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                violation(field, format!("expected string, found {}", type_name(other)));
                String::new()
            }
            None => {
                violation(field, "missing".to_string());
                String::new()
            }
        }
    };
    let [clause_number, clause_title, issues, who_it_benefits, ambiguities, summary] =
        TEXT_FIELDS.map(|field| text(field));

    let risk_score = match obj.get(RISK_SCORE) {
        Some(Value::Number(n)) => match risk_score_from(n) {
            Some(score) => score,
            None => {
                violation(
                    RISK_SCORE,
                    format!("expected integer 0-{MAX_RISK_SCORE}, found {n}"),
                );
                0
            }
        },
        Some(other) => {
            violation(RISK_SCORE, format!("expected number, found {}", type_name(other)));
            0
        }
        None => {
            violation(RISK_SCORE, "missing".to_string());
            0
        }
    };

    (violations.len() == before).then(|| ContractClause {
        clause_number,
        clause_title,
        risk_score,
        issues,
        who_it_benefits,
        ambiguities,
        summary,
    })
}

/// Accepts `7` and `7.0`, rejects fractions, negatives and values above the scale.
fn risk_score_from(n: &serde_json::Number) -> Option<u8> {
    let whole = match n.as_u64() {
        Some(u) => u,
        None => {
            let f = n.as_f64()?;
            if f.fract() != 0.0 || f < 0.0 {
                return None;
            }
            f as u64
        }
    };
    u8::try_from(whole).ok().filter(|s| *s <= MAX_RISK_SCORE)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clause_json() -> Value {
        json!({
            "clause_number": "4.2",
            "clause_title": "Termination",
            "risk_score": 6,
            "issues": "Either party may terminate without cause.",
            "who_it_benefits": "Primarily the service provider.",
            "ambiguities": "N/A",
            "summary": "Allows termination on 30 days notice."
        })
    }

    #[test]
    fn test_valid_array_parses() {
        let clauses = validate_analysis(&json!([clause_json()])).unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].clause_title, "Termination");
        assert_eq!(clauses[0].risk_score, 6);
        assert_eq!(clauses[0].ambiguities, "N/A");
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_analysis("[]").unwrap().is_empty());
    }

    #[test]
    fn test_missing_risk_score_is_reported() {
        let mut clause = clause_json();
        clause.as_object_mut().unwrap().remove("risk_score");
        let err = validate_analysis(&json!([clause])).unwrap_err();
        match err {
            SchemaError::Violations(v) => {
                assert_eq!(v.len(), 1);
                assert_eq!(v[0].index, Some(0));
                assert_eq!(v[0].field, "risk_score");
                assert_eq!(v[0].problem, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_collects_violations_across_elements() {
        let mut second = clause_json();
        second["summary"] = json!(12);
        second["risk_score"] = json!("high");
        let err = validate_analysis(&json!([clause_json(), second, "oops"])).unwrap_err();
        let SchemaError::Violations(v) = err else {
            panic!("expected violations");
        };
        let rendered: Vec<String> = v.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "[1].summary: expected string, found number",
                "[1].risk_score: expected number, found string",
                "[2].$: expected object, found string",
            ]
        );
    }

    #[test]
    fn test_top_level_object_is_rejected() {
        let err = validate_analysis(&clause_json()).unwrap_err();
        assert!(err.to_string().contains("expected array, found object"));
    }

    #[test]
    fn test_risk_score_bounds() {
        for (raw, ok) in [
            (json!(0), true),
            (json!(10), true),
            (json!(7.0), true),
            (json!(11), false),
            (json!(-1), false),
            (json!(3.5), false),
        ] {
            let mut clause = clause_json();
            clause["risk_score"] = raw.clone();
            assert_eq!(
                validate_analysis(&json!([clause])).is_ok(),
                ok,
                "risk_score {raw}"
            );
        }
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let mut clause = clause_json();
        clause["confidence"] = json!(0.9);
        let clauses = validate_analysis(&json!([clause])).unwrap();
        let out = serde_json::to_value(&clauses[0]).unwrap();
        assert!(out.get("confidence").is_none());
        assert_eq!(out.as_object().unwrap().len(), 7);
    }

    #[test]
    fn test_malformed_json_is_schema_error() {
        assert!(matches!(
            parse_analysis("[{\"clause_number\": "),
            Err(SchemaError::Json(_))
        ));
    }

    #[test]
    fn test_reserialized_clause_reproduces_fields() {
        let clauses = validate_analysis(&json!([clause_json()])).unwrap();
        let json = serde_json::to_string(&clauses).unwrap();
        let reparsed = parse_analysis(&json).unwrap();
        assert_eq!(reparsed, clauses);
    }
}
