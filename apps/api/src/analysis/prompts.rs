//! Contract analysis prompt template and the response schema sent with it.

use serde_json::{json, Value};

pub const CONTRACT_ANALYSIS_PROMPT: &str = r#"Analyze the following legal contract and extract its key clauses.
For each clause, provide the clause number, clause title, risk score (on a scale of 1 to 10),
issues identified, who it benefits, any ambiguities, and a summary.

Return a JSON array shaped like this example:
[
  {
    "clause_number": "1",
    "clause_title": "Confidentiality",
    "risk_score": 7,
    "issues": "Lack of clear definition of confidential information.",
    "who_it_benefits": "Primarily benefits the disclosing party.",
    "ambiguities": "The term 'reasonable measures' is vague and open to interpretation.",
    "summary": "This clause outlines the obligations of both parties to maintain confidentiality of shared information."
  }
]

Always include every field.
- If the text has no information for a string field, use the string "N/A".
- If the text has no information for risk_score, use the number 0.
Do not omit any fields.

Contract Text:
"""
{contract_text}
"""
"#;

/// Builds the analysis prompt with the contract text embedded verbatim.
pub fn build_analysis_prompt(contract_text: &str) -> String {
    CONTRACT_ANALYSIS_PROMPT.replace("{contract_text}", contract_text)
}

/// OpenAPI-style schema for `generationConfig.responseSchema`: an array of
/// clause objects with every field required.
pub fn contract_analysis_schema() -> Value {
    let text = json!({ "type": "STRING" });
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "clause_number": text,
                "clause_title": text,
                "risk_score": { "type": "INTEGER", "minimum": 0, "maximum": 10 },
                "issues": text,
                "who_it_benefits": text,
                "ambiguities": text,
                "summary": text
            },
            "required": [
                "clause_number",
                "clause_title",
                "risk_score",
                "issues",
                "who_it_benefits",
                "ambiguities",
                "summary"
            ],
            "propertyOrdering": [
                "clause_number",
                "clause_title",
                "risk_score",
                "issues",
                "who_it_benefits",
                "ambiguities",
                "summary"
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_contract_text() {
        let prompt = build_analysis_prompt("The Tenant shall pay rent monthly.");
        assert!(prompt.contains("\"\"\"\nThe Tenant shall pay rent monthly.\n\"\"\""));
        assert!(!prompt.contains("{contract_text}"));
    }

    #[test]
    fn test_prompt_states_placeholder_policy() {
        let prompt = build_analysis_prompt("");
        assert!(prompt.contains("use the string \"N/A\""));
        assert!(prompt.contains("use the number 0"));
    }

    #[test]
    fn test_schema_requires_every_clause_field() {
        let schema = contract_analysis_schema();
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 7);
        let properties = schema["items"]["properties"].as_object().unwrap();
        for field in required {
            assert!(properties.contains_key(field.as_str().unwrap()));
        }
        assert_eq!(properties["risk_score"]["type"], "INTEGER");
    }
}
