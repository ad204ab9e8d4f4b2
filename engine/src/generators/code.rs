//! Starter code snippet generator.

use crate::catalog::{CodeSnippet, GenerationError};
use crate::llm::failover::ModelRouter;
use crate::llm::{extract_json_object, Message};

const SYSTEM: &str = "You are the technical lead of a creative studio.\n\
Output ONLY a JSON object with these fields:\n\
- \"language\": programming language (required)\n\
- \"filename\": suggested file name (optional)\n\
- \"code\": the snippet itself (required)\n\
- \"explanation\": one or two sentences (optional)\n\
No markdown, no explanation outside the JSON object.";

const INSTRUCTION: &str = "Write a small starter code snippet for this project.";

pub async fn generate(model: &ModelRouter, context: &str) -> Result<CodeSnippet, GenerationError> {
    let messages = [
        Message::system(SYSTEM),
        Message::user(format!("{context}\n\n{INSTRUCTION}")),
    ];
    let completion = model.complete(&messages).await?;
    parse(&completion)
}

fn parse(content: &str) -> Result<CodeSnippet, GenerationError> {
    let json = extract_json_object(content)
        .ok_or_else(|| GenerationError::Malformed("no JSON object in code output".to_string()))?;

    let snippet: CodeSnippet = serde_json::from_str(json)
        .map_err(|e| GenerationError::Malformed(format!("code JSON: {e}")))?;

    if snippet.language.trim().is_empty() || snippet.code.trim().is_empty() {
        return Err(GenerationError::Malformed(
            "code snippet is missing a language or body".to_string(),
        ));
    }

    Ok(snippet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_snippet() {
        let content = r#"{"language": "html", "filename": "index.html", "code": "<audio controls src=\"ep1.mp3\"></audio>"}"#;
        let snippet = parse(content).unwrap();
        assert_eq!(snippet.language, "html");
        assert!(snippet.code.contains("audio"));
    }

    #[test]
    fn test_parse_rejects_empty_code() {
        assert!(parse(r#"{"language": "rust", "code": ""}"#).is_err());
    }
}
