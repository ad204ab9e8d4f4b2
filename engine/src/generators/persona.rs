//! Audience persona generator.

use crate::catalog::{GenerationError, Persona};
use crate::llm::failover::ModelRouter;
use crate::llm::{extract_json_object, Message};

const SYSTEM: &str = "You are the audience researcher of a creative studio.\n\
Output ONLY a JSON object with these fields:\n\
- \"name\": a first name (required)\n\
- \"age\": number (optional)\n\
- \"occupation\": string (optional)\n\
- \"bio\": 2-3 sentence biography (required)\n\
- \"goals\": array of strings (optional)\n\
- \"frustrations\": array of strings (optional)\n\
No markdown, no explanation, just the JSON object.";

const INSTRUCTION: &str = "Describe the target-audience persona for this project.";

pub async fn generate(model: &ModelRouter, context: &str) -> Result<Persona, GenerationError> {
    let messages = [
        Message::system(SYSTEM),
        Message::user(format!("{context}\n\n{INSTRUCTION}")),
    ];
    let completion = model.complete(&messages).await?;
    parse(&completion)
}

fn parse(content: &str) -> Result<Persona, GenerationError> {
    let json = extract_json_object(content)
        .ok_or_else(|| GenerationError::Malformed("no JSON object in persona output".to_string()))?;

    let persona: Persona = serde_json::from_str(json)
        .map_err(|e| GenerationError::Malformed(format!("persona JSON: {e}")))?;

    if persona.name.trim().is_empty() || persona.bio.trim().is_empty() {
        return Err(GenerationError::Malformed(
            "persona is missing a name or bio".to_string(),
        ));
    }

    Ok(persona)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_persona() {
        let content = r#"{
            "name": "Claire",
            "age": 41,
            "occupation": "Film director",
            "bio": "Claire directs documentaries and wants to keep up with AI.",
            "goals": ["stay relevant", "save production time"],
            "frustrations": ["hype", "jargon"]
        }"#;
        let persona = parse(content).unwrap();
        assert_eq!(persona.name, "Claire");
        assert_eq!(persona.age, Some(41));
        assert_eq!(persona.goals.len(), 2);
    }

    #[test]
    fn test_parse_minimal_persona() {
        let content = r#"{"name": "Sam", "bio": "A curious listener."}"#;
        let persona = parse(content).unwrap();
        assert!(persona.goals.is_empty());
        assert_eq!(persona.age, None);
    }

    #[test]
    fn test_parse_rejects_empty_bio() {
        assert!(parse(r#"{"name": "Sam", "bio": " "}"#).is_err());
    }
}
