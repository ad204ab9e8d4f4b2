//! Pitch deck outline generator.

use crate::catalog::{Deck, GenerationError};
use crate::llm::failover::ModelRouter;
use crate::llm::{extract_json_object, Message};

const SYSTEM: &str = "You are the presentation designer of a creative studio.\n\
Output ONLY a JSON object:\n\
{\"title\": \"...\", \"slides\": [{\"title\": \"...\", \"bullets\": [\"...\"], \"speaker_notes\": \"...\"}]}\n\
Produce 5 to 8 slides. \"speaker_notes\" is optional per slide.\n\
No markdown, no explanation, just the JSON object.";

const INSTRUCTION: &str = "Outline the pitch deck for this project.";

pub async fn generate(model: &ModelRouter, context: &str) -> Result<Deck, GenerationError> {
    let messages = [
        Message::system(SYSTEM),
        Message::user(format!("{context}\n\n{INSTRUCTION}")),
    ];
    let completion = model.complete(&messages).await?;
    parse(&completion)
}

fn parse(content: &str) -> Result<Deck, GenerationError> {
    let json = extract_json_object(content)
        .ok_or_else(|| GenerationError::Malformed("no JSON object in deck output".to_string()))?;

    let deck: Deck = serde_json::from_str(json)
        .map_err(|e| GenerationError::Malformed(format!("deck JSON: {e}")))?;

    if deck.title.trim().is_empty() {
        return Err(GenerationError::Malformed(
            "deck is missing a title".to_string(),
        ));
    }
    if deck.slides.is_empty() {
        return Err(GenerationError::Malformed("deck has no slides".to_string()));
    }

    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_deck() {
        let content = r#"{
            "title": "Signal & Noise — Pitch",
            "slides": [
                {"title": "The problem", "bullets": ["AI is opaque to creatives"]},
                {"title": "The show", "bullets": ["weekly", "20 minutes"], "speaker_notes": "keep it light"}
            ]
        }"#;
        let deck = parse(content).unwrap();
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[1].speaker_notes.as_deref(), Some("keep it light"));
    }

    #[test]
    fn test_parse_rejects_no_slides() {
        assert!(parse(r#"{"title": "Pitch", "slides": []}"#).is_err());
    }
}
