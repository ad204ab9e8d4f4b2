//! Kickoff agenda generator.
//!
//! Produces a SINGLE event. The bundle's agenda slot is a collection, so the
//! aggregator wraps this payload into a one-element list.

use crate::catalog::{AgendaEvent, GenerationError};
use crate::llm::failover::ModelRouter;
use crate::llm::{extract_json_object, Message};

const SYSTEM: &str = "You are the producer of a creative studio.\n\
Output ONLY a JSON object with these fields:\n\
- \"title\": event title (required)\n\
- \"date\": ISO date YYYY-MM-DD (optional)\n\
- \"start_time\": HH:MM, 24-hour (optional)\n\
- \"duration_minutes\": number (optional)\n\
- \"notes\": short agenda notes (optional)\n\
No markdown, no explanation, just the JSON object.";

const INSTRUCTION: &str = "Propose the kickoff event for this project.";

pub async fn generate(model: &ModelRouter, context: &str) -> Result<AgendaEvent, GenerationError> {
    let messages = [
        Message::system(SYSTEM),
        Message::user(format!("{context}\n\n{INSTRUCTION}")),
    ];
    let completion = model.complete(&messages).await?;
    parse(&completion)
}

fn parse(content: &str) -> Result<AgendaEvent, GenerationError> {
    let json = extract_json_object(content)
        .ok_or_else(|| GenerationError::Malformed("no JSON object in agenda output".to_string()))?;

    let event: AgendaEvent = serde_json::from_str(json)
        .map_err(|e| GenerationError::Malformed(format!("agenda JSON: {e}")))?;

    if event.title.trim().is_empty() {
        return Err(GenerationError::Malformed(
            "agenda event is missing a title".to_string(),
        ));
    }

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_valid_event() {
        let content = r#"{
            "title": "Kickoff: Signal & Noise",
            "date": "2026-03-02",
            "start_time": "09:30",
            "duration_minutes": 60,
            "notes": "Align on episode one."
        }"#;
        let event = parse(content).unwrap();
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2026, 3, 2));
        assert_eq!(event.duration_minutes, Some(60));
    }

    #[test]
    fn test_parse_minimal_event() {
        let event = parse(r#"{"title": "Kickoff"}"#).unwrap();
        assert_eq!(event.date, None);
    }

    #[test]
    fn test_parse_rejects_untitled_event() {
        assert!(parse(r#"{"title": ""}"#).is_err());
    }
}
