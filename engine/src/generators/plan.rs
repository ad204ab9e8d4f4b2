//! Project plan generator, the seed capability.
//!
//! Runs before every other tool: its title and brief are folded into the
//! shared context the fan-out tasks receive. Because of that, an incomplete
//! plan (missing title or brief) is rejected here rather than tolerated.

use crate::catalog::{GenerationError, ProjectPlan};
use crate::llm::failover::ModelRouter;
use crate::llm::{extract_json_object, Message};

const SYSTEM: &str = "You are the project planner of a creative studio. \
Given a user's goal, produce a project plan.\n\
Output ONLY a JSON object with these fields:\n\
- \"title\": short, memorable project title (required)\n\
- \"brief\": 2-4 sentence creative brief giving direction and tone (required)\n\
- \"audience\": who this is for (optional)\n\
- \"deliverables\": array of concrete deliverables (optional)\n\
- \"tone\": one or two words describing the voice (optional)\n\
No markdown, no explanation, just the JSON object.";

pub async fn generate(model: &ModelRouter, goal: &str) -> Result<ProjectPlan, GenerationError> {
    let messages = [
        Message::system(SYSTEM),
        Message::user(format!("Goal: {goal}\n\nWrite the project plan.")),
    ];
    let completion = model.complete(&messages).await?;
    parse(&completion)
}

fn parse(content: &str) -> Result<ProjectPlan, GenerationError> {
    let json = extract_json_object(content)
        .ok_or_else(|| GenerationError::Malformed("no JSON object in plan output".to_string()))?;

    let plan: ProjectPlan = serde_json::from_str(json)
        .map_err(|e| GenerationError::Malformed(format!("plan JSON: {e}")))?;

    if plan.title.trim().is_empty() {
        return Err(GenerationError::Malformed(
            "plan is missing a title".to_string(),
        ));
    }
    if plan.brief.trim().is_empty() {
        return Err(GenerationError::Malformed(
            "plan is missing a creative brief".to_string(),
        ));
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_plan() {
        let content = r#"{
            "title": "Signal & Noise",
            "brief": "A weekly podcast demystifying AI for filmmakers.",
            "audience": "film directors",
            "deliverables": ["trailer episode", "cover art"],
            "tone": "curious"
        }"#;

        let plan = parse(content).unwrap();
        assert_eq!(plan.title, "Signal & Noise");
        assert_eq!(plan.deliverables.len(), 2);
        assert_eq!(plan.tone.as_deref(), Some("curious"));
    }

    #[test]
    fn test_parse_plan_with_markdown_wrapper() {
        let content = "Here you go:\n```json\n{\"title\": \"Launch\", \"brief\": \"A brief.\"}\n```";
        let plan = parse(content).unwrap();
        assert_eq!(plan.title, "Launch");
    }

    #[test]
    fn test_parse_rejects_empty_title() {
        let content = r#"{"title": "  ", "brief": "Something."}"#;
        assert!(matches!(parse(content), Err(GenerationError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_missing_brief() {
        let content = r#"{"title": "Launch", "brief": ""}"#;
        assert!(matches!(parse(content), Err(GenerationError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_prose() {
        let content = "I think a podcast is a great idea!";
        assert!(matches!(parse(content), Err(GenerationError::Malformed(_))));
    }
}
