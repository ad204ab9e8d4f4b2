//! Mind map generator.

use crate::catalog::{GenerationError, MindMap};
use crate::llm::failover::ModelRouter;
use crate::llm::{extract_json_object, Message};

const SYSTEM: &str = "You are the strategist of a creative studio.\n\
Output ONLY a JSON object:\n\
{\"root\": \"central theme\", \"branches\": [{\"label\": \"...\", \"children\": [\"...\"]}]}\n\
Produce 3 to 6 branches with 2 to 4 children each.\n\
No markdown, no explanation, just the JSON object.";

const INSTRUCTION: &str = "Break this project down into a mind map.";

pub async fn generate(model: &ModelRouter, context: &str) -> Result<MindMap, GenerationError> {
    let messages = [
        Message::system(SYSTEM),
        Message::user(format!("{context}\n\n{INSTRUCTION}")),
    ];
    let completion = model.complete(&messages).await?;
    parse(&completion)
}

fn parse(content: &str) -> Result<MindMap, GenerationError> {
    let json = extract_json_object(content).ok_or_else(|| {
        GenerationError::Malformed("no JSON object in mind map output".to_string())
    })?;

    let map: MindMap = serde_json::from_str(json)
        .map_err(|e| GenerationError::Malformed(format!("mind map JSON: {e}")))?;

    if map.root.trim().is_empty() {
        return Err(GenerationError::Malformed(
            "mind map is missing a root".to_string(),
        ));
    }
    if map.branches.is_empty() {
        return Err(GenerationError::Malformed(
            "mind map has no branches".to_string(),
        ));
    }

    Ok(map)
}
