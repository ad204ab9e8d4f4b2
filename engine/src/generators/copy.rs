//! Marketing copy generator.

use crate::catalog::{CopyBlock, GenerationError};
use crate::llm::failover::ModelRouter;
use crate::llm::{extract_json_object, Message};

const SYSTEM: &str = "You are the copywriter of a creative studio.\n\
Output ONLY a JSON object with these fields:\n\
- \"headline\": punchy headline (required)\n\
- \"body\": 2-3 sentences of body copy (required)\n\
- \"cta\": short call to action (optional)\n\
No markdown, no explanation, just the JSON object.";

const INSTRUCTION: &str = "Write the marketing copy for this project.";

pub async fn generate(model: &ModelRouter, context: &str) -> Result<CopyBlock, GenerationError> {
    let messages = [
        Message::system(SYSTEM),
        Message::user(format!("{context}\n\n{INSTRUCTION}")),
    ];
    let completion = model.complete(&messages).await?;
    parse(&completion)
}

fn parse(content: &str) -> Result<CopyBlock, GenerationError> {
    let json = extract_json_object(content)
        .ok_or_else(|| GenerationError::Malformed("no JSON object in copy output".to_string()))?;

    let block: CopyBlock = serde_json::from_str(json)
        .map_err(|e| GenerationError::Malformed(format!("copy JSON: {e}")))?;

    if block.headline.trim().is_empty() || block.body.trim().is_empty() {
        return Err(GenerationError::Malformed(
            "copy is missing a headline or body".to_string(),
        ));
    }

    Ok(block)
}
