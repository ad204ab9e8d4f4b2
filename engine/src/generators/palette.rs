//! Color palette generator.

use crate::catalog::{GenerationError, Palette};
use crate::llm::failover::ModelRouter;
use crate::llm::{extract_json_object, Message};

const SYSTEM: &str = "You are the art director of a creative studio.\n\
Output ONLY a JSON object:\n\
{\"colors\": [{\"hex\": \"#rrggbb\", \"name\": \"...\", \"role\": \"primary|secondary|accent|neutral\"}]}\n\
Provide 4 to 6 colors. No markdown, no explanation, just the JSON object.";

const INSTRUCTION: &str = "Generate a color palette for this project.";

pub async fn generate(model: &ModelRouter, context: &str) -> Result<Palette, GenerationError> {
    let messages = [
        Message::system(SYSTEM),
        Message::user(format!("{context}\n\n{INSTRUCTION}")),
    ];
    let completion = model.complete(&messages).await?;
    parse(&completion)
}

fn parse(content: &str) -> Result<Palette, GenerationError> {
    let json = extract_json_object(content)
        .ok_or_else(|| GenerationError::Malformed("no JSON object in palette output".to_string()))?;

    let palette: Palette = serde_json::from_str(json)
        .map_err(|e| GenerationError::Malformed(format!("palette JSON: {e}")))?;

    if palette.colors.is_empty() {
        return Err(GenerationError::Malformed(
            "palette has no colors".to_string(),
        ));
    }
    for color in &palette.colors {
        if !is_hex_color(&color.hex) {
            return Err(GenerationError::Malformed(format!(
                "invalid hex color: {}",
                color.hex
            )));
        }
    }

    Ok(palette)
}

/// `#rrggbb`, case-insensitive
fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_palette() {
        let content = r##"{"colors": [
            {"hex": "#0A0A23", "name": "Midnight", "role": "primary"},
            {"hex": "#f5e642", "name": "Signal Yellow", "role": "accent"}
        ]}"##;
        let palette = parse(content).unwrap();
        assert_eq!(palette.colors.len(), 2);
        assert_eq!(palette.colors[1].name, "Signal Yellow");
    }

    #[test]
    fn test_parse_rejects_empty_palette() {
        assert!(parse(r#"{"colors": []}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_hex() {
        let content = r#"{"colors": [{"hex": "blue", "name": "Blue"}]}"#;
        assert!(parse(content).is_err());
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#a1B2c3"));
        assert!(!is_hex_color("#a1B2c"));
        assert!(!is_hex_color("a1B2c3f"));
        assert!(!is_hex_color("#a1B2cZ"));
    }
}
