//! Typed payloads produced by the generation capabilities.
//!
//! One variant per tool. The shapes mirror what each generator's output
//! contract asks the model for; optional fields are omitted from serialized
//! output entirely rather than carried as nulls.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Payload of a settled generation task, tagged by capability
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolPayload {
    Plan(ProjectPlan),
    Copy(CopyBlock),
    Palette(Palette),
    Persona(Persona),
    Deck(Deck),
    Code(CodeSnippet),
    MindMap(MindMap),
    Agenda(AgendaEvent),
}

/// Seed output: the project plan every other capability builds on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectPlan {
    /// Project title
    pub title: String,

    /// Creative brief describing direction and tone
    pub brief: String,

    /// Intended audience, when the model names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    /// Concrete deliverables
    #[serde(default)]
    pub deliverables: Vec<String>,

    /// Overall tone (e.g. "playful", "corporate")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

/// Marketing copy block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CopyBlock {
    pub headline: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
}

/// A single color in a palette
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaletteColor {
    /// Hex code, `#rrggbb`
    pub hex: String,
    pub name: String,
    /// Usage role (e.g. "primary", "accent")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Color palette
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Palette {
    pub colors: Vec<PaletteColor>,
}

/// Target-audience persona
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Persona {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    pub bio: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub frustrations: Vec<String>,
}

/// One slide of a deck outline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slide {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_notes: Option<String>,
}

/// Pitch deck outline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deck {
    pub title: String,
    pub slides: Vec<Slide>,
}

/// Starter code snippet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeSnippet {
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One branch of a mind map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Branch {
    pub label: String,
    #[serde(default)]
    pub children: Vec<String>,
}

/// Mind map rooted at the project theme
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MindMap {
    pub root: String,
    pub branches: Vec<Branch>,
}

/// A single kickoff agenda event.
///
/// The generator produces one event; the aggregate stores agenda entries as
/// a collection, so this payload is wrapped into a one-element list there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgendaEvent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Start time as "HH:MM", when the model proposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_omitted_from_output() {
        let plan = ProjectPlan {
            title: "Podcast".to_string(),
            brief: "A show about AI".to_string(),
            audience: None,
            deliverables: vec![],
            tone: None,
        };
        let json = serde_json::to_string(&plan).unwrap();
        assert!(!json.contains("audience"));
        assert!(!json.contains("tone"));
    }

    #[test]
    fn test_payload_tagging() {
        let payload = ToolPayload::Palette(Palette {
            colors: vec![PaletteColor {
                hex: "#0a0a23".to_string(),
                name: "Midnight".to_string(),
                role: Some("primary".to_string()),
            }],
        });
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""tool":"palette""#));
    }

    #[test]
    fn test_agenda_date_round_trip() {
        let event = AgendaEvent {
            title: "Kickoff".to_string(),
            date: Some(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()),
            start_time: Some("09:30".to_string()),
            duration_minutes: Some(60),
            notes: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: AgendaEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
