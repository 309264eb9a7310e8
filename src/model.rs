//! The records a paper is rendered from.
//!
//! All of them deserialize from the camelCase JSON the question bank stores.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Only used to name the output file.
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq,
    ShortAnswer,
}

/// The answer key: one string, or several for multi-answer `mcq` questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Single(String),
    Multiple(Vec<String>),
}

impl CorrectAnswer {
    /// Exact string equality, with list membership for multiple answers.
    pub fn accepts(&self, option: &str) -> bool {
        match self {
            CorrectAnswer::Single(answer) => answer == option,
            CorrectAnswer::Multiple(answers) => answers.iter().any(|answer| answer == option),
        }
    }

    /// The answer as shown in a short-answer panel.
    pub fn display_text(&self) -> String {
        match self {
            CorrectAnswer::Single(answer) => answer.clone(),
            CorrectAnswer::Multiple(answers) => answers.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub order: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<CorrectAnswer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn prompt(&self) -> String {
        format!("Question {}: {}", self.order, self.question_text)
    }

    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer
            .as_ref()
            .is_some_and(|answer| answer.accepts(option))
    }

    /// The explanation, if there is any visible text in it.
    pub fn explanation_text(&self) -> Option<&str> {
        self.explanation
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// The subset of site settings the renderer reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub pdf_watermark_enabled: bool,
    pub pdf_watermark_text: String,
    pub site_name: String,
}

/// Everything needed to render one paper, as read by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperBundle {
    pub paper: Paper,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub settings: Settings,
}
