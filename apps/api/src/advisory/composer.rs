//! Advisory Composer: turns a fetched advisory page plus the user's question
//! into the final answer.
//!
//! A static field table decides which snippets of the page reach the prompt.
//! The model's reply is returned verbatim.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::advisory::extract::extract_window;
use crate::advisory::models::AdvisoryDocument;
use crate::advisory::prompts::TRAVEL_ADVICE_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::prompts::{INSUFFICIENT_INFORMATION_INSTRUCTION, TRIP_ADVISOR_SYSTEM};
use crate::llm_client::ChatModel;

/// Where a prompt field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// The user's query, unchanged.
    Query,
    /// A key of the document metadata; empty when absent.
    Metadata(&'static str),
    /// A window of the page text.
    PageContent {
        start: &'static str,
        end: &'static str,
        length: usize,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct PromptField {
    /// Placeholder name in the prompt template.
    pub name: &'static str,
    pub source: FieldSource,
}

/// The markers are tied to the advisory site's current page layout.
pub static ADVICE_PROMPT_FIELDS: &[PromptField] = &[
    PromptField {
        name: "title",
        source: FieldSource::Metadata("title"),
    },
    PromptField {
        name: "description",
        source: FieldSource::Metadata("description"),
    },
    PromptField {
        name: "latest_update",
        source: FieldSource::PageContent {
            start: "Latest update",
            end: "Download",
            length: 800,
        },
    },
    PromptField {
        name: "advice_levels",
        source: FieldSource::PageContent {
            start: "Advice levels",
            end: "Overview",
            length: 500,
        },
    },
    PromptField {
        name: "query",
        source: FieldSource::Query,
    },
];

/// Resolves a single field against the document and query.
pub fn resolve_field<'a>(source: FieldSource, doc: &'a AdvisoryDocument, query: &'a str) -> &'a str {
    match source {
        FieldSource::Query => query,
        FieldSource::Metadata(key) => doc.metadata_value(key),
        FieldSource::PageContent { start, end, length } => {
            extract_window(&doc.text, start, Some(end), length)
        }
    }
}

/// Resolves every field in `fields`, warning when a page snippet comes back empty.
pub fn resolve_fields<'a>(
    fields: &[PromptField],
    doc: &'a AdvisoryDocument,
    query: &'a str,
) -> HashMap<&'static str, &'a str> {
    fields
        .iter()
        .map(|field| {
            let value = resolve_field(field.source, doc, query);
            if value.is_empty() {
                if let FieldSource::PageContent { start, .. } = field.source {
                    warn!(
                        field = field.name,
                        marker = start,
                        source = doc.metadata_value("source"),
                        "Advisory field extracted empty; page layout may have changed"
                    );
                }
            }
            (field.name, value)
        })
        .collect()
}

/// Fills `{name}` placeholders in `template` in a single pass, so braces inside
/// substituted values are never expanded. Unknown placeholders are left as is.
pub fn render_prompt(template: &str, values: &HashMap<&'static str, &str>) -> String {
    let mut prompt = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        prompt.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after
            .find('}')
            .and_then(|close| values.get(&after[..close]).map(|v| (close, v)))
        {
            Some((close, value)) => {
                prompt.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                prompt.push('{');
                rest = after;
            }
        }
    }
    prompt.push_str(rest);
    prompt
}

/// Builds the full advice prompt for `doc` and `query`.
pub fn build_advice_prompt(doc: &AdvisoryDocument, query: &str) -> String {
    let values = resolve_fields(ADVICE_PROMPT_FIELDS, doc, query);
    let mut prompt = render_prompt(TRAVEL_ADVICE_PROMPT_TEMPLATE, &values);
    prompt.push_str(INSUFFICIENT_INFORMATION_INSTRUCTION);
    prompt
}

pub struct AdvisoryComposer {
    model: Arc<dyn ChatModel>,
}

impl AdvisoryComposer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn compose(&self, doc: &AdvisoryDocument, query: &str) -> Result<String, AppError> {
        let prompt = build_advice_prompt(doc, query);
        self.model
            .complete(TRIP_ADVISOR_SYSTEM, &prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Advice generation failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{LlmError, ToolSpec};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    fn sample_doc() -> AdvisoryDocument {
        let mut metadata = HashMap::new();
        metadata.insert("title".to_string(), "Sample Title".to_string());
        metadata.insert("description".to_string(), "Sample Description".to_string());
        AdvisoryDocument {
            metadata,
            text: "Intro. Latest update: Some content here... Download the app. \
                   Advice levels: Exercise normal safety precautions. Overview of risks."
                .to_string(),
        }
    }

    struct EchoModel {
        reply: String,
        seen_prompt: Mutex<Option<String>>,
    }

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
            *self.seen_prompt.lock().unwrap() = Some(prompt.to_string());
            Ok(self.reply.clone())
        }

        async fn call_tool(&self, _: &str, _: &str, _: &ToolSpec) -> Result<Value, LlmError> {
            unreachable!("composer only uses free-text completion")
        }
    }

    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        async fn complete(&self, _: &str, _: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }

        async fn call_tool(&self, _: &str, _: &str, _: &ToolSpec) -> Result<Value, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    #[test]
    fn test_resolve_field_sources() {
        let doc = sample_doc();
        assert_eq!(resolve_field(FieldSource::Query, &doc, "test query"), "test query");
        assert_eq!(
            resolve_field(FieldSource::Metadata("title"), &doc, "q"),
            "Sample Title"
        );
        assert_eq!(resolve_field(FieldSource::Metadata("language"), &doc, "q"), "");
        assert_eq!(
            resolve_field(
                FieldSource::PageContent {
                    start: "Latest update",
                    end: "Download",
                    length: 800
                },
                &doc,
                "q"
            ),
            "Latest update: Some content here... "
        );
    }

    #[test]
    fn test_resolve_fields_covers_table_in_order() {
        let doc = sample_doc();
        let values = resolve_fields(ADVICE_PROMPT_FIELDS, &doc, "Good to go?");
        assert_eq!(values.len(), 5);
        assert_eq!(values["query"], "Good to go?");
        assert_eq!(values["description"], "Sample Description");
        assert_eq!(
            values["advice_levels"],
            "Advice levels: Exercise normal safety precautions. "
        );
    }

    #[test]
    fn test_missing_markers_resolve_to_empty() {
        let doc = AdvisoryDocument {
            metadata: HashMap::new(),
            text: "Page not found".to_string(),
        };
        let values = resolve_fields(ADVICE_PROMPT_FIELDS, &doc, "q");
        assert_eq!(values["latest_update"], "");
        assert_eq!(values["advice_levels"], "");
        assert_eq!(values["title"], "");
    }

    #[test]
    fn test_build_advice_prompt_fills_every_placeholder() {
        let prompt = build_advice_prompt(&sample_doc(), "Is it safe?");
        assert!(prompt.contains("`title`: Sample Title"));
        assert!(prompt.contains("`query`: Is it safe?"));
        assert!(prompt.contains("`latest_update`: Latest update: Some content here..."));
        assert!(!prompt.contains("{query}"));
        assert!(!prompt.contains("{advice_levels}"));
        assert!(prompt.ends_with("to provide you with the advice.\""));
    }

    #[test]
    fn test_render_prompt_does_not_expand_placeholders_inside_values() {
        let mut values = HashMap::new();
        values.insert("title", "T");
        values.insert("query", "what is {title}?");
        let rendered = render_prompt("{title} | {query} | {unknown} | {", &values);
        assert_eq!(rendered, "T | what is {title}? | {unknown} | {");
    }

    #[tokio::test]
    async fn test_compose_returns_model_reply_verbatim() {
        let model = Arc::new(EchoModel {
            reply: "  I do not have sufficient information to provide you with the advice.\n"
                .to_string(),
            seen_prompt: Mutex::new(None),
        });
        let composer = AdvisoryComposer::new(model.clone());

        let answer = composer.compose(&sample_doc(), "Is it safe?").await.unwrap();
        assert_eq!(
            answer,
            "  I do not have sufficient information to provide you with the advice.\n"
        );
        let prompt = model.seen_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Sample Description"));
    }

    #[tokio::test]
    async fn test_compose_failure_is_llm_error() {
        let composer = AdvisoryComposer::new(Arc::new(FailingModel));
        let err = composer.compose(&sample_doc(), "q").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(msg) if msg.contains("empty content")));
    }
}
