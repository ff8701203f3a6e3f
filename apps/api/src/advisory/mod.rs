// Travel advisory pipeline.
// Implements: destination lookup, advisory page fetch, snippet extraction, advice composition.
// All LLM calls go through llm_client, never OpenAI directly.

pub mod composer;
pub mod extract;
pub mod fetcher;
pub mod handlers;
pub mod locator;
pub mod models;
pub mod pipeline;
pub mod prompts;
