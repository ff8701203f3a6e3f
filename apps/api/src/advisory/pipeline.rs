//! Advisory pipeline: locate → fetch → compose, strictly in sequence.
//!
//! `AppState` holds an `Arc<dyn TravelAdviser>`; handlers never see the stages.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::advisory::composer::AdvisoryComposer;
use crate::advisory::fetcher::DocumentLoader;
use crate::advisory::locator::AdvisoryLocator;
use crate::errors::AppError;

/// Answers a validated travel-safety query.
#[async_trait]
pub trait TravelAdviser: Send + Sync {
    async fn advise(&self, query: &str) -> Result<String, AppError>;
}

pub struct AdvisoryPipeline {
    locator: AdvisoryLocator,
    loader: Arc<dyn DocumentLoader>,
    composer: AdvisoryComposer,
}

impl AdvisoryPipeline {
    pub fn new(
        locator: AdvisoryLocator,
        loader: Arc<dyn DocumentLoader>,
        composer: AdvisoryComposer,
    ) -> Self {
        Self {
            locator,
            loader,
            composer,
        }
    }
}

#[async_trait]
impl TravelAdviser for AdvisoryPipeline {
    async fn advise(&self, query: &str) -> Result<String, AppError> {
        let url = self.locator.locate(query).await?;
        let document = self.loader.load(&url).await?;
        let answer = self.composer.compose(&document, query).await?;

        info!(%url, answer_chars = answer.chars().count(), "Composed travel advice");
        Ok(answer)
    }
}
