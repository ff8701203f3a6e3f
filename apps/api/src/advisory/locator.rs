//! Advisory Locator: asks the model which country a query is about and maps
//! the answer onto the advisory site's `/destinations/{region}/{country}` URL.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::advisory::models::{normalize_slug, LocationGuess, Region};
use crate::advisory::prompts::{locate_tool, LOCATE_PROMPT_TEMPLATE};
use crate::errors::AppError;
use crate::llm_client::prompts::TRIP_ADVISOR_SYSTEM;
use crate::llm_client::{call_tool_as, ChatModel};

const MISSING_LOCATION: &str = "Please provide the region and country for travel advice";

/// Raw tool arguments, before normalization and region parsing.
#[derive(Debug, Deserialize)]
struct LocateArgs {
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
}

pub struct AdvisoryLocator {
    model: Arc<dyn ChatModel>,
    base_url: String,
}

impl AdvisoryLocator {
    pub fn new(model: Arc<dyn ChatModel>, base_url: impl Into<String>) -> Self {
        Self {
            model,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolves `query` to the advisory URL for its destination.
    pub async fn locate(&self, query: &str) -> Result<String, AppError> {
        let guess = self.guess_location(query).await?;
        let url = advisory_url(&self.base_url, &guess);
        info!(region = %guess.region, country = %guess.country, %url, "Resolved advisory URL");
        Ok(url)
    }

    pub async fn guess_location(&self, query: &str) -> Result<LocationGuess, AppError> {
        let prompt = LOCATE_PROMPT_TEMPLATE.replace("{query}", query);
        let args: LocateArgs =
            call_tool_as(self.model.as_ref(), TRIP_ADVISOR_SYSTEM, &prompt, &locate_tool())
                .await
                .map_err(|e| AppError::Llm(format!("Location lookup failed: {e}")))?;

        debug!(region = %args.region, country = %args.country, "Model location guess");
        location_from_args(args)
    }
}

fn location_from_args(args: LocateArgs) -> Result<LocationGuess, AppError> {
    let country = normalize_slug(&args.country);
    if args.region.trim().is_empty() || country.is_empty() {
        return Err(AppError::Validation(MISSING_LOCATION.to_string()));
    }

    let region: Region = args
        .region
        .parse()
        .map_err(|e| AppError::Llm(format!("Location lookup failed: {e}")))?;

    Ok(LocationGuess { region, country })
}

/// `{base_url}/destinations/{region}/{country}`. No check that the page exists.
pub fn advisory_url(base_url: &str, guess: &LocationGuess) -> String {
    format!(
        "{}/destinations/{}/{}",
        base_url.trim_end_matches('/'),
        guess.region,
        guess.country
    )
}
