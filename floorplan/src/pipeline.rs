//! Extraction and update of floor plans through a language model.

use tracing::{debug, warn};

use crate::{
    completion::{CompletionClient, CompletionRequest, OpenAiCompatibleClient},
    config::CompletionConfig,
    error::{CompletionError, ConfigError, Result},
    model::FloorPlan,
    prompt::Prompt,
    recovery::{format_instructions, recover},
};

/// Turns free-text descriptions into floor plans using a completion client.
///
/// Each call renders one prompt, makes exactly one completion request and
/// recovers the plan from the reply. The extractor holds no state between
/// calls.
///
/// # Examples
///
/// ```
/// use floorplan::{
///     completion::CompletionRequest, error::CompletionError, FloorPlanExtractor,
/// };
///
/// let client = |_: &CompletionRequest| -> Result<String, CompletionError> {
///     Ok(r#"{"rooms": [{"name": "Balcony", "type": "Balcony", "link": []}]}"#.to_string())
/// };
/// let extractor = FloorPlanExtractor::new(client, "llama3:instruct");
///
/// let plan = extractor.extract("A balcony facing west.").unwrap();
/// assert_eq!(plan.rooms()[0].name(), "Balcony");
/// ```
#[derive(Debug, Clone)]
pub struct FloorPlanExtractor<C> {
    client: C,
    model: String,
}

impl FloorPlanExtractor<OpenAiCompatibleClient> {
    /// Creates an extractor backed by an HTTP client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn from_config(config: &CompletionConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            OpenAiCompatibleClient::new(config),
            config.model.clone(),
        ))
    }
}

impl<C: CompletionClient> FloorPlanExtractor<C> {
    /// Creates an extractor that sends requests for `model` through `client`.
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Model identifier sent with every request.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Extracts a floor plan from a description.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Completion`](crate::error::Error::Completion) if the
    /// request fails, [`Error::Extraction`](crate::error::Error::Extraction)
    /// if the reply holds no balanced object, and
    /// [`Error::Parse`](crate::error::Error::Parse) if the object is not a
    /// valid floor plan.
    pub fn extract(&self, description: &str) -> Result<FloorPlan> {
        self.run(Prompt::Extraction { description })
    }

    /// Produces a new floor plan from a serialized one and a further description.
    ///
    /// The model is asked to keep everything the new description does not
    /// contradict. Its reply is validated but not merged with `existing`.
    ///
    /// # Errors
    ///
    /// Same as [`FloorPlanExtractor::extract`].
    pub fn update(&self, existing: &str, new_description: &str) -> Result<FloorPlan> {
        self.run(Prompt::Update {
            existing,
            description: new_description,
        })
    }

    /// Like [`FloorPlanExtractor::update`], starting from a parsed plan.
    pub fn update_plan(&self, existing: &FloorPlan, new_description: &str) -> Result<FloorPlan> {
        self.update(&existing.to_json(), new_description)
    }

    /// Extracts a floor plan and returns its textual serialization.
    pub fn extract_information(&self, description: &str) -> Result<String> {
        self.extract(description).map(|plan| plan.to_json())
    }

    /// Updates a serialized floor plan and returns the new serialization.
    pub fn update_floor_plan(&self, existing: &str, new_description: &str) -> Result<String> {
        self.update(existing, new_description)
            .map(|plan| plan.to_json())
    }

    fn run(&self, prompt: Prompt<'_>) -> Result<FloorPlan> {
        let text = prompt.render(format_instructions());
        debug!(kind = prompt.kind(), len = text.len(), "rendered prompt");

        let request = CompletionRequest::user_prompt(&self.model, text);
        debug!(
            model = %self.model,
            messages = request.messages.len(),
            "requesting completion"
        );

        let reply = self.client.complete(&request).map_err(|err| {
            warn!(error = %err, "completion request failed");
            err
        })?;
        if reply.trim().is_empty() {
            warn!("completion returned empty content");
            return Err(CompletionError::EmptyContent.into());
        }
        debug!(len = reply.len(), "received completion");

        recover(&reply)
    }
}
