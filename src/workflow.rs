//! Communications workflow orchestrator
//!
//! Fixed four-step pipeline: retrieve product context for a feature,
//! generate a social media post, generate an FAQ answer, assemble the
//! result. Strictly sequential; both generation calls consume the same
//! retrieved context and are independent of each other.

use crate::backend::{GenerateRequest, RetryPolicy, TextBackend};
use crate::errors::{CommsError, Result};
use crate::tool::RetrievalTool;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// System instruction for the social media copy step
pub const SOCIAL_SYSTEM_PROMPT: &str = "You are the SynapseFlow Social Media Copywriter. \
Your goal is to generate a concise, exciting, launch-ready tweet (max 280 characters). \
Your tone must be Enthusiastic and Forward-Thinking. \
End with exactly one relevant emoji and the hashtag #SynapseFlow. \
Focus on the benefit to the user, not just the technical spec.";

/// System instruction for the FAQ documentation step
pub const FAQ_SYSTEM_PROMPT: &str = "You are the SynapseFlow Technical Documentation Specialist. \
Your goal is to write a detailed, factual, and neutral FAQ answer. \
Your tone must be Clear and Objective. \
Present all specifications accurately using a bulleted list format. \
Do not use emojis or marketing hype.";

/// Terminal output of the workflow, immutable once constructed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub feature_name: String,
    pub social_media_post: String,
    pub faq_answer: String,
}

/// Top-level driver for the communications workflow
pub struct CommsOrchestrator {
    tool: RetrievalTool,
    backend: Arc<dyn TextBackend>,
    retry: RetryPolicy,
}

impl CommsOrchestrator {
    pub fn new(tool: RetrievalTool, backend: Arc<dyn TextBackend>, retry: RetryPolicy) -> Self {
        Self {
            tool,
            backend,
            retry,
        }
    }

    /// Retrieval query template for a feature name
    pub fn retrieval_query(feature_name: &str) -> String {
        format!(
            "Provide all available product data and key metrics for the feature: {}.",
            feature_name
        )
    }

    /// Retrieve product context for the feature via the retrieval tool
    pub async fn retrieve_product_context(&self, feature_name: &str) -> Result<String> {
        self.tool
            .invoke(&Self::retrieval_query(feature_name))
            .await
            .map_err(|e| match e {
                // Already stage-tagged by the query engine
                CommsError::Retrieval(_) => e,
                other => CommsError::Retrieval(other.to_string()),
            })
    }

    /// Run the full workflow for one feature request.
    ///
    /// Any stage failure aborts the run; there is no partial result.
    pub async fn run(&self, feature_name: &str) -> Result<WorkflowResult> {
        // 1. Context retrieval
        let product_context = self.retrieve_product_context(feature_name).await?;

        self.generate_from_context(feature_name, &product_context)
            .await
    }

    /// Steps 2-4: generate both pieces of copy from already-retrieved
    /// context and assemble the result. Callers that want to inspect or
    /// display the context retrieve it first, then hand it in here.
    pub async fn generate_from_context(
        &self,
        feature_name: &str,
        product_context: &str,
    ) -> Result<WorkflowResult> {
        // 2. Social media copy
        let social_input = format!(
            "Generate a launch announcement tweet for the feature: {}.",
            feature_name
        );
        let social_media_post = self
            .generate(SOCIAL_SYSTEM_PROMPT, &product_context, &social_input)
            .await?;

        // 3. Documentation copy
        let faq_input = format!(
            "Write a comprehensive FAQ answer explaining the details of the {} feature.",
            feature_name
        );
        let faq_answer = self
            .generate(FAQ_SYSTEM_PROMPT, &product_context, &faq_input)
            .await?;

        // 4. Assemble
        Ok(WorkflowResult {
            feature_name: feature_name.to_string(),
            social_media_post,
            faq_answer,
        })
    }

    async fn generate(&self, system: &str, context: &str, input: &str) -> Result<String> {
        let request = GenerateRequest::new(system, context, input);
        let backend = self.backend.clone();
        self.retry
            .execute(|| {
                let backend = backend.clone();
                let request = request.clone();
                async move { backend.generate(&request).await }
            })
            .await
            .map_err(|e| CommsError::Generation(e.to_string()))
    }

    pub fn tool(&self) -> &RetrievalTool {
        &self.tool
    }
}
