//! Rewrite Agent
//!
//! Sends the full paper text to the generation service with a fixed prompt
//! asking for six audience-targeted deliverables. The response is returned
//! untouched; nothing checks that all six sections are actually present.

use std::sync::Arc;

use crate::config::LLMConfig;
use crate::llm::provider::LLMAdapter;
use crate::types::{AppResult, LLMMessage, LLMRequest};
use tracing::{error, info};

const SYSTEM_PROMPT: &str = "You are an expert at simplifying complex scientific papers for general audiences while maintaining accuracy. You create multiple formats of content for different platforms and audiences.";

const INSTRUCTIONS: &str = "You are designed to take in scientific papers and produce multiple simplified outputs for broader public understanding and engagement. You will provide the following as output:

1. Community Summary – a simplified summary written at about a 6th grade reading level, but without mentioning reading level in the output.

2. Three draft blog posts – examples of how the content could look in blog format.

3. Three draft Facebook posts – short, curiosity-piquing posts designed to boost engagement.

4. YouTube video script (3–5 minutes) – based on the paper.

5. Main Findings – a summary of the study's findings written in plain language at about an 8th grade level (do not label reading level).

6. How This Information Can Be Used – examples of how communities, health care providers, program directors, and legislators could use the findings, written in plain language at about an 8th grade level (do not label reading level).

All outputs must be crafted to make the science accessible and engaging for non-expert audiences. Technical terms must be simplified or explained with analogies and examples appropriate to the audience. Adapt tone and structure depending on the platform while maintaining accuracy and clarity.

Format your response with clear section headings for each deliverable (use ## for markdown headings).";

const CLOSING: &str = "Please provide all six outputs listed above.";

/// Sampling parameters for the single generation call
#[derive(Debug, Clone)]
pub struct RewriteParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for RewriteParams {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 8000,
        }
    }
}

impl From<&LLMConfig> for RewriteParams {
    fn from(config: &LLMConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

pub struct RewriteAgent {
    llm: Arc<dyn LLMAdapter>,
    params: RewriteParams,
}

impl RewriteAgent {
    pub fn new(llm: Arc<dyn LLMAdapter>, params: RewriteParams) -> Self {
        Self { llm, params }
    }

    /// Embed the paper verbatim into the instruction template
    pub fn create_prompt(paper_text: &str) -> String {
        format!(
            "{}\n\nScientific Paper:\n{}\n\n{}",
            INSTRUCTIONS, paper_text, CLOSING
        )
    }

    pub fn build_request(&self, paper_text: &str) -> LLMRequest {
        LLMRequest {
            model: self.params.model.clone(),
            messages: vec![
                LLMMessage::system(SYSTEM_PROMPT),
                LLMMessage::user(Self::create_prompt(paper_text)),
            ],
            max_tokens: Some(self.params.max_tokens),
            temperature: Some(self.params.temperature),
        }
    }

    /// One call, no retry. Any failure is terminal for the request.
    pub async fn generate(&self, paper_text: &str) -> AppResult<String> {
        info!(
            text_len = paper_text.len(),
            model = %self.params.model,
            "Requesting simplified rewrites"
        );

        let request = self.build_request(paper_text);

        match self.llm.create_chat_completion(&request).await {
            Ok(response) => {
                info!(
                    response_len = response.content.len(),
                    finish_reason = %response.finish_reason,
                    total_tokens = response.usage.total_tokens,
                    "Generated rewrites"
                );
                Ok(response.content)
            }
            Err(e) => {
                error!(error = %e, "Error calling generation service");
                Err(e)
            }
        }
    }
}
