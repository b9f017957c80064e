pub mod errors;

use std::time::Duration;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::error;
use ureq::Agent;
use crate::config::Gemini as GeminiConfig;
use crate::manager_gemini::errors::GeminiError;
use crate::models::gemini::{GenerateRequest, GenerateResponse, Part};

/// Returned instead of an error whenever the chat bridge fails
const CHAT_FALLBACK: &str =
    "I apologize, but I'm having trouble connecting to the AI service right now. Please try again later.";

/// Returned instead of an error whenever the image bridge fails
const ANALYSIS_FALLBACK: &str = "Analysis failed. Please try again.";

/// Struct for managing the generative AI text and image bridges
pub struct Gemini {
    agent: Agent,
    api_key: String,
    base_url: String,
}

impl Gemini {
    /// Returns a Gemini struct ready for single turn text generation and
    /// multimodal image analysis
    ///
    /// # Arguments
    ///
    /// * 'config' - the Gemini section of the configuration
    pub fn new(config: &GeminiConfig) -> Gemini {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build();

        let agent = agent_config.into();

        Gemini {
            agent,
            api_key: config.api_key.to_string(),
            base_url: config.base_url.to_string(),
        }
    }

    /// Sends a farm assistant question embedded in a context blob assembled
    /// by the caller from the current weather and soil snapshots.
    ///
    /// This never fails: any transport or shape error is logged and replaced
    /// by a fixed apology, so the conversation flow needs no error branches.
    ///
    /// # Arguments
    ///
    /// * 'message' - the user question
    /// * 'context' - free text describing the current farm state
    pub fn chat(&self, message: &str, context: &str) -> String {
        let req = GenerateRequest::single_turn(vec![Part::text(&chat_prompt(message, context))]);

        match self.generate(&req) {
            Ok(text) => text,
            Err(e) => {
                error!("Gemini chat error: {}", e);
                CHAT_FALLBACK.to_string()
            }
        }
    }

    /// Submits an in-memory image alongside an instruction prompt to the
    /// multimodal endpoint and returns the raw text response. Structured
    /// field extraction is left to the caller.
    ///
    /// # Arguments
    ///
    /// * 'image' - the raw image bytes
    /// * 'mime_type' - MIME type of the image
    /// * 'prompt' - the instruction prompt
    pub fn analyze_image(&self, image: &[u8], mime_type: &str, prompt: &str) -> String {
        let req = GenerateRequest::single_turn(vec![
            Part::text(prompt),
            Part::inline_image(mime_type, STANDARD.encode(image)),
        ]);

        match self.generate(&req) {
            Ok(text) => text,
            Err(e) => {
                error!("Gemini vision error: {}", e);
                ANALYSIS_FALLBACK.to_string()
            }
        }
    }

    /// Posts a generateContent request and extracts the first candidate text
    ///
    /// # Arguments
    ///
    /// * 'req' - the request body
    fn generate(&self, req: &GenerateRequest) -> Result<String, GeminiError> {
        let url = format!("{}?key={}", self.base_url, self.api_key);
        let req_json = serde_json::to_string(req)?;

        let json = self.agent
            .post(url)
            .header("Content-Type", "application/json")
            .send(req_json)?
            .body_mut()
            .read_to_string()?;

        let response: GenerateResponse = serde_json::from_str(&json)?;

        extract_text(response)
    }
}

/// Builds the single turn prompt embedding context and question
///
/// # Arguments
///
/// * 'message' - the user question
/// * 'context' - free text describing the current farm state
pub fn chat_prompt(message: &str, context: &str) -> String {
    format!(
        "You are a smart farming AI assistant. Context: {}\n\nUser question: {}\n\n\
         Provide practical farming advice based on the context and question.",
        context, message
    )
}

/// Pulls the first candidate's first text part out of a response document
///
/// # Arguments
///
/// * 'response' - the deserialized response body
pub fn extract_text(response: GenerateResponse) -> Result<String, GeminiError> {
    response.candidates
        .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
        .and_then(|c| c.content)
        .and_then(|mut c| if c.parts.is_empty() { None } else { Some(c.parts.remove(0)) })
        .and_then(|p| p.text)
        .ok_or(GeminiError::Shape("response carries no candidate text".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_embeds_context_and_question() {
        let prompt = chat_prompt("When should I irrigate?", "Current Weather: 28.5°C, clear sky");

        assert!(prompt.starts_with("You are a smart farming AI assistant."));
        assert!(prompt.contains("Context: Current Weather: 28.5°C, clear sky"));
        assert!(prompt.contains("User question: When should I irrigate?"));
    }

    #[test]
    fn text_request_serializes_single_part() {
        let req = GenerateRequest::single_turn(vec![Part::text("hello")]);
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert!(value["contents"][0]["parts"][0].get("inlineData").is_none());
    }

    #[test]
    fn image_request_carries_inline_data() {
        let req = GenerateRequest::single_turn(vec![
            Part::text("inspect this leaf"),
            Part::inline_image("image/png", STANDARD.encode(b"leaf-bytes")),
        ]);
        let value = serde_json::to_value(&req).unwrap();

        let image_part = &value["contents"][0]["parts"][1];
        assert_eq!(image_part["inlineData"]["mimeType"], "image/png");
        assert_eq!(image_part["inlineData"]["data"], "bGVhZi1ieXRlcw==");
        assert!(image_part.get("text").is_none());
    }

    #[test]
    fn extracts_first_candidate_text() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "water in the evening"}]}},
                {"content": {"parts": [{"text": "second candidate"}]}}
            ]
        })).unwrap();

        assert_eq!(extract_text(response).unwrap(), "water in the evening");
    }

    #[test]
    fn failed_bridge_calls_return_the_fixed_strings() {
        let gemini = Gemini::new(&GeminiConfig {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:9/v1beta/models/gemini-pro:generateContent".to_string(),
        });

        assert_eq!(gemini.chat("When should I irrigate?", "no data yet"), CHAT_FALLBACK);
        assert_eq!(gemini.analyze_image(b"leaf-bytes", "image/png", "inspect this leaf"),
                   ANALYSIS_FALLBACK);
    }

    #[test]
    fn missing_candidates_is_a_shape_error() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(extract_text(response), Err(GeminiError::Shape(_))));

        let response: GenerateResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(matches!(extract_text(response), Err(GeminiError::Shape(_))));

        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": []}}]
        })).unwrap();
        assert!(matches!(extract_text(response), Err(GeminiError::Shape(_))));
    }
}
