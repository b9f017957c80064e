use serde::{Deserialize, Serialize};

/// Inline image payload of a multimodal part
#[derive(Serialize, Deserialize)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: &str) -> Part {
        Part { text: Some(text.to_string()), inline_data: None }
    }

    pub fn inline_image(mime_type: &str, base64_data: String) -> Part {
        Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: base64_data,
            }),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Request body of the generateContent endpoint
#[derive(Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    pub fn single_turn(parts: Vec<Part>) -> GenerateRequest {
        GenerateRequest { contents: vec![Content { parts }] }
    }
}

#[derive(Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Deserialize)]
pub struct GenerateResponse {
    pub candidates: Option<Vec<Candidate>>,
}
