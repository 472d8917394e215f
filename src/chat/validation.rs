//! Validation messages: request payload, reply schema, and generation with a
//! canned fallback.

use serde::{Deserialize, Serialize};

use super::fallback::{
    intensity_to_temp, map_length_to_fallback, moody_fallback, FallbackPayload, Intensity,
    ValidationMode,
};
use crate::llms::base_llm::{ChatCompletion, ChatRequest, LlmMessage};
use crate::utilities::errors::ApiError;
use crate::utilities::json_repair::parse_json_safe;

pub const MAX_TAGS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Stranger,
    Acquaintance,
    Friend,
    Partner,
    Family,
    Coworker,
    Mentor,
    #[serde(rename = "self")]
    SelfRelation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStyle {
    MoodyBot,
    Gentle,
    Direct,
    Clinical,
    Playful,
    Poetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowupStyle {
    Question,
    Prompt,
    Reflection,
}

/// Body of `POST /api/validation`. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub message: String,
    pub relationship: Relationship,
    pub mode: ValidationMode,
    pub style: ValidationStyle,
    pub intensity: Intensity,
    /// "1-line", "2-3-lines" or "short-paragraph".
    pub length: String,
    #[serde(default)]
    pub include_followup: bool,
    #[serde(default)]
    pub followup_style: Option<FollowupStyle>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub system_flavor: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl ValidationRequest {
    pub fn check(&self) -> Result<(), ApiError> {
        if self.message.trim().is_empty() {
            return Err(ApiError::Validation("message must not be empty".into()));
        }
        if !matches!(self.length.as_str(), "1-line" | "2-3-lines" | "short-paragraph") {
            return Err(ApiError::Validation(format!("unsupported length: {}", self.length)));
        }
        if self.system_flavor.as_deref().is_some_and(|f| f != "validation") {
            return Err(ApiError::Validation("system_flavor must be \"validation\"".into()));
        }
        if self.version.as_deref().is_some_and(|v| v != "v1") {
            return Err(ApiError::Validation("version must be \"v1\"".into()));
        }
        Ok(())
    }

    fn fallback_payload(&self) -> FallbackPayload {
        let style = match self.style {
            ValidationStyle::MoodyBot => "moodybot",
            _ => "plain",
        };
        FallbackPayload {
            mode: self.mode,
            length: map_length_to_fallback(&self.length),
            intensity: self.intensity,
            style: style.to_string(),
            reason_tags: self.tags.clone(),
            include_followup: self.include_followup,
            user_msg: self.message.clone(),
        }
    }
}

/// Reply schema for validation text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub validation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub because: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followup: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::Validation(format!(
            "{} must be {}-{} characters, got {}",
            field, min, max, len
        )));
    }
    Ok(())
}

impl ValidationResponse {
    pub fn check(&self) -> Result<(), ApiError> {
        check_len("validation", &self.validation, 12, 400)?;
        if let Some(ref because) = self.because {
            check_len("because", because, 5, 280)?;
        }
        if let Some(ref followup) = self.followup {
            check_len("followup", followup, 5, 200)?;
        }
        if self.tags.len() > MAX_TAGS {
            return Err(ApiError::Validation(format!(
                "at most {} tags allowed, got {}",
                MAX_TAGS,
                self.tags.len()
            )));
        }
        Ok(())
    }
}

/// A validation reply and whether it came from the canned fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    #[serde(flatten)]
    pub response: ValidationResponse,
    pub is_fallback: bool,
}

fn system_prompt(request: &ValidationRequest) -> String {
    let length = match request.length.as_str() {
        "1-line" => "one line",
        "2-3-lines" => "two to three lines",
        _ => "a short paragraph",
    };
    let followup = if request.include_followup {
        "Include a short \"followup\" question."
    } else {
        "Do not include a followup."
    };
    format!(
        "You are MoodyBot writing a validation message. Relationship to the sender: {:?}. \
         Direction: {}. Style: {:?}. Intensity: {}. Length: {}. Earned praise only, no \
         flattery, no toxic positivity. {} Respond in JSON with a \"validation\" string, an \
         optional \"because\" string, an optional \"followup\" string and a \"tags\" array of \
         at most {} strings.",
        request.relationship,
        request.mode.as_str(),
        request.style,
        request.intensity.as_str(),
        length,
        followup,
        MAX_TAGS,
    )
}

fn parse_reply(text: &str) -> Result<ValidationResponse, ApiError> {
    let value = parse_json_safe(text)
        .ok_or_else(|| ApiError::Validation("reply is not JSON".into()))?;
    let response: ValidationResponse = serde_json::from_value(value)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    response.check()?;
    Ok(response)
}

/// Generate validation text with the given model, falling back to the canned
/// reply when the call fails or its output does not pass [`ValidationResponse::check`].
pub async fn generate_validation(
    llm: &dyn ChatCompletion,
    model: &str,
    request: &ValidationRequest,
) -> ValidationOutcome {
    let chat = ChatRequest::new(vec![
        LlmMessage::system(system_prompt(request)),
        LlmMessage::user(request.message.clone()),
    ])
    .model(model)
    .temperature(intensity_to_temp(request.intensity.level()))
    .json_mode();

    let reply = match llm.complete(chat).await {
        Ok(text) => parse_reply(&text),
        Err(e) => Err(ApiError::Llm(e)),
    };

    match reply {
        Ok(response) => ValidationOutcome { response, is_fallback: false },
        Err(e) => {
            tracing::warn!(error = %e, "Validation reply unusable, using fallback");
            let fallback = moody_fallback(&request.fallback_payload());
            ValidationOutcome {
                response: ValidationResponse {
                    validation: fallback.validation,
                    because: fallback.because,
                    followup: fallback.followup,
                    tags: fallback.tags,
                },
                is_fallback: true,
            }
        }
    }
}
