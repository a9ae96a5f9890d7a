use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::{AssessmentProvider, PromptMessages, ProviderError};
use crate::config::ProviderConfig;

/// Provider backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Build a provider when a credential is configured, `None` otherwise.
    ///
    /// The request deadline is owned by the orchestrator, not the HTTP client.
    pub fn from_config(config: &ProviderConfig) -> Result<Option<Self>, ProviderError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ProviderError::Client(err.to_string()))?;

        Ok(Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    stream: bool,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyCompletion)
    }
}

impl AssessmentProvider for OpenAiProvider {
    async fn complete(&self, prompt: &PromptMessages) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: 0.2,
            stream: false,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!(model = %self.model, "requesting provider completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;

        body.into_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn provider_config(api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.map(str::to_string),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://llm.internal.example/v1/".to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    #[test]
    fn missing_credential_disables_provider() {
        let provider = OpenAiProvider::from_config(&provider_config(None)).expect("builds");
        assert!(provider.is_none());
    }

    #[test]
    fn configured_provider_targets_chat_completions() {
        let provider = OpenAiProvider::from_config(&provider_config(Some("sk-test")))
            .expect("builds")
            .expect("provider enabled");
        assert_eq!(
            provider.endpoint(),
            "https://llm.internal.example/v1/chat/completions"
        );
        assert_eq!(provider.model(), "gpt-4o-mini");
    }

    #[test]
    fn request_serializes_as_single_non_streaming_chat() {
        let prompt = PromptMessages {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: 0.2,
            stream: false,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let value = serde_json::to_value(&request).expect("serializes");
        assert_eq!(value["stream"], serde_json::json!(false));
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "usr");
        assert_eq!(value["response_format"]["type"], "json_object");
    }

    #[test]
    fn extracts_first_choice_content() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"score\":1}"}}]}"#,
        )
        .expect("parses");
        assert_eq!(body.into_content().expect("content"), "{\"score\":1}");
    }

    #[test]
    fn empty_choices_are_an_empty_completion() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).expect("parses");
        assert!(matches!(
            body.into_content(),
            Err(ProviderError::EmptyCompletion)
        ));

        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#)
                .expect("parses");
        assert!(matches!(
            body.into_content(),
            Err(ProviderError::EmptyCompletion)
        ));
    }
}
