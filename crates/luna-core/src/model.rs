use crate::{
    error::{LunaError, Result},
    provider::Provider,
};

/// Send one prompt to the provider's chat-completion endpoint and return the
/// plain-text response. No retries, no caching; failures surface to the
/// caller as service errors.
pub async fn generate(provider: &Provider, prompt: &str) -> Result<String> {
    let config = provider.config();
    let api_key = provider.validate_api_key()?;

    let response = reqwest::Client::new()
        .post(config.api_url)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&serde_json::json!({
            "model": config.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt,
                },
            ],
            "temperature": 0.3,
        }))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;

    parse_completion(&response)
}

/// Extract the generated text from an OpenAI-style chat completion response.
fn parse_completion(response: &serde_json::Value) -> Result<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| LunaError::Service {
            reason: format!("Invalid API response: {:?}", response),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_completion_extracts_content() {
        let response = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "A short summary."}}]
        });
        assert_eq!(parse_completion(&response).unwrap(), "A short summary.");
    }

    #[test]
    fn parse_completion_rejects_error_payload() {
        let response = serde_json::json!({
            "error": {"message": "rate limit exceeded", "code": 429}
        });
        let err = parse_completion(&response).unwrap_err();
        match err {
            LunaError::Service { reason } => assert!(reason.contains("rate limit exceeded")),
            other => panic!("expected Service error, got {other:?}"),
        }
    }
}
