//! Per-provider wire shapes.
//!
//! Pure functions: building a request never touches the network and
//! extracting text only reads parsed JSON, so both are unit-testable.

use crate::config::{GeneratorConfig, Provider};
use anyhow::{Context, bail};
use serde_json::{Value, json};

/// Output token budget for providers that require one.
pub const MAX_OUTPUT_TOKENS: u32 = 8192;
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A fully specified HTTP POST.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

pub fn build_request(config: &GeneratorConfig, system: &str, prompt: &str) -> anyhow::Result<ProviderRequest> {
    let provider = config.provider;
    let key = config.api_key.as_deref().filter(|k| !k.is_empty());
    if provider.requires_key() && key.is_none() {
        bail!("no API key configured for {provider}");
    }
    let base = config.base_url();
    let model = config.model();

    let request = match provider {
        Provider::OpenAi | Provider::Ollama => ProviderRequest {
            url: format!("{base}/chat/completions"),
            headers: key
                .map(|k| vec![("authorization", format!("Bearer {k}"))])
                .unwrap_or_default(),
            body: json!({
                "model": model,
                "temperature": config.temperature,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": prompt },
                ],
            }),
        },
        Provider::Anthropic => ProviderRequest {
            url: format!("{base}/messages"),
            headers: vec![
                ("x-api-key", key.unwrap_or_default().to_string()),
                ("anthropic-version", ANTHROPIC_VERSION.to_string()),
            ],
            body: json!({
                "model": model,
                "max_tokens": MAX_OUTPUT_TOKENS,
                "temperature": config.temperature,
                "system": system,
                "messages": [{ "role": "user", "content": prompt }],
            }),
        },
        Provider::Gemini => ProviderRequest {
            url: format!("{base}/models/{model}:generateContent"),
            headers: vec![("x-goog-api-key", key.unwrap_or_default().to_string())],
            body: json!({
                "systemInstruction": { "parts": [{ "text": system }] },
                "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
                "generationConfig": {
                    "temperature": config.temperature,
                    "maxOutputTokens": MAX_OUTPUT_TOKENS,
                },
            }),
        },
    };
    Ok(request)
}

/// Pull the generated text out of a provider response.
pub fn extract_text(provider: Provider, response: &Value) -> anyhow::Result<String> {
    if let Some(message) = error_message(response) {
        bail!("{provider} error: {message}");
    }
    let text = match provider {
        Provider::OpenAi | Provider::Ollama => response
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string),
        Provider::Anthropic => join_text(response.get("content"), "/text"),
        Provider::Gemini => join_text(response.pointer("/candidates/0/content/parts"), "/text"),
    };
    text.filter(|t| !t.trim().is_empty())
        .with_context(|| format!("{provider} response has no generated text"))
}

/// Error text from an error-shaped body, across provider conventions.
pub fn error_message(response: &Value) -> Option<String> {
    let error = response.get("error")?;
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    Some(message)
}

fn join_text(parts: Option<&Value>, field: &str) -> Option<String> {
    let parts = parts?.as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.pointer(field).and_then(Value::as_str))
        .collect();
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(provider: Provider) -> GeneratorConfig {
        GeneratorConfig {
            provider,
            api_key: Some("sk-test".into()),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn openai_request_shape() {
        let req = build_request(&config(Provider::OpenAi), "sys", "make ui").unwrap();
        assert_eq!(req.url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(req.headers, vec![("authorization", "Bearer sk-test".to_string())]);
        assert_eq!(req.body["messages"][1]["content"], "make ui");
        assert_eq!(req.body["model"], "gpt-4o-mini");
    }

    #[test]
    fn anthropic_puts_system_at_top_level() {
        let req = build_request(&config(Provider::Anthropic), "sys", "make ui").unwrap();
        assert_eq!(req.url, "https://api.anthropic.com/v1/messages");
        assert_eq!(req.body["system"], "sys");
        assert_eq!(req.body["max_tokens"], MAX_OUTPUT_TOKENS);
        assert!(req.headers.iter().any(|(k, v)| *k == "x-api-key" && v == "sk-test"));
    }

    #[test]
    fn gemini_url_names_the_model() {
        let mut cfg = config(Provider::Gemini);
        cfg.model = "gemini-2.0-flash".into();
        let req = build_request(&cfg, "sys", "make ui").unwrap();
        assert_eq!(
            req.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(req.body["contents"][0]["parts"][0]["text"], "make ui");
    }

    #[test]
    fn ollama_needs_no_key() {
        let cfg = GeneratorConfig {
            provider: Provider::Ollama,
            ..GeneratorConfig::default()
        };
        let req = build_request(&cfg, "sys", "p").unwrap();
        assert!(req.headers.is_empty());
        assert!(build_request(&GeneratorConfig::default(), "sys", "p").is_err());
    }

    #[test]
    fn extracts_text_per_provider() {
        let openai = json!({ "choices": [{ "message": { "content": "lv_obj_t *btn;" } }] });
        assert_eq!(extract_text(Provider::OpenAi, &openai).unwrap(), "lv_obj_t *btn;");

        let anthropic = json!({ "content": [
            { "type": "text", "text": "part one, " },
            { "type": "text", "text": "part two" },
        ] });
        assert_eq!(
            extract_text(Provider::Anthropic, &anthropic).unwrap(),
            "part one, part two"
        );

        let gemini = json!({ "candidates": [{ "content": { "parts": [{ "text": "import lvgl" }] } }] });
        assert_eq!(extract_text(Provider::Gemini, &gemini).unwrap(), "import lvgl");
    }

    #[test]
    fn error_bodies_and_empty_replies_fail() {
        let err = json!({ "error": { "message": "invalid api key", "type": "auth" } });
        let msg = extract_text(Provider::OpenAi, &err).unwrap_err().to_string();
        assert!(msg.contains("invalid api key"));

        let empty = json!({ "choices": [] });
        assert!(extract_text(Provider::Ollama, &empty).is_err());
    }
}
