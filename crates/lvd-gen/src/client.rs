//! Code generation client.
//!
//! `CodeGenerator` turns a project into target-language source through a
//! `Backend`. Failures never escape `generate`: they come back as a
//! commented-out error block so the caller can show it and retry.

use crate::config::GeneratorConfig;
use crate::prompt::{system_prompt, user_prompt};
use crate::provider::{build_request, error_message, extract_text};
use crate::target::TargetLanguage;
use anyhow::{Context, bail};
use lvd_core::draft::strip_code_fence;
use lvd_core::export::ExportDocument;
use lvd_core::model::Project;
use std::future::Future;
use std::time::Duration;

/// A text-completion service: system + user message in, reply text out.
pub trait Backend: Send + Sync + 'static {
    fn complete(&self, system: &str, prompt: &str) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// HTTP backend for the configured provider.
pub struct HttpBackend {
    config: GeneratorConfig,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: GeneratorConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building HTTP client")?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl Backend for HttpBackend {
    async fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<String> {
        let provider = self.config.provider;
        let request = build_request(&self.config, system, prompt)?;
        log::info!("generating with {provider} model {}", self.config.model());

        let mut builder = self.http.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        let response = builder
            .send()
            .await
            .with_context(|| format!("request to {provider} failed"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("reading {provider} response"))?;

        let json: serde_json::Value = match serde_json::from_str(&body) {
            Ok(json) => json,
            Err(_) if !status.is_success() => bail!("{provider} returned HTTP {status}"),
            Err(e) => return Err(e).with_context(|| format!("{provider} response is not JSON")),
        };
        if !status.is_success() {
            let detail = error_message(&json).unwrap_or_else(|| status.to_string());
            bail!("{provider} returned HTTP {status}: {detail}");
        }
        extract_text(provider, &json)
    }
}

pub struct CodeGenerator<B = HttpBackend> {
    backend: B,
}

impl CodeGenerator<HttpBackend> {
    pub fn from_config(config: GeneratorConfig) -> anyhow::Result<Self> {
        Ok(Self::new(HttpBackend::new(config)?))
    }
}

impl<B: Backend> CodeGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate source for `project`, surfacing every failure.
    pub async fn try_generate(&self, project: &Project, lang: TargetLanguage) -> anyhow::Result<String> {
        let doc = ExportDocument::build(project, lang.tag());
        let json = doc.to_json()?;
        let prompt = user_prompt(&doc, &json);
        let reply = self.backend.complete(&system_prompt(lang), &prompt).await?;
        let code = strip_code_fence(&reply).trim();
        if code.is_empty() {
            bail!("the model returned no code");
        }
        Ok(format!("{code}\n"))
    }

    /// Generate source for `project`. Never fails: errors become a
    /// comment block in `lang`.
    pub async fn generate(&self, project: &Project, lang: TargetLanguage) -> String {
        match self.try_generate(project, lang).await {
            Ok(code) => code,
            Err(e) => {
                log::warn!("code generation failed: {e:#}");
                failure_comment(lang, &e)
            }
        }
    }
}

/// Visible stand-in for code when generation fails.
pub fn failure_comment(lang: TargetLanguage, err: &anyhow::Error) -> String {
    lang.comment(&format!(
        "Code generation failed.\n{err:#}\nCheck the generator settings and try again."
    ))
}
