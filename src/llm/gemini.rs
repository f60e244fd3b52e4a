//! Gemini 客户端
//!
//! 每次请求携带完整历史 + 工具声明 + 固定安全阈值，temperature 固定为 0；
//! API key 作为 query 参数。错误分三类：发送失败（Transport）、非 2xx（Api）、
//! 响应体解析失败（Protocol），内部一律不重试（RetryPolicy 默认 NoRetry）。

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LlmSection;
use crate::core::AgentError;
use crate::llm::protocol::{
    default_safety_settings, Content, FunctionDeclaration, GenerateRequest, GenerateResponse,
    GenerationConfig, ToolGroup,
};
use crate::llm::{ModelClient, NoRetry, RetryPolicy};
use crate::tools::ToolDeclaration;

const DEFAULT_MODEL: &str = "gemini-1.5-pro";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini generateContent 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    retry: Arc<dyn RetryPolicy>,
}

impl GeminiClient {
    /// 创建客户端；api_key 为空时立即失败（快速暴露配置问题），
    /// model / endpoint 留空时取 provider 默认值
    pub fn new(section: &LlmSection) -> Result<Self, AgentError> {
        if section.api_key.is_empty() {
            return Err(AgentError::Config(
                "api_key is required for the gemini provider".to_string(),
            ));
        }
        let model = if section.model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            section.model.clone()
        };
        let endpoint = if section.endpoint.is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            section.endpoint.trim_end_matches('/').to_string()
        };
        Ok(Self {
            http: reqwest::Client::new(),
            api_key: section.api_key.clone(),
            model,
            endpoint,
            retry: Arc::new(NoRetry),
        })
    }

    /// 注入重试策略（默认 NoRetry）
    pub fn with_retry_policy(mut self, retry: Arc<dyn RetryPolicy>) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }

    fn build_request(
        history: &[Content],
        declarations: &[ToolDeclaration],
    ) -> GenerateRequest {
        let tools = if declarations.is_empty() {
            Vec::new()
        } else {
            vec![ToolGroup {
                function_declarations: declarations.iter().map(FunctionDeclaration::from).collect(),
            }]
        };
        GenerateRequest {
            contents: history.to_vec(),
            tools,
            safety_settings: default_safety_settings(),
            generation_config: GenerationConfig::default(),
        }
    }

    async fn generate_once(
        &self,
        history: &[Content],
        declarations: &[ToolDeclaration],
    ) -> Result<GenerateResponse, AgentError> {
        let request = Self::build_request(history, declarations);
        tracing::debug!(
            body = %serde_json::to_string(&request).unwrap_or_default(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(self.request_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(AgentError::Api {
                status: status.as_u16(),
                body,
            });
        }
        tracing::debug!(body = %body, "received generateContent response");

        serde_json::from_str(&body).map_err(|e| AgentError::Protocol(e.to_string()))
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(
        &self,
        history: &[Content],
        declarations: &[ToolDeclaration],
    ) -> Result<GenerateResponse, AgentError> {
        let mut attempt: u32 = 0;
        loop {
            match self.generate_once(history, declarations).await {
                Ok(response) => return Ok(response),
                Err(e) if self.retry.should_retry(attempt, &e) => {
                    tracing::warn!(attempt, error = %e, "retrying model request");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
