//! 模型客户端抽象
//!
//! 所有后端实现 ModelClient：一次性发送完整历史与工具声明，拿回候选列表。
//! create_client 按配置选择后端，key 缺失或 provider 不支持时立即报配置错误。

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LlmSection;
use crate::core::AgentError;
use crate::tools::ToolDeclaration;

pub mod gemini;
pub mod mock;
pub mod protocol;

pub use gemini::GeminiClient;
pub use mock::MockModelClient;
pub use protocol::{Content, GenerateResponse};

/// 模型客户端 trait：无流式，阻塞到完整响应体返回
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(
        &self,
        history: &[Content],
        declarations: &[ToolDeclaration],
    ) -> Result<GenerateResponse, AgentError>;
}

/// 重试策略扩展点：attempt 从 0 计，返回 true 则重发本次请求。
/// 参考行为是完全不重试，因此默认实现是 NoRetry；需要退避的调用方自行注入。
pub trait RetryPolicy: Send + Sync {
    fn should_retry(&self, attempt: u32, error: &AgentError) -> bool;
}

/// 不重试
#[derive(Debug, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn should_retry(&self, _attempt: u32, _error: &AgentError) -> bool {
        false
    }
}

/// 工厂：按 [llm].provider 创建客户端
pub fn create_client(section: &LlmSection) -> Result<Arc<dyn ModelClient>, AgentError> {
    match section.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::new(section)?)),
        other => Err(AgentError::Config(format!(
            "unsupported model provider: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmSection;

    #[test]
    fn test_create_client_rejects_unknown_provider() {
        let section = LlmSection {
            provider: "acme".to_string(),
            api_key: "key".to_string(),
            ..LlmSection::default()
        };
        assert!(matches!(
            create_client(&section),
            Err(AgentError::Config(_))
        ));
    }

    #[test]
    fn test_create_client_requires_api_key() {
        let section = LlmSection {
            provider: "gemini".to_string(),
            ..LlmSection::default()
        };
        assert!(matches!(
            create_client(&section),
            Err(AgentError::Config(_))
        ));
    }
}
