//! 工具调度器
//!
//! 注册表查找 + 确认门 + 载荷/错误双轨转换。dispatch 返回的载荷总是作为
//! functionResponse 写回历史（模型据此调整策略）；错误侧只供进程本地记录，
//! 工具层面的失败从不中止会话。安全开关在构造时固定，会话期不可变。

use std::sync::Arc;

use serde_json::Value;

use crate::core::AgentError;
use crate::llm::protocol::JsonMap;
use crate::tools::{ConfirmationGate, ToolDeclaration, ToolRegistry};

/// 用户拒绝后写回的正常响应（非错误，模型可以体面地继续）
const CANCELLED_BY_USER: &str = "Tool execution cancelled by user.";

pub struct ToolDispatcher {
    registry: ToolRegistry,
    gate: Arc<dyn ConfirmationGate>,
    /// 会话期固定：true 时每次执行前咨询确认门
    confirm_execution: bool,
}

impl ToolDispatcher {
    pub fn new(
        registry: ToolRegistry,
        gate: Arc<dyn ConfirmationGate>,
        confirm_execution: bool,
    ) -> Self {
        Self {
            registry,
            gate,
            confirm_execution,
        }
    }

    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.registry.declarations()
    }

    /// 调度一次函数调用，返回（写回历史的载荷, 可选的本地错误）
    pub async fn dispatch(&self, name: &str, args: &JsonMap) -> (JsonMap, Option<AgentError>) {
        let Some(tool) = self.registry.get(name) else {
            return (
                error_payload(format!("Tool not found: {name}")),
                Some(AgentError::ToolNotFound(name.to_string())),
            );
        };

        if self.confirm_execution && !self.gate.confirm(name, args) {
            tracing::info!(tool = %name, "tool execution declined by operator");
            let mut payload = JsonMap::new();
            payload.insert(
                "result".to_string(),
                Value::String(CANCELLED_BY_USER.to_string()),
            );
            return (payload, None);
        }

        match tool.execute(args).await {
            Ok(result) => (result, None),
            Err(e) => {
                let message = format!("Error executing tool {name}: {e}");
                (
                    error_payload(message.clone()),
                    Some(AgentError::ToolExecution(message)),
                )
            }
        }
    }
}

fn error_payload(message: String) -> JsonMap {
    let mut payload = JsonMap::new();
    payload.insert("error".to_string(), Value::String(message));
    payload
}
