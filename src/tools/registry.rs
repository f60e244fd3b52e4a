//! 工具注册表
//!
//! 按名称存储 Arc<dyn Tool>，启动时一次性构建并做重名校验，之后只读；
//! 未知名称的查找由 ToolDispatcher 转成模型可见的错误载荷，不会崩溃。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::AgentError;
use crate::llm::protocol::JsonMap;
use crate::tools::{ToolDeclaration, ToolResult};

/// 工具 trait：声明（供模型理解）+ 执行。
/// execute 的 Err 仅用于参数非法或进程无法启动；非零退出码属于正常返回。
#[async_trait]
pub trait Tool: Send + Sync {
    fn declaration(&self) -> ToolDeclaration;

    async fn execute(&self, args: &JsonMap) -> ToolResult;
}

/// 封闭注册表：register / get / declarations
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册工具；重名视为配置错误
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), AgentError> {
        let name = tool.declaration().name;
        if self.tools.contains_key(&name) {
            return Err(AgentError::Config(format!("duplicate tool name: {name}")));
        }
        self.tools.insert(name, Arc::new(tool));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// 全部声明，按名称排序，保证外发请求体字节稳定
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        let mut declarations: Vec<ToolDeclaration> =
            self.tools.values().map(|tool| tool.declaration()).collect();
        declarations.sort_by(|a, b| a.name.cmp(&b.name));
        declarations
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.declarations()
            .into_iter()
            .map(|decl| decl.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{BashTool, HelmTool, KubectlTool};

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(BashTool::new()).unwrap();
        assert!(matches!(
            registry.register(BashTool::new()),
            Err(AgentError::Config(_))
        ));
    }

    #[test]
    fn test_declarations_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(KubectlTool::new()).unwrap();
        registry.register(BashTool::new()).unwrap();
        registry.register(HelmTool::new()).unwrap();
        assert_eq!(registry.tool_names(), vec!["bash", "helm", "kubectl"]);
    }
}
