//! bash 工具：执行任意 bash 命令行并带回输出与退出码

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::llm::protocol::JsonMap;
use crate::tools::{
    parse_args, CommandRunner, PropertyKind, SystemRunner, Tool, ToolDeclaration, ToolResult,
};

#[derive(Debug, Deserialize)]
struct BashArgs {
    command: String,
}

pub struct BashTool {
    runner: Arc<dyn CommandRunner>,
}

impl BashTool {
    pub fn new() -> Self {
        Self::with_runner(Arc::new(SystemRunner))
    }

    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl Default for BashTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for BashTool {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new("bash", "Execute a bash command and return the result").required(
            "command",
            PropertyKind::String,
            "The bash command to execute",
        )
    }

    async fn execute(&self, args: &JsonMap) -> ToolResult {
        let args: BashArgs = parse_args(args)?;
        let outcome = self.runner.run(&args.command).await?;
        Ok(outcome.into_payload())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tools::ToolError;

    #[tokio::test]
    async fn test_missing_command_is_bad_argument() {
        let tool = BashTool::new();
        let args = json!({}).as_object().cloned().unwrap();
        assert!(matches!(
            tool.execute(&args).await,
            Err(ToolError::BadArgument(_))
        ));
    }
}
