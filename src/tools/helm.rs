//! helm 工具
//!
//! --output 对部分子命令不适用（helm 的输出旗标随子命令变化），这里采用通用拼法，
//! 覆盖 list / get 等常见命令；不适用时 helm 自己会报错并经 exit_code 反馈给模型。

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::llm::protocol::JsonMap;
use crate::tools::{
    non_empty, parse_args, CommandRunner, PropertyKind, SystemRunner, Tool, ToolDeclaration,
    ToolResult,
};

#[derive(Debug, Deserialize)]
struct HelmArgs {
    command: String,
    #[serde(default)]
    kubecontext: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    output: Option<String>,
}

impl HelmArgs {
    fn command_line(&self) -> String {
        let mut line = String::from("helm");
        if let Some(kubecontext) = non_empty(&self.kubecontext) {
            line.push_str(&format!(" --kube-context={kubecontext}"));
        }
        if let Some(namespace) = non_empty(&self.namespace) {
            line.push_str(&format!(" --namespace={namespace}"));
        }
        if let Some(output) = non_empty(&self.output) {
            line.push_str(&format!(" --output={output}"));
        }
        line.push(' ');
        line.push_str(&self.command);
        line
    }
}

pub struct HelmTool {
    runner: Arc<dyn CommandRunner>,
}

impl HelmTool {
    pub fn new() -> Self {
        Self::with_runner(Arc::new(SystemRunner))
    }

    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl Default for HelmTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for HelmTool {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new("helm", "Execute a helm command and return the result")
            .required(
                "command",
                PropertyKind::String,
                "The helm command to execute (without the 'helm' prefix)",
            )
            .optional(
                "kubecontext",
                PropertyKind::String,
                "The Kubernetes context to use for Helm (optional)",
            )
            .optional(
                "namespace",
                PropertyKind::String,
                "The Kubernetes namespace to use for Helm (optional)",
            )
            .optional(
                "output",
                PropertyKind::String,
                "The output format (e.g., json, yaml, table) (optional)",
            )
    }

    async fn execute(&self, args: &JsonMap) -> ToolResult {
        let args: HelmArgs = parse_args(args)?;
        let outcome = self.runner.run(&args.command_line()).await?;
        Ok(outcome.into_payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kube_context_flag_spelling() {
        let args = HelmArgs {
            command: "list".to_string(),
            kubecontext: Some("staging".to_string()),
            namespace: None,
            output: Some("json".to_string()),
        };
        assert_eq!(
            args.command_line(),
            "helm --kube-context=staging --output=json list"
        );
    }
}
