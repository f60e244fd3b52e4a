//! kubectl 工具：可选的 context / namespace / output 以 --flag=value 形式拼在用户命令之前

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::llm::protocol::JsonMap;
use crate::tools::{
    non_empty, parse_args, CommandRunner, PropertyKind, SystemRunner, Tool, ToolDeclaration,
    ToolResult,
};

#[derive(Debug, Deserialize)]
struct KubectlArgs {
    command: String,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    output: Option<String>,
}

impl KubectlArgs {
    fn command_line(&self) -> String {
        let mut line = String::from("kubectl");
        if let Some(context) = non_empty(&self.context) {
            line.push_str(&format!(" --context={context}"));
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

pub struct KubectlTool {
    runner: Arc<dyn CommandRunner>,
}

impl KubectlTool {
    pub fn new() -> Self {
        Self::with_runner(Arc::new(SystemRunner))
    }

    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl Default for KubectlTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for KubectlTool {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new("kubectl", "Execute a kubectl command and return the result")
            .required(
                "command",
                PropertyKind::String,
                "The kubectl command to execute (without the 'kubectl' prefix)",
            )
            .optional(
                "context",
                PropertyKind::String,
                "The Kubernetes context to use (optional)",
            )
            .optional(
                "namespace",
                PropertyKind::String,
                "The Kubernetes namespace to use (optional)",
            )
            .optional(
                "output",
                PropertyKind::String,
                "The output format (e.g., json, yaml, wide) (optional)",
            )
    }

    async fn execute(&self, args: &JsonMap) -> ToolResult {
        let args: KubectlArgs = parse_args(args)?;
        let outcome = self.runner.run(&args.command_line()).await?;
        Ok(outcome.into_payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_with_all_options() {
        let args = KubectlArgs {
            command: "get pods".to_string(),
            context: Some("prod".to_string()),
            namespace: Some("kube-system".to_string()),
            output: Some("json".to_string()),
        };
        assert_eq!(
            args.command_line(),
            "kubectl --context=prod --namespace=kube-system --output=json get pods"
        );
    }

    #[test]
    fn test_command_line_skips_empty_options() {
        let args = KubectlArgs {
            command: "get nodes".to_string(),
            context: None,
            namespace: Some(String::new()),
            output: None,
        };
        assert_eq!(args.command_line(), "kubectl get nodes");
    }
}
