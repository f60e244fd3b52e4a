//! az 工具：Azure CLI 封装

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::llm::protocol::JsonMap;
use crate::tools::{
    non_empty, parse_args, CommandRunner, PropertyKind, SystemRunner, Tool, ToolDeclaration,
    ToolResult,
};

#[derive(Debug, Deserialize)]
struct AzArgs {
    command: String,
    #[serde(default)]
    subscription: Option<String>,
    #[serde(default)]
    resource_group: Option<String>,
    #[serde(default)]
    output: Option<String>,
}

impl AzArgs {
    fn command_line(&self) -> String {
        let mut line = String::from("az");
        if let Some(subscription) = non_empty(&self.subscription) {
            line.push_str(&format!(" --subscription={subscription}"));
        }
        if let Some(resource_group) = non_empty(&self.resource_group) {
            line.push_str(&format!(" --resource-group={resource_group}"));
        }
        if let Some(output) = non_empty(&self.output) {
            line.push_str(&format!(" --output={output}"));
        }
        line.push(' ');
        line.push_str(&self.command);
        line
    }
}

pub struct AzTool {
    runner: Arc<dyn CommandRunner>,
}

impl AzTool {
    pub fn new() -> Self {
        Self::with_runner(Arc::new(SystemRunner))
    }

    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl Default for AzTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for AzTool {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new("az", "Execute an Azure CLI command and return the result")
            .required(
                "command",
                PropertyKind::String,
                "The Azure CLI command to execute (without the 'az' prefix)",
            )
            .optional(
                "subscription",
                PropertyKind::String,
                "The Azure subscription ID or name to use (optional)",
            )
            .optional(
                "resource_group",
                PropertyKind::String,
                "The Azure resource group to use (optional)",
            )
            .optional(
                "output",
                PropertyKind::String,
                "The output format (e.g., json, yaml, table, tsv) (optional)",
            )
    }

    async fn execute(&self, args: &JsonMap) -> ToolResult {
        let args: AzArgs = parse_args(args)?;
        let outcome = self.runner.run(&args.command_line()).await?;
        Ok(outcome.into_payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_with_subscription_and_group() {
        let args = AzArgs {
            command: "vm list".to_string(),
            subscription: Some("prod-sub".to_string()),
            resource_group: Some("rg-web".to_string()),
            output: Some("table".to_string()),
        };
        assert_eq!(
            args.command_line(),
            "az --subscription=prod-sub --resource-group=rg-web --output=table vm list"
        );
    }
}
