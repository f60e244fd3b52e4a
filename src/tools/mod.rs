//! 工具箱
//!
//! 每个工具实现 Tool trait（declaration / execute），由 ToolRegistry 按名注册，
//! ToolDispatcher 负责确认门与载荷/错误双轨转换；子进程统一走 CommandRunner。

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::llm::protocol::JsonMap;

pub mod az;
pub mod bash;
pub mod confirm;
pub mod dispatch;
pub mod exec;
pub mod helm;
pub mod kubectl;
pub mod registry;
pub mod schema;

pub use az::AzTool;
pub use bash::BashTool;
pub use confirm::{ConfirmationGate, ConsoleGate};
pub use dispatch::ToolDispatcher;
pub use exec::{CommandOutcome, CommandRunner, SystemRunner};
pub use helm::HelmTool;
pub use kubectl::KubectlTool;
pub use registry::{Tool, ToolRegistry};
pub use schema::{PropertyKind, PropertySpec, ToolDeclaration};

/// 工具内部的硬错误：参数非法或进程无法启动。
/// 非零退出码不在此列，它作为正常载荷上报（见 exec::CommandOutcome）。
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("missing or invalid arguments: {0}")]
    BadArgument(String),

    #[error("failed to launch command: {0}")]
    Launch(String),
}

pub type ToolResult = Result<JsonMap, ToolError>;

/// 线边界处把松散的参数映射转为各工具的类型化参数结构
pub(crate) fn parse_args<T: DeserializeOwned>(args: &JsonMap) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| ToolError::BadArgument(e.to_string()))
}

/// 可选参数：空字符串按缺省处理（模型常把未填的参数发成 ""）
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
