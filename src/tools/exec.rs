//! 子进程执行
//!
//! 四个 CLI 工具共用一条执行通道：sh -c 跑完整命令行，合并 stdout/stderr 文本并带回退出码。
//! 启动失败（shell 不存在、无法 fork）是硬错误；非零退出码是带载荷的正常结果，
//! 模型从 exit_code 字段自行判断成败。

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use crate::llm::protocol::JsonMap;
use crate::tools::ToolError;

/// 一次命令执行的结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    pub output: String,
    pub exit_code: i32,
}

impl CommandOutcome {
    /// 转为函数响应载荷：{"output": ..., "exit_code": ...}
    pub fn into_payload(self) -> JsonMap {
        let mut payload = JsonMap::new();
        payload.insert("output".to_string(), Value::String(self.output));
        payload.insert("exit_code".to_string(), Value::from(self.exit_code));
        payload
    }
}

/// 命令执行 trait：测试中替换为不落地的桩实现
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command_line: &str) -> Result<CommandOutcome, ToolError>;
}

/// 系统执行器：sh -c，阻塞到进程退出
#[derive(Debug, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command_line: &str) -> Result<CommandOutcome, ToolError> {
        tracing::debug!(command = %command_line, "running command");
        let output = Command::new("sh")
            .args(["-c", command_line])
            .output()
            .await
            .map_err(|e| ToolError::Launch(e.to_string()))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        // 被信号终止等拿不到退出码的情况按 -1 上报
        let exit_code = output.status.code().unwrap_or(-1);
        Ok(CommandOutcome {
            output: text,
            exit_code,
        })
    }
}
