//! 错误分类
//!
//! 传播原则：模型需要感知的失败以数据形式写回历史（functionResponse 里的 error 载荷），
//! 进程本地才关心的失败以 AgentError 返回并结束当前轮，历史保持一致（不存在悬空的函数调用）。

use thiserror::Error;

/// 会话运行过程中可能出现的错误（配置、传输、协议、工具）
#[derive(Error, Debug)]
pub enum AgentError {
    /// 构造期配置缺失或不支持，不做恢复
    #[error("configuration error: {0}")]
    Config(String),

    /// 请求未能送达（连接建立或发送失败）
    #[error("transport error: {0}")]
    Transport(String),

    /// 非 2xx 的 HTTP 状态
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// 响应体解析不出预期形状
    #[error("protocol error: {0}")]
    Protocol(String),

    /// 模型请求了未注册的工具
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// 工具执行中的硬错误（进程启动失败、参数非法）
    #[error("tool execution failed: {0}")]
    ToolExecution(String),
}
