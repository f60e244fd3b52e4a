//! Opsagent - 基础设施运维对话助手
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误分类与对话编排状态机
//! - **llm**: Gemini 协议类型、模型客户端抽象与 Mock
//! - **prompt**: 系统引导语加载
//! - **render**: 文本输出协作者（终端 Markdown 渲染等由外部实现）
//! - **tools**: bash/kubectl/helm/az 工具、注册表、确认门与子进程执行

pub mod config;
pub mod core;
pub mod llm;
pub mod prompt;
pub mod render;
pub mod tools;
