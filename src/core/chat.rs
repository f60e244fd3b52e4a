//! 对话编排状态机
//!
//! 持有完整对话历史，驱动「请求 -> 按序处理候选 parts -> 调度函数调用 -> 再请求」的循环，
//! 直到一轮以纯文本、终止性 finish 信号、空候选或不可恢复错误收束。
//! 严格串行：同一时刻只有一个在途模型请求、一个在途工具执行；上一轮的函数调用
//! 全部配对响应之前绝不发起下一次请求。
//! 历史只追加、不重排、不截断（无窗口化——增长无上界是明确的契约，由调用方治理）。

use std::sync::Arc;

use crate::core::AgentError;
use crate::llm::protocol::{Content, FunctionCall, Part, Role};
use crate::llm::ModelClient;
use crate::render::Renderer;
use crate::tools::{ToolDeclaration, ToolDispatcher};

/// 模型回了无法理解的 part 时补写的占位回复
const UNEXPECTED_RESPONSE_NOTICE: &str = "I received an unexpected response. Let's try again.";

/// 单个会话：历史的唯一所有者
pub struct ChatSession {
    client: Arc<dyn ModelClient>,
    dispatcher: ToolDispatcher,
    renderer: Arc<dyn Renderer>,
    /// 启动时收集一次，之后不变
    declarations: Vec<ToolDeclaration>,
    history: Vec<Content>,
}

impl ChatSession {
    /// 创建会话：历史以一条系统引导消息开始（model 角色，先于任何用户轮）
    pub fn new(
        client: Arc<dyn ModelClient>,
        dispatcher: ToolDispatcher,
        renderer: Arc<dyn Renderer>,
        system_prompt: &str,
    ) -> Self {
        let declarations = dispatcher.declarations();
        Self {
            client,
            dispatcher,
            renderer,
            declarations,
            history: vec![Content::priming(system_prompt)],
        }
    }

    /// 当前对话历史
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// 处理一轮用户输入。
    ///
    /// 文本 part 交给 Renderer；函数调用同步调度，其响应在处理下一个 part 之前入史。
    /// 传输/API/协议错误中止本轮并原样上抛，已入史的内容保持不动。
    pub async fn handle_user_turn(&mut self, text: &str) -> Result<(), AgentError> {
        self.history.push(Content::user_text(text));

        loop {
            let response = self
                .client
                .generate(&self.history, &self.declarations)
                .await?;

            // 空候选 / 空 parts：本轮结束，不再改动历史
            let Some(candidate) = response.candidates.into_iter().next() else {
                return Ok(());
            };
            if candidate.content.parts.is_empty() {
                return Ok(());
            }

            // 模型轮原样入史（角色归一为 model），part 顺序保持
            let mut content = candidate.content;
            content.role = Role::Model;
            let parts = content.parts.clone();
            self.history.push(content);

            let mut dispatched_call = false;
            for part in parts {
                match part {
                    Part::Text(text) => self.renderer.emit(&text),
                    Part::FunctionCall(call) => {
                        dispatched_call = true;
                        self.dispatch_call(call).await;
                    }
                    // 模型不应回送 functionResponse；连同空 part 一并按异常轮处理
                    Part::FunctionResponse(_) | Part::Empty => {
                        tracing::warn!("model part had no text or function call");
                        self.history
                            .push(Content::model_text(UNEXPECTED_RESPONSE_NOTICE));
                        self.renderer.emit(UNEXPECTED_RESPONSE_NOTICE);
                        return Ok(());
                    }
                }
            }

            match candidate.finish_reason.as_deref() {
                // 正常收束：仅当本轮发生过函数调用才回去取模型的后续回复
                Some("STOP") => {
                    if dispatched_call {
                        continue;
                    }
                    return Ok(());
                }
                Some(reason @ ("MAX_TOKENS" | "SAFETY" | "RECITATION" | "OTHER")) => {
                    tracing::warn!(reason = %reason, "model stopped before normal completion");
                    return Ok(());
                }
                other => {
                    tracing::warn!(reason = ?other, "missing or unrecognized finish reason");
                    return Ok(());
                }
            }
        }
    }

    /// 调度一次函数调用并把 functionResponse 写回历史。
    /// 错误侧只做本地记录——失败已经作为载荷进了历史，模型自己会看到。
    async fn dispatch_call(&mut self, call: FunctionCall) {
        tracing::info!(
            tool = %call.name,
            args = %serde_json::Value::Object(call.args.clone()),
            "model requested function call"
        );
        let (payload, error) = self.dispatcher.dispatch(&call.name, &call.args).await;
        if let Some(e) = error {
            tracing::error!(tool = %call.name, error = %e, "function call failed");
        }
        self.history.push(Content::function_response(call.name, payload));
    }
}
