//! Mock 模型客户端（测试用，无需网络）
//!
//! 按脚本顺序弹出预置响应，同时记录每次请求时的完整历史快照，
//! 供测试断言「函数调用在下一次外发前已配对响应」。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::AgentError;
use crate::llm::protocol::{Candidate, Content, GenerateResponse, Part, Role};
use crate::llm::ModelClient;
use crate::tools::ToolDeclaration;

/// 脚本化 Mock 客户端
#[derive(Default)]
pub struct MockModelClient {
    responses: Mutex<VecDeque<GenerateResponse>>,
    requests: Mutex<Vec<Vec<Content>>>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条脚本响应（按入队顺序消费）
    pub fn enqueue(&self, response: GenerateResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// 每次 generate 调用时的历史快照
    pub fn requests(&self) -> Vec<Vec<Content>> {
        self.requests.lock().unwrap().clone()
    }

    /// 便捷构造：单候选响应
    pub fn candidate(parts: Vec<Part>, finish_reason: &str) -> GenerateResponse {
        GenerateResponse {
            candidates: vec![Candidate {
                content: Content {
                    role: Role::Model,
                    parts,
                },
                finish_reason: Some(finish_reason.to_string()),
            }],
        }
    }

    /// 便捷构造：STOP 收束的纯文本候选
    pub fn text_candidate(text: &str) -> GenerateResponse {
        Self::candidate(vec![Part::Text(text.to_string())], "STOP")
    }

    /// 便捷构造：空候选列表
    pub fn no_candidates() -> GenerateResponse {
        GenerateResponse::default()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(
        &self,
        history: &[Content],
        _declarations: &[ToolDeclaration],
    ) -> Result<GenerateResponse, AgentError> {
        self.requests.lock().unwrap().push(history.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Protocol("mock script exhausted".to_string()))
    }
}
