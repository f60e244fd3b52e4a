//! 对话循环集成测试
//!
//! 用脚本化 Mock 客户端驱动完整编排循环，覆盖函数调用配对、未知工具、
//! 确认拒绝、终止性 finish 信号与确定性重放。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use opsagent::core::ChatSession;
use opsagent::llm::mock::MockModelClient;
use opsagent::llm::protocol::{Content, FunctionCall, JsonMap, Part, Role};
use opsagent::render::Renderer;
use opsagent::tools::{
    BashTool, CommandOutcome, CommandRunner, ConfirmationGate, HelmTool, KubectlTool,
    ToolDispatcher, ToolError, ToolRegistry,
};

fn json_map(value: serde_json::Value) -> JsonMap {
    value.as_object().cloned().unwrap()
}

fn call_part(name: &str, args: serde_json::Value) -> Part {
    Part::FunctionCall(FunctionCall {
        name: name.to_string(),
        args: json_map(args),
    })
}

/// 记录渲染输出，供断言模型文本确实到达终端侧
#[derive(Default)]
struct RecordingRenderer {
    lines: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn emit(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

struct StaticGate(bool);

impl ConfirmationGate for StaticGate {
    fn confirm(&self, _name: &str, _args: &JsonMap) -> bool {
        self.0
    }
}

/// 记录命令行并返回固定结果的运行器
#[derive(Default)]
struct RecordingRunner {
    commands: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl RecordingRunner {
    fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command_line: &str) -> Result<CommandOutcome, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.commands.lock().unwrap().push(command_line.to_string());
        Ok(CommandOutcome {
            output: "ok\n".to_string(),
            exit_code: 0,
        })
    }
}

fn session_with(
    client: Arc<MockModelClient>,
    runner: Arc<RecordingRunner>,
    allow: bool,
    confirm: bool,
) -> (ChatSession, Arc<RecordingRenderer>) {
    let mut registry = ToolRegistry::new();
    registry
        .register(BashTool::with_runner(runner.clone()))
        .unwrap();
    registry
        .register(KubectlTool::with_runner(runner.clone()))
        .unwrap();
    registry
        .register(HelmTool::with_runner(runner.clone()))
        .unwrap();
    let dispatcher = ToolDispatcher::new(registry, Arc::new(StaticGate(allow)), confirm);
    let renderer = Arc::new(RecordingRenderer::default());
    let session = ChatSession::new(
        client,
        dispatcher,
        renderer.clone(),
        "You are a test assistant.",
    );
    (session, renderer)
}

#[tokio::test]
async fn test_function_calls_are_paired_before_next_request() {
    let client = Arc::new(MockModelClient::new());
    client.enqueue(MockModelClient::candidate(
        vec![
            call_part("kubectl", json!({"command": "get pods"})),
            call_part("helm", json!({"command": "list"})),
        ],
        "STOP",
    ));
    client.enqueue(MockModelClient::text_candidate("Both commands succeeded."));

    let runner = Arc::new(RecordingRunner::default());
    let (mut session, renderer) = session_with(client.clone(), runner.clone(), true, false);

    session.handle_user_turn("check the cluster").await.unwrap();

    // 两个调用按 part 顺序执行
    assert_eq!(runner.commands(), vec!["kubectl get pods", "helm list"]);

    // 第二次外发请求前，两个 functionResponse 都已入史
    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    let second = &requests[1];
    let tail: Vec<&Content> = second.iter().rev().take(2).collect();
    for content in tail {
        assert!(matches!(content.parts[0], Part::FunctionResponse(_)));
    }

    // 最终历史：引导语、用户轮、双调用模型轮、两条响应、收尾文本
    let history = session.history();
    assert_eq!(history.len(), 6);
    assert_eq!(history[1].role, Role::User);
    assert_eq!(history[2].parts.len(), 2);
    assert_eq!(
        history[5].parts[0],
        Part::Text("Both commands succeeded.".to_string())
    );
    assert_eq!(renderer.lines(), vec!["Both commands succeeded."]);
}

#[tokio::test]
async fn test_unknown_tool_is_reported_back_to_the_model() {
    let client = Arc::new(MockModelClient::new());
    client.enqueue(MockModelClient::candidate(
        vec![call_part("terraform", json!({"command": "plan"}))],
        "STOP",
    ));
    client.enqueue(MockModelClient::text_candidate("Understood."));

    let runner = Arc::new(RecordingRunner::default());
    let (mut session, _renderer) = session_with(client, runner.clone(), true, false);

    session.handle_user_turn("plan the change").await.unwrap();

    assert_eq!(runner.call_count(), 0);
    let history = session.history();
    match &history[3].parts[0] {
        Part::FunctionResponse(fr) => {
            assert_eq!(fr.name, "terraform");
            assert_eq!(fr.response["error"], json!("Tool not found: terraform"));
        }
        other => panic!("expected function response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_declined_confirmation_skips_execution() {
    let client = Arc::new(MockModelClient::new());
    client.enqueue(MockModelClient::candidate(
        vec![call_part("bash", json!({"command": "rm -rf /tmp/cache"}))],
        "STOP",
    ));
    client.enqueue(MockModelClient::text_candidate("Okay, I won't run it."));

    let runner = Arc::new(RecordingRunner::default());
    let (mut session, _renderer) = session_with(client, runner.clone(), false, true);

    session.handle_user_turn("clear the cache").await.unwrap();

    assert_eq!(runner.call_count(), 0);
    match &session.history()[3].parts[0] {
        Part::FunctionResponse(fr) => {
            assert_eq!(
                fr.response["result"],
                json!("Tool execution cancelled by user.")
            );
        }
        other => panic!("expected function response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_terminal_finish_reason_ends_turn_without_error() {
    let client = Arc::new(MockModelClient::new());
    client.enqueue(MockModelClient::candidate(
        vec![Part::Text("I cannot help with".to_string())],
        "SAFETY",
    ));

    let runner = Arc::new(RecordingRunner::default());
    let (mut session, _renderer) = session_with(client.clone(), runner, true, false);

    session.handle_user_turn("do something odd").await.unwrap();

    // 不再发第二次请求，也不补写占位消息
    assert_eq!(client.requests().len(), 1);
    assert_eq!(session.history().len(), 3);
}

#[tokio::test]
async fn test_empty_candidates_end_turn_without_history_mutation() {
    let client = Arc::new(MockModelClient::new());
    client.enqueue(MockModelClient::no_candidates());

    let runner = Arc::new(RecordingRunner::default());
    let (mut session, renderer) = session_with(client, runner, true, false);

    session.handle_user_turn("hello").await.unwrap();

    // 历史只含引导语与用户轮
    assert_eq!(session.history().len(), 2);
    assert!(renderer.lines().is_empty());
}

#[tokio::test]
async fn test_empty_part_yields_synthetic_notice() {
    let client = Arc::new(MockModelClient::new());
    client.enqueue(MockModelClient::candidate(vec![Part::Empty], "STOP"));

    let runner = Arc::new(RecordingRunner::default());
    let (mut session, renderer) = session_with(client, runner, true, false);

    session.handle_user_turn("hello").await.unwrap();

    let history = session.history();
    assert_eq!(
        history.last().unwrap().parts[0],
        Part::Text("I received an unexpected response. Let's try again.".to_string())
    );
    assert_eq!(
        renderer.lines(),
        vec!["I received an unexpected response. Let's try again."]
    );
}

#[tokio::test]
async fn test_identical_scripts_replay_identical_histories() {
    let mut histories = Vec::new();
    for _ in 0..2 {
        let client = Arc::new(MockModelClient::new());
        client.enqueue(MockModelClient::candidate(
            vec![call_part("kubectl", json!({"command": "get nodes"}))],
            "STOP",
        ));
        client.enqueue(MockModelClient::text_candidate("Three nodes are Ready."));

        let runner = Arc::new(RecordingRunner::default());
        let (mut session, _renderer) = session_with(client, runner, true, false);
        session.handle_user_turn("how many nodes?").await.unwrap();
        histories.push(session.history().to_vec());
    }
    assert_eq!(histories[0], histories[1]);
}
