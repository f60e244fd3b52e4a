//! opsagent - 面向基础设施运维的命令行对话助手
//!
//! 入口：解析命令行参数、初始化日志、装配模型客户端与工具注册表，
//! 然后进入逐行读取 stdin 的 REPL 主循环。

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use opsagent::config::load_config;
use opsagent::core::ChatSession;
use opsagent::llm::create_client;
use opsagent::prompt::load_system_prompt;
use opsagent::render::PlainRenderer;
use opsagent::tools::{
    AzTool, BashTool, ConsoleGate, HelmTool, KubectlTool, ToolDispatcher, ToolRegistry,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "opsagent", about = "DevOps AI agent with shell, kubectl, helm and az tools")]
struct Cli {
    /// 配置文件路径
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// 日志级别（可被 RUST_LOG 覆盖）
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 跳过工具执行前的人工确认
    #[arg(long = "unsafe")]
    unsafe_mode: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 日志：默认跟随 --log-level，可通过 RUST_LOG 覆盖
    let directive = cli
        .log_level
        .parse()
        .context("invalid --log-level value")?;
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(directive))
        .with(fmt::layer())
        .init();

    println!("DevOps AI Agent");
    println!("---------------");
    println!("Config: {}", cli.config.display());

    let mut cfg = load_config(Some(cli.config)).context("Failed to load configuration")?;
    if cli.unsafe_mode {
        cfg.unsafe_mode = true;
    }
    if cfg.unsafe_mode {
        tracing::warn!("unsafe mode enabled, tool calls will run without confirmation");
    }

    let client = create_client(&cfg.llm).context("Failed to create model client")?;

    let mut registry = ToolRegistry::new();
    registry
        .register(BashTool::new())
        .context("Failed to register bash tool")?;
    registry
        .register(KubectlTool::new())
        .context("Failed to register kubectl tool")?;
    registry
        .register(HelmTool::new())
        .context("Failed to register helm tool")?;
    registry
        .register(AzTool::new())
        .context("Failed to register az tool")?;

    let dispatcher = ToolDispatcher::new(registry, Arc::new(ConsoleGate), !cfg.unsafe_mode);
    let mut session = ChatSession::new(
        client,
        dispatcher,
        Arc::new(PlainRenderer),
        &load_system_prompt(),
    );

    println!("Type 'exit' or 'quit' to leave.");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => {
                println!("\nExiting due to EOF (CTRL+D)");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "failed to read user input");
                break;
            }
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "exit" | "quit") {
            println!("Exiting application");
            break;
        }

        if let Err(e) = session.handle_user_turn(input).await {
            tracing::error!(error = %e, "conversation turn failed");
            println!("An error occurred while processing your request. Please try again.");
        }
    }

    Ok(())
}
