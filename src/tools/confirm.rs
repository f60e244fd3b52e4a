//! 人工确认门
//!
//! 仅在安全模式下被调度器咨询；只有明确的 y/yes（去空白、大小写不敏感）放行，
//! 空输入、读取失败、EOF 一律视为拒绝——关闭 stdin 不会让会话挂死。

use std::io::{self, BufRead, Write};

use serde_json::Value;

use crate::llm::protocol::JsonMap;

/// 确认门 trait：展示待执行的调用并读取一次操作员决定
pub trait ConfirmationGate: Send + Sync {
    fn confirm(&self, name: &str, args: &JsonMap) -> bool;
}

/// 控制台确认门：stdout 提示 + stdin 单行读取
#[derive(Debug, Default)]
pub struct ConsoleGate;

impl ConfirmationGate for ConsoleGate {
    fn confirm(&self, name: &str, args: &JsonMap) -> bool {
        println!(
            "AI wants to use tool: {} with args: {}",
            name,
            Value::Object(args.clone())
        );
        print!("Allow this action? [y/N] ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => false, // EOF：视为拒绝
            Ok(_) => is_affirmative(&line),
            Err(_) => false,
        }
    }
}

fn is_affirmative(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::is_affirmative;

    #[test]
    fn test_only_explicit_yes_is_affirmative() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative("yes\n"));
        assert!(is_affirmative("  YES  \n"));
        assert!(is_affirmative("Y"));

        assert!(!is_affirmative(""));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("n\n"));
        assert!(!is_affirmative("yep\n"));
        assert!(!is_affirmative("ok\n"));
    }
}
