//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `OPSAGENT__*` 覆盖（双下划线表示嵌套，
//! 如 `OPSAGENT__LLM__MODEL=gemini-1.5-flash`）。api_key 留空时退回 GEMINI_API_KEY。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmSection,
    /// true 时跳过工具执行前的人工确认（会话期固定，不会中途切换）
    #[serde(default)]
    pub unsafe_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmSection::default(),
            unsafe_mode: false,
        }
    }
}

/// [llm] 段：provider 与端点；model / endpoint 留空时用 provider 默认值
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub endpoint: String,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            model: String::new(),
            endpoint: String::new(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

/// 加载配置：TOML 文件 + OPSAGENT__* 环境变量覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到即作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 叠加环境变量 OPSAGENT__*（双下划线表示嵌套键）
/// 4. api_key 为空或是占位值时退回 GEMINI_API_KEY 环境变量
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{name}.toml");
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("OPSAGENT")
            .separator("__")
            .try_parsing(true),
    );

    let mut cfg: AppConfig = builder.build()?.try_deserialize()?;

    if cfg.llm.api_key.is_empty() || cfg.llm.api_key == "YOUR_API_KEY_HERE" {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            cfg.llm.api_key = key;
        }
    }

    Ok(cfg)
}
