//! Gemini generateContent 协议类型
//!
//! 请求/响应体与 REST 接口一一对应（camelCase）。Part 对外是带标签枚举（每个 part
//! 恰有一种内容），序列化经由宽松的线格式结构体：无可识别字段的 part 解析为
//! Part::Empty 而不是协议错误，Empty 序列化回 `{}`。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tools::{PropertyKind, ToolDeclaration};

/// 函数调用参数与响应载荷的通用形状：string -> 任意 JSON 值
pub type JsonMap = Map<String, Value>;

/// 消息角色：线上只有 user / model；系统引导语以 model 角色注入
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// 单条消息：角色 + 有序 parts；parts 顺序在写回历史时原样保持
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            role: Role::Model,
            parts: Vec::new(),
        }
    }
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// 系统引导消息：协议没有独立的 system 角色，按 model 角色发送
    pub fn priming(text: impl Into<String>) -> Self {
        Self::model_text(text)
    }

    /// 函数响应消息：一条 model 角色、单 functionResponse part 的消息
    pub fn function_response(name: impl Into<String>, response: JsonMap) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::FunctionResponse(FunctionResponse {
                name: name.into(),
                response,
            })],
        }
    }
}

/// 模型发起的函数调用
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: JsonMap,
}

/// 写回历史的函数响应
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    #[serde(default)]
    pub response: JsonMap,
}

/// 消息的组成单元：文本、函数调用、函数响应之一；
/// 模型偶尔会返回没有任何字段的 part，解析为 Empty
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PartWire", into = "PartWire")]
pub enum Part {
    Text(String),
    FunctionCall(FunctionCall),
    FunctionResponse(FunctionResponse),
    Empty,
}

/// Part 的线格式：与 Gemini 的全可选字段结构一致
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PartWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

impl From<PartWire> for Part {
    fn from(wire: PartWire) -> Self {
        // 判定顺序与字段优先级一致：非空文本 > functionCall > functionResponse
        match wire {
            PartWire { text: Some(t), .. } if !t.is_empty() => Part::Text(t),
            PartWire {
                function_call: Some(fc),
                ..
            } => Part::FunctionCall(fc),
            PartWire {
                function_response: Some(fr),
                ..
            } => Part::FunctionResponse(fr),
            _ => Part::Empty,
        }
    }
}

impl From<Part> for PartWire {
    fn from(part: Part) -> Self {
        let mut wire = PartWire::default();
        match part {
            Part::Text(t) => wire.text = Some(t),
            Part::FunctionCall(fc) => wire.function_call = Some(fc),
            Part::FunctionResponse(fr) => wire.function_response = Some(fr),
            Part::Empty => {}
        }
        wire
    }
}

/// generateContent 请求体
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
    pub generation_config: GenerationConfig,
}

/// 工具声明分组（协议要求再包一层 functionDeclarations）
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolGroup {
    pub function_declarations: Vec<FunctionDeclaration>,
}

/// 提供方格式的函数声明
#[derive(Clone, Debug, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Schema,
}

/// object 参数 schema；properties 用 BTreeMap 保证序列化顺序稳定
#[derive(Clone, Debug, Serialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, SchemaProperty>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SchemaProperty {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl From<&ToolDeclaration> for FunctionDeclaration {
    /// required 列表由每个属性的 required 标记推导
    fn from(decl: &ToolDeclaration) -> Self {
        let required = decl
            .parameters
            .iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name.clone())
            .collect();
        let properties = decl
            .parameters
            .iter()
            .map(|(name, spec)| {
                (
                    name.clone(),
                    SchemaProperty {
                        kind: kind_name(spec.kind).to_string(),
                        description: spec.description.clone(),
                    },
                )
            })
            .collect();
        Self {
            name: decl.name.clone(),
            description: decl.description.clone(),
            parameters: Schema {
                kind: "object".to_string(),
                properties,
                required,
            },
        }
    }
}

fn kind_name(kind: PropertyKind) -> &'static str {
    match kind {
        PropertyKind::String => "string",
        PropertyKind::Integer => "integer",
        PropertyKind::Boolean => "boolean",
    }
}

/// 安全阈值设置；四个类别各一条保守阈值，随每个请求固定下发
#[derive(Clone, Debug, Serialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

pub fn default_safety_settings() -> Vec<SafetySetting> {
    const CATEGORIES: [&str; 4] = [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ];
    CATEGORIES
        .iter()
        .map(|category| SafetySetting {
            category: (*category).to_string(),
            threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
        })
        .collect()
}

/// 采样配置：temperature 固定为 0 保证可复现；不设其他默认值
#[derive(Clone, Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { temperature: 0.0 }
    }
}

/// generateContent 响应体
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// 单个候选：内容 + finish 信号；content 缺失时按空 parts 处理
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub finish_reason: Option<String>,
}
