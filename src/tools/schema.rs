//! 工具声明
//!
//! 启动时从每个工具收集一次，描述名称、用途与对象参数 schema；
//! required 以属性标记表达，发送请求时再推导为提供方的 required 列表。

use std::collections::BTreeMap;

/// 参数类型
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    String,
    Integer,
    Boolean,
}

/// 单个参数：类型、说明、是否必填
#[derive(Clone, Debug, PartialEq)]
pub struct PropertySpec {
    pub kind: PropertyKind,
    pub description: String,
    pub required: bool,
}

/// 工具声明；parameters 用 BTreeMap 保证迭代顺序稳定
#[derive(Clone, Debug, PartialEq)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, PropertySpec>,
}

impl ToolDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn required(
        self,
        name: impl Into<String>,
        kind: PropertyKind,
        description: impl Into<String>,
    ) -> Self {
        self.property(name, kind, description, true)
    }

    pub fn optional(
        self,
        name: impl Into<String>,
        kind: PropertyKind,
        description: impl Into<String>,
    ) -> Self {
        self.property(name, kind, description, false)
    }

    fn property(
        mut self,
        name: impl Into<String>,
        kind: PropertyKind,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.parameters.insert(
            name.into(),
            PropertySpec {
                kind,
                description: description.into(),
                required,
            },
        );
        self
    }
}
