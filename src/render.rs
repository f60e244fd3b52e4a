//! 输出渲染协作者
//!
//! 核心不做任何格式化：模型文本一律交给 Renderer。终端 Markdown 渲染、
//! 配色等属于外部实现，替换 Renderer 即可接入。

/// 渲染 trait：emit 一段模型文本
pub trait Renderer: Send + Sync {
    fn emit(&self, text: &str);
}

/// 纯文本渲染：直接打印到 stdout
#[derive(Debug, Default)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn emit(&self, text: &str) {
        println!("{text}");
    }
}
