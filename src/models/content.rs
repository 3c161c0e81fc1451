//! 内容树输入侧结构

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// 接受的源图格式，按优先级排列：两种格式同时存在时 png 获胜
pub const SOURCE_FORMATS: [&str; 2] = ["png", "jpg"];

/// 轮次规格（来自 `<content-root>/index.json`）
///
/// 轮次没有自带 ID，它在索引文件中的位置就是它的身份。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSpec {
    /// 轮次标题
    pub title: String,
    /// 题目目录列表（声明顺序即编号顺序）
    pub questions: Vec<String>,
    /// 示例题目录（不占用编号）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// 题目元数据（来自 `<content-root>/<题目目录>/index.json`）
///
/// 字段由内容作者自由定义，原样透传到输出索引。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionMeta {
    #[serde(flatten)]
    pub fields: Map<String, JsonValue>,
}

/// 图片角色：每道题目固定的三种图片用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    /// 第一张对比图
    A,
    /// 第二张对比图
    B,
    /// 合成图
    Mix,
}

impl ImageRole {
    /// 全部角色，处理顺序固定
    pub const ALL: [ImageRole; 3] = [ImageRole::A, ImageRole::B, ImageRole::Mix];

    /// 角色名，同时是源文件名主干、输出子目录名和索引中的键名
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageRole::A => "a",
            ImageRole::B => "b",
            ImageRole::Mix => "mix",
        }
    }
}

impl std::fmt::Display for ImageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
