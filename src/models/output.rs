//! 聚合索引输出侧结构
//!
//! 这些结构直接决定 `index.json` 的形态，字段名统一使用 camelCase。

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// 题目身份
///
/// 普通题目使用轮次内的零基编号，示例题使用固定哨兵值 `"example"`，
/// 永远不占用编号序列。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionId {
    /// 轮次内的零基编号
    Numbered(usize),
    /// 示例题哨兵
    Example,
}

impl Serialize for QuestionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QuestionId::Numbered(n) => serializer.serialize_u64(*n as u64),
            QuestionId::Example => serializer.serialize_str("example"),
        }
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionId::Numbered(n) => write!(f, "{}", n),
            QuestionId::Example => f.write_str("example"),
        }
    }
}

/// 题目对所属轮次的反向引用
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRef {
    pub round_id: usize,
    pub title: String,
}

/// 单个角色的处理结果：宽高比 + 各宽度变体的 API 路径
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResult {
    /// 源图的高宽比（height / width），尺寸未知时为 null
    pub aspect_ratio: Option<f64>,
    /// 宽度（字符串键）→ API 路径；仅包含生成成功的宽度
    pub srcs: BTreeMap<String, String>,
}

/// 一道题目的三个角色结果，失败的角色直接缺席
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImageSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<RoleResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<RoleResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mix: Option<RoleResult>,
}

impl ImageSet {
    /// 按角色写入结果
    pub fn set(&mut self, role: super::ImageRole, result: RoleResult) {
        match role {
            super::ImageRole::A => self.a = Some(result),
            super::ImageRole::B => self.b = Some(result),
            super::ImageRole::Mix => self.mix = Some(result),
        }
    }

    /// 已生成的变体总数
    pub fn variant_count(&self) -> usize {
        [&self.a, &self.b, &self.mix]
            .into_iter()
            .flatten()
            .map(|r| r.srcs.len())
            .sum()
    }
}

/// 一道题目的完整输出记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionData {
    pub question_id: QuestionId,
    pub round_data: RoundRef,
    /// 作者自定义的元数据字段，原样展开
    #[serde(flatten)]
    pub meta: Map<String, JsonValue>,
    pub imgs: ImageSet,
}

/// 一个轮次的完整输出记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundData {
    pub title: String,
    pub round_id: usize,
    /// 示例题结果，与编号题目分开存放
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_data: Option<QuestionData>,
    /// 按声明顺序排列的题目结果；元数据缺失或处理失败的题目留下 null 空位，
    /// 不做压缩，保证下标与题目编号对齐
    pub questions_data: Vec<Option<QuestionData>>,
}

/// 最终聚合索引（`<output-root>/index.json` 的根文档）
#[derive(Debug, Clone, Serialize)]
pub struct ApiIndex {
    pub rounds: Vec<RoundData>,
}
