//! 数据模型
//!
//! - `content`：内容树的输入侧结构（轮次规格、题目元数据、图片角色）
//! - `output`：聚合索引的输出侧结构（index.json 的序列化形态）

pub mod content;
pub mod output;

pub use content::{ImageRole, QuestionMeta, RoundSpec, SOURCE_FORMATS};
pub use output::{ApiIndex, ImageSet, QuestionData, QuestionId, RoleResult, RoundData, RoundRef};
