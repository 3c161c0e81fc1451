//! 业务能力层
//!
//! 描述"我能做什么"，只处理单个内容单元：
//! - `ContentRepository` - 读取轮次索引和题目元数据
//! - `VariantGenerator` - 生成单个宽度的图片变体
//! - `ImageSetProcessor` - 解析一道题目的三个图片角色

pub mod content_repository;
pub mod image_set;
pub mod variant_generator;

pub use content_repository::ContentRepository;
pub use image_set::ImageSetProcessor;
pub use variant_generator::VariantGenerator;
