//! 流程层
//!
//! 定义"一道题目"的完整处理流程：
//! - `QuestionCtx` - 上下文封装（轮次身份 + 题目身份）
//! - `QuestionProcessor` - 流程编排（元数据 → 图片集 → 输出记录）

pub mod question_ctx;
pub mod question_processor;

pub use question_ctx::QuestionCtx;
pub use question_processor::QuestionProcessor;
