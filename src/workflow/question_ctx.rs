//! 题目处理上下文
//!
//! 封装"我正在处理第几轮的哪道题"这一信息

use crate::models::QuestionId;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// 所属轮次的身份（索引即身份）
    pub round_id: usize,

    /// 所属轮次的标题
    pub round_title: String,

    /// 题目身份：轮次内编号或 "example" 哨兵
    pub question_id: QuestionId,
}

impl QuestionCtx {
    /// 创建普通题目的上下文
    pub fn numbered(round_id: usize, round_title: &str, index: usize) -> Self {
        Self {
            round_id,
            round_title: round_title.to_string(),
            question_id: QuestionId::Numbered(index),
        }
    }

    /// 创建示例题的上下文，不占用编号序列
    pub fn example(round_id: usize, round_title: &str) -> Self {
        Self {
            round_id,
            round_title: round_title.to_string(),
            question_id: QuestionId::Example,
        }
    }
}

impl std::fmt::Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[第{}轮 题{}]", self.round_id, self.question_id)
    }
}
