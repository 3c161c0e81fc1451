//! 轮次聚合器 - 编排层
//!
//! ## 职责
//!
//! 处理单个轮次的所有题目，是轮次级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **身份分配**：轮次索引即轮次身份；题目按声明顺序分配 0..n-1 的编号，
//!    示例题在编号序列之外求值，使用固定的 "example" 身份
//! 2. **并发扇出**：题目之间并发处理，完成顺序不作保证
//! 3. **全部结算**：等每道题都结算后才组装轮次记录，任何叶子失败都不会卡住轮次
//! 4. **空位保留**：失败/跳过的题目在 questionsData 里留下 null 空位，
//!    下标与题目编号始终对齐

use crate::models::{RoundData, RoundSpec};
use crate::orchestrator::build_coordinator::BuildDeps;
use crate::workflow::{QuestionCtx, QuestionProcessor};
use futures::future::{join_all, OptionFuture};
use tracing::info;

/// 处理单个轮次
///
/// # 参数
/// - `deps`: 共享依赖（配置、图片工具、内容仓库）
/// - `round_id`: 轮次索引（即轮次身份）
/// - `spec`: 轮次规格
pub async fn process_round(deps: &BuildDeps, round_id: usize, spec: RoundSpec) -> RoundData {
    log_round_start(round_id, &spec.title, spec.questions.len(), spec.example.is_some());

    let processor = QuestionProcessor::new(&deps.repository, &deps.tool, &deps.config);
    let processor = &processor;

    // 普通题目：声明顺序即编号顺序
    let numbered_tasks = spec.questions.iter().enumerate().map(|(index, dir)| {
        let ctx = QuestionCtx::numbered(round_id, &spec.title, index);
        async move { processor.run(dir, &ctx).await }
    });

    // 示例题在编号计数之外求值，与普通题目并发
    let example_task = spec.example.as_deref().map(|dir| {
        let ctx = QuestionCtx::example(round_id, &spec.title);
        async move { processor.run(dir, &ctx).await }
    });

    let (questions_data, example_settled) =
        futures::join!(join_all(numbered_tasks), OptionFuture::from(example_task));
    let example_data = example_settled.flatten();

    let processed = questions_data.iter().filter(|q| q.is_some()).count();
    let skipped = questions_data.len() - processed;
    log_round_complete(round_id, processed, skipped);

    RoundData {
        title: spec.title,
        round_id,
        example_data,
        questions_data,
    }
}

// ========== 日志辅助函数 ==========

fn log_round_start(round_id: usize, title: &str, question_count: usize, has_example: bool) {
    info!("[第{}轮] 开始处理", round_id);
    info!("[第{}轮] 标题: {}", round_id, title);
    info!(
        "[第{}轮] 题目总数: {}{}",
        round_id,
        question_count,
        if has_example { "（含示例题）" } else { "" }
    );
}

fn log_round_complete(round_id: usize, processed: usize, skipped: usize) {
    info!(
        "[第{}轮] ✅ 轮次处理完成: 成功 {}, 跳过 {}",
        round_id, processed, skipped
    );
}
