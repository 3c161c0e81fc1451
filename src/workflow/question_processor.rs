//! 题目处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序：
//! 1. 加载题目元数据（缺失 ⇒ 记录并跳过，输出留空位）
//! 2. 委托 ImageSetProcessor 解析三个图片角色
//! 3. 组装携带轮次反向引用的输出记录
//!
//! 不持有任何资源，只依赖业务能力（services）。

use crate::config::Config;
use crate::infrastructure::ImageTool;
use crate::models::{ImageSet, QuestionData, RoundRef};
use crate::services::{ContentRepository, ImageSetProcessor};
use crate::workflow::question_ctx::QuestionCtx;
use std::path::PathBuf;
use tracing::{info, warn};

/// 题目处理流程
pub struct QuestionProcessor<'a> {
    repository: &'a ContentRepository,
    images: ImageSetProcessor<'a>,
    config: &'a Config,
}

impl<'a> QuestionProcessor<'a> {
    /// 创建题目处理流程
    pub fn new(repository: &'a ContentRepository, tool: &'a ImageTool, config: &'a Config) -> Self {
        Self {
            repository,
            images: ImageSetProcessor::new(tool, config),
            config,
        }
    }

    /// 处理一道题目
    ///
    /// 元数据缺失返回 None（调用方在输出数组里留 null 空位）；
    /// 图片层面的失败已经在下游降级，不会让整道题失败。
    pub async fn run(&self, question_dir: &str, ctx: &QuestionCtx) -> Option<QuestionData> {
        let meta = match self.repository.load_question_meta(question_dir).await {
            Some(meta) => meta,
            None => {
                warn!("{} ⚠️ 元数据缺失，跳过题目: {}", ctx, question_dir);
                return None;
            }
        };

        if self.config.verbose_logging {
            info!("{} 开始处理图片集: {}", ctx, question_dir);
        }

        let imgs = self.process_images(question_dir, ctx).await;

        Some(QuestionData {
            question_id: ctx.question_id,
            round_data: RoundRef {
                round_id: ctx.round_id,
                title: ctx.round_title.clone(),
            },
            meta: meta.fields,
            imgs,
        })
    }

    async fn process_images(&self, question_dir: &str, ctx: &QuestionCtx) -> ImageSet {
        let src_dir = self.repository.question_dir(question_dir);
        let out_dir = self.question_output_dir(ctx);
        self.images
            .process(&src_dir, &out_dir, ctx.round_id, ctx.question_id)
            .await
    }

    /// 题目的输出目录: `<output-root>/<image-subdir>/round-<r>/question-<q>`
    fn question_output_dir(&self, ctx: &QuestionCtx) -> PathBuf {
        PathBuf::from(&self.config.output_root)
            .join(&self.config.image_subdir)
            .join(format!("round-{}", ctx.round_id))
            .join(format!("question-{}", ctx.question_id))
    }
}
