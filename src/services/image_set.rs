//! 图片集处理器 - 业务能力层
//!
//! 解析一道题目的三个图片角色（a / b / mix），每个角色：
//!
//! 1. 并发探测两种接受格式（png / jpg），各自经过 identify 限制器
//! 2. 等两次探测都结算后按固定优先级取源：png 获胜
//! 3. 两种格式都不存在 ⇒ 该角色以 SourceImageMissing 失败，
//!    只缺席该角色，不中止构建
//! 4. 为每个配置宽度并发生成变体，全部结算后只保留成功的宽度
//!
//! 三个角色之间同样并发，完成顺序不作任何保证。

use crate::config::Config;
use crate::error::{BuildError, BuildResult};
use crate::infrastructure::ImageTool;
use crate::models::{ImageRole, ImageSet, QuestionId, RoleResult, SOURCE_FORMATS};
use crate::services::variant_generator::VariantGenerator;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::error;

/// 图片集处理器
pub struct ImageSetProcessor<'a> {
    tool: &'a ImageTool,
    config: &'a Config,
}

impl<'a> ImageSetProcessor<'a> {
    pub fn new(tool: &'a ImageTool, config: &'a Config) -> Self {
        Self { tool, config }
    }

    /// 处理一道题目的全部角色，失败的角色记录日志后缺席
    pub async fn process(
        &self,
        question_dir: &Path,
        out_dir: &Path,
        round_id: usize,
        question_id: QuestionId,
    ) -> ImageSet {
        let role_tasks = ImageRole::ALL.map(|role| async move {
            let result = self
                .resolve_role(question_dir, out_dir, role, round_id, question_id)
                .await;
            (role, result)
        });

        let mut images = ImageSet::default();
        for (role, result) in join_all(role_tasks).await {
            match result {
                Ok(role_result) => images.set(role, role_result),
                Err(e) => {
                    error!("[第{}轮 题{}] 角色 {} 处理失败: {}", round_id, question_id, role, e);
                }
            }
        }
        images
    }

    /// 解析一个角色：探测源图 → 建目录 → 生成各宽度变体
    async fn resolve_role(
        &self,
        question_dir: &Path,
        out_dir: &Path,
        role: ImageRole,
        round_id: usize,
        question_id: QuestionId,
    ) -> BuildResult<RoleResult> {
        let base = question_dir.join(role.as_str());

        // 两种格式并发探测，等两边都结算（允许任一失败）
        let probes = SOURCE_FORMATS.map(|ext| {
            let path = base.with_extension(ext);
            async move { self.tool.identify(&path).await.map(|meta| (path, meta)) }
        });
        let settled = join_all(probes).await;

        // 按 SOURCE_FORMATS 的声明顺序取第一个成功的探测：png 优先
        let (source, meta) = settled
            .into_iter()
            .find_map(|probe| probe.ok())
            .ok_or(BuildError::SourceImageMissing {
                role: role.as_str(),
                base_path: base,
            })?;

        // 宽高比来自源图，同一角色的所有变体共享
        let aspect_ratio = meta.aspect_ratio();

        // 角色子目录，幂等创建，不同角色并发创建同一祖先目录也安全
        let role_dir = out_dir.join(role.as_str());
        tokio::fs::create_dir_all(&role_dir)
            .await
            .map_err(|e| BuildError::filesystem(&role_dir, e))?;

        let generator = VariantGenerator::new(self.tool, self.config);
        let source = &source;
        let generator = &generator;
        let variant_tasks = self.config.target_widths.iter().map(|&width| async move {
            let result = generator
                .generate(source, out_dir, role, width, round_id, question_id)
                .await;
            (width, result)
        });

        // 全部结算后只保留成功的宽度，部分失败的角色键数少于配置
        let mut srcs = BTreeMap::new();
        for (width, result) in join_all(variant_tasks).await {
            match result {
                Ok(api_path) => {
                    srcs.insert(width.to_string(), api_path);
                }
                Err(e) => {
                    error!(
                        "[第{}轮 题{}] 角色 {} 宽度 {} 生成失败: {}",
                        round_id, question_id, role, width, e
                    );
                }
            }
        }

        Ok(RoleResult { aspect_ratio, srcs })
    }
}
