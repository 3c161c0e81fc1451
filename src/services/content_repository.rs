//! 内容仓库 - 业务能力层
//!
//! 从只读内容树中读取轮次规格和题目元数据。
//!
//! 元数据缺失是整个系统里唯一被静默容忍的内容缺失：
//! `load_question_meta` 对无法读取/解析的题目返回 None，
//! 由调用方记录并跳过；而源图缺失是更严重的错误（见 image_set）。

use crate::config::Config;
use crate::models::{QuestionMeta, RoundSpec};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs;
use tracing::warn;

/// 内容仓库
pub struct ContentRepository {
    content_root: PathBuf,
}

impl ContentRepository {
    /// 创建内容仓库
    pub fn new(config: &Config) -> Self {
        Self {
            content_root: PathBuf::from(&config.content_root),
        }
    }

    /// 题目目录的绝对路径
    pub fn question_dir(&self, dir: &str) -> PathBuf {
        self.content_root.join(dir)
    }

    /// 加载轮次索引（`<content-root>/index.json`），顺序即轮次身份
    pub async fn load_round_index(&self) -> Result<Vec<RoundSpec>> {
        let index_path = self.content_root.join("index.json");
        let content = fs::read_to_string(&index_path)
            .await
            .with_context(|| format!("无法读取轮次索引: {}", index_path.display()))?;

        let rounds: Vec<RoundSpec> = serde_json::from_str(&content)
            .with_context(|| format!("无法解析轮次索引: {}", index_path.display()))?;
        Ok(rounds)
    }

    /// 加载一道题目的元数据（`<题目目录>/index.json`）
    ///
    /// 文件缺失或无法解析时返回 None，构建继续
    pub async fn load_question_meta(&self, dir: &str) -> Option<QuestionMeta> {
        let meta_path = self.question_dir(dir).join("index.json");

        let content = match fs::read_to_string(&meta_path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("⚠️ 无法读取题目元数据 {}: {}", meta_path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(meta) => Some(meta),
            Err(e) => {
                warn!("⚠️ 无法解析题目元数据 {}: {}", meta_path.display(), e);
                None
            }
        }
    }
}
