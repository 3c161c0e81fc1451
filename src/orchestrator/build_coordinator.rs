//! 构建协调器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整构建的驱动和资源管理。
//!
//! ## 核心功能
//!
//! 1. **输出重置**：销毁旧输出树（不存在时幂等），重建目录骨架
//! 2. **并发扇出**：为每个轮次 spawn 一个任务，轮次之间完全并发
//! 3. **全部结算**：等所有轮次结算后才组装聚合索引——索引每次运行
//!    只写一次，绝不写出部分索引
//! 4. **索引持久化**：pretty-print 的 JSON 作为唯一的终端步骤
//! 5. **全局统计**：汇总所有轮次的处理结果
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有 ImageTool（内含两类并发限制器）的模块
//! - **尽力而为**：叶子层的失败只留下缺席，顶层 settle-all 结算后
//!   照常发出完成信号
//! - **向下委托**：委托 round_aggregator 处理单个轮次

use crate::config::Config;
use crate::infrastructure::{GraphicsMagickBackend, ImageBackend, ImageTool};
use crate::models::ApiIndex;
use crate::orchestrator::round_aggregator::process_round;
use crate::services::ContentRepository;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{error, info, warn};

/// 构建共享依赖
///
/// 配置在启动时构建一次，之后所有组件只持有这份不可变值。
pub struct BuildDeps {
    pub config: Config,
    pub tool: ImageTool,
    pub repository: ContentRepository,
}

/// 构建协调器
pub struct BuildCoordinator {
    deps: Arc<BuildDeps>,
}

impl BuildCoordinator {
    /// 用指定后端创建协调器（测试注入假后端的入口）
    pub fn new(config: Config, backend: Arc<dyn ImageBackend>) -> Self {
        let tool = ImageTool::new(backend, &config);
        let repository = ContentRepository::new(&config);
        Self {
            deps: Arc::new(BuildDeps {
                config,
                tool,
                repository,
            }),
        }
    }

    /// 用生产环境的 GraphicsMagick 后端创建协调器
    pub fn with_graphicsmagick(config: Config) -> Self {
        Self::new(config, Arc::new(GraphicsMagickBackend::new()))
    }

    /// 运行一次完整构建
    pub async fn run(&self) -> Result<BuildStats> {
        log_startup(&self.deps.config);

        self.reset_output().await?;

        let rounds = self.deps.repository.load_round_index().await?;
        if rounds.is_empty() {
            warn!("⚠️ 轮次索引为空，将写出空的聚合索引");
        }

        // ========== 扇出所有轮次 ==========
        let handles: Vec<_> = rounds
            .into_iter()
            .enumerate()
            .map(|(round_id, spec)| {
                let deps = self.deps.clone();
                tokio::spawn(async move { process_round(&deps, round_id, spec).await })
            })
            .collect();

        // ========== 全部结算后扇入 ==========
        let mut round_results = Vec::with_capacity(handles.len());
        for (round_id, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(round_data) => round_results.push(round_data),
                Err(e) => {
                    // 轮次任务 panic 属于程序缺陷，记录后继续，不让它卡住索引写出
                    error!("[第{}轮] 任务执行失败: {}", round_id, e);
                }
            }
        }

        let index = ApiIndex {
            rounds: round_results,
        };
        self.write_index(&index).await?;

        let stats = BuildStats::from_index(&index);
        print_final_stats(&stats, &self.deps.config);
        Ok(stats)
    }

    /// 清空并重建输出树；输出根目录级别的失败直接中止构建
    async fn reset_output(&self) -> Result<()> {
        let output_root = Path::new(&self.deps.config.output_root);

        match fs::remove_dir_all(output_root).await {
            Ok(()) => info!("🗑️ 已清空旧输出: {}", output_root.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("无法清空输出目录: {}", output_root.display()));
            }
        }

        let image_root = output_root.join(&self.deps.config.image_subdir);
        fs::create_dir_all(&image_root)
            .await
            .with_context(|| format!("无法创建输出目录: {}", image_root.display()))?;
        Ok(())
    }

    /// 持久化聚合索引——唯一的终端步骤
    async fn write_index(&self, index: &ApiIndex) -> Result<()> {
        let json = serde_json::to_string_pretty(index).context("无法序列化聚合索引")?;
        let index_path = Path::new(&self.deps.config.output_root).join("index.json");
        fs::write(&index_path, json)
            .await
            .with_context(|| format!("无法写入聚合索引: {}", index_path.display()))?;
        info!("✓ 聚合索引已写入: {}", index_path.display());
        Ok(())
    }
}

/// 构建统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub rounds: usize,
    pub questions_processed: usize,
    pub questions_skipped: usize,
    pub variants_written: usize,
}

impl BuildStats {
    /// 从组装好的索引汇总统计
    pub fn from_index(index: &ApiIndex) -> Self {
        let mut stats = Self::default();
        for round in &index.rounds {
            stats.rounds += 1;
            for question in &round.questions_data {
                match question {
                    Some(question) => {
                        stats.questions_processed += 1;
                        stats.variants_written += question.imgs.variant_count();
                    }
                    None => stats.questions_skipped += 1,
                }
            }
            if let Some(example) = &round.example_data {
                stats.questions_processed += 1;
                stats.variants_written += example.imgs.variant_count();
            }
        }
        stats
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始构建 - 图片索引生成模式");
    info!(
        "开始时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📊 目标宽度: {:?}", config.target_widths);
    info!(
        "📊 并发上限: identify {}, resize {}",
        config.max_concurrent_identify, config.max_concurrent_resize
    );
    info!("{}", "=".repeat(60));
}

fn print_final_stats(stats: &BuildStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 轮次: {}", stats.rounds);
    info!(
        "✅ 题目: 成功 {}, 跳过 {}",
        stats.questions_processed, stats.questions_skipped
    );
    info!("🖼️ 变体: {}", stats.variants_written);
    info!("{}", "=".repeat(60));
    info!("\n索引已保存至: {}/index.json", config.output_root);
}
