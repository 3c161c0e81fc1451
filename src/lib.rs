//! # Quiz Image Builder
//!
//! 把结构化内容树（轮次 → 题目 → 三张源图）构建成派生产物：
//! 固定宽度的图片变体 + 一份描述全部轮次/题目/变体路径的聚合索引
//! `index.json`。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源，只暴露能力
//! - `ConcurrencyLimiter` - FIFO 槽位池，identify / resize 各一个实例
//! - `ImageTool` - 外部图片工具（GraphicsMagick 或测试假后端）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个内容单元
//! - `ContentRepository` - 读取轮次索引 / 题目元数据
//! - `VariantGenerator` - 生成单个宽度变体
//! - `ImageSetProcessor` - 解析一道题的三个图片角色
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `QuestionCtx` - 上下文封装（轮次身份 + 题目身份）
//! - `QuestionProcessor` - 流程编排（元数据 → 图片集 → 输出记录）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/round_aggregator` - 轮次级扇出/扇入
//! - `orchestrator/build_coordinator` - 顶层驱动，持有资源，写出索引
//!
//! ## 结算纪律
//!
//! 每个扇出单元（轮次 / 题目 / 角色 / 变体）都遵循
//! Pending → Running → Settled(Fulfilled | Rejected) 的状态机；
//! 父节点必须等所有子节点各自结算后才结算自己。叶子层的失败
//! 只留下缺席，永远不会卡住构建。

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{BuildError, BuildResult};
pub use infrastructure::{ConcurrencyLimiter, GraphicsMagickBackend, ImageBackend, ImageMeta, ImageTool};
pub use models::{ApiIndex, ImageRole, QuestionData, QuestionId, RoundData, RoundSpec};
pub use orchestrator::{process_round, BuildCoordinator, BuildDeps, BuildStats};
pub use services::{ContentRepository, ImageSetProcessor, VariantGenerator};
pub use workflow::{QuestionCtx, QuestionProcessor};
