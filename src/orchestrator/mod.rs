//! 编排层
//!
//! - `round_aggregator` - 单个轮次的扇出/扇入：题目并发处理，全部结算后组装轮次记录
//! - `build_coordinator` - 顶层驱动：清空输出、扇出全部轮次、写出聚合索引

pub mod build_coordinator;
pub mod round_aggregator;

pub use build_coordinator::{BuildCoordinator, BuildDeps, BuildStats};
pub use round_aggregator::process_round;
