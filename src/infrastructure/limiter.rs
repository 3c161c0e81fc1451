//! 并发限制器 - 基础设施层
//!
//! 固定容量的槽位池：同时运行的任务不超过容量 C，超出的提交按
//! FIFO 顺序排队，槽位释放后才开始执行。identify 与 resize 各用
//! 一个独立实例，避免 resize 洪峰饿死 identify（反之亦然）。
//!
//! 任务失败只释放自己的槽位，不影响其他排队/运行中的任务。

use crate::error::{BuildError, BuildResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// 并发限制器
///
/// 内部是 tokio 的 FIFO 信号量，clone 后共享同一个槽位池。
#[derive(Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    /// 创建容量为 `capacity` 的限制器
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// 槽位总容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 获取一个槽位，排队直到有空闲
    ///
    /// 信号量在本系统中永不关闭，失败分支只是为了避免 unwrap
    pub async fn acquire(&self) -> BuildResult<OwnedSemaphorePermit> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| BuildError::ExternalTool {
                operation: "acquire",
                message: "并发槽位池已关闭".to_string(),
            })
    }

    /// 在一个槽位中运行任务：先排队拿槽位，任务结束（无论成败）自动归还
    pub async fn run<T, F>(&self, task: F) -> BuildResult<T>
    where
        F: Future<Output = BuildResult<T>>,
    {
        let _permit = self.acquire().await?;
        task.await
    }
}
