//! 外部图片工具 - 基础设施层
//!
//! 持有图片后端和两个独立的并发限制器（identify 一个、resize 一个），
//! 只暴露"识别"和"缩放"两种能力。后端本身是黑盒：生产环境通过
//! GraphicsMagick 命令行完成，测试注入假后端。
//!
//! 阻塞的外部调用统一放到 tokio 的阻塞线程池上执行，调用前先在
//! 对应资源类别的限制器里排队拿槽位。

use crate::config::Config;
use crate::error::{BuildError, BuildResult};
use crate::infrastructure::limiter::ConcurrencyLimiter;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

/// 源图元数据（identify 的返回值）
#[derive(Debug, Clone, Copy)]
pub struct ImageMeta {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageMeta {
    /// 高宽比（height / width），任一维度未知时为 None
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 => Some(h as f64 / w as f64),
            _ => None,
        }
    }
}

/// 图片后端能力接口
///
/// 同步阻塞接口，由 [`ImageTool`] 负责放到阻塞线程池上执行。
pub trait ImageBackend: Send + Sync {
    /// 识别一个源文件的元数据，文件不存在或无法识别时返回错误
    fn identify(&self, path: &Path) -> BuildResult<ImageMeta>;

    /// 将源字节缩放到目标宽度（保持比例），输出指定格式的字节
    fn resize(&self, bytes: &[u8], width: u32, format: &str) -> BuildResult<Vec<u8>>;
}

/// GraphicsMagick 命令行后端
#[derive(Debug, Default)]
pub struct GraphicsMagickBackend;

impl GraphicsMagickBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for GraphicsMagickBackend {
    fn identify(&self, path: &Path) -> BuildResult<ImageMeta> {
        let output = Command::new("gm")
            .args(["identify", "-format", "%w %h"])
            .arg(path)
            .output()
            .map_err(|e| BuildError::identify_failed(format!("无法启动 gm: {}", e)))?;

        if !output.status.success() {
            return Err(BuildError::identify_failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        // 解析失败不算错误，尺寸保持未知即可
        let text = String::from_utf8_lossy(&output.stdout);
        let mut parts = text.split_whitespace();
        let width = parts.next().and_then(|s| s.parse().ok());
        let height = parts.next().and_then(|s| s.parse().ok());
        Ok(ImageMeta { width, height })
    }

    fn resize(&self, bytes: &[u8], width: u32, format: &str) -> BuildResult<Vec<u8>> {
        let mut child = Command::new("gm")
            .args(["convert", "-", "-resize"])
            .arg(format!("{}x", width))
            .arg(format!("{}:-", format))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BuildError::resize_failed(format!("无法启动 gm: {}", e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| BuildError::resize_failed("无法获取 gm 的标准输入"))?;
        let input = bytes.to_vec();
        // 单独的线程写入 stdin，避免子进程输出撑满管道时互相死锁
        let writer = std::thread::spawn(move || {
            let _ = stdin.write_all(&input);
        });

        let output = child
            .wait_with_output()
            .map_err(|e| BuildError::resize_failed(format!("等待 gm 退出失败: {}", e)))?;
        let _ = writer.join();

        if !output.status.success() {
            return Err(BuildError::resize_failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(output.stdout)
    }
}

/// 外部图片工具
///
/// 职责：
/// - 持有唯一的后端实例和两类资源的限制器
/// - 暴露 identify() / resize() 能力
/// - 不认识 Round / Question
pub struct ImageTool {
    backend: Arc<dyn ImageBackend>,
    identify_limiter: ConcurrencyLimiter,
    resize_limiter: ConcurrencyLimiter,
}

impl ImageTool {
    /// 创建图片工具，限制器容量取自配置
    pub fn new(backend: Arc<dyn ImageBackend>, config: &Config) -> Self {
        Self {
            backend,
            identify_limiter: ConcurrencyLimiter::new(config.max_concurrent_identify),
            resize_limiter: ConcurrencyLimiter::new(config.max_concurrent_resize),
        }
    }

    /// 识别源文件，在 identify 限制器中排队
    pub async fn identify(&self, path: &Path) -> BuildResult<ImageMeta> {
        let backend = self.backend.clone();
        let path: PathBuf = path.to_path_buf();
        self.identify_limiter
            .run(async move {
                tokio::task::spawn_blocking(move || backend.identify(&path))
                    .await
                    .map_err(|e| BuildError::identify_failed(format!("任务执行失败: {}", e)))?
            })
            .await
    }

    /// 缩放图片字节，在 resize 限制器中排队
    pub async fn resize(&self, bytes: Vec<u8>, width: u32, format: &str) -> BuildResult<Vec<u8>> {
        let backend = self.backend.clone();
        let format = format.to_string();
        self.resize_limiter
            .run(async move {
                tokio::task::spawn_blocking(move || backend.resize(&bytes, width, &format))
                    .await
                    .map_err(|e| BuildError::resize_failed(format!("任务执行失败: {}", e)))?
            })
            .await
    }
}
