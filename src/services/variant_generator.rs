//! 变体生成器 - 业务能力层
//!
//! 把一张已识别的源图缩放到一个目标宽度，写入确定性的输出路径，
//! 返回对应的 API 路径。
//!
//! 每次调用都重新读取源文件的完整字节，不在多个宽度之间共享缓存，
//! 用多一点 I/O 换实现的简单。

use crate::config::Config;
use crate::error::{BuildError, BuildResult};
use crate::infrastructure::ImageTool;
use crate::models::{ImageRole, QuestionId};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// 变体生成器
pub struct VariantGenerator<'a> {
    tool: &'a ImageTool,
    config: &'a Config,
}

impl<'a> VariantGenerator<'a> {
    pub fn new(tool: &'a ImageTool, config: &'a Config) -> Self {
        Self { tool, config }
    }

    /// 生成一个变体：读源 → 缩放 → 写出，返回 API 路径
    ///
    /// 外部工具或文件系统的失败向上传播，由调用方按"单个宽度缺失"处理。
    pub async fn generate(
        &self,
        source: &Path,
        out_dir: &Path,
        role: ImageRole,
        width: u32,
        round_id: usize,
        question_id: QuestionId,
    ) -> BuildResult<String> {
        let bytes = fs::read(source)
            .await
            .map_err(|e| BuildError::filesystem(source, e))?;

        let resized = self
            .tool
            .resize(bytes, width, &self.config.output_format)
            .await?;

        let file_name = format!(
            "r{}q{}.{}.{}.{}",
            round_id, question_id, role, width, self.config.output_format
        );
        let out_path = out_dir.join(role.as_str()).join(file_name);

        fs::write(&out_path, resized)
            .await
            .map_err(|e| BuildError::filesystem(&out_path, e))?;

        if self.config.verbose_logging {
            debug!("变体已写入: {}", out_path.display());
        }
        Ok(self.to_api_path(&out_path))
    }

    /// 把输出文件路径转成 API 路径：剥掉输出根目录前缀，换上 API 前缀
    ///
    /// 路径不包含输出根目录时回落到完整路径，不报错
    pub fn to_api_path(&self, out_path: &Path) -> String {
        match out_path.strip_prefix(&self.config.output_root) {
            Ok(relative) => format!(
                "{}/{}",
                self.config.api_prefix.trim_end_matches('/'),
                relative.display()
            ),
            Err(_) => out_path.display().to_string(),
        }
    }
}
