//! 构建错误类型
//!
//! 按错误类别划分，每个扇入点根据类别显式决定"吞掉并记录"还是"向上传播"：
//!
//! - [`BuildError::ContentMissing`]：题目元数据缺失/无法解析，跳过该题目
//! - [`BuildError::SourceImageMissing`]：某角色两种格式的源图都不存在，仅该角色失败
//! - [`BuildError::ExternalTool`]：identify / resize 调用失败，仅该次调用对应的探测或变体缺失
//! - [`BuildError::Filesystem`]：输出目录/文件写入失败；输出根目录级别的失败中止构建，
//!   单个变体级别的失败降级为"该变体缺失"

use std::path::PathBuf;
use thiserror::Error;

/// 构建过程中的错误
#[derive(Debug, Error)]
pub enum BuildError {
    /// 题目元数据文件不存在或无法解析
    #[error("题目元数据缺失: {dir}")]
    ContentMissing { dir: String },

    /// 某角色的源图在两种接受格式下都不存在
    #[error("源图缺失 (角色: {role}, 基础路径: {base_path})")]
    SourceImageMissing { role: &'static str, base_path: PathBuf },

    /// 外部图片工具调用失败
    #[error("外部工具 {operation} 调用失败: {message}")]
    ExternalTool { operation: &'static str, message: String },

    /// 文件系统操作失败
    #[error("文件系统操作失败 ({path}): {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// 创建 identify 调用失败错误
    pub fn identify_failed(message: impl Into<String>) -> Self {
        BuildError::ExternalTool {
            operation: "identify",
            message: message.into(),
        }
    }

    /// 创建 resize 调用失败错误
    pub fn resize_failed(message: impl Into<String>) -> Self {
        BuildError::ExternalTool {
            operation: "resize",
            message: message.into(),
        }
    }

    /// 创建文件系统错误
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// 构建结果类型
pub type BuildResult<T> = Result<T, BuildError>;
