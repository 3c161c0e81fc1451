//! 构建配置
//!
//! 配置在程序启动时构建一次，之后以不可变值的形式传入各组件，
//! 任何组件都不读取全局状态。

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 内容树根目录（只读输入）
    pub content_root: String,
    /// 输出根目录（每次构建前清空重建）
    pub output_root: String,
    /// 输出根目录下的图片子目录
    pub image_subdir: String,
    /// API 路径前缀（生成 API 路径时替换输出根目录）
    pub api_prefix: String,
    /// 生成的目标宽度列表
    pub target_widths: Vec<u32>,
    /// 输出图片格式（扩展名）
    pub output_format: String,
    /// identify 调用的最大并发数
    pub max_concurrent_identify: usize,
    /// resize 调用的最大并发数
    pub max_concurrent_resize: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_root: "content".to_string(),
            output_root: "dist".to_string(),
            image_subdir: "imgs".to_string(),
            api_prefix: "/api".to_string(),
            target_widths: vec![320, 640, 1280],
            output_format: "jpg".to_string(),
            max_concurrent_identify: 8,
            max_concurrent_resize: 4,
            verbose_logging: false,
        }
    }
}

/// 配置文件的部分字段（全部可选，缺省时回落到内置默认值）
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    content_root: Option<String>,
    output_root: Option<String>,
    image_subdir: Option<String>,
    api_prefix: Option<String>,
    target_widths: Option<Vec<u32>>,
    output_format: Option<String>,
    max_concurrent_identify: Option<usize>,
    max_concurrent_resize: Option<usize>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 从 TOML 配置文件加载，文件中的字段覆盖内置默认值
    ///
    /// 文件不存在时直接返回默认配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))?;

        let default = Self::default();
        Ok(Self {
            content_root: file.content_root.unwrap_or(default.content_root),
            output_root: file.output_root.unwrap_or(default.output_root),
            image_subdir: file.image_subdir.unwrap_or(default.image_subdir),
            api_prefix: file.api_prefix.unwrap_or(default.api_prefix),
            target_widths: file.target_widths.unwrap_or(default.target_widths),
            output_format: file.output_format.unwrap_or(default.output_format),
            max_concurrent_identify: file
                .max_concurrent_identify
                .unwrap_or(default.max_concurrent_identify),
            max_concurrent_resize: file
                .max_concurrent_resize
                .unwrap_or(default.max_concurrent_resize),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }
}
