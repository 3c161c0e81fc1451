//! 基础设施层
//!
//! 持有稀缺资源（并发槽位、外部图片工具进程），只暴露能力，
//! 不认识 Round / Question，不处理业务流程。

pub mod image_tool;
pub mod limiter;

pub use image_tool::{GraphicsMagickBackend, ImageBackend, ImageMeta, ImageTool};
pub use limiter::ConcurrencyLimiter;
