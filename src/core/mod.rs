//! 核心层：错误、响应、中间件与上传文件管理

pub mod error;
pub mod middleware;
pub mod response;
pub mod upload;
