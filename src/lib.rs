//! # 二手市场后端
//!
//! 提供以下功能：
//! - 商品发布（可附带一张图片）与商品目录查询
//! - 账户注册与用户名/密码登录
//! - 前端页面和上传图片的静态资源服务
//!
//! 所有数据只保存在进程内存中，重启后丢失。

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{build_router, AppState};
pub use infrastructure::config::AppConfig;
