//! 账户：注册与登录

pub mod handler;
pub mod model;
pub mod service;
