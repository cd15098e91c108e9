//! 商品目录：商品列表与发布

pub mod handler;
pub mod model;
pub mod service;
