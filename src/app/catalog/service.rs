//! 商品目录存储

use std::sync::{Arc, RwLock};

use super::model::{NewProduct, Product, PLACEHOLDER_IMAGE_URL};
use crate::core::error::CoreError;

/// 进程内、只追加的商品列表
#[derive(Clone, Default)]
pub struct CatalogStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按插入顺序返回全部商品
    pub fn list(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.products.read()?.clone())
    }

    pub fn len(&self) -> Result<usize, CoreError> {
        Ok(self.products.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CoreError> {
        Ok(self.len()? == 0)
    }

    /// 追加商品。编号为现有最大编号加一（空时为 1），
    /// 计算与追加在同一把写锁内完成，并发创建不会得到重复编号。
    pub fn create(
        &self,
        new_product: NewProduct,
        image_url: Option<String>,
    ) -> Result<Product, CoreError> {
        let mut products = self.products.write()?;

        let id = products
            .iter()
            .map(|product| product.id)
            .max()
            .map_or(1, |max| max + 1);

        let product = Product {
            id,
            title: new_product.title,
            category: new_product.category,
            condition: new_product.condition,
            price: new_product.price,
            description: new_product.description,
            image_url: image_url.unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            created_at: chrono::Utc::now(),
        };

        products.push(product.clone());
        Ok(product)
    }
}
