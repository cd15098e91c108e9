//! 商品目录数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::CoreError;

/// 未上传图片时使用的占位图
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x200?text=No+Image";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub condition: String,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// 已通过校验、等待入库的商品字段
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub category: String,
    pub condition: String,
    pub price: f64,
    pub description: Option<String>,
}

/// 表单中原样读取的文本字段
#[derive(Debug, Default, Clone)]
pub struct ProductFields {
    pub title: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
}

/// 创建成功的响应体
#[derive(Debug, Serialize)]
pub struct ProductCreated {
    pub message: String,
    pub product: Product,
}

impl ProductFields {
    /// 按字段名写入，未知字段返回 false
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "category" => &mut self.category,
            "condition" => &mut self.condition,
            "price" => &mut self.price,
            "description" => &mut self.description,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn validate(self) -> Result<NewProduct, CoreError> {
        let fields = (
            non_blank(self.title),
            non_blank(self.category),
            non_blank(self.condition),
            non_blank(self.price),
        );

        match fields {
            (Some(title), Some(category), Some(condition), Some(price)) => Ok(NewProduct {
                title,
                category,
                condition,
                price: parse_price(&price)?,
                description: non_blank(self.description),
            }),
            (title, category, condition, price) => {
                let missing: Vec<&str> = [
                    ("title", title.is_none()),
                    ("category", category.is_none()),
                    ("condition", condition.is_none()),
                    ("price", price.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(CoreError::missing_fields(&missing))
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 价格必须是有限且非负的数字
pub fn parse_price(text: &str) -> Result<f64, CoreError> {
    match text.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(CoreError::Validation(format!(
            "Price must be a non-negative number, got '{}'",
            text
        ))),
    }
}
