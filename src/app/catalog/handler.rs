//! 商品目录处理器

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::Json,
};
use tracing::{debug, info};

use super::model::{Product, ProductCreated, ProductFields};
use crate::app::AppState;
use crate::core::{
    error::CoreError,
    upload::{StoredUpload, UploadStore},
};

/// 图片所在的表单字段名
const IMAGE_FIELD: &str = "image";

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, CoreError> {
    Ok(Json(state.catalog.list()?))
}

/// 发布商品。上传的图片由 `StoredUpload` 持有，
/// 在商品入库成功之前的任何 `?` 返回都会删除它。
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ProductCreated>), CoreError> {
    let (fields, image) = read_product_form(multipart?, &state.uploads).await?;

    let new_product = fields.validate()?;
    let image_url = image.as_ref().map(|upload| upload.public_url().to_string());
    let product = state.catalog.create(new_product, image_url)?;

    if let Some(image) = image {
        image.keep();
    }

    info!(id = product.id, title = %product.title, image = %product.image_url, "商品发布成功");

    Ok((
        StatusCode::CREATED,
        Json(ProductCreated {
            message: "Product listed successfully".to_string(),
            product,
        }),
    ))
}

/// 读取全部表单字段，图片字段直接写入上传目录
async fn read_product_form(
    mut multipart: Multipart,
    uploads: &UploadStore,
) -> Result<(ProductFields, Option<StoredUpload>), CoreError> {
    let mut fields = ProductFields::default();
    let mut image: Option<StoredUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name != IMAGE_FIELD {
            let value = field.text().await?;
            if !fields.set(&name, value) {
                debug!(field = %name, "忽略未知表单字段");
            }
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        // 浏览器在未选择文件时会提交一个空的文件字段
        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        if !content_type.starts_with("image/") {
            return Err(CoreError::Validation(format!(
                "Only image uploads are accepted, got '{}'",
                content_type
            )));
        }

        // 重复的图片字段以最后一个为准，之前写入的文件随旧守卫一起删除
        image = Some(uploads.save(&file_name, &bytes).await?);
    }

    Ok((fields, image))
}
