//! 上传文件管理
//!
//! 上传的图片先落盘，再交给商品创建流程。`StoredUpload` 持有刚写入的文件，
//! 除非调用 [`StoredUpload::keep`]，否则在被丢弃时删除该文件，
//! 这样请求在任何失败路径上都不会留下孤儿文件。

use std::path::{Path, PathBuf};

use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::CoreError;
use crate::infrastructure::config::StorageConfig;

/// 一个已写入上传目录、尚未确认保留的文件
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
    public_url: String,
    kept: bool,
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 静态资源服务下的访问路径，例如 `/uploads/1700000000000-3f2a9c1b.png`
    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    /// 确认保留文件，之后丢弃守卫不再删除它
    pub fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        if self.kept {
            return;
        }

        // Drop 中无法 await，删除在当前线程上同步完成
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "已清理未使用的上传文件"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "清理上传文件失败"),
        }
    }
}

/// 上传目录及其对外访问前缀
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    url_prefix: String,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(storage: &StorageConfig) -> Self {
        Self::new(
            storage.upload_dir(),
            format!("/{}", storage.uploads_subdir.trim_matches('/')),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 启动时创建上传目录（包括父级公共目录）
    pub async fn ensure_dir(&self) -> Result<(), CoreError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// 以生成的唯一文件名写入上传内容
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredUpload, CoreError> {
        self.save_as(&generate_file_name(original_name), bytes).await
    }

    /// 只创建新文件，同名文件已存在时返回错误而不是覆盖
    async fn save_as(&self, file_name: &str, bytes: &[u8]) -> Result<StoredUpload, CoreError> {
        let path = self.dir.join(file_name);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        // 文件由本次请求创建之后才交给守卫，写到一半失败时残留文件同样会被清理
        let upload = StoredUpload {
            path,
            public_url: format!("{}/{}", self.url_prefix, file_name),
            kept: false,
        };

        file.write_all(bytes).await?;
        file.flush().await?;
        debug!(path = %upload.path.display(), size = bytes.len(), "上传文件已写入");

        Ok(upload)
    }
}

/// `<毫秒时间戳>-<8位随机十六进制><.扩展名>`
fn generate_file_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    let suffix = &random[..8];

    match extension_of(original_name) {
        Some(ext) => format!("{}-{}.{}", millis, suffix, ext),
        None => format!("{}-{}", millis, suffix),
    }
}

fn extension_of(original_name: &str) -> Option<String> {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
}
