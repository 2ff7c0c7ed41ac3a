//! 上传文件的磁盘存储
//!
//! 头像放在 `picture_dir`（前端静态目录直接读取），
//! 认证材料放在 `storage_dir/<user_id>/` 下，只能通过管理员下载接口访问。

use std::path::PathBuf;

use tokio::fs;
use tracing::{debug, warn};

use crate::config::UploadConfig;
use crate::errors::{AppError, Result};
use crate::utils::filename::{document_filename, is_safe_filename, picture_filename};

/// multipart 中读出的单个文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct FileStore {
    picture_dir: PathBuf,
    storage_dir: PathBuf,
    default_picture: String,
    max_file_size: usize,
}

impl FileStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            picture_dir: PathBuf::from(&config.picture_dir),
            storage_dir: PathBuf::from(&config.storage_dir),
            default_picture: config.default_picture.clone(),
            max_file_size: config.max_file_size,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn default_picture(&self) -> &str {
        &self.default_picture
    }

    /// 启动时确保目录存在
    pub async fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.picture_dir, &self.storage_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                AppError::file_operation(format!("无法创建目录 {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// 写入新头像，返回生成的文件名
    pub async fn save_picture(&self, ext: &str, bytes: &[u8]) -> Result<String> {
        let filename = picture_filename(ext);
        let path = self.picture_dir.join(&filename);

        fs::create_dir_all(&self.picture_dir).await?;
        fs::write(&path, bytes).await.map_err(|e| {
            AppError::file_operation(format!("写入头像失败 {}: {}", path.display(), e))
        })?;

        debug!("Picture stored: {} ({} bytes)", path.display(), bytes.len());
        Ok(filename)
    }

    /// 尽力删除旧头像，默认头像和非法文件名直接跳过
    pub async fn remove_picture(&self, filename: &str) {
        if filename == self.default_picture || !is_safe_filename(filename) {
            return;
        }

        let path = self.picture_dir.join(filename);
        match fs::remove_file(&path).await {
            Ok(()) => debug!("Picture removed: {}", path.display()),
            Err(e) => warn!("Failed to remove picture {}: {}", path.display(), e),
        }
    }

    /// 写入认证材料：`<storage>/<id>/<id>-<field>.<ext>`
    pub async fn save_document(
        &self,
        user_id: i32,
        field: &str,
        ext: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let dir = self.storage_dir.join(user_id.to_string());
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::file_operation(format!("无法创建目录 {}: {}", dir.display(), e))
        })?;

        let filename = document_filename(user_id, field, ext);
        let path = dir.join(&filename);
        fs::write(&path, bytes).await.map_err(|e| {
            AppError::file_operation(format!("写入文件失败 {}: {}", path.display(), e))
        })?;

        debug!("Document stored: {} ({} bytes)", path.display(), bytes.len());
        Ok(filename)
    }

    /// 定位某个用户的认证材料
    pub async fn document_path(&self, user_id: i32, filename: &str) -> Result<PathBuf> {
        if !is_safe_filename(filename) {
            return Err(AppError::invalid_file_name(format!(
                "Invalid filename: {}",
                filename
            )));
        }

        let path = self.storage_dir.join(user_id.to_string()).join(filename);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(AppError::file_missing(format!("File not found: {}", filename))),
        }
    }
}
