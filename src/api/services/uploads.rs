//! 头像与认证材料的上传、下载

use actix_multipart::{Field, Multipart};
use actix_web::http::header::{
    CONTENT_TYPE, ContentDisposition, DispositionParam, DispositionType,
};
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use bytes::Bytes;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use crate::api::jwt::{Claims, JwtService};
use crate::api::middleware::strip_bearer;
use crate::errors::AppError;
use crate::services::{CARTE_ID_FIELD, CERTIFICAT_FIELD, FileStore, UploadedFile, UserService};
use crate::storage::Role;

use super::helpers::{api_result, error_from_app};
use super::types::{AffectedResponse, FileQuery};

const DOWNLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// 读取一个文件字段（带大小限制）
async fn read_file_field(field: &mut Field, limit: usize) -> Result<UploadedFile, AppError> {
    let filename = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(str::to_string)
        .unwrap_or_default();

    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| {
            error!("Failed to read file chunk: {}", e);
            AppError::file_operation(format!("Failed to read file: {}", e))
        })?;
        // 检查累积大小
        if data.len() + bytes.len() > limit {
            return Err(AppError::file_too_large(format!(
                "File size exceeds maximum {} MB",
                limit / 1024 / 1024
            )));
        }
        data.extend_from_slice(&bytes);
    }

    Ok(UploadedFile {
        filename,
        bytes: data,
    })
}

/// 按字段名收集文件，每个字段只保留第一个
async fn collect_files(
    payload: &mut Multipart,
    wanted: &[&str],
    limit: usize,
) -> Result<Vec<(String, UploadedFile)>, AppError> {
    let mut files: Vec<(String, UploadedFile)> = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            error!("Failed to parse multipart field: {}", e);
            AppError::upload(format!("Invalid multipart data: {}", e))
        })?;

        let name = field.name().unwrap_or("").to_string();
        if !wanted.contains(&name.as_str()) || files.iter().any(|(n, _)| *n == name) {
            // 忽略未知字段
            continue;
        }

        let file = read_file_field(&mut field, limit).await?;
        files.push((name, file));
    }

    Ok(files)
}

fn take_file(
    files: &mut Vec<(String, UploadedFile)>,
    name: &str,
) -> Result<UploadedFile, AppError> {
    let idx = files
        .iter()
        .position(|(n, _)| n == name)
        .ok_or_else(|| AppError::upload(format!("Missing multipart field '{}'", name)))?;
    Ok(files.swap_remove(idx).1)
}

/// POST /users/upload
///
/// 成功时直接返回新文件名（纯文本）。
pub async fn upload_picture(
    mut payload: Multipart,
    claims: web::ReqData<Claims>,
    users: web::Data<Arc<UserService>>,
    files: web::Data<Arc<FileStore>>,
) -> ActixResult<impl Responder> {
    info!("Users API: picture upload for user {}", claims.id);

    let result = async {
        let mut collected = collect_files(&mut payload, &["file"], files.max_file_size()).await?;
        let file = take_file(&mut collected, "file")?;
        users.replace_picture(claims.id, file).await
    }
    .await;

    Ok(match result {
        Ok(filename) => HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .body(filename),
        Err(e) => error_from_app(&e),
    })
}

/// POST /users/uploadVerifications
pub async fn upload_verifications(
    mut payload: Multipart,
    claims: web::ReqData<Claims>,
    users: web::Data<Arc<UserService>>,
    files: web::Data<Arc<FileStore>>,
) -> ActixResult<impl Responder> {
    info!("Users API: verification upload for user {}", claims.id);

    let result = async {
        let mut collected = collect_files(
            &mut payload,
            &[CARTE_ID_FIELD, CERTIFICAT_FIELD],
            files.max_file_size(),
        )
        .await?;
        let carte_id = take_file(&mut collected, CARTE_ID_FIELD)?;
        let certificat = take_file(&mut collected, CERTIFICAT_FIELD)?;
        users
            .store_verifications(claims.id, carte_id, certificat)
            .await
    }
    .await;

    Ok(api_result(result.map(|affected| AffectedResponse { affected })))
}

/// GET /users/files?bearer=&user_id=&filename=
///
/// token 放在 query 里，方便浏览器直接打开下载链接。
pub async fn download_file(
    query: web::Query<FileQuery>,
    jwt: web::Data<Arc<JwtService>>,
    files: web::Data<Arc<FileStore>>,
) -> ActixResult<impl Responder> {
    let query = query.into_inner();

    let token = query.bearer.as_deref().map(strip_bearer).unwrap_or("");
    let claims = match jwt.validate_access_token(token) {
        Ok(c) => c,
        Err(_) => return Ok(error_from_app(&AppError::token("token invalide"))),
    };

    if claims.role != Role::Admin {
        return Ok(error_from_app(&AppError::unauthorized("Unauthorized")));
    }

    let path = match files.document_path(query.user_id, &query.filename).await {
        Ok(p) => p,
        Err(e) => return Ok(error_from_app(&e)),
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) => return Ok(error_from_app(&AppError::from(e))),
    };

    info!(
        "Users API: admin {} downloads {} of user {}",
        claims.id, query.filename, query.user_id
    );

    // 读失败后结束流
    let stream = futures_util::stream::unfold(Some(file), |state| async move {
        let mut file = state?;
        let mut buf = vec![0u8; DOWNLOAD_CHUNK_SIZE];
        match file.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok::<_, std::io::Error>(Bytes::from(buf)), Some(file)))
            }
            Err(e) => Some((Err(e), None)),
        }
    });

    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(query.filename)],
    };

    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "application/octet-stream"))
        .insert_header(disposition)
        .streaming(stream))
}
