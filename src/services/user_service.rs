//! User management service
//!
//! Account creation, profile updates, candidate/match listing and the
//! picture / verification-document workflows.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::{AppError, Result};
use crate::services::file_store::{FileStore, UploadedFile};
use crate::storage::{Needs, NewUser, Role, SeaOrmStorage, User, UserChanges};
use crate::utils::filename::{DOCUMENT_EXTENSIONS, PICTURE_EXTENSIONS, allowed_extension};
use crate::utils::password::{hash_password, process_update_password, verify_password};

/// 认证材料的 multipart 字段名
pub const CARTE_ID_FIELD: &str = "carte_id";
pub const CERTIFICAT_FIELD: &str = "certificatScolaire";

// ============ Request DTOs ============

/// Request to create a new account
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub description: Option<String>,
    pub needs: Option<Needs>,
    pub role: Role,
}

/// Partial update, `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub needs: Option<Needs>,
    pub picture: Option<String>,
    pub verified: Option<bool>,
}

/// Who is allowed to set `verified`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateScope {
    /// 用户修改自己的资料，忽略 verified 和 picture
    OwnProfile,
    /// 管理员审核
    Admin,
}

// ============ UserService Implementation ============

pub struct UserService {
    storage: Arc<SeaOrmStorage>,
    files: Arc<FileStore>,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>, files: Arc<FileStore>) -> Self {
        Self { storage, files }
    }

    fn require_non_empty(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(AppError::validation(format!("{} must not be empty", field)));
        }
        Ok(())
    }

    fn validate_email(email: &str) -> Result<()> {
        Self::require_non_empty("email", email)?;
        if !email.contains('@') {
            return Err(AppError::validation(format!("Invalid email: {}", email)));
        }
        Ok(())
    }

    /// Create a new account, email must be unused
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<User> {
        Self::require_non_empty("name", &req.name)?;
        Self::require_non_empty("surname", &req.surname)?;
        Self::validate_email(&req.email)?;
        Self::require_non_empty("password", &req.password)?;

        if self.storage.email_taken(&req.email, None).await? {
            return Err(AppError::user_already_exists("User already exist"));
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!("Failed to hash password: {}", e);
            e
        })?;

        let user = self
            .storage
            .insert_user(NewUser {
                name: req.name,
                surname: req.surname,
                email: req.email,
                password_hash,
                role: req.role,
                picture: self.files.default_picture().to_string(),
                description: req.description,
                needs: req.needs.unwrap_or_default(),
                verified: false,
            })
            .await?;

        info!(
            "UserService: created {} account {} (id {})",
            user.role.as_ref(),
            user.email,
            user.id
        );
        Ok(user)
    }

    /// Check email/password, same error for unknown email and bad password
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let failed =
            || AppError::auth_failed("Connexion impossible, utilisateur ou mot de passe incorrect");

        let Some(creds) = self.storage.find_credentials_by_email(email).await? else {
            info!("Sign-in refused: unknown email {}", email);
            return Err(failed());
        };

        if !verify_password(password, &creds.password_hash) {
            info!("Sign-in refused: wrong password for {}", email);
            return Err(failed());
        }

        Ok(creds.user)
    }

    pub async fn get_user(&self, id: i32) -> Result<User> {
        self.storage
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::user_not_found(format!("User {} not found", id)))
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.storage.list_users().await
    }

    /// Swipe candidates for the caller
    ///
    /// 排除管理员、自己以及已经滑过的人，needs 取请求头的互补值。
    pub async fn candidates(
        &self,
        caller_id: i32,
        needs_header: Option<&str>,
    ) -> Result<Vec<User>> {
        let mut exclude = self.storage.swiped_target_ids(caller_id).await?;
        exclude.push(caller_id);

        let wanted = Needs::wanted_for(needs_header);
        self.storage.find_candidates(&exclude, wanted).await
    }

    /// Users sharing a mutual like with the caller
    pub async fn matches(&self, caller_id: i32) -> Result<Vec<User>> {
        let ids = self.storage.matched_user_ids(caller_id).await?;
        self.storage.list_users_by_ids(&ids).await
    }

    /// Apply a partial update, returns affected rows
    pub async fn update_user(
        &self,
        id: i32,
        req: UpdateUserRequest,
        scope: UpdateScope,
    ) -> Result<u64> {
        if let Some(ref name) = req.name {
            Self::require_non_empty("name", name)?;
        }
        if let Some(ref surname) = req.surname {
            Self::require_non_empty("surname", surname)?;
        }
        if let Some(ref email) = req.email {
            Self::validate_email(email)?;
            if self.storage.email_taken(email, Some(id)).await? {
                return Err(AppError::user_already_exists("User already exist"));
            }
        }

        let changes = UserChanges {
            name: req.name,
            surname: req.surname,
            email: req.email,
            password_hash: process_update_password(req.password.as_deref())?,
            // 头像只能通过上传接口替换
            picture: match scope {
                UpdateScope::Admin => req.picture,
                UpdateScope::OwnProfile => None,
            },
            description: req.description,
            needs: req.needs,
            carte_id: None,
            certificat_scolaire: None,
            verified: match scope {
                UpdateScope::Admin => req.verified,
                UpdateScope::OwnProfile => None,
            },
        };

        let affected = self.storage.update_user(id, changes).await?;
        info!(
            "UserService: updated user {} ({:?}), affected {}",
            id, scope, affected
        );
        Ok(affected)
    }

    /// 删除头像文件，仍被其他用户引用时保留
    async fn release_picture(&self, owner: i32, picture: &str) {
        match self
            .storage
            .picture_referenced_by_others(picture, owner)
            .await
        {
            Ok(false) => self.files.remove_picture(picture).await,
            Ok(true) => warn!(
                "Picture {} of user {} is referenced by another user, keeping it",
                picture, owner
            ),
            Err(e) => warn!("Failed to check references of picture {}: {}", picture, e),
        }
    }

    /// Delete an account, its swipes and (best effort) its stored picture
    pub async fn delete_user(&self, id: i32) -> Result<u64> {
        let Some(stored) = self.storage.find_user(id).await? else {
            return Err(AppError::user_not_found(format!("User {} not found", id)));
        };

        let affected = self.storage.delete_user(id).await?;
        if affected == 0 {
            return Err(AppError::user_not_found(format!("User {} not found", id)));
        }

        self.release_picture(id, &stored.picture).await;

        info!("UserService: deleted user {}", id);
        Ok(affected)
    }

    /// Store a new profile picture and drop the previous one
    pub async fn replace_picture(&self, user_id: i32, file: UploadedFile) -> Result<String> {
        let ext = allowed_extension(&file.filename, PICTURE_EXTENSIONS)
            .ok_or_else(|| AppError::invalid_file_type("Only image files are allowed!"))?;

        let previous = self.get_user(user_id).await?;
        let filename = self.files.save_picture(&ext, &file.bytes).await?;

        let changes = UserChanges {
            picture: Some(filename.clone()),
            ..Default::default()
        };
        let affected = self.storage.update_user(user_id, changes).await?;

        if affected != 1 {
            // 用户在上传过程中被删除
            warn!("Picture upload for user {} matched no row", user_id);
            self.files.remove_picture(&filename).await;
            return Err(AppError::user_not_found(format!("User {} not found", user_id)));
        }

        self.release_picture(user_id, &previous.picture).await;
        info!("UserService: user {} picture -> {}", user_id, filename);
        Ok(filename)
    }

    /// Store both verification documents, returns affected rows
    pub async fn store_verifications(
        &self,
        user_id: i32,
        carte_id: UploadedFile,
        certificat: UploadedFile,
    ) -> Result<u64> {
        let invalid = || AppError::invalid_file_type("Only image files and pdf are allowed!");
        let carte_ext =
            allowed_extension(&carte_id.filename, DOCUMENT_EXTENSIONS).ok_or_else(invalid)?;
        let cert_ext =
            allowed_extension(&certificat.filename, DOCUMENT_EXTENSIONS).ok_or_else(invalid)?;

        let carte_name = self
            .files
            .save_document(user_id, CARTE_ID_FIELD, &carte_ext, &carte_id.bytes)
            .await?;
        let cert_name = self
            .files
            .save_document(user_id, CERTIFICAT_FIELD, &cert_ext, &certificat.bytes)
            .await?;

        let changes = UserChanges {
            carte_id: Some(carte_name),
            certificat_scolaire: Some(cert_name),
            ..Default::default()
        };
        let affected = self.storage.update_user(user_id, changes).await?;
        info!(
            "UserService: verification documents stored for user {}",
            user_id
        );
        Ok(affected)
    }

    pub async fn pending_verifications(&self) -> Result<Vec<User>> {
        self.storage.list_pending_verifications().await
    }
}
