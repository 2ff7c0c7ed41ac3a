//! Shared setup for the integration tests
//!
//! Each test gets its own temp directory holding the SQLite file and the
//! upload folders.

#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tempfile::TempDir;

use rendezvous::config::StaticConfig;
use rendezvous::runtime::lifetime::startup::StartupContext;
use rendezvous::services::CreateUserRequest;
use rendezvous::storage::{Needs, Role, StorageFactory, User};

pub const TEST_SECRET: &str = "integration_test_secret_32_bytes!";
pub const PASSWORD: &str = "p4ss:word";
pub const MAX_FILE_SIZE: usize = 64 * 1024;

pub struct TestEnv {
    pub dir: TempDir,
    pub config: StaticConfig,
    pub ctx: StartupContext,
}

pub fn test_config(dir: &TempDir) -> StaticConfig {
    let mut config = StaticConfig::default();
    config.database.database_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("test.db").display()
    );
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.uploads.picture_dir = dir.path().join("pictures").to_string_lossy().into_owned();
    config.uploads.storage_dir = dir.path().join("storage").to_string_lossy().into_owned();
    config.uploads.max_file_size = MAX_FILE_SIZE;
    config
}

pub async fn setup() -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&dir);

    let storage = StorageFactory::create(&config.database)
        .await
        .expect("Failed to create storage");
    let ctx = StartupContext::build(storage, &config)
        .await
        .expect("Failed to build context");

    TestEnv { dir, config, ctx }
}

impl TestEnv {
    pub async fn create_user(&self, email: &str, needs: Needs) -> User {
        self.create_with_role(email, needs, Role::Customer).await
    }

    pub async fn create_admin(&self, email: &str) -> User {
        self.create_with_role(email, Needs::Duo, Role::Admin).await
    }

    async fn create_with_role(&self, email: &str, needs: Needs, role: Role) -> User {
        self.ctx
            .user_service
            .create_user(CreateUserRequest {
                name: "Test".to_string(),
                surname: "User".to_string(),
                email: email.to_string(),
                password: PASSWORD.to_string(),
                description: Some(format!("about {}", email)),
                needs: Some(needs),
                role,
            })
            .await
            .expect("Failed to create user")
    }

    pub fn token_for(&self, user: &User) -> String {
        self.ctx
            .jwt
            .generate_access_token(user)
            .expect("Failed to sign token")
    }

    pub fn bearer_for(&self, user: &User) -> String {
        format!("Bearer {}", self.token_for(user))
    }

    pub fn picture_path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join("pictures").join(name)
    }

    pub fn document_path(&self, user_id: i32, name: &str) -> std::path::PathBuf {
        self.dir
            .path()
            .join("storage")
            .join(user_id.to_string())
            .join(name)
    }
}

pub fn basic(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
}

pub const BOUNDARY: &str = "rendezvous-test-boundary";

/// 手工拼 multipart/form-data 请求体：(字段名, 文件名, 内容)
pub fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
