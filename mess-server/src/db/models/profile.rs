//! Profile Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::Role;
use shared::client::UserInfo;
use surrealdb::RecordId;

/// Profile ID type
pub type ProfileId = RecordId;

/// Profile model matching the `profile` table
///
/// Profile 即用户记录：注册时创建，应用内不可删除。
/// `hash_pass` 只在数据库侧存在，对外一律转换为 [`UserInfo`]。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProfileId>,
    pub username: String,
    pub email: String,
    pub hash_pass: String,
    pub role: Role,
    pub created_at: i64,
}

impl Profile {
    /// 记录 ID 的字符串形式 ("profile:...")
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    /// API 可见的用户信息（不含密码散列）
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id_string(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

/// Create profile payload (registration)
#[derive(Debug, Clone)]
pub struct ProfileCreate {
    pub username: String,
    pub email: String,
    /// Plain password, hashed by the repository
    pub password: String,
    pub role: Role,
}
