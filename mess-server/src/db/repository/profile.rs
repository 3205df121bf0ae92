//! Profile repository
//!
//! 用户档案的持久化操作。Passwords are hashed with Argon2 before the
//! row is written; plain passwords never reach the database.

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::db::models::{Profile, ProfileCreate};

use super::{now_ms, parse_record_id, BaseRepository, RepoError, RepoResult};

#[derive(Clone)]
pub struct ProfileRepository {
    base: BaseRepository,
}

impl ProfileRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &Surreal<Db> {
        self.base.db()
    }

    /// Find a profile by email (used for login and duplicate checks)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Profile>> {
        let mut result = self
            .db()
            .query("SELECT * FROM profile WHERE email = $email LIMIT 1")
            .bind(("email", email.to_lowercase()))
            .await?;

        let profile: Option<Profile> = result.take(0)?;
        Ok(profile)
    }

    /// Find a profile by its record ID string ("profile:xxx")
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Profile>> {
        let record_id = parse_record_id(id)?;
        let profile: Option<Profile> = self.db().select(record_id).await?;
        Ok(profile)
    }

    /// Create a new profile. The email must not already be registered.
    pub async fn create(&self, data: ProfileCreate) -> RepoResult<Profile> {
        let email = data.email.to_lowercase();

        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email already registered: {}",
                email
            )));
        }

        let hash_pass = Profile::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {}", e)))?;

        let mut result = self
            .db()
            .query(
                "CREATE profile SET
                    username = $username,
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    created_at = $created_at
                RETURN AFTER",
            )
            .bind(("username", data.username))
            .bind(("email", email))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("created_at", now_ms()))
            .await?;

        let profile: Option<Profile> = result.take(0)?;
        profile.ok_or_else(|| RepoError::Database("Failed to create profile".to_string()))
    }
}
