//! Feedback repository
//!
//! 评分反馈的持久化操作。At most one feedback row exists per
//! (menu_item, user) pair: submissions look up the existing row first
//! and update it in place instead of inserting a second one.

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use crate::db::models::Feedback;

use super::{now_ms, parse_record_id, BaseRepository, RepoError, RepoResult};

#[derive(Clone)]
pub struct FeedbackRepository {
    base: BaseRepository,
}

impl FeedbackRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &Surreal<Db> {
        self.base.db()
    }

    /// The one feedback row a user has for an item, if any
    pub async fn find_by_item_and_user(
        &self,
        menu_item_id: &str,
        user_id: &str,
    ) -> RepoResult<Option<Feedback>> {
        let menu_item = parse_record_id(menu_item_id)?;
        let user = parse_record_id(user_id)?;

        let mut result = self
            .db()
            .query("SELECT * FROM feedback WHERE menu_item = $menu_item AND user = $user LIMIT 1")
            .bind(("menu_item", menu_item))
            .bind(("user", user))
            .await?;

        let feedback: Option<Feedback> = result.take(0)?;
        Ok(feedback)
    }

    /// All feedback rows for an item (used to recompute its average rating)
    pub async fn find_for_item(&self, menu_item_id: &str) -> RepoResult<Vec<Feedback>> {
        let menu_item = parse_record_id(menu_item_id)?;

        let mut result = self
            .db()
            .query("SELECT * FROM feedback WHERE menu_item = $menu_item")
            .bind(("menu_item", menu_item))
            .await?;

        let rows: Vec<Feedback> = result.take(0)?;
        Ok(rows)
    }

    /// Insert or update the user's feedback for an item.
    ///
    /// Ratings outside 1..=5 are rejected here as a last line of defense;
    /// handlers validate the payload before any lookup happens.
    pub async fn upsert(
        &self,
        menu_item_id: &str,
        user_id: &str,
        rating: u8,
        comment: Option<String>,
    ) -> RepoResult<Feedback> {
        if !(1..=5).contains(&rating) {
            return Err(RepoError::Validation(format!(
                "Rating out of range: {}",
                rating
            )));
        }

        let existing = self.find_by_item_and_user(menu_item_id, user_id).await?;

        match existing {
            Some(row) => {
                let record_id = row
                    .id
                    .clone()
                    .ok_or_else(|| RepoError::Database("Feedback row missing ID".to_string()))?;
                self.update_row(record_id, rating, comment).await
            }
            None => {
                let menu_item = parse_record_id(menu_item_id)?;
                let user = parse_record_id(user_id)?;
                self.create_row(menu_item, user, rating, comment).await
            }
        }
    }

    async fn create_row(
        &self,
        menu_item: RecordId,
        user: RecordId,
        rating: u8,
        comment: Option<String>,
    ) -> RepoResult<Feedback> {
        let now = now_ms();

        let mut result = self
            .db()
            .query(
                "CREATE feedback SET
                    menu_item = $menu_item,
                    user = $user,
                    rating = $rating,
                    comment = $comment,
                    created_at = $created_at,
                    updated_at = $updated_at
                RETURN AFTER",
            )
            .bind(("menu_item", menu_item))
            .bind(("user", user))
            .bind(("rating", rating))
            .bind(("comment", comment))
            .bind(("created_at", now))
            .bind(("updated_at", now))
            .await?;

        let feedback: Option<Feedback> = result.take(0)?;
        feedback.ok_or_else(|| RepoError::Database("Failed to create feedback".to_string()))
    }

    async fn update_row(
        &self,
        record_id: RecordId,
        rating: u8,
        comment: Option<String>,
    ) -> RepoResult<Feedback> {
        let mut result = self
            .db()
            .query(
                "UPDATE $row SET
                    rating = $rating,
                    comment = $comment,
                    updated_at = $updated_at
                RETURN AFTER",
            )
            .bind(("row", record_id))
            .bind(("rating", rating))
            .bind(("comment", comment))
            .bind(("updated_at", now_ms()))
            .await?;

        let feedback: Option<Feedback> = result.take(0)?;
        feedback.ok_or_else(|| RepoError::Database("Failed to update feedback".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ProfileCreate;
    use crate::db::repository::{MenuItemRepository, ProfileRepository};
    use shared::client::MenuItemPayload;
    use shared::{MealType, Role};

    async fn memory_db() -> Surreal<Db> {
        let db = Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        db
    }

    async fn seed(db: &Surreal<Db>) -> (String, String) {
        let profile = ProfileRepository::new(db.clone())
            .create(ProfileCreate {
                username: "user2".to_string(),
                email: "regular@mess.test".to_string(),
                password: "Abcdef12".to_string(),
                role: Role::Regular,
            })
            .await
            .unwrap();

        let item = MenuItemRepository::new(db.clone())
            .create(MenuItemPayload {
                title: "Masala Dosa".to_string(),
                description: "Crispy rice crepe".to_string(),
                detailed_description: None,
                image_url: None,
                meal_type: MealType::Breakfast,
                tags: vec![],
                serving_time: "7:30 AM - 9:30 AM".to_string(),
                ingredients: vec![],
                nutritional_info: None,
            })
            .await
            .unwrap();

        (item.id_string(), profile.id_string())
    }

    #[tokio::test]
    async fn upsert_keeps_one_row_per_user_and_item() {
        let db = memory_db().await;
        let (item_id, user_id) = seed(&db).await;
        let repo = FeedbackRepository::new(db);

        let first = repo
            .upsert(&item_id, &user_id, 3, Some("Decent".to_string()))
            .await
            .unwrap();
        assert_eq!(first.rating, 3);

        let second = repo.upsert(&item_id, &user_id, 5, None).await.unwrap();
        assert_eq!(second.rating, 5);
        assert_eq!(second.id, first.id);
        assert!(second.comment.is_none());

        let rows = repo.find_for_item(&item_id).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn rating_out_of_range_rejected() {
        let db = memory_db().await;
        let (item_id, user_id) = seed(&db).await;
        let repo = FeedbackRepository::new(db);

        assert!(matches!(
            repo.upsert(&item_id, &user_id, 0, None).await,
            Err(RepoError::Validation(_))
        ));
        assert!(matches!(
            repo.upsert(&item_id, &user_id, 6, None).await,
            Err(RepoError::Validation(_))
        ));
    }
}
