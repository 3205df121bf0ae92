//! Menu item repository
//!
//! 菜单项的持久化操作。Payloads are normalized (trimmed, empties dropped)
//! before they reach this layer; see `MenuItemPayload::normalized`.

use shared::client::MenuItemPayload;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::db::models::MenuItem;

use super::{now_ms, parse_record_id, BaseRepository, RepoError, RepoResult};

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &Surreal<Db> {
        self.base.db()
    }

    /// All menu items, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let mut result = self
            .db()
            .query("SELECT * FROM menu_item ORDER BY created_at DESC")
            .await?;

        let items: Vec<MenuItem> = result.take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let record_id = parse_record_id(id)?;
        let item: Option<MenuItem> = self.db().select(record_id).await?;
        Ok(item)
    }

    /// Require an item to exist
    pub async fn get(&self, id: &str) -> RepoResult<MenuItem> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item not found: {}", id)))
    }

    /// Create a new menu item. Rating starts at zero until feedback arrives.
    pub async fn create(&self, payload: MenuItemPayload) -> RepoResult<MenuItem> {
        let now = now_ms();

        let mut result = self
            .db()
            .query(
                "CREATE menu_item SET
                    title = $title,
                    description = $description,
                    detailed_description = $detailed_description,
                    image_url = $image_url,
                    meal_type = $meal_type,
                    tags = $tags,
                    serving_time = $serving_time,
                    ingredients = $ingredients,
                    rating = 0.0,
                    nutritional_info = $nutritional_info,
                    created_at = $created_at,
                    updated_at = $updated_at
                RETURN AFTER",
            )
            .bind(("title", payload.title))
            .bind(("description", payload.description))
            .bind(("detailed_description", payload.detailed_description))
            .bind(("image_url", payload.image_url))
            .bind(("meal_type", payload.meal_type))
            .bind(("tags", payload.tags))
            .bind(("serving_time", payload.serving_time))
            .bind(("ingredients", payload.ingredients))
            .bind(("nutritional_info", payload.nutritional_info))
            .bind(("created_at", now))
            .bind(("updated_at", now))
            .await?;

        let item: Option<MenuItem> = result.take(0)?;
        item.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Replace the editable fields of an existing item.
    ///
    /// Rating and created_at are never touched here; rating only moves
    /// through feedback aggregation.
    pub async fn update(&self, id: &str, payload: MenuItemPayload) -> RepoResult<MenuItem> {
        let record_id = parse_record_id(id)?;

        let mut result = self
            .db()
            .query(
                "UPDATE $item SET
                    title = $title,
                    description = $description,
                    detailed_description = $detailed_description,
                    image_url = $image_url,
                    meal_type = $meal_type,
                    tags = $tags,
                    serving_time = $serving_time,
                    ingredients = $ingredients,
                    nutritional_info = $nutritional_info,
                    updated_at = $updated_at
                RETURN AFTER",
            )
            .bind(("item", record_id))
            .bind(("title", payload.title))
            .bind(("description", payload.description))
            .bind(("detailed_description", payload.detailed_description))
            .bind(("image_url", payload.image_url))
            .bind(("meal_type", payload.meal_type))
            .bind(("tags", payload.tags))
            .bind(("serving_time", payload.serving_time))
            .bind(("ingredients", payload.ingredients))
            .bind(("nutritional_info", payload.nutritional_info))
            .bind(("updated_at", now_ms()))
            .await?;

        let item: Option<MenuItem> = result.take(0)?;
        item.ok_or_else(|| RepoError::NotFound(format!("Menu item not found: {}", id)))
    }

    /// Update only the cached average rating
    pub async fn set_rating(&self, id: &str, rating: f64) -> RepoResult<()> {
        let record_id = parse_record_id(id)?;

        self.db()
            .query("UPDATE $item SET rating = $rating, updated_at = $updated_at")
            .bind(("item", record_id))
            .bind(("rating", rating))
            .bind(("updated_at", now_ms()))
            .await?;

        Ok(())
    }

    /// Delete an item, returning the removed row
    pub async fn delete(&self, id: &str) -> RepoResult<MenuItem> {
        let record_id = parse_record_id(id)?;
        let item: Option<MenuItem> = self.db().delete(record_id).await?;
        item.ok_or_else(|| RepoError::NotFound(format!("Menu item not found: {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::MealType;

    async fn memory_db() -> Surreal<Db> {
        let db = Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        db
    }

    fn sample_payload(title: &str) -> MenuItemPayload {
        MenuItemPayload {
            title: title.to_string(),
            description: "Crispy rice crepe".to_string(),
            detailed_description: None,
            image_url: None,
            meal_type: MealType::Breakfast,
            tags: vec!["vegetarian".to_string(), "south-indian".to_string()],
            serving_time: "7:30 AM - 9:30 AM".to_string(),
            ingredients: vec!["rice".to_string(), "lentils".to_string()],
            nutritional_info: None,
        }
    }

    #[tokio::test]
    async fn create_starts_with_zero_rating() {
        let repo = MenuItemRepository::new(memory_db().await);
        let item = repo.create(sample_payload("Masala Dosa")).await.unwrap();

        assert_eq!(item.title, "Masala Dosa");
        assert_eq!(item.rating, 0.0);
        assert_eq!(item.meal_type, MealType::Breakfast);
        assert!(item.id.is_some());
    }

    #[tokio::test]
    async fn update_preserves_rating() {
        let repo = MenuItemRepository::new(memory_db().await);
        let item = repo.create(sample_payload("Idli")).await.unwrap();
        let id = item.id_string();

        repo.set_rating(&id, 4.5).await.unwrap();

        let mut payload = sample_payload("Idli Sambar");
        payload.serving_time = "8:00 AM - 10:00 AM".to_string();
        let updated = repo.update(&id, payload).await.unwrap();

        assert_eq!(updated.title, "Idli Sambar");
        assert_eq!(updated.rating, 4.5);
        assert_eq!(updated.created_at, item.created_at);
    }

    #[tokio::test]
    async fn delete_then_lookup_is_not_found() {
        let repo = MenuItemRepository::new(memory_db().await);
        let item = repo.create(sample_payload("Poha")).await.unwrap();
        let id = item.id_string();

        repo.delete(&id).await.unwrap();
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
        assert!(matches!(repo.get(&id).await, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_all_newest_first() {
        let repo = MenuItemRepository::new(memory_db().await);
        repo.create(sample_payload("First")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.create(sample_payload("Second")).await.unwrap();

        let items = repo.find_all().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Second");
    }
}
