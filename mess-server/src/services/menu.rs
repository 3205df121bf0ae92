//! Menu Service
//!
//! 菜单领域服务：列表缓存、筛选排序、反馈评分聚合。
//!
//! The list cache carries a generation counter. Every refresh claims a
//! new generation before touching the database; a refresh result is only
//! installed if no newer refresh was claimed in the meantime, so a slow
//! fetch can never overwrite fresher data.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared::client::{FeedbackView, MenuItemPayload, MenuItemView};
use shared::MealType;

use crate::db::repository::{FeedbackRepository, MenuItemRepository, RepoError, RepoResult};
use crate::services::ImageStoreService;
use crate::utils::validation::{
    validate_optional_text, validate_required_text, MAX_LONG_TEXT_LEN, MAX_NAME_LEN,
    MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
};
use crate::utils::{AppError, AppResult};

// ── Filtering and sorting ───────────────────────────────────────────

/// Sort orders for the menu list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuSort {
    /// Highest rated first
    #[default]
    RatingDesc,
    /// Title A to Z
    TitleAsc,
    /// Title Z to A
    TitleDesc,
}

impl FromStr for MenuSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rating" => Ok(MenuSort::RatingDesc),
            "title-asc" => Ok(MenuSort::TitleAsc),
            "title-desc" => Ok(MenuSort::TitleDesc),
            other => Err(AppError::invalid(format!("Unknown sort order: {other}"))),
        }
    }
}

/// Filter criteria for the menu list. All criteria are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub meal_type: Option<MealType>,
    /// Case-insensitive substring over title, description and tags
    pub search: Option<String>,
    /// Item must carry every listed tag
    pub tags: Vec<String>,
}

impl MenuFilter {
    fn matches(&self, item: &MenuItemView) -> bool {
        if let Some(meal_type) = self.meal_type
            && item.meal_type != meal_type
        {
            return false;
        }

        if !self.tags.is_empty() && !self.tags.iter().all(|t| item.tags.contains(t)) {
            return false;
        }

        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !term.is_empty() {
                let in_title = item.title.to_lowercase().contains(&term);
                let in_description = item.description.to_lowercase().contains(&term);
                let in_tags = item.tags.iter().any(|t| t.to_lowercase().contains(&term));
                if !(in_title || in_description || in_tags) {
                    return false;
                }
            }
        }

        true
    }
}

/// Apply a filter to a snapshot of the menu
pub fn apply_filter(items: &[MenuItemView], filter: &MenuFilter) -> Vec<MenuItemView> {
    items.iter().filter(|i| filter.matches(i)).cloned().collect()
}

/// Sort in place. Stable, so equal keys keep their snapshot order.
pub fn sort_items(items: &mut [MenuItemView], sort: MenuSort) {
    match sort {
        MenuSort::RatingDesc => {
            items.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal))
        }
        MenuSort::TitleAsc => items.sort_by(|a, b| a.title.cmp(&b.title)),
        MenuSort::TitleDesc => items.sort_by(|a, b| b.title.cmp(&a.title)),
    }
}

// ── Retry helper ────────────────────────────────────────────────────

/// Run a fallible async operation up to `attempts` times, waiting
/// `delay` between tries. Returns the last error if all attempts fail.
pub async fn with_retry<T, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> RepoResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = RepoResult<T>>,
{
    let attempts = attempts.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!(attempt, max = attempts, error = %err, "Menu fetch attempt failed");
                last_err = Some(err);
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(last_err.unwrap_or_else(|| RepoError::Database("Retry loop ran zero attempts".to_string())))
}

// ── Generation-counted cache ────────────────────────────────────────

#[derive(Debug, Default)]
struct CacheInner {
    /// Highest generation handed out so far
    claimed: u64,
    /// Generation of the currently installed snapshot
    installed: u64,
    items: Option<Vec<MenuItemView>>,
}

/// Snapshot cache for the menu list with stale-write protection
#[derive(Debug, Default)]
pub struct MenuCache {
    inner: Mutex<CacheInner>,
}

impl MenuCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a generation token for a refresh that is about to start
    pub fn claim(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.claimed += 1;
        inner.claimed
    }

    /// Install a snapshot. Returns false (and discards the data) when a
    /// newer snapshot has already been installed.
    pub fn install(&self, generation: u64, items: Vec<MenuItemView>) -> bool {
        let mut inner = self.inner.lock();
        if generation < inner.installed {
            tracing::debug!(generation, installed = inner.installed, "Discarding stale menu snapshot");
            return false;
        }
        inner.installed = generation;
        inner.items = Some(items);
        true
    }

    pub fn snapshot(&self) -> Option<Vec<MenuItemView>> {
        self.inner.lock().items.clone()
    }

    /// Drop the cached snapshot so the next list call refetches
    pub fn invalidate(&self) {
        self.inner.lock().items = None;
    }
}

// ── Service ─────────────────────────────────────────────────────────

/// Menu service — owns the item/feedback repositories and the list cache
#[derive(Clone)]
pub struct MenuService {
    items: MenuItemRepository,
    feedback: FeedbackRepository,
    cache: Arc<MenuCache>,
    fetch_attempts: u32,
    fetch_retry_delay: Duration,
}

impl MenuService {
    pub fn new(
        items: MenuItemRepository,
        feedback: FeedbackRepository,
        fetch_attempts: u32,
        fetch_retry_delay: Duration,
    ) -> Self {
        Self {
            items,
            feedback,
            cache: Arc::new(MenuCache::new()),
            fetch_attempts,
            fetch_retry_delay,
        }
    }

    /// List menu items matching the filter, in the given sort order.
    ///
    /// Serves from the cached snapshot when one exists; otherwise
    /// refreshes from the database first.
    pub async fn list(&self, filter: &MenuFilter, sort: MenuSort) -> AppResult<Vec<MenuItemView>> {
        let snapshot = match self.cache.snapshot() {
            Some(items) => items,
            None => self.refresh().await?,
        };

        let mut items = apply_filter(&snapshot, filter);
        sort_items(&mut items, sort);
        Ok(items)
    }

    /// Refetch the full list from the database and install it in the cache
    pub async fn refresh(&self) -> AppResult<Vec<MenuItemView>> {
        let generation = self.cache.claim();

        let rows = with_retry(self.fetch_attempts, self.fetch_retry_delay, || {
            let repo = self.items.clone();
            async move { repo.find_all().await }
        })
        .await?;

        let views: Vec<MenuItemView> = rows.iter().map(|r| r.to_view()).collect();
        self.cache.install(generation, views.clone());
        Ok(views)
    }

    pub async fn get(&self, id: &str) -> AppResult<MenuItemView> {
        let item = self.items.get(id).await?;
        Ok(item.to_view())
    }

    pub async fn create(&self, payload: MenuItemPayload) -> AppResult<MenuItemView> {
        let payload = self.checked(payload)?;
        let item = self.items.create(payload).await?;
        self.cache.invalidate();
        Ok(item.to_view())
    }

    pub async fn update(&self, id: &str, payload: MenuItemPayload) -> AppResult<MenuItemView> {
        let payload = self.checked(payload)?;
        let item = self.items.update(id, payload).await?;
        self.cache.invalidate();
        Ok(item.to_view())
    }

    /// Delete an item. Its image file is removed best-effort afterwards;
    /// a failure there only logs, the row is already gone.
    pub async fn delete(&self, id: &str, image_store: &ImageStoreService) -> AppResult<MenuItemView> {
        let item = self.items.delete(id).await?;
        self.cache.invalidate();

        if let Some(url) = &item.image_url {
            image_store.remove_by_url(url).await;
        }

        Ok(item.to_view())
    }

    /// The user's existing feedback for an item, if any
    pub async fn feedback_for(
        &self,
        menu_item_id: &str,
        user_id: &str,
    ) -> AppResult<Option<FeedbackView>> {
        let row = self.feedback.find_by_item_and_user(menu_item_id, user_id).await?;
        Ok(row.map(|r| r.to_view()))
    }

    /// Store or replace a user's rating for an item, then recompute the
    /// item's cached average from all its feedback rows.
    pub async fn submit_feedback(
        &self,
        menu_item_id: &str,
        user_id: &str,
        rating: u8,
        comment: Option<String>,
    ) -> AppResult<FeedbackView> {
        // Item must exist (and 404 beats a dangling record link)
        self.items.get(menu_item_id).await?;

        let row = self
            .feedback
            .upsert(menu_item_id, user_id, rating, comment)
            .await?;

        let all = self.feedback.find_for_item(menu_item_id).await?;
        if !all.is_empty() {
            let avg = all.iter().map(|f| f.rating as f64).sum::<f64>() / all.len() as f64;
            self.items.set_rating(menu_item_id, avg).await?;
            self.cache.invalidate();
        }

        Ok(row.to_view())
    }

    fn checked(&self, payload: MenuItemPayload) -> AppResult<MenuItemPayload> {
        let payload = payload.normalized();

        validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
        validate_required_text(&payload.description, "description", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&payload.serving_time, "servingTime", MAX_NAME_LEN)?;
        validate_optional_text(
            &payload.detailed_description,
            "detailedDescription",
            MAX_LONG_TEXT_LEN,
        )?;
        validate_optional_text(&payload.image_url, "imageUrl", MAX_URL_LEN)?;

        Ok(payload)
    }
}
