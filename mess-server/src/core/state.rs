use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::repository::{FeedbackRepository, MenuItemRepository, ProfileRepository};
use crate::db::DbService;
use crate::services::{ImageStoreService, MenuService};

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是服务的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | profiles | ProfileRepository | 用户档案仓库 |
/// | menu | MenuService | 菜单领域服务 |
/// | image_store | ImageStoreService | 图片存储服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 用户档案仓库
    pub profiles: ProfileRepository,
    /// 菜单领域服务
    pub menu: MenuService,
    /// 图片存储服务
    pub image_store: ImageStoreService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database)
    /// 3. 各服务 (JWT, 仓库, 菜单, 图片存储)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("mess.db");
        let db_service = DbService::new(&db_path)
            .await
            .expect("Failed to initialize database");

        Self::from_db(config.clone(), db_service.db)
    }

    /// 初始化基于内存数据库的状态 (测试用)
    pub async fn initialize_in_memory(config: Config) -> Self {
        let db_service = DbService::memory()
            .await
            .expect("Failed to initialize in-memory database");
        Self::from_db(config, db_service.db)
    }

    fn from_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let profiles = ProfileRepository::new(db.clone());
        let menu = MenuService::new(
            MenuItemRepository::new(db.clone()),
            FeedbackRepository::new(db.clone()),
            config.menu_fetch_attempts,
            Duration::from_millis(config.menu_fetch_retry_delay_ms),
        );
        let image_store = ImageStoreService::new(config.images_dir());

        Self {
            config,
            db,
            jwt_service,
            profiles,
            menu,
            image_store,
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
