//! Mess Server - 校园食堂菜单与反馈服务
//!
//! # 架构概述
//!
//! 本模块是 Mess Server 的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系，staff/regular 两种角色
//! - **领域服务** (`services`): 菜单列表缓存、筛选排序、评分聚合、图片存储
//! - **HTTP API** (`api`): RESTful API 接口
//! - **页面路由** (`pages`): SPA 壳与访问守卫（登录/角色重定向）
//!
//! # 模块结构
//!
//! ```text
//! mess-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色授权
//! ├── services/      # 菜单服务、图片存储
//! ├── api/           # HTTP 路由和处理器
//! ├── pages/         # 页面路由与守卫
//! ├── utils/         # 错误、日志、校验
//! └── db/            # 数据库层（模型 + 仓库）
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod pages;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv, 日志)
///
/// 必须在 [`Config::from_env`] 之前调用，保证 .env 里的变量生效。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  __________
  / /|_/ / _ \/ ___/ ___/
 / /  / /  __(__  |__  )
/_/  /_/\___/____/____/
    "#
    );
}
