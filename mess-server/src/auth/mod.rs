//! 认证模块
//!
//! JWT 会话令牌、认证/授权中间件。

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{AUTH_COOKIE, require_auth, require_staff, session_from_headers};
