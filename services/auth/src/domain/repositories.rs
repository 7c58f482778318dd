//! 仓储接口

use async_trait::async_trait;
use zipper_errors::AppResult;
use zipper_otp::Identifier;

use super::User;

/// 用户仓储
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 根据归一化标识查找
    async fn find_by_identifier(&self, identifier: &Identifier) -> AppResult<Option<User>>;

    /// 检查标识是否已注册
    async fn exists(&self, identifier: &Identifier) -> AppResult<bool>;

    /// 新建用户，标识已存在时返回 `Conflict`
    async fn save(&self, user: &User) -> AppResult<()>;

    /// 更新用户，不存在时返回 `NotFound`
    async fn update(&self, user: &User) -> AppResult<()>;
}
