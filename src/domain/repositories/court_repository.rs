// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::court::{Court, CourtSeed};
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;

/// 法院仓库特质
#[async_trait]
pub trait CourtRepository: Send + Sync {
    /// 按代码查找法院，不存在时用种子信息创建
    async fn find_or_create(&self, seed: &CourtSeed) -> Result<Court, RepositoryError>;
}
