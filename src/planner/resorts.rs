use std::str::FromStr;

use super::demo_resorts;
use crate::auth::{list_scope, Principal};
use crate::config::Config;
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{Difficulty, Resort, ResortFilter};

/// Difficulty selector of the resorts page. `ALL` disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    pub fn difficulty(self) -> Option<Difficulty> {
        match self {
            DifficultyFilter::All => None,
            DifficultyFilter::Only(difficulty) => Some(difficulty),
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(DifficultyFilter::All),
            other => other.parse().map(DifficultyFilter::Only),
        }
    }
}

/// List resorts in insertion order, seeding the demo catalogue when empty.
///
/// Seeding needs a signed-in caller, who then owns the demo records. Guests
/// just see the empty list.
pub async fn list_resorts(
    repo: &Repository,
    config: &Config,
    principal: &Principal,
    filter: ResortFilter,
    limit: Option<i64>,
) -> Result<Vec<Resort>, AppError> {
    let scope = list_scope::<Resort>(principal)?;
    let resorts = repo.list_resorts(&scope, &filter, limit).await?;
    if !resorts.is_empty() || !config.seed_demo_data {
        return Ok(resorts);
    }

    let Some(owner) = principal.username() else {
        return Ok(resorts);
    };

    // A concurrent listing may have seeded first, so re-query either way.
    let inserted = repo.seed_resorts_if_empty(owner, &demo_resorts()).await?;
    if inserted > 0 {
        tracing::info!(count = inserted, owner = %owner, "Seeded demo resorts");
    }

    repo.list_resorts(&scope, &filter, limit).await
}
