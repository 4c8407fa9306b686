//! Read-only lookups of user identities for authorization and attribution.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ActiveEnum, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use serde::Serialize;

use crate::entities::users::{self, UserRole, UserStatus};
use crate::error::{AppError, AppResult};

/// The parts of a user the workflow needs: who they are and what they may do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: i32,
    pub full_name: String,
    pub role: UserRole,
    pub status: UserStatus,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_role(&self, role: UserRole) -> AppResult<()> {
        if self.role != role {
            return Err(AppError::forbidden(format!(
                "This action requires the {} role",
                role.to_value()
            )));
        }
        Ok(())
    }

    pub fn require_verified(&self) -> AppResult<()> {
        if self.status != UserStatus::Verified {
            return Err(AppError::forbidden("Your account has not been verified yet"));
        }
        Ok(())
    }
}

impl From<users::Model> for Identity {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            role: user.role,
            status: user.status,
        }
    }
}

#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn lookup(&self, user_id: i32) -> AppResult<Option<Identity>>;

    /// Display names for the given ids. Unknown ids are absent from the map.
    async fn display_names(&self, user_ids: &[i32]) -> AppResult<HashMap<i32, String>>;
}

/// Directory backed by the `users` table.
#[derive(Clone)]
pub struct DbDirectory {
    db: DatabaseConnection,
}

impl DbDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityDirectory for DbDirectory {
    async fn lookup(&self, user_id: i32) -> AppResult<Option<Identity>> {
        let user = users::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(user.map(Identity::from))
    }

    async fn display_names(&self, user_ids: &[i32]) -> AppResult<HashMap<i32, String>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i32, String)> = users::Entity::find()
            .select_only()
            .column(users::Column::Id)
            .column(users::Column::FullName)
            .filter(users::Column::Id.is_in(user_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().collect())
    }
}

/// Resolves an attribution field to a user holding one of `roles`.
///
/// Unknown ids and wrong roles are input errors of the request that named them.
pub async fn resolve_with_role(
    directory: &dyn IdentityDirectory,
    user_id: i32,
    roles: &[UserRole],
    field: &str,
) -> AppResult<Identity> {
    let identity = directory
        .lookup(user_id)
        .await?
        .ok_or_else(|| AppError::validation(format!("{field}: user {user_id} does not exist")))?;

    if !roles.contains(&identity.role) {
        return Err(AppError::validation(format!(
            "{field}: user {user_id} is a {}, not a valid choice here",
            identity.role.to_value()
        )));
    }
    if identity.status == UserStatus::Suspended {
        return Err(AppError::validation(format!(
            "{field}: user {user_id} is suspended"
        )));
    }
    Ok(identity)
}

/// Collects the distinct non-null ids from attribution columns.
pub fn collect_ids<I>(ids: I) -> Vec<i32>
where
    I: IntoIterator<Item = Option<i32>>,
{
    let mut out: Vec<i32> = ids.into_iter().flatten().collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_ids_dedups_and_drops_nulls() {
        assert_eq!(collect_ids([Some(3), None, Some(1), Some(3)]), vec![1, 3]);
    }

    #[test]
    fn test_role_checks() {
        let dev = Identity {
            id: 7,
            full_name: "Ravi".into(),
            role: UserRole::Developer,
            status: UserStatus::Pending,
        };
        assert!(dev.require_role(UserRole::Developer).is_ok());
        assert!(matches!(
            dev.require_role(UserRole::Admin),
            Err(AppError::Forbidden(_))
        ));
        assert!(dev.require_verified().is_err());
        assert!(!dev.is_admin());
    }
}
