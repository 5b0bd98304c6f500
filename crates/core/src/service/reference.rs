//! Reference data helpers backing pickers and form validation.

use std::collections::BTreeSet;

use super::ResourceService;
use crate::error::CoreError;
use crate::filters::SortDirection;
use crate::planner::{self, ID_COLUMN};
use crate::query::{Condition, RecordQuery};
use crate::record::{FieldValue, Record};
use crate::resource::{
    ResourceDescriptor, ACCOUNTS, ACCOUNT_CATEGORIES, BRANCHES, EMPLOYEES, LOOKUPS, ROOMS,
    SERVICES,
};
use crate::shaping;
use crate::types::DbId;

const ACTIVE: &str = "A";

impl ResourceService {
    /// Branches with status `A`, ordered by name.
    pub async fn active_branches(&self) -> Result<Vec<Record>, CoreError> {
        let query = RecordQuery::new(BRANCHES.table, BRANCHES.fields)
            .filter(Condition::Eq {
                column: "status",
                value: FieldValue::from(ACTIVE),
            })
            .order_by("name", SortDirection::Asc)
            .order_by(ID_COLUMN, SortDirection::Asc);

        let rows = self.store.select(&query).await?;
        Ok(rows.into_iter().map(|row| row.record).collect())
    }

    /// Active accounts in list order, each with its `category_name`.
    pub async fn active_accounts(&self) -> Result<Vec<Record>, CoreError> {
        let query = planner::base_query(&ACCOUNTS)
            .filter(active("status"))
            .order_by("list_order", SortDirection::Asc)
            .order_by("account_name", SortDirection::Asc)
            .order_by(ID_COLUMN, SortDirection::Asc);

        self.shaped(&ACCOUNTS, &query).await
    }

    /// Every account category, by list order then name.
    pub async fn account_categories(&self) -> Result<Vec<Record>, CoreError> {
        let query = planner::base_query(&ACCOUNT_CATEGORIES)
            .order_by("list_order", SortDirection::Asc)
            .order_by("name", SortDirection::Asc)
            .order_by(ID_COLUMN, SortDirection::Asc);

        self.shaped(&ACCOUNT_CATEGORIES, &query).await
    }

    /// Active rooms by name, optionally limited to one branch.
    pub async fn active_rooms(&self, branch_id: Option<DbId>) -> Result<Vec<Record>, CoreError> {
        let query = in_branch(
            planner::base_query(&ROOMS).filter(active("status")),
            branch_id,
        )
        .order_by("room_name", SortDirection::Asc)
        .order_by(ID_COLUMN, SortDirection::Asc);

        self.shaped(&ROOMS, &query).await
    }

    /// Active employees by nick name, optionally limited to one branch.
    pub async fn instructors(&self, branch_id: Option<DbId>) -> Result<Vec<Record>, CoreError> {
        let query = in_branch(
            planner::base_query(&EMPLOYEES).filter(active("contact_status")),
            branch_id,
        )
        .order_by("nick_name", SortDirection::Asc)
        .order_by("last_name", SortDirection::Asc)
        .order_by(ID_COLUMN, SortDirection::Asc);

        self.shaped(&EMPLOYEES, &query).await
    }

    async fn shaped(
        &self,
        resource: &'static ResourceDescriptor,
        query: &RecordQuery,
    ) -> Result<Vec<Record>, CoreError> {
        let rows = self.store.select(query).await?;
        tracing::debug!(resource = resource.name, returned = rows.len(), "Loaded picker rows");
        Ok(rows
            .into_iter()
            .map(|row| shaping::shape(resource, row))
            .collect())
    }

    /// Distinct non-empty lookup categories in ascending order.
    pub async fn lookup_categories(&self) -> Result<Vec<String>, CoreError> {
        let query = RecordQuery::new(LOOKUPS.table, LOOKUPS.fields);
        let rows = self.store.select(&query).await?;

        let categories: BTreeSet<String> = rows
            .iter()
            .filter_map(|row| row.record.text("category"))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        Ok(categories.into_iter().collect())
    }

    /// Whether another service already uses `code`.
    ///
    /// `exclude_id` skips the service being edited.
    pub async fn service_code_exists(
        &self,
        code: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, CoreError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CoreError::invalid("service code must not be empty"));
        }

        let mut query = RecordQuery::new(SERVICES.table, SERVICES.fields).filter(Condition::Eq {
            column: "service_code",
            value: FieldValue::from(code),
        });
        if let Some(id) = exclude_id {
            query = query.filter(Condition::NotEq {
                column: ID_COLUMN,
                value: FieldValue::Integer(id),
            });
        }

        Ok(self.store.count(&query).await? > 0)
    }
}

fn active(column: &'static str) -> Condition {
    Condition::Eq {
        column,
        value: FieldValue::from(ACTIVE),
    }
}

fn in_branch(query: RecordQuery, branch_id: Option<DbId>) -> RecordQuery {
    match branch_id {
        Some(id) => query.filter(Condition::Eq {
            column: "branch_id",
            value: FieldValue::Integer(id),
        }),
        None => query,
    }
}
