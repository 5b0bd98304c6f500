//! Cash register helpers: reconciliation status and working balance.

use serde::{Deserialize, Serialize};

use super::ResourceService;
use crate::error::CoreError;
use crate::filters::FilterValue;
use crate::planner;
use crate::query::{Condition, RecordQuery};
use crate::record::{FieldKind, FieldValue, Record};
use crate::resource::REGISTERS;
use crate::store::RecordStore;
use crate::types::DbId;

const STATUS_COLUMN: &str = "transaction_status";
const AMOUNT_COLUMN: &str = "amount";

/// Reconciliation state of a register entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[serde(rename = "U")]
    Uncleared,
    #[serde(rename = "C")]
    Cleared,
    #[serde(rename = "R")]
    Reconciled,
}

impl TransactionStatus {
    pub fn code(self) -> &'static str {
        match self {
            TransactionStatus::Uncleared => "U",
            TransactionStatus::Cleared => "C",
            TransactionStatus::Reconciled => "R",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim() {
            "U" => Ok(TransactionStatus::Uncleared),
            "C" => Ok(TransactionStatus::Cleared),
            "R" => Ok(TransactionStatus::Reconciled),
            other => Err(CoreError::invalid(format!(
                "transaction status must be one of U, C, R, got '{other}'"
            ))),
        }
    }
}

/// Cleared and uncleared totals of an account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkingBalance {
    pub cleared: f64,
    pub uncleared: f64,
    pub working_balance: f64,
}

impl ResourceService {
    /// Set the status of every listed register entry, leaving reconciled
    /// entries untouched.
    pub async fn update_transaction_status(
        &self,
        ids: &[DbId],
        status: TransactionStatus,
    ) -> Result<bool, CoreError> {
        if ids.is_empty() {
            return Ok(true);
        }

        let mut conditions = planner::ids_conditions(&REGISTERS, ids);
        conditions.push(Condition::NotEq {
            column: STATUS_COLUMN,
            value: FieldValue::from(TransactionStatus::Reconciled.code()),
        });
        let values = Record::new().with(STATUS_COLUMN, status.code());

        let updated = self
            .store
            .update(REGISTERS.table, REGISTERS.fields, &conditions, &values)
            .await?;

        tracing::info!(
            requested = ids.len(),
            updated = updated.len(),
            status = status.code(),
            "Register transaction status updated",
        );

        Ok(true)
    }

    /// Cleared (`C`, `R`) and uncleared (`U`) totals for `account_id`.
    ///
    /// `All` sums every account; the authorized branch list restricts the
    /// entries considered when non-empty.
    pub async fn working_balance(
        &self,
        account_id: &FilterValue,
        authorized_branch_ids: Option<&[DbId]>,
    ) -> Result<WorkingBalance, CoreError> {
        let mut base = RecordQuery::new(REGISTERS.table, REGISTERS.fields);

        if let FilterValue::Value(value) = account_id {
            let value = FieldKind::Integer
                .coerce(value.clone())
                .map_err(|msg| CoreError::invalid(format!("invalid value for account_id: {msg}")))?;
            base = base.filter(Condition::Eq {
                column: "account_id",
                value,
            });
        }
        if let Some(scope) =
            planner::branch_condition(&REGISTERS, &FilterValue::All, authorized_branch_ids)?
        {
            base = base.filter(scope);
        }

        let cleared_query = base.clone().filter(Condition::In {
            column: STATUS_COLUMN,
            values: vec![
                FieldValue::from(TransactionStatus::Cleared.code()),
                FieldValue::from(TransactionStatus::Reconciled.code()),
            ],
        });
        let uncleared_query = base.filter(Condition::Eq {
            column: STATUS_COLUMN,
            value: FieldValue::from(TransactionStatus::Uncleared.code()),
        });

        let (cleared, uncleared) = tokio::try_join!(
            sum_amounts(self.store.as_ref(), &cleared_query),
            sum_amounts(self.store.as_ref(), &uncleared_query),
        )?;

        tracing::debug!(account_id = ?account_id, cleared, uncleared, "Computed working balance");

        Ok(WorkingBalance {
            cleared,
            uncleared,
            working_balance: cleared + uncleared,
        })
    }
}

async fn sum_amounts(store: &dyn RecordStore, query: &RecordQuery) -> Result<f64, CoreError> {
    let rows = store.select(query).await?;
    Ok(rows
        .iter()
        .filter_map(|row| row.record.decimal(AMOUNT_COLUMN))
        .sum())
}
