use crate::{entities::audit_log, errors::ServiceError};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde::Serialize;

/// Writes one audit trail entry. Old and new state are serialized to
/// JSON; pass `None::<()>` for the side that does not apply.
pub(crate) async fn record<C, O, N>(
    conn: &C,
    user_id: Option<i32>,
    action: &str,
    table_name: &str,
    record_id: Option<i32>,
    old_values: Option<&O>,
    new_values: Option<&N>,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
    O: Serialize,
    N: Serialize,
{
    let old_values = old_values
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ServiceError::InternalError(e.to_string()))?;
    let new_values = new_values
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ServiceError::InternalError(e.to_string()))?;

    audit_log::ActiveModel {
        user_id: Set(user_id),
        action: Set(action.to_string()),
        table_name: Set(table_name.to_string()),
        record_id: Set(record_id),
        old_values: Set(old_values),
        new_values: Set(new_values),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(())
}
