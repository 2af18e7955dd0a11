use uuid::Uuid;

use crate::database::models::Journal;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::types::Operation;

/// The caller must be the journal's recorded creator.
pub fn authorize(caller: &AuthUser, journal: &Journal, operation: Operation, resource_id: Uuid) -> Result<(), ApiError> {
    if journal.is_created_by(caller.user_id) {
        return Ok(());
    }

    tracing::error!(
        "User {} not authorized to {} resource {}",
        caller.user_id,
        operation,
        resource_id
    );
    Err(ApiError::unauthorized(format!(
        "You are not authorized to {} resource {}",
        operation, resource_id
    )))
}
