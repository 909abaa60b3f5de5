//! Request field collection
//!
//! The lookup and config pages accept their fields from the query string, a
//! urlencoded body, or both. Body fields come first, so they win over the
//! query string for single-valued fields.

use actix_web::{
    error::UrlencodedError,
    web::{self, Form, Query},
    Error, HttpRequest,
};
use oldvrs_core::AppError;
use tracing::warn;

/// Decoded `(name, value)` pairs, in submission order
pub type Fields = Vec<(String, String)>;

/// Body fields followed by query-string fields
///
/// A request without a urlencoded body contributes only its query string.
/// A urlencoded body that cannot be read is a client error.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` when the body is oversized or malformed.
pub fn merge_fields(
    query: Query<Fields>,
    body: Result<Form<Fields>, Error>,
) -> Result<Fields, AppError> {
    let mut fields = match body {
        Ok(form) => form.into_inner(),
        Err(err)
            if matches!(
                err.as_error::<UrlencodedError>(),
                Some(UrlencodedError::ContentType)
            ) =>
        {
            Vec::new()
        }
        Err(err) => {
            warn!("Rejecting unreadable form body: {}", err);
            return Err(AppError::InvalidInput(format!(
                "Unreadable form body: {}",
                err
            )));
        }
    };

    fields.extend(query.into_inner());
    Ok(fields)
}

/// Query extractor config reporting decode failures as `invalid_input`
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        warn!("Rejecting query string: {}", err);
        AppError::InvalidInput(format!("Invalid query string: {}", err)).into()
    })
}
