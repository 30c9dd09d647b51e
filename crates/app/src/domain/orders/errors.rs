//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use truekicks::checkout::CheckoutError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error(transparent)]
    Invalid(#[from] CheckoutError),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_storage_errors() {
        assert!(matches!(
            OrdersServiceError::from(Error::PoolTimedOut),
            OrdersServiceError::Sql(_)
        ));
    }

    #[test]
    fn checkout_errors_are_passed_through() {
        let error = OrdersServiceError::from(CheckoutError::EmptyCart);

        assert_eq!(error.to_string(), "cart is empty");
    }
}
