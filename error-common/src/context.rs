use crate::types::{ClinicError, Result};

/// Attaches operation context to storage failures, turning them into
/// [`ClinicError::Storage`].
pub trait StorageContext<T> {
    /// # Errors
    ///
    /// Returns [`ClinicError::Storage`] wrapping the original error.
    fn storage_context(self, context: &str) -> Result<T>;
}

impl<T, E> StorageContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn storage_context(self, context: &str) -> Result<T> {
        self.map_err(|e| {
            tracing::error!(context = context, error = %e, "storage operation failed");
            ClinicError::storage(context, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_errors_with_context() {
        let res: std::result::Result<(), std::fmt::Error> = Err(std::fmt::Error);
        let err = res.storage_context("failed to list doctors").unwrap_err();
        assert!(matches!(err, ClinicError::Storage { ref context, .. } if context == "failed to list doctors"));
    }

    #[test]
    fn passes_values_through() {
        let res: std::result::Result<u8, std::fmt::Error> = Ok(7);
        assert_eq!(res.storage_context("unused").unwrap(), 7);
    }
}
