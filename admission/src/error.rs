use thiserror::Error;
use voteweb_store::StoreError;
use voteweb_types::InputError;

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("ledger operation {op} failed: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("deadline expired before the operation completed")]
    Timeout,
}

impl AdmissionError {
    pub(crate) fn storage(op: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Storage { op, source }
    }
}
