use sea_orm::DbErr;

/// Failure kinds of the recommendation pipeline.
///
/// The first three come from the caller's input, the next three from a dependency,
/// and the last two from lookups and the write gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SongError {
    #[error("malformed link: {0}")]
    MalformedLink(String),
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("track id not found in link: {0}")]
    TrackIdNotFound(String),
    #[error("failed to acquire provider token: {0}")]
    TokenAcquisitionFailed(String),
    #[error("failed to fetch track metadata: {0}")]
    MetadataFetchFailed(String),
    #[error("storage error: {0}")]
    StorageError(String),
    #[error("not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
}

impl SongError {
    /// True for errors caused by the submitted link rather than a dependency.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SongError::MalformedLink(_)
                | SongError::UnsupportedProvider(_)
                | SongError::TrackIdNotFound(_)
        )
    }
}

impl From<DbErr> for SongError {
    fn from(err: DbErr) -> Self {
        SongError::StorageError(err.to_string())
    }
}

pub type SongResult<T> = Result<T, SongError>;
