#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
}
impl Error {
	/// True when the error is a unique violation on the named constraint or index.
	pub fn is_unique_violation(&self, constraint: &str) -> bool {
		let Self::Sqlx(sqlx::Error::Database(db_err)) = self else {
			return false;
		};

		db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
	}
}
