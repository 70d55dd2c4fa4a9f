use crate::application::repos::LookupError;

pub fn map_sqlx_error(err: sqlx::Error) -> LookupError {
    match err {
        sqlx::Error::PoolTimedOut => LookupError::Timeout,
        sqlx::Error::Database(db)
            if db
                .message()
                .contains("canceling statement due to statement timeout")
                || db
                    .message()
                    .contains("canceling statement due to user request") =>
        {
            LookupError::Timeout
        }
        other => LookupError::from_persistence(other),
    }
}
