use anyhow::Result;
use chrono::NaiveDate;

use crate::api::dto::system_dto::PaginatedLogResponse;
use crate::core::persistence::logs::log_repository::LogRepository;
use crate::domain::common::model::Actor;
use crate::errors::{bad_request, not_found};

const DEFAULT_LIMIT: usize = 200;
const MAX_LIMIT: usize = 1000;

/// Admin view over the daily log files.
pub struct LogService<R: LogRepository> {
    repo: R,
}

impl<R: LogRepository> LogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn get_system_log_file_list(&self, actor: Actor) -> Result<Vec<String>> {
        actor.require_admin()?;
        self.repo.get_logs()
    }

    pub async fn get_system_log_lines(
        &self,
        actor: Actor,
        date: &str,
        cursor: Option<usize>,
        limit: Option<usize>,
    ) -> Result<PaginatedLogResponse> {
        actor.require_admin()?;
        if date.len() != 10 || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(bad_request(format!("invalid log date '{date}', expected YYYY-MM-DD")));
        }

        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let page = self
            .repo
            .get_log_lines(date, cursor.unwrap_or(0), limit)?
            .ok_or_else(|| not_found("log file", date))?;

        Ok(PaginatedLogResponse {
            date: date.to_string(),
            lines: page.lines,
            next_cursor: page.next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::logs::log_repository::LogRepositoryImpl;
    use crate::core::persistence::user::user_entity::Role;
    use crate::errors::AppError;
    use crate::logging::LOG_FILE_PREFIX;
    use axum::http::StatusCode;

    fn admin() -> Actor {
        Actor::new("admin", Role::Admin)
    }

    #[tokio::test]
    async fn pages_through_a_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let body: String = (0..5).map(|i| format!("line {i}\n")).collect();
        std::fs::write(dir.path().join(format!("{LOG_FILE_PREFIX}.2025-01-02")), body).unwrap();
        let service = LogService::new(LogRepositoryImpl::new(dir.path()));

        assert_eq!(service.get_system_log_file_list(admin()).await.unwrap(), ["2025-01-02"]);

        let first = service
            .get_system_log_lines(admin(), "2025-01-02", None, Some(3))
            .await
            .unwrap();
        assert_eq!(first.lines.len(), 3);
        assert_eq!(first.next_cursor, Some(3));

        let rest = service
            .get_system_log_lines(admin(), "2025-01-02", first.next_cursor, Some(3))
            .await
            .unwrap();
        assert_eq!(rest.lines, ["line 3", "line 4"]);
        assert_eq!(rest.next_cursor, None);
    }

    #[tokio::test]
    async fn bad_dates_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let service = LogService::new(LogRepositoryImpl::new(dir.path()));

        let err = service
            .get_system_log_lines(admin(), "yesterday", None, None)
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);

        let err = service
            .get_system_log_lines(admin(), "2025-1-3", None, None)
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);

        let err = service
            .get_system_log_lines(admin(), "2025-01-03", None, None)
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::NOT_FOUND);

        let err = service
            .get_system_log_file_list(Actor::new("m1", Role::Manager))
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);
    }
}
