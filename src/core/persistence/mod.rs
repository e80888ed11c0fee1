//! Relational persistence: schema, connection handle and per-entity repositories.

pub mod database;
pub mod migrations;
pub mod schema;

pub mod banner_ad;
pub mod buy_request;
pub mod camera;
pub mod feedback;
pub mod land;
pub mod land_camera;
pub mod leave_request;
pub mod logs;
pub mod notification;
pub mod office;
pub mod plot;
pub mod project;
pub mod request_status;
pub mod sell_request;
pub mod user;
pub mod visit_request;

/// Store a code enum (`as_code`/`from_code`) as TEXT.
macro_rules! impl_sql_code {
    ($ty:ty) => {
        impl rusqlite::types::ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.as_code()))
            }
        }

        impl rusqlite::types::FromSql for $ty {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                let code = value.as_str()?;
                <$ty>::from_code(code).ok_or_else(|| {
                    rusqlite::types::FromSqlError::Other(
                        format!("unknown {} code '{}'", stringify!($ty), code).into(),
                    )
                })
            }
        }
    };
}

pub(crate) use impl_sql_code;

/// Clamp user-supplied paging to sane bounds.
pub fn page_bounds(
    limit: Option<usize>,
    offset: Option<usize>,
    default: usize,
    max: usize,
) -> (usize, usize) {
    let limit = limit.unwrap_or(default).clamp(1, max);
    (limit, offset.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_clamps_limit() {
        assert_eq!(page_bounds(None, None, 50, 200), (50, 0));
        assert_eq!(page_bounds(Some(0), Some(10), 50, 200), (1, 10));
        assert_eq!(page_bounds(Some(5000), None, 50, 200), (200, 0));
    }
}
