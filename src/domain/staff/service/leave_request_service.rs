use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::api::dto::request_dto::StatusQuery;
use crate::core::persistence::database::Database;
use crate::core::persistence::leave_request::leave_request_entity::LeaveRequestEntity;
use crate::core::persistence::leave_request::leave_request_repository::LeaveRequestRepository;
use crate::core::persistence::notification::notification_entity::NotificationKind;
use crate::core::persistence::request_status::RequestStatus;
use crate::core::persistence::user::user_entity::Role;
use crate::domain::common::model::Actor;
use crate::domain::common::service::notify::{notify_roles, notify_user};
use crate::domain::common::service::{new_id, parse_code};
use crate::domain::staff::dto::leave_request_create_request::LeaveRequestCreateRequest;
use crate::errors::{bad_request, conflict, forbidden, not_found};

pub async fn create_leave_request(
    db: &Database,
    actor: Actor,
    req: LeaveRequestCreateRequest,
) -> Result<LeaveRequestEntity> {
    actor.require(&[Role::Manager])?;
    req.validate()?;
    if req.end_date < req.start_date {
        return Err(bad_request("end_date must be on or after start_date"));
    }
    if req.start_date < Utc::now().date_naive() {
        return Err(bad_request("start_date must not be in the past"));
    }

    let leave = db
        .transaction(move |tx| {
            let repo = LeaveRequestRepository::new(tx);
            let clash = repo
                .list(Some(&actor.id), None)?
                .into_iter()
                .filter(|l| l.status != RequestStatus::Rejected)
                .find(|l| l.overlaps(req.start_date, req.end_date));
            if let Some(clash) = clash {
                return Err(conflict(format!(
                    "overlaps leave {} to {}",
                    clash.start_date, clash.end_date
                )));
            }

            let now = Utc::now();
            let leave = LeaveRequestEntity {
                id: new_id(),
                manager_id: actor.id.clone(),
                start_date: req.start_date,
                end_date: req.end_date,
                reason: req.reason.trim().to_string(),
                status: RequestStatus::Pending,
                reviewed_by: None,
                created_at: now,
                updated_at: now,
            };
            repo.insert(&leave)?;

            notify_roles(
                tx,
                &[Role::Admin],
                NotificationKind::Leave,
                "New leave request",
                &format!(
                    "Leave requested for {} day(s) from {}",
                    leave.days(),
                    leave.start_date
                ),
            )?;
            Ok(leave)
        })
        .await?;

    info!(leave_id = %leave.id, days = leave.days(), "Leave requested");
    Ok(leave)
}

pub async fn list_leave_requests(
    db: &Database,
    actor: Actor,
    q: StatusQuery,
) -> Result<Vec<LeaveRequestEntity>> {
    actor.require_staff()?;
    let status = parse_code(q.status.as_deref(), "request status", |c| RequestStatus::from_code(c))?;
    let scope = (!actor.is_admin()).then_some(actor.id);
    db.with_conn(move |conn| LeaveRequestRepository::new(conn).list(scope.as_deref(), status))
        .await
}

pub async fn approve_leave_request(db: &Database, actor: Actor, id: String) -> Result<LeaveRequestEntity> {
    review(db, actor, id, RequestStatus::Approved).await
}

pub async fn reject_leave_request(db: &Database, actor: Actor, id: String) -> Result<LeaveRequestEntity> {
    review(db, actor, id, RequestStatus::Rejected).await
}

async fn review(
    db: &Database,
    actor: Actor,
    id: String,
    outcome: RequestStatus,
) -> Result<LeaveRequestEntity> {
    actor.require_admin()?;
    db.transaction(move |tx| apply_review(tx, &actor, &id, outcome))
        .await
}

fn apply_review(
    conn: &Connection,
    actor: &Actor,
    id: &str,
    outcome: RequestStatus,
) -> Result<LeaveRequestEntity> {
    let repo = LeaveRequestRepository::new(conn);
    let mut leave = repo.find(id)?.ok_or_else(|| not_found("leave request", id))?;
    if leave.status != RequestStatus::Pending {
        return Err(conflict(format!(
            "leave request is already {}",
            leave.status.as_code()
        )));
    }

    leave.status = outcome;
    leave.reviewed_by = Some(actor.id.clone());
    leave.updated_at = Utc::now();
    repo.update_review(&leave)?;

    notify_user(
        conn,
        &leave.manager_id,
        NotificationKind::Leave,
        "Leave request reviewed",
        &format!(
            "Your leave from {} to {} was {}",
            leave.start_date,
            leave.end_date,
            outcome.as_code().to_lowercase()
        ),
    )?;
    Ok(leave)
}

pub async fn delete_leave_request(db: &Database, actor: Actor, id: String) -> Result<Value> {
    db.with_conn(move |conn| {
        let repo = LeaveRequestRepository::new(conn);
        let leave = repo.find(&id)?.ok_or_else(|| not_found("leave request", &id))?;
        if leave.manager_id != actor.id {
            return Err(forbidden("not the owner of this leave request"));
        }
        if leave.status != RequestStatus::Pending {
            return Err(conflict("only PENDING leave requests can be withdrawn"));
        }
        repo.delete(&id)?;
        Ok(json!({ "deleted": true, "id": id }))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::service::test_support::{days_from_today, seed_user};
    use crate::errors::AppError;
    use axum::http::StatusCode;

    fn leave(from: i64, to: i64) -> LeaveRequestCreateRequest {
        LeaveRequestCreateRequest {
            start_date: days_from_today(from),
            end_date: days_from_today(to),
            reason: "Family function".into(),
        }
    }

    #[tokio::test]
    async fn only_managers_request_leave() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        let err = create_leave_request(&db, admin, leave(1, 2)).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn date_rules_are_enforced() {
        let db = Database::open_in_memory().unwrap();
        let manager = seed_user(&db, "m1", Role::Manager).await;

        let err = create_leave_request(&db, manager.clone(), leave(3, 2)).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);

        let err = create_leave_request(&db, manager.clone(), leave(-1, 2)).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);

        create_leave_request(&db, manager.clone(), leave(5, 7)).await.unwrap();
        let err = create_leave_request(&db, manager, leave(7, 9)).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn rejected_leave_frees_the_dates() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        let manager = seed_user(&db, "m1", Role::Manager).await;

        let first = create_leave_request(&db, manager.clone(), leave(5, 7)).await.unwrap();
        let rejected = reject_leave_request(&db, admin.clone(), first.id.clone()).await.unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert_eq!(rejected.reviewed_by.as_deref(), Some("admin"));

        let err = approve_leave_request(&db, admin, first.id).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);

        assert!(create_leave_request(&db, manager, leave(5, 7)).await.is_ok());
    }

    #[tokio::test]
    async fn managers_see_only_their_own() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        let m1 = seed_user(&db, "m1", Role::Manager).await;
        let m2 = seed_user(&db, "m2", Role::Manager).await;
        create_leave_request(&db, m1.clone(), leave(1, 1)).await.unwrap();
        create_leave_request(&db, m2, leave(1, 1)).await.unwrap();

        assert_eq!(list_leave_requests(&db, m1, StatusQuery::default()).await.unwrap().len(), 1);
        assert_eq!(list_leave_requests(&db, admin, StatusQuery::default()).await.unwrap().len(), 2);
    }
}
