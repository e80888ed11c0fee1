//! Site visit bookings and the gate pass issued on approval.
//!
//! An approved visit carries a QR code that encodes
//! `{public_base_url}/api/v1/visit-requests/verify/{qr_token}`. Staff at the
//! gate scan it and the verify endpoint decides whether the pass admits its
//! holder. Passes lapse at the end of the visit day and a scheduler task
//! marks them `EXPIRED`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::request_dto::StatusQuery;
use crate::core::persistence::database::Database;
use crate::core::persistence::notification::notification_entity::NotificationKind;
use crate::core::persistence::plot::plot_repository::PlotRepository;
use crate::core::persistence::visit_request::visit_request_entity::{
    VisitRequestEntity, VisitStatus,
};
use crate::core::persistence::visit_request::visit_request_repository::VisitRequestRepository;
use crate::core::util::qr_util::QrUtil;
use crate::domain::common::model::{Actor, ReviewRejectRequest};
use crate::domain::common::service::notify::{notify_staff, notify_user};
use crate::domain::common::service::{end_of_day, new_id, normalize_opt, parse_code};
use crate::domain::request::dto::visit_request_create_request::VisitRequestCreateRequest;
use crate::errors::{bad_request, conflict, forbidden, not_found};

/// Outcome of scanning a visit pass.
#[derive(Debug, Clone, Serialize)]
pub struct VisitPassCheck {
    pub valid: bool,
    /// `expired`, or the lowercased status when the pass is not approved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub visit_request: VisitRequestEntity,
}

pub async fn create_visit_request(
    db: &Database,
    actor: Actor,
    req: VisitRequestCreateRequest,
) -> Result<VisitRequestEntity> {
    req.validate()?;
    if req.visit_date < Utc::now().date_naive() {
        return Err(bad_request("visit_date must be today or later"));
    }

    let visit = db
        .transaction(move |tx| {
            let plot = PlotRepository::new(tx)
                .find(&req.plot_id)?
                .ok_or_else(|| not_found("plot", &req.plot_id))?;

            let now = Utc::now();
            let visit = VisitRequestEntity {
                id: new_id(),
                user_id: actor.id,
                plot_id: plot.id,
                name: req.name.trim().to_string(),
                email: req.email.trim().to_string(),
                phone: req.phone.trim().to_string(),
                visit_date: req.visit_date,
                visit_time: normalize_opt(req.visit_time),
                message: normalize_opt(req.message),
                status: VisitStatus::Pending,
                qr_token: None,
                qr_code: None,
                expires_at: None,
                reviewed_by: None,
                rejection_reason: None,
                created_at: now,
                updated_at: now,
            };
            VisitRequestRepository::new(tx).insert(&visit)?;

            notify_staff(
                tx,
                NotificationKind::Visit,
                "New visit request",
                &format!(
                    "{} wants to visit plot {} on {}",
                    visit.name, plot.plot_number, visit.visit_date
                ),
            )?;
            Ok(visit)
        })
        .await?;

    info!(visit_id = %visit.id, plot_id = %visit.plot_id, "Visit request created");
    Ok(visit)
}

pub async fn list_visit_requests(
    db: &Database,
    actor: Actor,
    q: StatusQuery,
) -> Result<Vec<VisitRequestEntity>> {
    let status = parse_code(q.status.as_deref(), "visit status", |c| VisitStatus::from_code(c))?;
    db.with_conn(move |conn| VisitRequestRepository::new(conn).list(actor.owner_scope(), status))
        .await
}

pub async fn get_visit_request(db: &Database, actor: Actor, id: String) -> Result<VisitRequestEntity> {
    let visit = find_visit(db, id).await?;
    actor.ensure_access(&visit.user_id)?;
    Ok(visit)
}

pub async fn approve_visit_request(
    db: &Database,
    public_base_url: &str,
    actor: Actor,
    id: String,
) -> Result<VisitRequestEntity> {
    actor.require_staff()?;
    let base_url = public_base_url.to_string();

    let visit = db
        .transaction(move |tx| {
            let repo = VisitRequestRepository::new(tx);
            let mut visit = repo.find(&id)?.ok_or_else(|| not_found("visit request", &id))?;

            if visit.status != VisitStatus::Pending {
                return Err(conflict(format!(
                    "visit request is already {}",
                    visit.status.as_code()
                )));
            }
            if visit.visit_date < Utc::now().date_naive() {
                return Err(conflict("visit date has already passed"));
            }

            let token = Uuid::new_v4().to_string();
            let qr_code = QrUtil::render_data_url(&QrUtil::verify_url(&base_url, &token))?;

            visit.qr_token = Some(token);
            visit.qr_code = Some(qr_code);
            visit.expires_at = Some(end_of_day(visit.visit_date));
            visit.status = VisitStatus::Approved;
            visit.reviewed_by = Some(actor.id.clone());
            visit.updated_at = Utc::now();
            repo.update_review(&visit)?;

            notify_user(
                tx,
                &visit.user_id,
                NotificationKind::Visit,
                "Visit approved",
                &format!(
                    "Your visit on {} is approved. Show the QR pass at the site gate.",
                    visit.visit_date
                ),
            )?;
            Ok(visit)
        })
        .await?;

    info!(visit_id = %visit.id, "Visit request approved, pass issued");
    Ok(visit)
}

pub async fn reject_visit_request(
    db: &Database,
    actor: Actor,
    id: String,
    req: ReviewRejectRequest,
) -> Result<VisitRequestEntity> {
    actor.require_staff()?;
    req.validate()?;

    db.transaction(move |tx| {
        let repo = VisitRequestRepository::new(tx);
        let mut visit = repo.find(&id)?.ok_or_else(|| not_found("visit request", &id))?;
        if visit.status != VisitStatus::Pending {
            return Err(conflict(format!(
                "visit request is already {}",
                visit.status.as_code()
            )));
        }

        visit.status = VisitStatus::Rejected;
        visit.rejection_reason = normalize_opt(req.reason);
        visit.reviewed_by = Some(actor.id.clone());
        visit.updated_at = Utc::now();
        repo.update_review(&visit)?;

        let message = match visit.rejection_reason.as_deref() {
            Some(reason) => format!("Your visit on {} was declined: {reason}", visit.visit_date),
            None => format!("Your visit on {} was declined", visit.visit_date),
        };
        notify_user(tx, &visit.user_id, NotificationKind::Visit, "Visit declined", &message)?;
        Ok(visit)
    })
    .await
}

/// Gate check for a scanned pass.
pub async fn verify_visit_pass(db: &Database, actor: Actor, token: String) -> Result<VisitPassCheck> {
    actor.require_staff()?;

    let visit = db
        .with_conn(move |conn| {
            VisitRequestRepository::new(conn)
                .find_by_token(&token)?
                .ok_or_else(|| not_found("visit pass", &token))
        })
        .await?;

    let check = check_pass(visit, Utc::now());
    if !check.valid {
        warn!(
            visit_id = %check.visit_request.id,
            reason = check.reason.as_deref().unwrap_or_default(),
            "Rejected visit pass at gate"
        );
    }
    Ok(check)
}

fn check_pass(visit: VisitRequestEntity, now: DateTime<Utc>) -> VisitPassCheck {
    let valid = visit.pass_is_valid_at(now);
    let reason = if valid {
        None
    } else if visit.status == VisitStatus::Approved || visit.status == VisitStatus::Expired {
        Some("expired".to_string())
    } else {
        Some(visit.status.as_code().to_lowercase())
    };
    VisitPassCheck {
        valid,
        reason,
        visit_request: visit,
    }
}

pub async fn delete_visit_request(db: &Database, actor: Actor, id: String) -> Result<Value> {
    db.with_conn(move |conn| {
        let repo = VisitRequestRepository::new(conn);
        let visit = repo.find(&id)?.ok_or_else(|| not_found("visit request", &id))?;

        if !actor.is_admin() {
            if visit.user_id != actor.id {
                return Err(forbidden("not the owner of this visit request"));
            }
            if visit.status != VisitStatus::Pending {
                return Err(conflict("only PENDING visit requests can be withdrawn"));
            }
        }
        repo.delete(&id)?;
        Ok(json!({ "deleted": true, "id": id }))
    })
    .await
}

/// Mark approved passes whose visit day has ended as `EXPIRED`.
pub async fn expire_visit_passes(db: &Database, now: DateTime<Utc>) -> Result<usize> {
    db.with_conn(move |conn| VisitRequestRepository::new(conn).expire_before(now))
        .await
}

async fn find_visit(db: &Database, id: String) -> Result<VisitRequestEntity> {
    db.with_conn(move |conn| {
        VisitRequestRepository::new(conn)
            .find(&id)?
            .ok_or_else(|| not_found("visit request", &id))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::notification::notification_repository::NotificationRepository;
    use crate::core::persistence::user::user_entity::Role;
    use crate::domain::common::service::test_support::{
        days_from_today, seed_plot, seed_project, seed_user,
    };
    use crate::errors::AppError;
    use axum::http::StatusCode;
    use chrono::Duration;

    const BASE: &str = "https://estate.example.com";

    async fn setup() -> (Database, Actor, Actor) {
        let db = Database::open_in_memory().unwrap();
        let manager = seed_user(&db, "m1", Role::Manager).await;
        let client = seed_user(&db, "c1", Role::Client).await;
        seed_project(&db, "pr1").await;
        seed_plot(&db, "p1", "pr1", 100).await;
        (db, manager, client)
    }

    fn booking(days: i64) -> VisitRequestCreateRequest {
        VisitRequestCreateRequest {
            plot_id: "p1".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: "+91 90000 00000".into(),
            visit_date: days_from_today(days),
            visit_time: Some("10:30".into()),
            message: None,
        }
    }

    #[tokio::test]
    async fn booking_notifies_staff() {
        let (db, _manager, client) = setup().await;
        let visit = create_visit_request(&db, client, booking(1)).await.unwrap();
        assert_eq!(visit.status, VisitStatus::Pending);

        let unread = db
            .with_conn(|conn| NotificationRepository::new(conn).unread_count("m1"))
            .await
            .unwrap();
        assert_eq!(unread, 1);
    }

    #[tokio::test]
    async fn past_dates_and_bad_emails_are_rejected() {
        let (db, _manager, client) = setup().await;

        let err = create_visit_request(&db, client.clone(), booking(-1)).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);

        let req = VisitRequestCreateRequest {
            email: "not-an-email".into(),
            ..booking(1)
        };
        let err = create_visit_request(&db, client, req).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_plot_is_not_found() {
        let (db, _manager, client) = setup().await;
        let req = VisitRequestCreateRequest {
            plot_id: "nope".into(),
            ..booking(1)
        };
        let err = create_visit_request(&db, client, req).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn approval_issues_a_verifiable_pass() {
        let (db, manager, client) = setup().await;
        let visit = create_visit_request(&db, client.clone(), booking(2)).await.unwrap();

        let approved = approve_visit_request(&db, BASE, manager.clone(), visit.id.clone())
            .await
            .unwrap();
        assert_eq!(approved.status, VisitStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some("m1"));
        assert!(approved
            .qr_code
            .as_deref()
            .unwrap()
            .starts_with(QrUtil::DATA_URL_PREFIX));
        assert_eq!(approved.expires_at, Some(end_of_day(days_from_today(2))));

        let token = approved.qr_token.clone().unwrap();
        let check = verify_visit_pass(&db, manager.clone(), token).await.unwrap();
        assert!(check.valid);
        assert_eq!(check.reason, None);

        let err = approve_visit_request(&db, BASE, manager, visit.id).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn clients_cannot_approve_or_verify() {
        let (db, _manager, client) = setup().await;
        let visit = create_visit_request(&db, client.clone(), booking(1)).await.unwrap();

        let err = approve_visit_request(&db, BASE, client.clone(), visit.id)
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);

        let err = verify_visit_pass(&db, client, "whatever".into()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (db, manager, _client) = setup().await;
        let err = verify_visit_pass(&db, manager, "missing".into()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn expiry_sweep_invalidates_passes() {
        let (db, manager, client) = setup().await;
        let visit = create_visit_request(&db, client, booking(0)).await.unwrap();
        let approved = approve_visit_request(&db, BASE, manager.clone(), visit.id)
            .await
            .unwrap();

        let later = approved.expires_at.unwrap() + Duration::seconds(1);
        assert_eq!(expire_visit_passes(&db, later).await.unwrap(), 1);

        let check = verify_visit_pass(&db, manager, approved.qr_token.unwrap())
            .await
            .unwrap();
        assert!(!check.valid);
        assert_eq!(check.reason.as_deref(), Some("expired"));
        assert_eq!(check.visit_request.status, VisitStatus::Expired);
    }

    #[test]
    fn approved_pass_past_expiry_reports_expired() {
        let now = Utc::now();
        let visit = VisitRequestEntity {
            id: "v".into(),
            user_id: "c1".into(),
            plot_id: "p1".into(),
            name: "n".into(),
            email: "e@example.com".into(),
            phone: "12345".into(),
            visit_date: now.date_naive(),
            visit_time: None,
            message: None,
            status: VisitStatus::Approved,
            qr_token: Some("t".into()),
            qr_code: None,
            expires_at: Some(now - Duration::minutes(1)),
            reviewed_by: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };
        let check = check_pass(visit.clone(), now);
        assert!(!check.valid);
        assert_eq!(check.reason.as_deref(), Some("expired"));

        let rejected = VisitRequestEntity {
            status: VisitStatus::Rejected,
            ..visit
        };
        assert_eq!(check_pass(rejected, now).reason.as_deref(), Some("rejected"));
    }

    #[tokio::test]
    async fn reject_then_owner_cannot_withdraw() {
        let (db, manager, client) = setup().await;
        let visit = create_visit_request(&db, client.clone(), booking(1)).await.unwrap();

        let rejected = reject_visit_request(
            &db,
            manager,
            visit.id.clone(),
            ReviewRejectRequest {
                reason: Some("Site closed".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Site closed"));

        let err = delete_visit_request(&db, client, visit.id).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn clients_list_only_their_requests() {
        let (db, manager, client) = setup().await;
        let other = seed_user(&db, "c2", Role::Client).await;
        create_visit_request(&db, client.clone(), booking(1)).await.unwrap();
        create_visit_request(&db, other.clone(), booking(1)).await.unwrap();

        assert_eq!(list_visit_requests(&db, client, StatusQuery::default()).await.unwrap().len(), 1);
        assert_eq!(list_visit_requests(&db, manager, StatusQuery::default()).await.unwrap().len(), 2);
    }
}
