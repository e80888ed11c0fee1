use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::api::dto::request_dto::StatusQuery;
use crate::core::persistence::buy_request::buy_request_entity::BuyRequestEntity;
use crate::core::persistence::buy_request::buy_request_repository::BuyRequestRepository;
use crate::core::persistence::database::Database;
use crate::core::persistence::notification::notification_entity::NotificationKind;
use crate::core::persistence::plot::plot_entity::PlotStatus;
use crate::core::persistence::plot::plot_repository::PlotRepository;
use crate::core::persistence::request_status::RequestStatus;
use crate::core::persistence::user::user_entity::Role;
use crate::domain::common::model::{Actor, ReviewRejectRequest};
use crate::domain::common::service::notify::{notify_staff, notify_user};
use crate::domain::common::service::{new_id, normalize_opt, parse_code};
use crate::domain::request::dto::buy_request_create_request::BuyRequestCreateRequest;
use crate::errors::{conflict, forbidden, not_found};

pub const PLOT_TAKEN_REASON: &str = "Plot is no longer available";

pub async fn create_buy_request(
    db: &Database,
    actor: Actor,
    req: BuyRequestCreateRequest,
) -> Result<BuyRequestEntity> {
    actor.require(&[Role::Client])?;
    req.validate()?;

    let request = db
        .transaction(move |tx| {
            let plot = PlotRepository::new(tx)
                .find(&req.plot_id)?
                .ok_or_else(|| not_found("plot", &req.plot_id))?;
            if plot.status != PlotStatus::Available {
                return Err(conflict(format!("plot is {}", plot.status.as_code())));
            }

            let repo = BuyRequestRepository::new(tx);
            if repo.has_pending(&actor.id, &plot.id)? {
                return Err(conflict("a pending buy request for this plot already exists"));
            }

            let now = Utc::now();
            let request = BuyRequestEntity {
                id: new_id(),
                user_id: actor.id.clone(),
                plot_id: plot.id,
                offer_price: req.offer_price,
                message: normalize_opt(req.message),
                status: RequestStatus::Pending,
                reviewed_by: None,
                rejection_reason: None,
                created_at: now,
                updated_at: now,
            };
            repo.insert(&request)?;

            notify_staff(
                tx,
                NotificationKind::Buy,
                "New buy request",
                &format!("A client wants to buy plot {}", plot.plot_number),
            )?;
            Ok(request)
        })
        .await?;

    info!(request_id = %request.id, plot_id = %request.plot_id, "Buy request created");
    Ok(request)
}

pub async fn list_buy_requests(
    db: &Database,
    actor: Actor,
    q: StatusQuery,
) -> Result<Vec<BuyRequestEntity>> {
    let status = parse_code(q.status.as_deref(), "request status", |c| RequestStatus::from_code(c))?;
    db.with_conn(move |conn| BuyRequestRepository::new(conn).list(actor.owner_scope(), status))
        .await
}

pub async fn get_buy_request(db: &Database, actor: Actor, id: String) -> Result<BuyRequestEntity> {
    let request = db
        .with_conn(move |conn| {
            BuyRequestRepository::new(conn)
                .find(&id)?
                .ok_or_else(|| not_found("buy request", &id))
        })
        .await?;
    actor.ensure_access(&request.user_id)?;
    Ok(request)
}

/// Book the plot for the requester and turn away every other pending buyer.
pub async fn approve_buy_request(db: &Database, actor: Actor, id: String) -> Result<BuyRequestEntity> {
    actor.require_staff()?;

    let (request, turned_away) = db
        .transaction(move |tx| {
            let repo = BuyRequestRepository::new(tx);
            let mut request = repo.find(&id)?.ok_or_else(|| not_found("buy request", &id))?;
            if request.status != RequestStatus::Pending {
                return Err(conflict(format!(
                    "buy request is already {}",
                    request.status.as_code()
                )));
            }

            let plots = PlotRepository::new(tx);
            let mut plot = plots
                .find(&request.plot_id)?
                .ok_or_else(|| not_found("plot", &request.plot_id))?;
            if plot.status != PlotStatus::Available {
                return Err(conflict(format!("plot is {}", plot.status.as_code())));
            }

            let now = Utc::now();
            plot.status = PlotStatus::Advance;
            plot.owner_id = Some(request.user_id.clone());
            plot.updated_at = now;
            plots.update(&plot)?;

            request.status = RequestStatus::Approved;
            request.reviewed_by = Some(actor.id.clone());
            request.updated_at = now;
            repo.update_review(&request)?;

            let mut turned_away = 0;
            for mut other in repo.list_pending_for_plot(&plot.id)? {
                other.status = RequestStatus::Rejected;
                other.rejection_reason = Some(PLOT_TAKEN_REASON.to_string());
                other.reviewed_by = Some(actor.id.clone());
                other.updated_at = now;
                repo.update_review(&other)?;
                notify_user(
                    tx,
                    &other.user_id,
                    NotificationKind::Buy,
                    "Buy request declined",
                    &format!("Plot {}: {PLOT_TAKEN_REASON}", plot.plot_number),
                )?;
                turned_away += 1;
            }

            notify_user(
                tx,
                &request.user_id,
                NotificationKind::Buy,
                "Buy request approved",
                &format!("Plot {} is booked for you", plot.plot_number),
            )?;
            Ok((request, turned_away))
        })
        .await?;

    info!(
        request_id = %request.id,
        plot_id = %request.plot_id,
        turned_away,
        "Buy request approved"
    );
    Ok(request)
}

pub async fn reject_buy_request(
    db: &Database,
    actor: Actor,
    id: String,
    req: ReviewRejectRequest,
) -> Result<BuyRequestEntity> {
    actor.require_staff()?;
    req.validate()?;

    db.transaction(move |tx| {
        let repo = BuyRequestRepository::new(tx);
        let mut request = repo.find(&id)?.ok_or_else(|| not_found("buy request", &id))?;
        if request.status != RequestStatus::Pending {
            return Err(conflict(format!(
                "buy request is already {}",
                request.status.as_code()
            )));
        }

        request.status = RequestStatus::Rejected;
        request.rejection_reason = normalize_opt(req.reason);
        request.reviewed_by = Some(actor.id.clone());
        request.updated_at = Utc::now();
        repo.update_review(&request)?;

        notify_user(
            tx,
            &request.user_id,
            NotificationKind::Buy,
            "Buy request declined",
            request
                .rejection_reason
                .as_deref()
                .unwrap_or("Your buy request was declined"),
        )?;
        Ok(request)
    })
    .await
}

pub async fn delete_buy_request(db: &Database, actor: Actor, id: String) -> Result<Value> {
    db.with_conn(move |conn| {
        let repo = BuyRequestRepository::new(conn);
        let request = repo.find(&id)?.ok_or_else(|| not_found("buy request", &id))?;
        if !actor.is_admin() {
            if request.user_id != actor.id {
                return Err(forbidden("not the owner of this buy request"));
            }
            if request.status != RequestStatus::Pending {
                return Err(conflict("only PENDING buy requests can be withdrawn"));
            }
        }
        repo.delete(&id)?;
        Ok(json!({ "deleted": true, "id": id }))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::service::test_support::{seed_plot, seed_project, seed_user};
    use crate::errors::AppError;
    use axum::http::StatusCode;

    fn offer() -> BuyRequestCreateRequest {
        BuyRequestCreateRequest {
            plot_id: "p1".into(),
            offer_price: Some(90),
            message: None,
        }
    }

    async fn setup() -> (Database, Actor) {
        let db = Database::open_in_memory().unwrap();
        let manager = seed_user(&db, "m1", Role::Manager).await;
        seed_project(&db, "pr1").await;
        seed_plot(&db, "p1", "pr1", 100).await;
        (db, manager)
    }

    #[tokio::test]
    async fn one_pending_request_per_user_and_plot() {
        let (db, _manager) = setup().await;
        let client = seed_user(&db, "c1", Role::Client).await;

        create_buy_request(&db, client.clone(), offer()).await.unwrap();
        let err = create_buy_request(&db, client, offer()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn staff_cannot_file_buy_requests() {
        let (db, manager) = setup().await;
        let err = create_buy_request(&db, manager, offer()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn approval_books_plot_and_rejects_competitors() {
        let (db, manager) = setup().await;
        let winner = seed_user(&db, "c1", Role::Client).await;
        let loser = seed_user(&db, "c2", Role::Client).await;

        let won = create_buy_request(&db, winner, offer()).await.unwrap();
        let lost = create_buy_request(&db, loser.clone(), offer()).await.unwrap();

        let approved = approve_buy_request(&db, manager.clone(), won.id).await.unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);

        let plot = db
            .with_conn(|conn| PlotRepository::new(conn).find("p1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(plot.status, PlotStatus::Advance);
        assert_eq!(plot.owner_id.as_deref(), Some("c1"));

        let lost = get_buy_request(&db, loser, lost.id).await.unwrap();
        assert_eq!(lost.status, RequestStatus::Rejected);
        assert_eq!(lost.rejection_reason.as_deref(), Some(PLOT_TAKEN_REASON));

        let third = seed_user(&db, "c3", Role::Client).await;
        let err = create_buy_request(&db, third, offer()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn others_cannot_read_or_withdraw() {
        let (db, _manager) = setup().await;
        let owner = seed_user(&db, "c1", Role::Client).await;
        let other = seed_user(&db, "c2", Role::Client).await;
        let req = create_buy_request(&db, owner.clone(), offer()).await.unwrap();

        let err = get_buy_request(&db, other.clone(), req.id.clone()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);
        let err = delete_buy_request(&db, other, req.id.clone()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);

        delete_buy_request(&db, owner, req.id).await.unwrap();
        assert_eq!(db.count_rows("buy_requests").await.unwrap(), 0);
    }
}
