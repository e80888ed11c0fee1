use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::api::dto::request_dto::StatusQuery;
use crate::core::persistence::database::Database;
use crate::core::persistence::land::land_repository::LandRepository;
use crate::core::persistence::notification::notification_entity::NotificationKind;
use crate::core::persistence::plot::plot_repository::PlotRepository;
use crate::core::persistence::request_status::RequestStatus;
use crate::core::persistence::sell_request::sell_request_entity::SellRequestEntity;
use crate::core::persistence::sell_request::sell_request_repository::SellRequestRepository;
use crate::domain::common::model::{Actor, ReviewRejectRequest};
use crate::domain::common::service::notify::{notify_staff, notify_user};
use crate::domain::common::service::{new_id, normalize_opt, parse_code};
use crate::domain::property::service::land_service::remove_land;
use crate::domain::request::dto::sell_request_create_request::SellRequestCreateRequest;
use crate::errors::{conflict, forbidden, not_found};

pub async fn create_sell_request(
    db: &Database,
    actor: Actor,
    req: SellRequestCreateRequest,
) -> Result<SellRequestEntity> {
    req.validate()?;

    let request = db
        .transaction(move |tx| {
            let land = LandRepository::new(tx)
                .find(&req.land_id)?
                .ok_or_else(|| not_found("land", &req.land_id))?;
            if land.owner_id != actor.id {
                return Err(forbidden("only the land owner can sell it"));
            }

            let repo = SellRequestRepository::new(tx);
            if repo.has_pending_for_land(&land.id)? {
                return Err(conflict("a pending sell request for this land already exists"));
            }

            let now = Utc::now();
            let request = SellRequestEntity {
                id: new_id(),
                user_id: actor.id.clone(),
                land_id: land.id,
                asking_price: req.asking_price,
                reason: normalize_opt(req.reason),
                status: RequestStatus::Pending,
                reviewed_by: None,
                rejection_reason: None,
                created_at: now,
                updated_at: now,
            };
            repo.insert(&request)?;

            notify_staff(
                tx,
                NotificationKind::Sell,
                "New sell request",
                &format!("{} is offered for resale at {}", land.name, request.asking_price),
            )?;
            Ok(request)
        })
        .await?;

    info!(request_id = %request.id, land_id = %request.land_id, "Sell request created");
    Ok(request)
}

pub async fn list_sell_requests(
    db: &Database,
    actor: Actor,
    q: StatusQuery,
) -> Result<Vec<SellRequestEntity>> {
    let status = parse_code(q.status.as_deref(), "request status", |c| RequestStatus::from_code(c))?;
    db.with_conn(move |conn| SellRequestRepository::new(conn).list(actor.owner_scope(), status))
        .await
}

pub async fn get_sell_request(db: &Database, actor: Actor, id: String) -> Result<SellRequestEntity> {
    let request = db
        .with_conn(move |conn| {
            SellRequestRepository::new(conn)
                .find(&id)?
                .ok_or_else(|| not_found("sell request", &id))
        })
        .await?;
    actor.ensure_access(&request.user_id)?;
    Ok(request)
}

/// Take the land back: its plot goes back on sale at the asking price.
pub async fn approve_sell_request(db: &Database, actor: Actor, id: String) -> Result<SellRequestEntity> {
    actor.require_staff()?;

    let request = db
        .transaction(move |tx| {
            let repo = SellRequestRepository::new(tx);
            let mut request = repo.find(&id)?.ok_or_else(|| not_found("sell request", &id))?;
            if request.status != RequestStatus::Pending {
                return Err(conflict(format!(
                    "sell request is already {}",
                    request.status.as_code()
                )));
            }

            let land = LandRepository::new(tx)
                .find(&request.land_id)?
                .ok_or_else(|| not_found("land", &request.land_id))?;

            if let Some(plot_id) = land.plot_id.as_deref() {
                let plots = PlotRepository::new(tx);
                if let Some(mut plot) = plots.find(plot_id)? {
                    plot.relist(request.asking_price);
                    plots.update(&plot)?;
                }
            }

            request.status = RequestStatus::Approved;
            request.reviewed_by = Some(actor.id.clone());
            request.updated_at = Utc::now();
            repo.update_review(&request)?;

            remove_land(tx, &land.id, "Land was sold back")?;

            notify_user(
                tx,
                &request.user_id,
                NotificationKind::Sell,
                "Sell request approved",
                &format!("{} has been taken back for resale", land.name),
            )?;
            Ok(request)
        })
        .await?;

    info!(request_id = %request.id, land_id = %request.land_id, "Sell request approved");
    Ok(request)
}

pub async fn reject_sell_request(
    db: &Database,
    actor: Actor,
    id: String,
    req: ReviewRejectRequest,
) -> Result<SellRequestEntity> {
    actor.require_staff()?;
    req.validate()?;

    db.transaction(move |tx| {
        let repo = SellRequestRepository::new(tx);
        let mut request = repo.find(&id)?.ok_or_else(|| not_found("sell request", &id))?;
        if request.status != RequestStatus::Pending {
            return Err(conflict(format!(
                "sell request is already {}",
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
            NotificationKind::Sell,
            "Sell request declined",
            request
                .rejection_reason
                .as_deref()
                .unwrap_or("Your sell request was declined"),
        )?;
        Ok(request)
    })
    .await
}

pub async fn delete_sell_request(db: &Database, actor: Actor, id: String) -> Result<Value> {
    db.with_conn(move |conn| {
        let repo = SellRequestRepository::new(conn);
        let request = repo.find(&id)?.ok_or_else(|| not_found("sell request", &id))?;
        if !actor.is_admin() {
            if request.user_id != actor.id {
                return Err(forbidden("not the owner of this sell request"));
            }
            if request.status != RequestStatus::Pending {
                return Err(conflict("only PENDING sell requests can be withdrawn"));
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
    use crate::core::persistence::plot::plot_entity::PlotStatus;
    use crate::core::persistence::user::user_entity::Role;
    use crate::domain::common::service::test_support::{seed_plot, seed_project, seed_user};
    use crate::domain::inventory::dto::plot_request::PlotStatusRequest;
    use crate::domain::inventory::service::plot_service::update_plot_status;
    use crate::errors::AppError;
    use axum::http::StatusCode;

    /// Sold plot `p1` owned by `c1`; returns the land id.
    async fn sold_plot(db: &Database, manager: &Actor) -> String {
        seed_user(db, "c1", Role::Client).await;
        seed_project(db, "pr1").await;
        seed_plot(db, "p1", "pr1", 100).await;
        update_plot_status(
            db,
            manager.clone(),
            "p1".into(),
            PlotStatusRequest {
                status: PlotStatus::Sold,
                owner_id: Some("c1".into()),
            },
        )
        .await
        .unwrap();
        db.with_conn(|conn| LandRepository::new(conn).list(Some("c1")))
            .await
            .unwrap()
            .remove(0)
            .id
    }

    fn sell(land_id: &str) -> SellRequestCreateRequest {
        SellRequestCreateRequest {
            land_id: land_id.into(),
            asking_price: 250,
            reason: Some("Relocating".into()),
        }
    }

    #[tokio::test]
    async fn only_the_owner_can_sell() {
        let db = Database::open_in_memory().unwrap();
        let manager = seed_user(&db, "m1", Role::Manager).await;
        let land_id = sold_plot(&db, &manager).await;
        let stranger = seed_user(&db, "c2", Role::Client).await;

        let err = create_sell_request(&db, stranger, sell(&land_id)).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);

        let owner = Actor::new("c1", Role::Client);
        create_sell_request(&db, owner.clone(), sell(&land_id)).await.unwrap();
        let err = create_sell_request(&db, owner, sell(&land_id)).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn approval_relists_plot_and_removes_land() {
        let db = Database::open_in_memory().unwrap();
        let manager = seed_user(&db, "m1", Role::Manager).await;
        let land_id = sold_plot(&db, &manager).await;
        let owner = Actor::new("c1", Role::Client);

        let req = create_sell_request(&db, owner.clone(), sell(&land_id)).await.unwrap();
        let approved = approve_sell_request(&db, manager, req.id.clone()).await.unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);

        let plot = db
            .with_conn(|conn| PlotRepository::new(conn).find("p1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(plot.status, PlotStatus::Available);
        assert_eq!(plot.owner_id, None);
        assert_eq!(plot.sold_at, None);
        assert_eq!(plot.price, 250);

        assert_eq!(db.count_rows("lands").await.unwrap(), 0);
        let kept = get_sell_request(&db, owner, req.id).await.unwrap();
        assert_eq!(kept.status, RequestStatus::Approved);
    }
}
