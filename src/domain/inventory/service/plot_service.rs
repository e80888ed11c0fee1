use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::api::dto::inventory_dto::PlotListQuery;
use crate::api::dto::paginated_response::PaginatedResponse;
use crate::core::persistence::database::Database;
use crate::core::persistence::land::land_entity::LandEntity;
use crate::core::persistence::land::land_repository::LandRepository;
use crate::core::persistence::notification::notification_entity::NotificationKind;
use crate::core::persistence::page_bounds;
use crate::core::persistence::plot::plot_entity::{PlotEntity, PlotStatus};
use crate::core::persistence::plot::plot_repository::{PlotFilter, PlotRepository, PlotSort};
use crate::core::persistence::project::project_repository::ProjectRepository;
use crate::core::persistence::user::user_entity::Role;
use crate::core::persistence::user::user_repository::UserRepository;
use crate::domain::common::model::Actor;
use crate::domain::common::service::notify::notify_user;
use crate::domain::common::service::{new_id, normalize_opt, parse_code};
use crate::domain::inventory::dto::plot_request::{
    PlotCreateRequest, PlotStatusRequest, PlotUpdateRequest,
};
use crate::errors::{bad_request, conflict, not_found};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

pub async fn list_plots(db: &Database, q: PlotListQuery) -> Result<PaginatedResponse<PlotEntity>> {
    let status = parse_code(q.status.as_deref(), "plot status", |c| PlotStatus::from_code(c))?;
    let sort = parse_code(q.sort.as_deref(), "sort", |c| PlotSort::from_code(c))?.unwrap_or_default();
    if let (Some(min), Some(max)) = (q.min_price, q.max_price) {
        if min > max {
            return Err(bad_request("min_price must not exceed max_price"));
        }
    }

    let (limit, offset) = page_bounds(q.limit, q.offset, DEFAULT_LIMIT, MAX_LIMIT);
    let filter = PlotFilter {
        project_id: normalize_opt(q.project_id),
        status,
        min_price: q.min_price,
        max_price: q.max_price,
        sort,
        limit,
        offset,
    };

    let (items, total) = db
        .with_conn(move |conn| PlotRepository::new(conn).list(&filter))
        .await?;

    Ok(PaginatedResponse {
        items,
        total,
        limit,
        offset,
    })
}

pub async fn get_plot(db: &Database, id: String) -> Result<PlotEntity> {
    db.with_conn(move |conn| {
        PlotRepository::new(conn)
            .find(&id)?
            .ok_or_else(|| not_found("plot", &id))
    })
    .await
}

pub async fn create_plot(db: &Database, actor: Actor, req: PlotCreateRequest) -> Result<PlotEntity> {
    actor.require_admin()?;
    req.validate()?;

    let plot = db
        .with_conn(move |conn| {
            if ProjectRepository::new(conn).find(&req.project_id)?.is_none() {
                return Err(not_found("project", &req.project_id));
            }

            let repo = PlotRepository::new(conn);
            let plot_number = req.plot_number.trim().to_string();
            if repo.exists_number(&req.project_id, &plot_number, None)? {
                return Err(conflict(format!(
                    "plot number '{plot_number}' already exists in this project"
                )));
            }

            let now = Utc::now();
            let plot = PlotEntity {
                id: new_id(),
                project_id: req.project_id,
                plot_number,
                title: normalize_opt(req.title),
                area_sq_yards: req.area_sq_yards,
                price: req.price,
                facing: normalize_opt(req.facing),
                status: PlotStatus::Available,
                owner_id: None,
                image_url: normalize_opt(req.image_url),
                sold_at: None,
                created_at: now,
                updated_at: now,
            };
            repo.insert(&plot)?;
            Ok(plot)
        })
        .await?;

    info!(plot_id = %plot.id, project_id = %plot.project_id, "Plot created");
    Ok(plot)
}

pub async fn update_plot(
    db: &Database,
    actor: Actor,
    id: String,
    req: PlotUpdateRequest,
) -> Result<PlotEntity> {
    actor.require_admin()?;
    req.validate()?;

    db.with_conn(move |conn| {
        let repo = PlotRepository::new(conn);
        let mut plot = repo.find(&id)?.ok_or_else(|| not_found("plot", &id))?;

        if let Some(number) = req.plot_number.map(|n| n.trim().to_string()) {
            if number != plot.plot_number
                && repo.exists_number(&plot.project_id, &number, Some(&plot.id))?
            {
                return Err(conflict(format!(
                    "plot number '{number}' already exists in this project"
                )));
            }
            plot.plot_number = number;
        }
        if req.title.is_some() {
            plot.title = normalize_opt(req.title);
        }
        if let Some(area) = req.area_sq_yards {
            plot.area_sq_yards = area;
        }
        if let Some(price) = req.price {
            plot.price = price;
        }
        if req.facing.is_some() {
            plot.facing = normalize_opt(req.facing);
        }
        if req.image_url.is_some() {
            plot.image_url = normalize_opt(req.image_url);
        }
        plot.updated_at = Utc::now();

        repo.update(&plot)?;
        Ok(plot)
    })
    .await
}

pub async fn delete_plot(db: &Database, actor: Actor, id: String) -> Result<Value> {
    actor.require_admin()?;

    db.with_conn(move |conn| {
        let repo = PlotRepository::new(conn);
        let plot = repo.find(&id)?.ok_or_else(|| not_found("plot", &id))?;
        if plot.status != PlotStatus::Available {
            return Err(conflict(format!(
                "plot is {}; only AVAILABLE plots can be deleted",
                plot.status.as_code()
            )));
        }
        repo.delete(&id)?;
        Ok(json!({ "deleted": true, "id": id }))
    })
    .await
}

/// Move a plot along its sales lifecycle. Selling a plot hands the buyer a land record.
pub async fn update_plot_status(
    db: &Database,
    actor: Actor,
    id: String,
    req: PlotStatusRequest,
) -> Result<PlotEntity> {
    actor.require_staff()?;

    let plot = db
        .transaction(move |tx| {
            let mut plot = PlotRepository::new(tx)
                .find(&id)?
                .ok_or_else(|| not_found("plot", &id))?;
            apply_status(tx, &mut plot, req.status, normalize_opt(req.owner_id))?;
            Ok(plot)
        })
        .await?;

    info!(
        plot_id = %plot.id,
        status = plot.status.as_code(),
        by = %actor.id,
        "Plot status changed"
    );
    Ok(plot)
}

fn apply_status(
    conn: &Connection,
    plot: &mut PlotEntity,
    next: PlotStatus,
    owner_id: Option<String>,
) -> Result<()> {
    if !plot.status.can_transition_to(next) {
        return Err(conflict(format!(
            "cannot move plot from {} to {}",
            plot.status.as_code(),
            next.as_code()
        )));
    }

    let now = Utc::now();
    match next {
        PlotStatus::Advance => {
            let owner_id = owner_id.ok_or_else(|| bad_request("owner_id is required"))?;
            let owner = UserRepository::new(conn)
                .find(&owner_id)?
                .ok_or_else(|| not_found("user", &owner_id))?;
            if owner.role != Role::Client {
                return Err(bad_request("plot owner must be a CLIENT"));
            }
            plot.owner_id = Some(owner.id);
        }
        PlotStatus::Sold => {
            let owner_id = owner_id
                .or_else(|| plot.owner_id.clone())
                .ok_or_else(|| bad_request("owner_id is required"))?;
            if UserRepository::new(conn).find(&owner_id)?.is_none() {
                return Err(not_found("user", &owner_id));
            }
            plot.owner_id = Some(owner_id);
            plot.sold_at = Some(now);
        }
        PlotStatus::Available => {
            plot.owner_id = None;
            plot.sold_at = None;
        }
    }
    plot.status = next;
    plot.updated_at = now;
    PlotRepository::new(conn).update(plot)?;

    if let Some(owner_id) = plot.owner_id.as_deref() {
        if next == PlotStatus::Sold {
            create_land_for_sold_plot(conn, plot, owner_id)?;
        }
        let title = match next {
            PlotStatus::Sold => "Plot purchase completed",
            _ => "Plot booked",
        };
        notify_user(
            conn,
            owner_id,
            NotificationKind::Buy,
            title,
            &format!("Plot {} is now {}", plot.plot_number, next.as_code()),
        )?;
    }
    Ok(())
}

fn create_land_for_sold_plot(conn: &Connection, plot: &PlotEntity, owner_id: &str) -> Result<()> {
    let project = ProjectRepository::new(conn)
        .find(&plot.project_id)?
        .ok_or_else(|| not_found("project", &plot.project_id))?;

    let now = Utc::now();
    let land = LandEntity {
        id: new_id(),
        owner_id: owner_id.to_string(),
        plot_id: Some(plot.id.clone()),
        name: format!("{} - Plot {}", project.name, plot.plot_number),
        area_sq_yards: plot.area_sq_yards,
        location: project.location,
        created_at: now,
        updated_at: now,
    };
    LandRepository::new(conn).insert(&land)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::service::test_support::{seed_plot, seed_project, seed_user};
    use crate::errors::AppError;
    use axum::http::StatusCode;

    fn status(status: PlotStatus, owner: Option<&str>) -> PlotStatusRequest {
        PlotStatusRequest {
            status,
            owner_id: owner.map(str::to_string),
        }
    }

    fn create_req(number: &str) -> PlotCreateRequest {
        PlotCreateRequest {
            project_id: "pr1".into(),
            plot_number: number.into(),
            title: None,
            area_sq_yards: 150.0,
            price: 1_500_000,
            facing: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn duplicate_plot_number_conflicts() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        seed_project(&db, "pr1").await;

        create_plot(&db, admin.clone(), create_req("A-1")).await.unwrap();
        let err = create_plot(&db, admin, create_req(" A-1 ")).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn zero_price_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        seed_project(&db, "pr1").await;

        let req = PlotCreateRequest {
            price: 0,
            ..create_req("A-2")
        };
        let err = create_plot(&db, admin, req).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_filters_and_sorts_by_price() {
        let db = Database::open_in_memory().unwrap();
        seed_project(&db, "pr1").await;
        seed_plot(&db, "cheap", "pr1", 100).await;
        seed_plot(&db, "mid", "pr1", 500).await;
        seed_plot(&db, "dear", "pr1", 900).await;

        let page = list_plots(
            &db,
            PlotListQuery {
                min_price: Some(200),
                sort: Some("price_desc".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.limit, DEFAULT_LIMIT);
        let ids: Vec<_> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["dear", "mid"]);
    }

    #[tokio::test]
    async fn unknown_sort_is_bad_request() {
        let db = Database::open_in_memory().unwrap();
        let err = list_plots(
            &db,
            PlotListQuery {
                sort: Some("cheapest".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn advance_requires_a_client_owner() {
        let db = Database::open_in_memory().unwrap();
        let manager = seed_user(&db, "m1", Role::Manager).await;
        seed_project(&db, "pr1").await;
        seed_plot(&db, "p1", "pr1", 100).await;

        let err = update_plot_status(&db, manager.clone(), "p1".into(), status(PlotStatus::Advance, None))
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);

        let err = update_plot_status(&db, manager, "p1".into(), status(PlotStatus::Advance, Some("m1")))
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn selling_an_advanced_plot_creates_land_for_owner() {
        let db = Database::open_in_memory().unwrap();
        let manager = seed_user(&db, "m1", Role::Manager).await;
        seed_user(&db, "c1", Role::Client).await;
        seed_project(&db, "pr1").await;
        seed_plot(&db, "p1", "pr1", 100).await;

        let booked = update_plot_status(&db, manager.clone(), "p1".into(), status(PlotStatus::Advance, Some("c1")))
            .await
            .unwrap();
        assert_eq!(booked.owner_id.as_deref(), Some("c1"));

        let sold = update_plot_status(&db, manager, "p1".into(), status(PlotStatus::Sold, None))
            .await
            .unwrap();
        assert_eq!(sold.status, PlotStatus::Sold);
        assert!(sold.sold_at.is_some());

        let lands = db
            .with_conn(|conn| LandRepository::new(conn).list(Some("c1")))
            .await
            .unwrap();
        assert_eq!(lands.len(), 1);
        assert_eq!(lands[0].name, "Green Acres pr1 - Plot P-p1");
        assert_eq!(lands[0].plot_id.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn sold_is_terminal_and_repeat_status_conflicts() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        seed_user(&db, "c1", Role::Client).await;
        seed_project(&db, "pr1").await;
        seed_plot(&db, "p1", "pr1", 100).await;

        let err = update_plot_status(&db, admin.clone(), "p1".into(), status(PlotStatus::Available, None))
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);

        update_plot_status(&db, admin.clone(), "p1".into(), status(PlotStatus::Sold, Some("c1")))
            .await
            .unwrap();
        let err = update_plot_status(&db, admin.clone(), "p1".into(), status(PlotStatus::Available, None))
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);

        let err = delete_plot(&db, admin, "p1".into()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn clients_cannot_change_status() {
        let db = Database::open_in_memory().unwrap();
        let client = seed_user(&db, "c1", Role::Client).await;
        seed_project(&db, "pr1").await;
        seed_plot(&db, "p1", "pr1", 100).await;

        let err = update_plot_status(&db, client, "p1".into(), status(PlotStatus::Sold, Some("c1")))
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);
    }
}
