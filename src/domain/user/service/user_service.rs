use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::api::dto::paginated_response::PaginatedResponse;
use crate::api::dto::user_dto::UserListQuery;
use crate::core::persistence::database::Database;
use crate::core::persistence::land::land_repository::LandRepository;
use crate::core::persistence::office::office_repository::OfficeRepository;
use crate::core::persistence::page_bounds;
use crate::core::persistence::plot::plot_repository::PlotRepository;
use crate::core::persistence::user::user_entity::{Role, UserEntity};
use crate::core::persistence::user::user_repository::{UserFilter, UserRepository};
use crate::domain::common::model::Actor;
use crate::domain::common::service::{normalize_opt, parse_code};
use crate::domain::property::service::land_service::remove_land;
use crate::domain::user::dto::user_update_request::{
    UserAdminUpdateRequest, UserProfileUpdateRequest,
};
use crate::errors::{bad_request, conflict, forbidden, not_found};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

/// Resolve a caller id to its mirrored user record.
pub async fn find_user(db: &Database, id: String) -> Result<Option<UserEntity>> {
    db.with_conn(move |conn| UserRepository::new(conn).find(&id))
        .await
}

pub async fn get_me(db: &Database, actor: Actor) -> Result<UserEntity> {
    get_user(db, actor.clone(), actor.id).await
}

pub async fn update_me(
    db: &Database,
    actor: Actor,
    req: UserProfileUpdateRequest,
) -> Result<UserEntity> {
    req.validate()?;

    db.with_conn(move |conn| {
        let repo = UserRepository::new(conn);
        let mut user = repo
            .find(&actor.id)?
            .ok_or_else(|| not_found("user", &actor.id))?;
        if let Some(name) = req.name {
            user.name = name.trim().to_string();
        }
        if req.phone.is_some() {
            user.phone = normalize_opt(req.phone);
        }
        user.updated_at = Utc::now();
        repo.update(&user)?;
        Ok(user)
    })
    .await
}

pub async fn list_users(
    db: &Database,
    actor: Actor,
    q: UserListQuery,
) -> Result<PaginatedResponse<UserEntity>> {
    actor.require_admin()?;
    let role = parse_code(q.role.as_deref(), "role", |c| Role::from_code(c))?;
    let (limit, offset) = page_bounds(q.limit, q.offset, DEFAULT_LIMIT, MAX_LIMIT);

    let filter = UserFilter {
        role,
        search: normalize_opt(q.search),
        limit,
        offset,
    };
    let (items, total) = db
        .with_conn(move |conn| UserRepository::new(conn).list(&filter))
        .await?;

    Ok(PaginatedResponse {
        items,
        total,
        limit,
        offset,
    })
}

pub async fn get_user(db: &Database, actor: Actor, id: String) -> Result<UserEntity> {
    if !actor.is_admin() && actor.id != id {
        return Err(forbidden("cannot read another user's profile"));
    }
    find_user(db, id.clone())
        .await?
        .ok_or_else(|| not_found("user", &id))
}

/// Change role and/or office. Only managers belong to an office.
pub async fn update_user(
    db: &Database,
    actor: Actor,
    id: String,
    req: UserAdminUpdateRequest,
) -> Result<UserEntity> {
    actor.require_admin()?;
    req.validate()?;

    let user = db
        .with_conn(move |conn| {
            let repo = UserRepository::new(conn);
            let mut user = repo.find(&id)?.ok_or_else(|| not_found("user", &id))?;

            if let Some(role) = req.role {
                user.role = role;
            }
            let office_change = req.office_id.map(normalize_opt);
            if let Some(office_id) = &office_change {
                user.office_id = office_id.clone();
            }

            if user.role != Role::Manager {
                if matches!(office_change, Some(Some(_))) {
                    return Err(bad_request("only MANAGER users can be assigned to an office"));
                }
                user.office_id = None;
            }
            if let Some(office_id) = user.office_id.as_deref() {
                if OfficeRepository::new(conn).find(office_id)?.is_none() {
                    return Err(not_found("office", office_id));
                }
            }

            user.updated_at = Utc::now();
            repo.update(&user)?;
            Ok(user)
        })
        .await?;

    info!(user_id = %user.id, role = user.role.as_code(), by = %actor.id, "User updated");
    Ok(user)
}

pub async fn delete_user(db: &Database, actor: Actor, id: String) -> Result<Value> {
    actor.require_admin()?;
    if actor.id == id {
        return Err(conflict("admins cannot delete themselves"));
    }

    db.transaction(move |tx| {
        let relisted = remove_user(tx, &id)?.ok_or_else(|| not_found("user", &id))?;
        Ok(json!({ "deleted": true, "id": id, "relisted_plots": relisted }))
    })
    .await
}

/// Delete a user, relisting the plots they held and removing their lands.
///
/// Returns the number of relisted plots, or `None` when the user is unknown.
pub(crate) fn remove_user(conn: &Connection, id: &str) -> Result<Option<usize>> {
    let users = UserRepository::new(conn);
    if users.find(id)?.is_none() {
        return Ok(None);
    }

    for land in LandRepository::new(conn).list(Some(id))? {
        remove_land(conn, &land.id, "Owner account was deleted")?;
    }

    let plots = PlotRepository::new(conn);
    let owned = plots.list_by_owner(id)?;
    for mut plot in owned.iter().cloned() {
        let price = plot.price;
        plot.relist(price);
        plots.update(&plot)?;
    }

    users.delete(id)?;
    info!(user_id = id, relisted = owned.len(), "User removed");
    Ok(Some(owned.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::office::office_entity::OfficeEntity;
    use crate::core::persistence::plot::plot_entity::PlotStatus;
    use crate::domain::common::service::test_support::{seed_plot, seed_project, seed_user};
    use crate::domain::inventory::dto::plot_request::PlotStatusRequest;
    use crate::domain::inventory::service::plot_service::{get_plot, update_plot_status};
    use crate::errors::AppError;
    use axum::http::StatusCode;

    async fn seed_office(db: &Database) {
        let now = Utc::now();
        let office = OfficeEntity {
            id: "o1".into(),
            name: "Head office".into(),
            address: "MG Road".into(),
            city: "Pune".into(),
            phone: None,
            email: None,
            created_at: now,
            updated_at: now,
        };
        db.with_conn(move |conn| OfficeRepository::new(conn).insert(&office))
            .await
            .unwrap();
    }

    fn assign(office: Option<&str>) -> UserAdminUpdateRequest {
        UserAdminUpdateRequest {
            role: None,
            office_id: Some(office.map(str::to_string)),
        }
    }

    #[tokio::test]
    async fn users_read_only_themselves_unless_admin() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        let client = seed_user(&db, "c1", Role::Client).await;

        assert_eq!(get_me(&db, client.clone()).await.unwrap().id, "c1");
        let err = get_user(&db, client, "admin".into()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);
        assert!(get_user(&db, admin, "c1".into()).await.is_ok());
    }

    #[tokio::test]
    async fn only_managers_get_offices() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        seed_user(&db, "c1", Role::Client).await;
        seed_user(&db, "m1", Role::Manager).await;
        seed_office(&db).await;

        let err = update_user(&db, admin.clone(), "c1".into(), assign(Some("o1")))
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);

        let err = update_user(&db, admin.clone(), "m1".into(), assign(Some("missing")))
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::NOT_FOUND);

        let manager = update_user(&db, admin.clone(), "m1".into(), assign(Some("o1")))
            .await
            .unwrap();
        assert_eq!(manager.office_id.as_deref(), Some("o1"));

        let demoted = update_user(
            &db,
            admin,
            "m1".into(),
            UserAdminUpdateRequest {
                role: Some(Role::Client),
                office_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(demoted.office_id, None);
    }

    #[tokio::test]
    async fn admin_cannot_delete_self() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        let err = delete_user(&db, admin, "admin".into()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn deleting_an_owner_relists_their_plots() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        seed_user(&db, "c1", Role::Client).await;
        seed_project(&db, "pr1").await;
        seed_plot(&db, "p1", "pr1", 500).await;
        seed_plot(&db, "p2", "pr1", 700).await;

        for (plot, status) in [("p1", PlotStatus::Sold), ("p2", PlotStatus::Advance)] {
            update_plot_status(
                &db,
                admin.clone(),
                plot.into(),
                PlotStatusRequest {
                    status,
                    owner_id: Some("c1".into()),
                },
            )
            .await
            .unwrap();
        }
        assert_eq!(db.count_rows("lands").await.unwrap(), 1);

        let out = delete_user(&db, admin, "c1".into()).await.unwrap();
        assert_eq!(out["relisted_plots"], 2);

        for id in ["p1", "p2"] {
            let plot = get_plot(&db, id.into()).await.unwrap();
            assert_eq!(plot.status, PlotStatus::Available);
            assert_eq!(plot.owner_id, None);
            assert_eq!(plot.sold_at, None);
        }
        assert_eq!(get_plot(&db, "p1".into()).await.unwrap().price, 500);
        assert_eq!(db.count_rows("lands").await.unwrap(), 0);
        assert_eq!(db.count_rows("users").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleting_unknown_user_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        let err = delete_user(&db, admin, "ghost".into()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_is_admin_only_and_paginated() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        let client = seed_user(&db, "c1", Role::Client).await;
        seed_user(&db, "c2", Role::Client).await;

        let err = list_users(&db, client, UserListQuery::default()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);

        let page = list_users(
            &db,
            admin,
            UserListQuery {
                role: Some("client".into()),
                limit: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn null_office_means_clear() {
        let req: UserAdminUpdateRequest = serde_json::from_str(r#"{"office_id":null}"#).unwrap();
        assert_eq!(req.office_id, Some(None));
        let req: UserAdminUpdateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.office_id, None);
    }
}
