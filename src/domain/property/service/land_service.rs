use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::core::persistence::camera::camera_entity::{CameraEntity, CameraStatus};
use crate::core::persistence::camera::camera_repository::CameraRepository;
use crate::core::persistence::database::Database;
use crate::core::persistence::land::land_entity::LandEntity;
use crate::core::persistence::land::land_repository::LandRepository;
use crate::core::persistence::land_camera::land_camera_entity::LandCameraEntity;
use crate::core::persistence::land_camera::land_camera_repository::LandCameraRepository;
use crate::core::persistence::plot::plot_repository::PlotRepository;
use crate::core::persistence::sell_request::sell_request_repository::SellRequestRepository;
use crate::core::persistence::user::user_repository::UserRepository;
use crate::domain::common::model::Actor;
use crate::domain::common::service::{new_id, normalize_opt};
use crate::domain::property::dto::camera_request::CameraAssignRequest;
use crate::domain::property::dto::land_upsert_request::LandUpsertRequest;
use crate::errors::{conflict, not_found};

#[derive(Debug, Clone, Serialize)]
pub struct LandDetail {
    #[serde(flatten)]
    pub land: LandEntity,
    pub cameras: Vec<CameraEntity>,
}

pub async fn list_lands(db: &Database, actor: Actor) -> Result<Vec<LandEntity>> {
    db.with_conn(move |conn| LandRepository::new(conn).list(actor.owner_scope()))
        .await
}

pub async fn get_land(db: &Database, actor: Actor, id: String) -> Result<LandDetail> {
    db.with_conn(move |conn| {
        let land = find_visible_land(conn, &actor, &id)?;
        let cameras = CameraRepository::new(conn).list_for_land(&land.id)?;
        Ok(LandDetail { land, cameras })
    })
    .await
}

pub async fn create_land(db: &Database, actor: Actor, req: LandUpsertRequest) -> Result<LandEntity> {
    actor.require_admin()?;
    req.validate()?;

    db.with_conn(move |conn| {
        check_references(conn, &req)?;
        let now = Utc::now();
        let land = LandEntity {
            id: new_id(),
            owner_id: req.owner_id,
            plot_id: normalize_opt(req.plot_id),
            name: req.name.trim().to_string(),
            area_sq_yards: req.area_sq_yards,
            location: req.location.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        LandRepository::new(conn).insert(&land)?;
        Ok(land)
    })
    .await
}

pub async fn update_land(
    db: &Database,
    actor: Actor,
    id: String,
    req: LandUpsertRequest,
) -> Result<LandEntity> {
    actor.require_admin()?;
    req.validate()?;

    db.with_conn(move |conn| {
        let repo = LandRepository::new(conn);
        let mut land = repo.find(&id)?.ok_or_else(|| not_found("land", &id))?;
        check_references(conn, &req)?;

        land.owner_id = req.owner_id;
        land.plot_id = normalize_opt(req.plot_id);
        land.name = req.name.trim().to_string();
        land.area_sq_yards = req.area_sq_yards;
        land.location = req.location.trim().to_string();
        land.updated_at = Utc::now();
        repo.update(&land)?;
        Ok(land)
    })
    .await
}

pub async fn delete_land(db: &Database, actor: Actor, id: String) -> Result<Value> {
    actor.require_admin()?;

    db.transaction(move |tx| {
        if LandRepository::new(tx).find(&id)?.is_none() {
            return Err(not_found("land", &id));
        }
        remove_land(tx, &id, "Land was removed")?;
        Ok(json!({ "deleted": true, "id": id }))
    })
    .await
}

/// Drop a land with its camera assignments and close its open sell requests.
pub(crate) fn remove_land(conn: &Connection, land_id: &str, reason: &str) -> Result<()> {
    let unassigned = LandCameraRepository::new(conn).delete_for_land(land_id)?;
    SellRequestRepository::new(conn).reject_pending_for_land(land_id, reason, Utc::now())?;
    LandRepository::new(conn).delete(land_id)?;
    info!(land_id, unassigned, "Land removed");
    Ok(())
}

pub async fn list_land_cameras(db: &Database, actor: Actor, land_id: String) -> Result<Vec<CameraEntity>> {
    db.with_conn(move |conn| {
        let land = find_visible_land(conn, &actor, &land_id)?;
        CameraRepository::new(conn).list_for_land(&land.id)
    })
    .await
}

pub async fn assign_camera(
    db: &Database,
    actor: Actor,
    land_id: String,
    req: CameraAssignRequest,
) -> Result<LandCameraEntity> {
    actor.require_admin()?;
    req.validate()?;

    let assignment = db
        .transaction(move |tx| {
            if LandRepository::new(tx).find(&land_id)?.is_none() {
                return Err(not_found("land", &land_id));
            }
            let camera = CameraRepository::new(tx)
                .find(&req.camera_id)?
                .ok_or_else(|| not_found("camera", &req.camera_id))?;
            if camera.status == CameraStatus::Inactive {
                return Err(conflict("camera is INACTIVE"));
            }

            let repo = LandCameraRepository::new(tx);
            if let Some(existing) = repo.find_by_camera(&camera.id)? {
                return Err(conflict(format!(
                    "camera is already assigned to land '{}'",
                    existing.land_id
                )));
            }

            let assignment = LandCameraEntity {
                land_id,
                camera_id: camera.id,
                assigned_by: actor.id.clone(),
                assigned_at: Utc::now(),
            };
            repo.insert(&assignment)?;
            Ok(assignment)
        })
        .await?;

    info!(
        land_id = %assignment.land_id,
        camera_id = %assignment.camera_id,
        "Camera assigned"
    );
    Ok(assignment)
}

pub async fn unassign_camera(
    db: &Database,
    actor: Actor,
    land_id: String,
    camera_id: String,
) -> Result<Value> {
    actor.require_admin()?;
    db.with_conn(move |conn| {
        if !LandCameraRepository::new(conn).delete(&land_id, &camera_id)? {
            return Err(not_found("camera assignment", &camera_id));
        }
        Ok(json!({ "deleted": true, "land_id": land_id, "camera_id": camera_id }))
    })
    .await
}

fn find_visible_land(conn: &Connection, actor: &Actor, id: &str) -> Result<LandEntity> {
    let land = LandRepository::new(conn)
        .find(id)?
        .ok_or_else(|| not_found("land", id))?;
    actor.ensure_access(&land.owner_id)?;
    Ok(land)
}

fn check_references(conn: &Connection, req: &LandUpsertRequest) -> Result<()> {
    if UserRepository::new(conn).find(&req.owner_id)?.is_none() {
        return Err(not_found("user", &req.owner_id));
    }
    if let Some(plot_id) = req.plot_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if PlotRepository::new(conn).find(plot_id)?.is_none() {
            return Err(not_found("plot", plot_id));
        }
    }
    Ok(())
}
