use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

use crate::api::dto::request_dto::CameraListQuery;
use crate::core::persistence::camera::camera_entity::{CameraEntity, CameraStatus};
use crate::core::persistence::camera::camera_repository::CameraRepository;
use crate::core::persistence::database::Database;
use crate::domain::common::model::Actor;
use crate::domain::common::service::{new_id, normalize_opt, parse_code};
use crate::domain::property::dto::camera_request::CameraUpsertRequest;
use crate::errors::not_found;

pub async fn list_cameras(db: &Database, actor: Actor, q: CameraListQuery) -> Result<Vec<CameraEntity>> {
    actor.require_staff()?;
    let status = parse_code(q.status.as_deref(), "camera status", |c| CameraStatus::from_code(c))?;
    db.with_conn(move |conn| CameraRepository::new(conn).list(status))
        .await
}

pub async fn get_camera(db: &Database, actor: Actor, id: String) -> Result<CameraEntity> {
    actor.require_staff()?;
    db.with_conn(move |conn| {
        CameraRepository::new(conn)
            .find(&id)?
            .ok_or_else(|| not_found("camera", &id))
    })
    .await
}

pub async fn create_camera(db: &Database, actor: Actor, req: CameraUpsertRequest) -> Result<CameraEntity> {
    actor.require_admin()?;
    req.validate()?;

    let now = Utc::now();
    let camera = CameraEntity {
        id: new_id(),
        name: req.name.trim().to_string(),
        stream_url: req.stream_url,
        location: normalize_opt(req.location),
        status: req.status.unwrap_or(CameraStatus::Active),
        created_at: now,
        updated_at: now,
    };
    let stored = camera.clone();
    db.with_conn(move |conn| CameraRepository::new(conn).insert(&stored))
        .await?;
    Ok(camera)
}

pub async fn update_camera(
    db: &Database,
    actor: Actor,
    id: String,
    req: CameraUpsertRequest,
) -> Result<CameraEntity> {
    actor.require_admin()?;
    req.validate()?;

    db.with_conn(move |conn| {
        let repo = CameraRepository::new(conn);
        let mut camera = repo.find(&id)?.ok_or_else(|| not_found("camera", &id))?;
        camera.name = req.name.trim().to_string();
        camera.stream_url = req.stream_url;
        camera.location = normalize_opt(req.location);
        if let Some(status) = req.status {
            camera.status = status;
        }
        camera.updated_at = Utc::now();
        repo.update(&camera)?;
        Ok(camera)
    })
    .await
}

/// Deleting a camera also drops its land assignment.
pub async fn delete_camera(db: &Database, actor: Actor, id: String) -> Result<Value> {
    actor.require_admin()?;
    db.with_conn(move |conn| {
        if !CameraRepository::new(conn).delete(&id)? {
            return Err(not_found("camera", &id));
        }
        Ok(json!({ "deleted": true, "id": id }))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::user::user_entity::Role;
    use crate::domain::common::service::test_support::seed_user;
    use crate::errors::AppError;
    use axum::http::StatusCode;

    fn req(url: &str) -> CameraUpsertRequest {
        CameraUpsertRequest {
            name: "Gate cam".into(),
            stream_url: url.into(),
            location: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn stream_url_must_be_a_url() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        let err = create_camera(&db, admin, req("not a url")).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cameras_default_active_and_filter_by_status() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        let cam = create_camera(&db, admin.clone(), req("rtsp://10.0.0.5/live"))
            .await
            .unwrap();
        assert_eq!(cam.status, CameraStatus::Active);

        let inactive = list_cameras(
            &db,
            admin,
            CameraListQuery {
                status: Some("inactive".into()),
            },
        )
        .await
        .unwrap();
        assert!(inactive.is_empty());
    }

    #[tokio::test]
    async fn clients_cannot_see_cameras() {
        let db = Database::open_in_memory().unwrap();
        let client = seed_user(&db, "c1", Role::Client).await;
        let err = list_cameras(&db, client, CameraListQuery::default())
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);
    }
}
