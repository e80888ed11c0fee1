use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::core::persistence::database::Database;
use crate::core::persistence::office::office_entity::OfficeEntity;
use crate::core::persistence::office::office_repository::OfficeRepository;
use crate::core::persistence::user::user_repository::UserRepository;
use crate::domain::common::model::Actor;
use crate::domain::common::service::{new_id, normalize_opt};
use crate::domain::user::dto::office_upsert_request::OfficeUpsertRequest;
use crate::errors::not_found;

pub async fn list_offices(db: &Database) -> Result<Vec<OfficeEntity>> {
    db.with_conn(|conn| OfficeRepository::new(conn).list()).await
}

pub async fn get_office(db: &Database, id: String) -> Result<OfficeEntity> {
    db.with_conn(move |conn| {
        OfficeRepository::new(conn)
            .find(&id)?
            .ok_or_else(|| not_found("office", &id))
    })
    .await
}

pub async fn create_office(db: &Database, actor: Actor, req: OfficeUpsertRequest) -> Result<OfficeEntity> {
    actor.require_admin()?;
    req.validate()?;

    let now = Utc::now();
    let office = OfficeEntity {
        id: new_id(),
        name: req.name.trim().to_string(),
        address: req.address.trim().to_string(),
        city: req.city.trim().to_string(),
        phone: normalize_opt(req.phone),
        email: normalize_opt(req.email),
        created_at: now,
        updated_at: now,
    };
    let stored = office.clone();
    db.with_conn(move |conn| OfficeRepository::new(conn).insert(&stored))
        .await?;
    Ok(office)
}

pub async fn update_office(
    db: &Database,
    actor: Actor,
    id: String,
    req: OfficeUpsertRequest,
) -> Result<OfficeEntity> {
    actor.require_admin()?;
    req.validate()?;

    db.with_conn(move |conn| {
        let repo = OfficeRepository::new(conn);
        let mut office = repo.find(&id)?.ok_or_else(|| not_found("office", &id))?;
        office.name = req.name.trim().to_string();
        office.address = req.address.trim().to_string();
        office.city = req.city.trim().to_string();
        office.phone = normalize_opt(req.phone);
        office.email = normalize_opt(req.email);
        office.updated_at = Utc::now();
        repo.update(&office)?;
        Ok(office)
    })
    .await
}

/// Managers of a deleted office become unassigned.
pub async fn delete_office(db: &Database, actor: Actor, id: String) -> Result<Value> {
    actor.require_admin()?;

    let released = db
        .transaction(move |tx| {
            let released = UserRepository::new(tx).clear_office(&id)?;
            if !OfficeRepository::new(tx).delete(&id)? {
                return Err(not_found("office", &id));
            }
            Ok(released)
        })
        .await?;

    info!(released, "Office deleted");
    Ok(json!({ "deleted": true, "released_managers": released }))
}
