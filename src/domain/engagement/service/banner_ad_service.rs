use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

use crate::core::persistence::banner_ad::banner_ad_entity::BannerAdEntity;
use crate::core::persistence::banner_ad::banner_ad_repository::BannerAdRepository;
use crate::core::persistence::database::Database;
use crate::domain::common::model::Actor;
use crate::domain::common::service::{new_id, normalize_opt};
use crate::domain::engagement::dto::banner_ad_upsert_request::BannerAdUpsertRequest;
use crate::errors::not_found;

pub async fn list_active_banner_ads(db: &Database) -> Result<Vec<BannerAdEntity>> {
    db.with_conn(|conn| BannerAdRepository::new(conn).list(true))
        .await
}

pub async fn list_all_banner_ads(db: &Database, actor: Actor) -> Result<Vec<BannerAdEntity>> {
    actor.require_admin()?;
    db.with_conn(|conn| BannerAdRepository::new(conn).list(false))
        .await
}

pub async fn create_banner_ad(
    db: &Database,
    actor: Actor,
    req: BannerAdUpsertRequest,
) -> Result<BannerAdEntity> {
    actor.require_admin()?;
    req.validate()?;

    let now = Utc::now();
    let ad = BannerAdEntity {
        id: new_id(),
        title: req.title.trim().to_string(),
        description: normalize_opt(req.description),
        image_url: req.image_url,
        link_url: normalize_opt(req.link_url),
        active: req.active.unwrap_or(true),
        display_order: req.display_order.unwrap_or(0),
        created_at: now,
        updated_at: now,
    };
    let stored = ad.clone();
    db.with_conn(move |conn| BannerAdRepository::new(conn).insert(&stored))
        .await?;
    Ok(ad)
}

pub async fn update_banner_ad(
    db: &Database,
    actor: Actor,
    id: String,
    req: BannerAdUpsertRequest,
) -> Result<BannerAdEntity> {
    actor.require_admin()?;
    req.validate()?;

    db.with_conn(move |conn| {
        let repo = BannerAdRepository::new(conn);
        let mut ad = repo.find(&id)?.ok_or_else(|| not_found("banner ad", &id))?;
        ad.title = req.title.trim().to_string();
        ad.description = normalize_opt(req.description);
        ad.image_url = req.image_url;
        ad.link_url = normalize_opt(req.link_url);
        if let Some(active) = req.active {
            ad.active = active;
        }
        if let Some(order) = req.display_order {
            ad.display_order = order;
        }
        ad.updated_at = Utc::now();
        repo.update(&ad)?;
        Ok(ad)
    })
    .await
}

pub async fn toggle_banner_ad(db: &Database, actor: Actor, id: String) -> Result<BannerAdEntity> {
    actor.require_admin()?;
    db.with_conn(move |conn| {
        let repo = BannerAdRepository::new(conn);
        let mut ad = repo.find(&id)?.ok_or_else(|| not_found("banner ad", &id))?;
        ad.active = !ad.active;
        ad.updated_at = Utc::now();
        repo.update(&ad)?;
        Ok(ad)
    })
    .await
}

pub async fn delete_banner_ad(db: &Database, actor: Actor, id: String) -> Result<Value> {
    actor.require_admin()?;
    db.with_conn(move |conn| {
        if !BannerAdRepository::new(conn).delete(&id)? {
            return Err(not_found("banner ad", &id));
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

    fn ad(title: &str, order: i64) -> BannerAdUpsertRequest {
        BannerAdUpsertRequest {
            title: title.into(),
            description: None,
            image_url: "https://cdn.example.com/ad.png".into(),
            link_url: None,
            active: None,
            display_order: Some(order),
        }
    }

    #[tokio::test]
    async fn public_list_hides_inactive_and_orders() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;

        create_banner_ad(&db, admin.clone(), ad("second", 2)).await.unwrap();
        create_banner_ad(&db, admin.clone(), ad("first", 1)).await.unwrap();
        let hidden = create_banner_ad(&db, admin.clone(), ad("hidden", 0)).await.unwrap();
        let toggled = toggle_banner_ad(&db, admin.clone(), hidden.id).await.unwrap();
        assert!(!toggled.active);

        let public = list_active_banner_ads(&db).await.unwrap();
        let titles: Vec<_> = public.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
        assert_eq!(list_all_banner_ads(&db, admin).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn image_url_must_be_a_url() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        let req = BannerAdUpsertRequest {
            image_url: "banner.png".into(),
            ..ad("bad", 0)
        };
        assert!(create_banner_ad(&db, admin, req).await.is_err());
    }
}
