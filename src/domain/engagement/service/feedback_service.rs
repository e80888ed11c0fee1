use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::core::persistence::database::Database;
use crate::core::persistence::feedback::feedback_entity::FeedbackEntity;
use crate::core::persistence::feedback::feedback_repository::FeedbackRepository;
use crate::domain::common::model::Actor;
use crate::domain::common::service::new_id;
use crate::domain::engagement::dto::feedback_create_request::FeedbackCreateRequest;
use crate::errors::not_found;

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackSummary {
    pub items: Vec<FeedbackEntity>,
    /// Zero when there is no feedback yet.
    pub average_rating: f64,
    pub count: usize,
}

impl FeedbackSummary {
    fn from_items(items: Vec<FeedbackEntity>) -> Self {
        let count = items.len();
        let average_rating = if count == 0 {
            0.0
        } else {
            let sum: u32 = items.iter().map(|f| u32::from(f.rating)).sum();
            // one decimal place
            (f64::from(sum) / count as f64 * 10.0).round() / 10.0
        };
        Self {
            items,
            average_rating,
            count,
        }
    }
}

pub async fn create_feedback(
    db: &Database,
    actor: Actor,
    req: FeedbackCreateRequest,
) -> Result<FeedbackEntity> {
    req.validate()?;

    let feedback = FeedbackEntity {
        id: new_id(),
        user_id: actor.id,
        rating: req.rating,
        message: req.message.trim().to_string(),
        created_at: Utc::now(),
    };
    let stored = feedback.clone();
    db.with_conn(move |conn| FeedbackRepository::new(conn).insert(&stored))
        .await?;
    Ok(feedback)
}

pub async fn list_feedback(db: &Database, actor: Actor) -> Result<FeedbackSummary> {
    actor.require_staff()?;
    let items = db
        .with_conn(|conn| FeedbackRepository::new(conn).list())
        .await?;
    Ok(FeedbackSummary::from_items(items))
}

pub async fn delete_feedback(db: &Database, actor: Actor, id: String) -> Result<Value> {
    actor.require_admin()?;
    db.with_conn(move |conn| {
        if !FeedbackRepository::new(conn).delete(&id)? {
            return Err(not_found("feedback", &id));
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

    fn rate(rating: u8) -> FeedbackCreateRequest {
        FeedbackCreateRequest {
            rating,
            message: "Smooth site visit".into(),
        }
    }

    #[tokio::test]
    async fn rating_must_be_one_to_five() {
        let db = Database::open_in_memory().unwrap();
        let client = seed_user(&db, "c1", Role::Client).await;
        for bad in [0, 6] {
            let err = create_feedback(&db, client.clone(), rate(bad)).await.unwrap_err();
            assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn summary_averages_ratings() {
        let db = Database::open_in_memory().unwrap();
        let client = seed_user(&db, "c1", Role::Client).await;
        let manager = seed_user(&db, "m1", Role::Manager).await;

        let empty = list_feedback(&db, manager.clone()).await.unwrap();
        assert_eq!(empty.average_rating, 0.0);

        for r in [5, 4, 4] {
            create_feedback(&db, client.clone(), rate(r)).await.unwrap();
        }
        let summary = list_feedback(&db, manager).await.unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average_rating, 4.3);

        let err = list_feedback(&db, client).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);
    }
}
