use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::api::dto::inventory_dto::ProjectListQuery;
use crate::core::persistence::database::Database;
use crate::core::persistence::plot::plot_entity::PlotStatus;
use crate::core::persistence::plot::plot_repository::PlotRepository;
use crate::core::persistence::project::project_entity::ProjectEntity;
use crate::core::persistence::project::project_repository::{ProjectFilter, ProjectRepository};
use crate::domain::common::model::Actor;
use crate::domain::common::service::{new_id, normalize_opt};
use crate::domain::inventory::dto::project_upsert_request::ProjectUpsertRequest;
use crate::errors::{conflict, not_found};

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PlotCounts {
    pub total: i64,
    pub available: i64,
    pub advance: i64,
    pub sold: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectEntity,
    pub plot_counts: PlotCounts,
}

pub async fn list_projects(db: &Database, q: ProjectListQuery) -> Result<Vec<ProjectEntity>> {
    let filter = ProjectFilter {
        city: normalize_opt(q.city),
        search: normalize_opt(q.search),
    };
    db.with_conn(move |conn| ProjectRepository::new(conn).list(&filter))
        .await
}

pub async fn get_project(db: &Database, id: String) -> Result<ProjectDetail> {
    db.with_conn(move |conn| {
        let project = ProjectRepository::new(conn)
            .find(&id)?
            .ok_or_else(|| not_found("project", &id))?;

        let by_status = PlotRepository::new(conn).count_by_status(&id)?;
        let count = |s: PlotStatus| by_status.get(&s).copied().unwrap_or(0);
        let plot_counts = PlotCounts {
            available: count(PlotStatus::Available),
            advance: count(PlotStatus::Advance),
            sold: count(PlotStatus::Sold),
            total: by_status.values().sum(),
        };

        Ok(ProjectDetail {
            project,
            plot_counts,
        })
    })
    .await
}

pub async fn create_project(
    db: &Database,
    actor: Actor,
    req: ProjectUpsertRequest,
) -> Result<ProjectEntity> {
    actor.require_admin()?;
    req.validate()?;

    let now = Utc::now();
    let project = ProjectEntity {
        id: new_id(),
        name: req.name.trim().to_string(),
        description: normalize_opt(req.description),
        location: req.location.trim().to_string(),
        city: req.city.trim().to_string(),
        image_url: normalize_opt(req.image_url),
        created_at: now,
        updated_at: now,
    };

    let stored = project.clone();
    db.with_conn(move |conn| ProjectRepository::new(conn).insert(&stored))
        .await?;

    info!(project_id = %project.id, by = %actor.id, "Project created");
    Ok(project)
}

pub async fn update_project(
    db: &Database,
    actor: Actor,
    id: String,
    req: ProjectUpsertRequest,
) -> Result<ProjectEntity> {
    actor.require_admin()?;
    req.validate()?;

    db.with_conn(move |conn| {
        let repo = ProjectRepository::new(conn);
        let mut project = repo.find(&id)?.ok_or_else(|| not_found("project", &id))?;

        project.name = req.name.trim().to_string();
        project.description = normalize_opt(req.description);
        project.location = req.location.trim().to_string();
        project.city = req.city.trim().to_string();
        project.image_url = normalize_opt(req.image_url);
        project.updated_at = Utc::now();

        repo.update(&project)?;
        Ok(project)
    })
    .await
}

/// Removes the project and its plots. Refused once any plot is booked or sold.
pub async fn delete_project(db: &Database, actor: Actor, id: String) -> Result<Value> {
    actor.require_admin()?;

    let removed_plots = db
        .transaction(move |tx| {
            if ProjectRepository::new(tx).find(&id)?.is_none() {
                return Err(not_found("project", &id));
            }

            let by_status = PlotRepository::new(tx).count_by_status(&id)?;
            let committed = by_status.get(&PlotStatus::Advance).copied().unwrap_or(0)
                + by_status.get(&PlotStatus::Sold).copied().unwrap_or(0);
            if committed > 0 {
                return Err(conflict(format!(
                    "project has {committed} booked or sold plot(s)"
                )));
            }

            ProjectRepository::new(tx).delete(&id)?;
            Ok(by_status.values().sum::<i64>())
        })
        .await?;

    info!(by = %actor.id, removed_plots, "Project deleted");
    Ok(json!({ "deleted": true, "removed_plots": removed_plots }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::user::user_entity::Role;
    use crate::domain::common::service::test_support::{seed_plot, seed_project, seed_user};
    use crate::errors::AppError;
    use axum::http::StatusCode;

    fn sample_request(name: &str) -> ProjectUpsertRequest {
        ProjectUpsertRequest {
            name: name.into(),
            description: Some("  ".into()),
            location: "Outer Ring Road".into(),
            city: "Hyderabad".into(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn admin_creates_and_lists_projects() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;

        let created = create_project(&db, admin, sample_request("Lake View"))
            .await
            .unwrap();
        assert_eq!(created.description, None);

        let listed = list_projects(
            &db,
            ProjectListQuery {
                city: Some("hyderabad".into()),
                search: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }

    #[tokio::test]
    async fn managers_cannot_create_projects() {
        let db = Database::open_in_memory().unwrap();
        let manager = seed_user(&db, "m1", Role::Manager).await;

        let err = create_project(&db, manager, sample_request("Nope"))
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn detail_counts_plots_by_status() {
        let db = Database::open_in_memory().unwrap();
        seed_project(&db, "pr1").await;
        seed_plot(&db, "a", "pr1", 100).await;
        seed_plot(&db, "b", "pr1", 200).await;

        let detail = get_project(&db, "pr1".into()).await.unwrap();
        assert_eq!(detail.plot_counts.total, 2);
        assert_eq!(detail.plot_counts.available, 2);
        assert_eq!(detail.plot_counts.sold, 0);
    }

    #[tokio::test]
    async fn delete_refused_when_a_plot_is_sold() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        seed_project(&db, "pr1").await;
        let mut plot = seed_plot(&db, "a", "pr1", 100).await;
        plot.status = PlotStatus::Sold;
        db.with_conn(move |conn| PlotRepository::new(conn).update(&plot))
            .await
            .unwrap();

        let err = delete_project(&db, admin, "pr1".into()).await.unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn delete_removes_available_plots() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        seed_project(&db, "pr1").await;
        seed_plot(&db, "a", "pr1", 100).await;

        let out = delete_project(&db, admin, "pr1".into()).await.unwrap();
        assert_eq!(out["removed_plots"], 1);
        assert_eq!(db.count_rows("plots").await.unwrap(), 0);
    }
}
