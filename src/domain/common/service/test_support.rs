//! Fixtures shared by the service tests.

use chrono::{Duration, NaiveDate, Utc};

use crate::core::persistence::database::Database;
use crate::core::persistence::plot::plot_entity::{PlotEntity, PlotStatus};
use crate::core::persistence::plot::plot_repository::PlotRepository;
use crate::core::persistence::project::project_entity::ProjectEntity;
use crate::core::persistence::project::project_repository::ProjectRepository;
use crate::core::persistence::user::user_entity::{Role, UserEntity};
use crate::core::persistence::user::user_repository::UserRepository;
use crate::domain::common::model::Actor;

pub async fn seed_user(db: &Database, id: &str, role: Role) -> Actor {
    let user = UserEntity::new(id, format!("{id}@example.com"), id.to_uppercase(), role);
    db.with_conn(move |conn| UserRepository::new(conn).upsert(&user))
        .await
        .unwrap();
    Actor::new(id, role)
}

pub async fn seed_project(db: &Database, id: &str) -> ProjectEntity {
    let now = Utc::now();
    let project = ProjectEntity {
        id: id.into(),
        name: format!("Green Acres {id}"),
        description: None,
        location: "Ring Road".into(),
        city: "Hyderabad".into(),
        image_url: None,
        created_at: now,
        updated_at: now,
    };
    let stored = project.clone();
    db.with_conn(move |conn| ProjectRepository::new(conn).insert(&stored))
        .await
        .unwrap();
    project
}

pub async fn seed_plot(db: &Database, id: &str, project_id: &str, price: i64) -> PlotEntity {
    let now = Utc::now();
    let plot = PlotEntity {
        id: id.into(),
        project_id: project_id.into(),
        plot_number: format!("P-{id}"),
        title: None,
        area_sq_yards: 200.0,
        price,
        facing: Some("EAST".into()),
        status: PlotStatus::Available,
        owner_id: None,
        image_url: None,
        sold_at: None,
        created_at: now,
        updated_at: now,
    };
    let stored = plot.clone();
    db.with_conn(move |conn| PlotRepository::new(conn).insert(&stored))
        .await
        .unwrap();
    plot
}

pub fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}
