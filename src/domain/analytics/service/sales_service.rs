use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::api::dto::request_dto::SalesQuery;
use crate::core::persistence::buy_request::buy_request_repository::BuyRequestRepository;
use crate::core::persistence::database::Database;
use crate::core::persistence::plot::plot_entity::{PlotEntity, PlotStatus};
use crate::core::persistence::plot::plot_repository::PlotRepository;
use crate::core::persistence::project::project_entity::ProjectEntity;
use crate::core::persistence::project::project_repository::{ProjectFilter, ProjectRepository};
use crate::core::persistence::request_status::RequestStatus;
use crate::core::persistence::sell_request::sell_request_repository::SellRequestRepository;
use crate::core::persistence::visit_request::visit_request_entity::VisitStatus;
use crate::core::persistence::visit_request::visit_request_repository::VisitRequestRepository;
use crate::domain::common::model::Actor;
use crate::errors::bad_request;

const DEFAULT_MONTHS: u32 = 12;
const MAX_MONTHS: u32 = 36;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PlotTotals {
    pub total: i64,
    pub available: i64,
    pub advance: i64,
    pub sold: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProjectSales {
    pub project_id: String,
    pub name: String,
    pub total: i64,
    pub sold: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    pub sold: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestCounts {
    pub visit: BTreeMap<&'static str, i64>,
    pub buy: BTreeMap<&'static str, i64>,
    pub sell: BTreeMap<&'static str, i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub plots: PlotTotals,
    pub revenue: i64,
    pub advance_value: i64,
    pub projects: Vec<ProjectSales>,
    pub monthly: Vec<MonthlySales>,
    pub requests: RequestCounts,
}

pub async fn get_sales_report(db: &Database, actor: Actor, q: SalesQuery) -> Result<SalesReport> {
    actor.require_staff()?;
    let months = q.months.unwrap_or(DEFAULT_MONTHS);
    if !(1..=MAX_MONTHS).contains(&months) {
        return Err(bad_request(format!("months must be between 1 and {MAX_MONTHS}")));
    }

    db.with_conn(move |conn| {
        let plots = PlotRepository::new(conn).list_all()?;
        let projects = ProjectRepository::new(conn).list(&ProjectFilter::default())?;

        let visit = VisitRequestRepository::new(conn).count_by_status()?;
        let buy = BuyRequestRepository::new(conn).count_by_status()?;
        let sell = SellRequestRepository::new(conn).count_by_status()?;

        let (plot_totals, revenue, advance_value) = totals(&plots);
        Ok(SalesReport {
            plots: plot_totals,
            revenue,
            advance_value,
            projects: per_project(&projects, &plots),
            monthly: monthly(&plots, Utc::now(), months),
            requests: RequestCounts {
                visit: zero_filled(&visit, &VisitStatus::ALL, VisitStatus::as_code),
                buy: zero_filled(&buy, &RequestStatus::ALL, RequestStatus::as_code),
                sell: zero_filled(&sell, &RequestStatus::ALL, RequestStatus::as_code),
            },
        })
    })
    .await
}

fn totals(plots: &[PlotEntity]) -> (PlotTotals, i64, i64) {
    let mut t = PlotTotals::default();
    let (mut revenue, mut advance_value) = (0i64, 0i64);
    for plot in plots {
        t.total += 1;
        match plot.status {
            PlotStatus::Available => t.available += 1,
            PlotStatus::Advance => {
                t.advance += 1;
                advance_value = advance_value.saturating_add(plot.price);
            }
            PlotStatus::Sold => {
                t.sold += 1;
                revenue = revenue.saturating_add(plot.price);
            }
        }
    }
    (t, revenue, advance_value)
}

fn per_project(projects: &[ProjectEntity], plots: &[PlotEntity]) -> Vec<ProjectSales> {
    let mut rows: Vec<ProjectSales> = projects
        .iter()
        .map(|p| {
            let mine = plots.iter().filter(|plot| plot.project_id == p.id);
            let (total, sold, revenue) = mine.fold((0i64, 0i64, 0i64), |(t, s, r), plot| {
                if plot.status == PlotStatus::Sold {
                    (t + 1, s + 1, r.saturating_add(plot.price))
                } else {
                    (t + 1, s, r)
                }
            });
            ProjectSales {
                project_id: p.id.clone(),
                name: p.name.clone(),
                total,
                sold,
                revenue,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    rows
}

/// Calendar months ending with the current one, oldest first.
fn month_keys(now: DateTime<Utc>, months: u32) -> Vec<String> {
    let (mut year, mut month) = (now.year(), now.month());
    let mut keys = Vec::with_capacity(months as usize);
    for _ in 0..months {
        keys.push(format!("{year:04}-{month:02}"));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    keys.reverse();
    keys
}

fn monthly(plots: &[PlotEntity], now: DateTime<Utc>, months: u32) -> Vec<MonthlySales> {
    let mut buckets: Vec<MonthlySales> = month_keys(now, months)
        .into_iter()
        .map(|month| MonthlySales {
            month,
            sold: 0,
            revenue: 0,
        })
        .collect();

    for plot in plots.iter().filter(|p| p.status == PlotStatus::Sold) {
        let Some(sold_at) = plot.sold_at else { continue };
        let key = sold_at.format("%Y-%m").to_string();
        if let Some(bucket) = buckets.iter_mut().find(|b| b.month == key) {
            bucket.sold += 1;
            bucket.revenue = bucket.revenue.saturating_add(plot.price);
        }
    }
    buckets
}

fn zero_filled<S: Copy + Eq + std::hash::Hash>(
    counts: &HashMap<S, i64>,
    all: &[S],
    code: fn(&S) -> &'static str,
) -> BTreeMap<&'static str, i64> {
    all.iter()
        .map(|s| (code(s), counts.get(s).copied().unwrap_or(0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::user::user_entity::Role;
    use crate::domain::common::service::test_support::{seed_plot, seed_project, seed_user};
    use crate::errors::AppError;
    use axum::http::StatusCode;
    use chrono::TimeZone;

    #[test]
    fn month_keys_cross_year_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap();
        assert_eq!(month_keys(now, 4), ["2024-11", "2024-12", "2025-01", "2025-02"]);
    }

    #[tokio::test]
    async fn report_sums_sold_and_advance_values() {
        let db = Database::open_in_memory().unwrap();
        let manager = seed_user(&db, "m1", Role::Manager).await;
        seed_project(&db, "pr1").await;
        seed_plot(&db, "a", "pr1", 100).await;
        let mut sold = seed_plot(&db, "b", "pr1", 300).await;
        let mut booked = seed_plot(&db, "c", "pr1", 50).await;

        sold.status = PlotStatus::Sold;
        sold.sold_at = Some(Utc::now());
        booked.status = PlotStatus::Advance;
        db.with_conn(move |conn| {
            let repo = PlotRepository::new(conn);
            repo.update(&sold)?;
            repo.update(&booked)
        })
        .await
        .unwrap();

        let report = get_sales_report(&db, manager, SalesQuery { months: Some(3) })
            .await
            .unwrap();
        assert_eq!(report.plots.total, 3);
        assert_eq!(report.plots.sold, 1);
        assert_eq!(report.revenue, 300);
        assert_eq!(report.advance_value, 50);
        assert_eq!(report.monthly.len(), 3);
        assert_eq!(report.monthly[2].sold, 1);
        assert_eq!(report.monthly[0].revenue, 0);
        assert_eq!(report.projects[0].revenue, 300);
        assert_eq!(report.requests.visit["PENDING"], 0);
        assert_eq!(report.requests.buy.len(), 3);
    }

    #[test]
    fn revenue_saturates_instead_of_overflowing() {
        let now = Utc::now();
        let sold = |id: &str| PlotEntity {
            id: id.into(),
            project_id: "pr1".into(),
            plot_number: id.into(),
            title: None,
            area_sq_yards: 100.0,
            price: i64::MAX - 1,
            facing: None,
            status: PlotStatus::Sold,
            owner_id: Some("c1".into()),
            image_url: None,
            sold_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        let plots = [sold("a"), sold("b")];

        let (_, revenue, _) = totals(&plots);
        assert_eq!(revenue, i64::MAX);
        assert_eq!(monthly(&plots, now, 1)[0].revenue, i64::MAX);
    }

    #[tokio::test]
    async fn months_are_bounded() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;
        for months in [0, 37] {
            let err = get_sales_report(&db, admin.clone(), SalesQuery { months: Some(months) })
                .await
                .unwrap_err();
            assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
        }
    }
}
