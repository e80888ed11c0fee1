use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::api::dto::inventory_dto::{PlotListQuery, ProjectListQuery};
use crate::api::dto::paginated_response::PaginatedResponse;
use crate::api::dto::request_dto::{CameraListQuery, NotificationListQuery, SalesQuery, StatusQuery};
use crate::api::dto::user_dto::UserListQuery;
use crate::config::AppConfig;
use crate::core::client::identity_client::{HttpIdentityDirectory, IdentityDirectory};
use crate::core::persistence::banner_ad::banner_ad_entity::BannerAdEntity;
use crate::core::persistence::buy_request::buy_request_entity::BuyRequestEntity;
use crate::core::persistence::camera::camera_entity::CameraEntity;
use crate::core::persistence::database::Database;
use crate::core::persistence::feedback::feedback_entity::FeedbackEntity;
use crate::core::persistence::land::land_entity::LandEntity;
use crate::core::persistence::land_camera::land_camera_entity::LandCameraEntity;
use crate::core::persistence::leave_request::leave_request_entity::LeaveRequestEntity;
use crate::core::persistence::logs::log_repository::LogRepositoryImpl;
use crate::core::persistence::notification::notification_entity::NotificationEntity;
use crate::core::persistence::office::office_entity::OfficeEntity;
use crate::core::persistence::plot::plot_entity::PlotEntity;
use crate::core::persistence::project::project_entity::ProjectEntity;
use crate::core::persistence::sell_request::sell_request_entity::SellRequestEntity;
use crate::core::persistence::user::user_entity::UserEntity;
use crate::core::persistence::visit_request::visit_request_entity::VisitRequestEntity;
use crate::core::util::signature_util::WebhookHeaders;
use crate::domain::analytics::service::sales_service::SalesReport;
use crate::domain::common::model::{Actor, ReviewRejectRequest};
use crate::domain::engagement::dto::banner_ad_upsert_request::BannerAdUpsertRequest;
use crate::domain::engagement::dto::feedback_create_request::FeedbackCreateRequest;
use crate::domain::engagement::dto::notification_broadcast_request::NotificationBroadcastRequest;
use crate::domain::engagement::service::feedback_service::FeedbackSummary;
use crate::domain::inventory::dto::plot_request::{PlotCreateRequest, PlotStatusRequest, PlotUpdateRequest};
use crate::domain::inventory::dto::project_upsert_request::ProjectUpsertRequest;
use crate::domain::inventory::service::project_service::ProjectDetail;
use crate::domain::property::dto::camera_request::{CameraAssignRequest, CameraUpsertRequest};
use crate::domain::property::dto::land_upsert_request::LandUpsertRequest;
use crate::domain::property::service::land_service::LandDetail;
use crate::domain::request::dto::buy_request_create_request::BuyRequestCreateRequest;
use crate::domain::request::dto::sell_request_create_request::SellRequestCreateRequest;
use crate::domain::request::dto::visit_request_create_request::VisitRequestCreateRequest;
use crate::domain::request::service::visit_request_service::{self, VisitPassCheck};
use crate::domain::staff::dto::leave_request_create_request::LeaveRequestCreateRequest;
use crate::domain::system::service::log_service::LogService;
use crate::domain::system::service::status_service::{self, SystemStatus};
use crate::domain::user::dto::office_upsert_request::OfficeUpsertRequest;
use crate::domain::user::dto::user_update_request::{UserAdminUpdateRequest, UserProfileUpdateRequest};
use crate::domain::user::service::identity_service;

/// Forward facade methods to free service functions, passing the shared database first.
macro_rules! delegate_async_service {
    ($(fn $name:ident($($arg:ident : $typ:ty),*) -> $ret:ty => $path:path;)+) => {
        $(
            pub async fn $name(&self, $($arg: $typ),*) -> anyhow::Result<$ret> {
                $path(&self.db, $($arg),*).await
            }
        )+
    };
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub log_service: Arc<LogService<LogRepositoryImpl>>,
    pub system_service: Arc<SystemService>,
    pub user_service: Arc<UserService>,
    pub inventory_service: Arc<InventoryService>,
    pub property_service: Arc<PropertyService>,
    pub request_service: Arc<RequestService>,
    pub engagement_service: Arc<EngagementService>,
    pub staff_service: Arc<StaffService>,
    pub analytics_service: Arc<AnalyticsService>,
}

/// State wired to the HTTP identity provider from `config`.
pub fn build_app_state(db: Database, config: &AppConfig) -> AppState {
    let directory = HttpIdentityDirectory::new(
        config.identity_api_url.clone(),
        config.identity_api_key.clone(),
    );
    build_app_state_with(db, config, Arc::new(directory))
}

pub fn build_app_state_with(
    db: Database,
    config: &AppConfig,
    directory: Arc<dyn IdentityDirectory>,
) -> AppState {
    AppState {
        config: Arc::new(config.clone()),
        log_service: Arc::new(LogService::new(LogRepositoryImpl::new(config.log_dir.clone()))),
        system_service: Arc::new(SystemService {
            db: db.clone(),
            started_at: Instant::now(),
        }),
        user_service: Arc::new(UserService {
            db: db.clone(),
            directory,
            webhook_secret: config.webhook_secret.clone(),
        }),
        inventory_service: Arc::new(InventoryService { db: db.clone() }),
        property_service: Arc::new(PropertyService { db: db.clone() }),
        request_service: Arc::new(RequestService {
            db: db.clone(),
            public_base_url: config.public_base_url.clone(),
        }),
        engagement_service: Arc::new(EngagementService { db: db.clone() }),
        staff_service: Arc::new(StaffService { db: db.clone() }),
        analytics_service: Arc::new(AnalyticsService { db }),
    }
}

pub struct SystemService {
    db: Database,
    started_at: Instant,
}

impl SystemService {
    pub async fn status(&self, actor: Actor) -> anyhow::Result<SystemStatus> {
        status_service::status(&self.db, actor, self.started_at).await
    }
}

pub struct UserService {
    db: Database,
    directory: Arc<dyn IdentityDirectory>,
    webhook_secret: Option<String>,
}

impl UserService {
    delegate_async_service! {
        fn find_user(id: String) -> Option<UserEntity> => crate::domain::user::service::user_service::find_user;
        fn get_me(actor: Actor) -> UserEntity => crate::domain::user::service::user_service::get_me;
        fn update_me(actor: Actor, req: UserProfileUpdateRequest) -> UserEntity => crate::domain::user::service::user_service::update_me;
        fn list_users(actor: Actor, q: UserListQuery) -> PaginatedResponse<UserEntity> => crate::domain::user::service::user_service::list_users;
        fn get_user(actor: Actor, id: String) -> UserEntity => crate::domain::user::service::user_service::get_user;
        fn update_user(actor: Actor, id: String, req: UserAdminUpdateRequest) -> UserEntity => crate::domain::user::service::user_service::update_user;
        fn delete_user(actor: Actor, id: String) -> Value => crate::domain::user::service::user_service::delete_user;

        fn list_offices() -> Vec<OfficeEntity> => crate::domain::user::service::office_service::list_offices;
        fn get_office(id: String) -> OfficeEntity => crate::domain::user::service::office_service::get_office;
        fn create_office(actor: Actor, req: OfficeUpsertRequest) -> OfficeEntity => crate::domain::user::service::office_service::create_office;
        fn update_office(actor: Actor, id: String, req: OfficeUpsertRequest) -> OfficeEntity => crate::domain::user::service::office_service::update_office;
        fn delete_office(actor: Actor, id: String) -> Value => crate::domain::user::service::office_service::delete_office;
    }

    pub async fn sync_user(&self, actor: Actor, id: String) -> anyhow::Result<UserEntity> {
        identity_service::sync_user(&self.db, self.directory.as_ref(), actor, id).await
    }

    pub async fn handle_identity_webhook(
        &self,
        headers: WebhookHeaders<'_>,
        body: &[u8],
    ) -> anyhow::Result<Value> {
        identity_service::handle_identity_webhook(
            &self.db,
            self.webhook_secret.as_deref(),
            headers,
            body,
        )
        .await
    }
}

pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    delegate_async_service! {
        fn list_projects(q: ProjectListQuery) -> Vec<ProjectEntity> => crate::domain::inventory::service::project_service::list_projects;
        fn get_project(id: String) -> ProjectDetail => crate::domain::inventory::service::project_service::get_project;
        fn create_project(actor: Actor, req: ProjectUpsertRequest) -> ProjectEntity => crate::domain::inventory::service::project_service::create_project;
        fn update_project(actor: Actor, id: String, req: ProjectUpsertRequest) -> ProjectEntity => crate::domain::inventory::service::project_service::update_project;
        fn delete_project(actor: Actor, id: String) -> Value => crate::domain::inventory::service::project_service::delete_project;

        fn list_plots(q: PlotListQuery) -> PaginatedResponse<PlotEntity> => crate::domain::inventory::service::plot_service::list_plots;
        fn get_plot(id: String) -> PlotEntity => crate::domain::inventory::service::plot_service::get_plot;
        fn create_plot(actor: Actor, req: PlotCreateRequest) -> PlotEntity => crate::domain::inventory::service::plot_service::create_plot;
        fn update_plot(actor: Actor, id: String, req: PlotUpdateRequest) -> PlotEntity => crate::domain::inventory::service::plot_service::update_plot;
        fn delete_plot(actor: Actor, id: String) -> Value => crate::domain::inventory::service::plot_service::delete_plot;
        fn update_plot_status(actor: Actor, id: String, req: PlotStatusRequest) -> PlotEntity => crate::domain::inventory::service::plot_service::update_plot_status;
    }
}

pub struct PropertyService {
    db: Database,
}

impl PropertyService {
    delegate_async_service! {
        fn list_lands(actor: Actor) -> Vec<LandEntity> => crate::domain::property::service::land_service::list_lands;
        fn get_land(actor: Actor, id: String) -> LandDetail => crate::domain::property::service::land_service::get_land;
        fn create_land(actor: Actor, req: LandUpsertRequest) -> LandEntity => crate::domain::property::service::land_service::create_land;
        fn update_land(actor: Actor, id: String, req: LandUpsertRequest) -> LandEntity => crate::domain::property::service::land_service::update_land;
        fn delete_land(actor: Actor, id: String) -> Value => crate::domain::property::service::land_service::delete_land;
        fn list_land_cameras(actor: Actor, land_id: String) -> Vec<CameraEntity> => crate::domain::property::service::land_service::list_land_cameras;
        fn assign_camera(actor: Actor, land_id: String, req: CameraAssignRequest) -> LandCameraEntity => crate::domain::property::service::land_service::assign_camera;
        fn unassign_camera(actor: Actor, land_id: String, camera_id: String) -> Value => crate::domain::property::service::land_service::unassign_camera;

        fn list_cameras(actor: Actor, q: CameraListQuery) -> Vec<CameraEntity> => crate::domain::property::service::camera_service::list_cameras;
        fn get_camera(actor: Actor, id: String) -> CameraEntity => crate::domain::property::service::camera_service::get_camera;
        fn create_camera(actor: Actor, req: CameraUpsertRequest) -> CameraEntity => crate::domain::property::service::camera_service::create_camera;
        fn update_camera(actor: Actor, id: String, req: CameraUpsertRequest) -> CameraEntity => crate::domain::property::service::camera_service::update_camera;
        fn delete_camera(actor: Actor, id: String) -> Value => crate::domain::property::service::camera_service::delete_camera;
    }
}

pub struct RequestService {
    db: Database,
    public_base_url: String,
}

impl RequestService {
    delegate_async_service! {
        fn create_visit_request(actor: Actor, req: VisitRequestCreateRequest) -> VisitRequestEntity => crate::domain::request::service::visit_request_service::create_visit_request;
        fn list_visit_requests(actor: Actor, q: StatusQuery) -> Vec<VisitRequestEntity> => crate::domain::request::service::visit_request_service::list_visit_requests;
        fn get_visit_request(actor: Actor, id: String) -> VisitRequestEntity => crate::domain::request::service::visit_request_service::get_visit_request;
        fn reject_visit_request(actor: Actor, id: String, req: ReviewRejectRequest) -> VisitRequestEntity => crate::domain::request::service::visit_request_service::reject_visit_request;
        fn verify_visit_pass(actor: Actor, token: String) -> VisitPassCheck => crate::domain::request::service::visit_request_service::verify_visit_pass;
        fn delete_visit_request(actor: Actor, id: String) -> Value => crate::domain::request::service::visit_request_service::delete_visit_request;
        fn expire_visit_passes(now: DateTime<Utc>) -> usize => crate::domain::request::service::visit_request_service::expire_visit_passes;

        fn create_buy_request(actor: Actor, req: BuyRequestCreateRequest) -> BuyRequestEntity => crate::domain::request::service::buy_request_service::create_buy_request;
        fn list_buy_requests(actor: Actor, q: StatusQuery) -> Vec<BuyRequestEntity> => crate::domain::request::service::buy_request_service::list_buy_requests;
        fn get_buy_request(actor: Actor, id: String) -> BuyRequestEntity => crate::domain::request::service::buy_request_service::get_buy_request;
        fn approve_buy_request(actor: Actor, id: String) -> BuyRequestEntity => crate::domain::request::service::buy_request_service::approve_buy_request;
        fn reject_buy_request(actor: Actor, id: String, req: ReviewRejectRequest) -> BuyRequestEntity => crate::domain::request::service::buy_request_service::reject_buy_request;
        fn delete_buy_request(actor: Actor, id: String) -> Value => crate::domain::request::service::buy_request_service::delete_buy_request;

        fn create_sell_request(actor: Actor, req: SellRequestCreateRequest) -> SellRequestEntity => crate::domain::request::service::sell_request_service::create_sell_request;
        fn list_sell_requests(actor: Actor, q: StatusQuery) -> Vec<SellRequestEntity> => crate::domain::request::service::sell_request_service::list_sell_requests;
        fn get_sell_request(actor: Actor, id: String) -> SellRequestEntity => crate::domain::request::service::sell_request_service::get_sell_request;
        fn approve_sell_request(actor: Actor, id: String) -> SellRequestEntity => crate::domain::request::service::sell_request_service::approve_sell_request;
        fn reject_sell_request(actor: Actor, id: String, req: ReviewRejectRequest) -> SellRequestEntity => crate::domain::request::service::sell_request_service::reject_sell_request;
        fn delete_sell_request(actor: Actor, id: String) -> Value => crate::domain::request::service::sell_request_service::delete_sell_request;
    }

    pub async fn approve_visit_request(
        &self,
        actor: Actor,
        id: String,
    ) -> anyhow::Result<VisitRequestEntity> {
        visit_request_service::approve_visit_request(&self.db, &self.public_base_url, actor, id)
            .await
    }
}

pub struct EngagementService {
    db: Database,
}

impl EngagementService {
    delegate_async_service! {
        fn create_feedback(actor: Actor, req: FeedbackCreateRequest) -> FeedbackEntity => crate::domain::engagement::service::feedback_service::create_feedback;
        fn list_feedback(actor: Actor) -> FeedbackSummary => crate::domain::engagement::service::feedback_service::list_feedback;
        fn delete_feedback(actor: Actor, id: String) -> Value => crate::domain::engagement::service::feedback_service::delete_feedback;

        fn list_notifications(actor: Actor, q: NotificationListQuery) -> Vec<NotificationEntity> => crate::domain::engagement::service::notification_service::list_notifications;
        fn unread_count(actor: Actor) -> Value => crate::domain::engagement::service::notification_service::unread_count;
        fn mark_read(actor: Actor, id: String) -> NotificationEntity => crate::domain::engagement::service::notification_service::mark_read;
        fn mark_all_read(actor: Actor) -> Value => crate::domain::engagement::service::notification_service::mark_all_read;
        fn delete_notification(actor: Actor, id: String) -> Value => crate::domain::engagement::service::notification_service::delete_notification;
        fn broadcast(actor: Actor, req: NotificationBroadcastRequest) -> Value => crate::domain::engagement::service::notification_service::broadcast;

        fn list_active_banner_ads() -> Vec<BannerAdEntity> => crate::domain::engagement::service::banner_ad_service::list_active_banner_ads;
        fn list_all_banner_ads(actor: Actor) -> Vec<BannerAdEntity> => crate::domain::engagement::service::banner_ad_service::list_all_banner_ads;
        fn create_banner_ad(actor: Actor, req: BannerAdUpsertRequest) -> BannerAdEntity => crate::domain::engagement::service::banner_ad_service::create_banner_ad;
        fn update_banner_ad(actor: Actor, id: String, req: BannerAdUpsertRequest) -> BannerAdEntity => crate::domain::engagement::service::banner_ad_service::update_banner_ad;
        fn toggle_banner_ad(actor: Actor, id: String) -> BannerAdEntity => crate::domain::engagement::service::banner_ad_service::toggle_banner_ad;
        fn delete_banner_ad(actor: Actor, id: String) -> Value => crate::domain::engagement::service::banner_ad_service::delete_banner_ad;
    }
}

pub struct StaffService {
    db: Database,
}

impl StaffService {
    delegate_async_service! {
        fn create_leave_request(actor: Actor, req: LeaveRequestCreateRequest) -> LeaveRequestEntity => crate::domain::staff::service::leave_request_service::create_leave_request;
        fn list_leave_requests(actor: Actor, q: StatusQuery) -> Vec<LeaveRequestEntity> => crate::domain::staff::service::leave_request_service::list_leave_requests;
        fn approve_leave_request(actor: Actor, id: String) -> LeaveRequestEntity => crate::domain::staff::service::leave_request_service::approve_leave_request;
        fn reject_leave_request(actor: Actor, id: String) -> LeaveRequestEntity => crate::domain::staff::service::leave_request_service::reject_leave_request;
        fn delete_leave_request(actor: Actor, id: String) -> Value => crate::domain::staff::service::leave_request_service::delete_leave_request;
    }
}

pub struct AnalyticsService {
    db: Database,
}

impl AnalyticsService {
    delegate_async_service! {
        fn get_sales_report(actor: Actor, q: SalesQuery) -> SalesReport => crate::domain::analytics::service::sales_service::get_sales_report;
    }
}
