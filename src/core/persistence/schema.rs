//! `SQLite` schema for the estate database.
//!
//! Statements are idempotent and run on every start.

pub const CREATE_USERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    name TEXT NOT NULL,
    phone TEXT,
    role TEXT NOT NULL,
    office_id TEXT REFERENCES offices(id) ON DELETE SET NULL,
    image_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

pub const CREATE_OFFICES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS offices (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    phone TEXT,
    email TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

pub const CREATE_PROJECTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    location TEXT NOT NULL,
    city TEXT NOT NULL,
    image_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

pub const CREATE_PLOTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS plots (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    plot_number TEXT NOT NULL,
    title TEXT,
    area_sq_yards REAL NOT NULL,
    price INTEGER NOT NULL,
    facing TEXT,
    status TEXT NOT NULL,
    owner_id TEXT REFERENCES users(id) ON DELETE SET NULL,
    image_url TEXT,
    sold_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (project_id, plot_number)
)
";

pub const CREATE_LANDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS lands (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    plot_id TEXT REFERENCES plots(id) ON DELETE SET NULL,
    name TEXT NOT NULL,
    area_sq_yards REAL NOT NULL,
    location TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

pub const CREATE_CAMERAS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS cameras (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    stream_url TEXT NOT NULL,
    location TEXT,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

pub const CREATE_LAND_CAMERAS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS land_cameras (
    land_id TEXT NOT NULL REFERENCES lands(id) ON DELETE CASCADE,
    camera_id TEXT NOT NULL UNIQUE REFERENCES cameras(id) ON DELETE CASCADE,
    assigned_by TEXT NOT NULL,
    assigned_at TEXT NOT NULL,
    PRIMARY KEY (land_id, camera_id)
)
";

pub const CREATE_VISIT_REQUESTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS visit_requests (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    plot_id TEXT NOT NULL REFERENCES plots(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    visit_date TEXT NOT NULL,
    visit_time TEXT,
    message TEXT,
    status TEXT NOT NULL,
    qr_token TEXT UNIQUE,
    qr_code TEXT,
    expires_at TEXT,
    reviewed_by TEXT,
    rejection_reason TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

pub const CREATE_BUY_REQUESTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS buy_requests (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    plot_id TEXT NOT NULL REFERENCES plots(id) ON DELETE CASCADE,
    offer_price INTEGER,
    message TEXT,
    status TEXT NOT NULL,
    reviewed_by TEXT,
    rejection_reason TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

pub const CREATE_SELL_REQUESTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS sell_requests (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    land_id TEXT NOT NULL,
    asking_price INTEGER NOT NULL,
    reason TEXT,
    status TEXT NOT NULL,
    reviewed_by TEXT,
    rejection_reason TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

pub const CREATE_FEEDBACK_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS feedback (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    message TEXT NOT NULL,
    created_at TEXT NOT NULL
)
";

pub const CREATE_NOTIFICATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    message TEXT NOT NULL,
    kind TEXT NOT NULL,
    read INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
)
";

pub const CREATE_LEAVE_REQUESTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS leave_requests (
    id TEXT PRIMARY KEY,
    manager_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    reason TEXT NOT NULL,
    status TEXT NOT NULL,
    reviewed_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

pub const CREATE_BANNER_ADS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS banner_ads (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    image_url TEXT NOT NULL,
    link_url TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    display_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_plots_project ON plots(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_plots_status ON plots(status)",
    "CREATE INDEX IF NOT EXISTS idx_lands_owner ON lands(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_visit_requests_user ON visit_requests(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_visit_requests_status ON visit_requests(status)",
    "CREATE INDEX IF NOT EXISTS idx_buy_requests_plot ON buy_requests(plot_id)",
    "CREATE INDEX IF NOT EXISTS idx_sell_requests_land ON sell_requests(land_id)",
    "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_leave_requests_manager ON leave_requests(manager_id)",
];

/// Table creation order respects foreign keys.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_OFFICES_TABLE,
    CREATE_USERS_TABLE,
    CREATE_PROJECTS_TABLE,
    CREATE_PLOTS_TABLE,
    CREATE_LANDS_TABLE,
    CREATE_CAMERAS_TABLE,
    CREATE_LAND_CAMERAS_TABLE,
    CREATE_VISIT_REQUESTS_TABLE,
    CREATE_BUY_REQUESTS_TABLE,
    CREATE_SELL_REQUESTS_TABLE,
    CREATE_FEEDBACK_TABLE,
    CREATE_NOTIFICATIONS_TABLE,
    CREATE_LEAVE_REQUESTS_TABLE,
    CREATE_BANNER_ADS_TABLE,
    CREATE_METADATA_TABLE,
];

/// Tables reported by the status endpoint and debug mode.
pub const COUNTED_TABLES: &[&str] = &[
    "users",
    "offices",
    "projects",
    "plots",
    "lands",
    "cameras",
    "visit_requests",
    "buy_requests",
    "sell_requests",
    "feedback",
    "notifications",
    "leave_requests",
    "banner_ads",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plots_are_unique_per_project() {
        assert!(CREATE_PLOTS_TABLE.contains("UNIQUE (project_id, plot_number)"));
    }

    #[test]
    fn a_camera_watches_one_land() {
        assert!(CREATE_LAND_CAMERAS_TABLE.contains("camera_id TEXT NOT NULL UNIQUE"));
    }

    #[test]
    fn counted_tables_exist_in_schema() {
        for table in COUNTED_TABLES {
            let needle = format!("CREATE TABLE IF NOT EXISTS {table} ");
            assert!(
                SCHEMA_STATEMENTS.iter().any(|s| s.contains(&needle)),
                "missing table {table}"
            );
        }
    }
}
