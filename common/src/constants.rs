pub const DEFAULT_API_BASE_URL: &str =
    "https://tl5son9q35.execute-api.us-east-1.amazonaws.com/dev";
pub const DEFAULT_SEDE: &str = "pardo_miraflores";
pub const STAFF_FRONTEND: &str = "staff";
pub const TENANT_HEADER: &str = "x-tenant-id";

pub const REFRESH_INTERVAL_SECONDS: u64 = 5;
pub const HTTP_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

pub const ENV_API_URL: &str = "PARDOS_API_URL";
pub const ENV_SEDE: &str = "PARDOS_SEDE";
pub const ENV_REFRESH_SECONDS: &str = "PARDOS_REFRESH_SECS";
pub const ENV_HTTP_TIMEOUT_SECONDS: &str = "PARDOS_HTTP_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "PARDOS_LOG_LEVEL";

pub const LOCAL_LOGOUT_MESSAGE: &str = "Sesión cerrada localmente";
