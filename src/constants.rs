pub const APP_NAME: &str = "Starter Portal";
pub const APP_DESCRIPTION: &str = "A modern web application starter with authentication built in";

/// Page paths.
pub mod pages {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const DASHBOARD: &str = "/dashboard";
}

/// API paths.
pub mod api {
    pub const AUTH_SESSION: &str = "/api/auth/session";
    pub const AUTH_SIGNOUT: &str = "/api/auth/signout";
}
