//! Built-in route catalog for the LMS backend services.
//!
//! Used whenever the configuration does not list its own routes. Service keys
//! resolve through `SERVICE_NAME_<KEY>`.

use crate::config::schema::RouteConfig;

pub const STORAGE: &str = "STORAGE";
pub const AUTH: &str = "AUTH";
pub const LECTURER: &str = "LEC";
pub const PAYMENT: &str = "PAY";
pub const COURSE: &str = "COURSE";
pub const NOTIFICATION: &str = "NOTIFICATION";

/// The default route table, in registration order.
pub fn builtin_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/cap", STORAGE, "/capcheck", "CAPTCHA validation service"),
        RouteConfig::new("/create", AUTH, "/api/v1/users", "User creation endpoint"),
        RouteConfig::new(
            "/getenrolledcoursedatabyuid",
            AUTH,
            "/api/v1/users/courses",
            "Gets enrolled courses for a user ID",
        ),
        RouteConfig::new("/login", AUTH, "/api/v1/auth", "User authentication endpoint"),
        RouteConfig::new("/register", AUTH, "/api/v1/users", "User registration endpoint"),
        RouteConfig::new("/hi", AUTH, "/yo", "Test endpoint"),
        RouteConfig::new(
            "/lecget",
            LECTURER,
            "/api/v1/lecturer/get",
            "Get single lecturer data - viewable for any user role",
        ),
        RouteConfig::new("/checkout", PAYMENT, "", "Stripe checkout session creation"),
        RouteConfig::new("/courses", COURSE, "/api/v1/courses", "Course management endpoints"),
        RouteConfig::new(
            "/notify",
            NOTIFICATION,
            "/notifications",
            "Notification service endpoints",
        ),
        RouteConfig::new(
            "/browse",
            COURSE,
            "/api/v1/courses",
            "Get all courses with CRUD operations - Frontend displays them filtered by approval state",
        ),
        RouteConfig::new("/addcoursecontent", COURSE, "/api/v1/content", "Course content management"),
        RouteConfig::new("/upload", STORAGE, "/api/upload", "File upload service"),
        RouteConfig::new("/getallusers", AUTH, "/api/v1/users", "Admin endpoint to get all users"),
    ]
}

/// Service keys referenced by the built-in catalog.
pub fn builtin_services() -> [&'static str; 6] {
    [STORAGE, AUTH, LECTURER, PAYMENT, COURSE, NOTIFICATION]
}
