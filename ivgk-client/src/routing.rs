//! Role-gated route resolution

use crate::session::Session;
use shared::models::UserRole;

pub const LOGIN_ROUTE: &str = "/login";

/// Known application routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    AdminDashboard,
    SuperAdminDashboard,
    SuperAdminUsers,
    SuperAdminPlans,
    SuperAdminCurrencies,
}

/// Who may open a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Sign-in pages; reachable with or without a session
    Guest,
    Authenticated,
    Admin,
    SuperAdmin,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::AdminDashboard,
        Route::SuperAdminDashboard,
        Route::SuperAdminUsers,
        Route::SuperAdminPlans,
        Route::SuperAdminCurrencies,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => LOGIN_ROUTE,
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::AdminDashboard => "/dashboard/admin",
            Self::SuperAdminDashboard => "/dashboard/super-admin",
            Self::SuperAdminUsers => "/dashboard/super-admin/users",
            Self::SuperAdminPlans => "/dashboard/super-admin/plans",
            Self::SuperAdminCurrencies => "/dashboard/super-admin/currencies",
        }
    }

    /// Match a path; a trailing slash is ignored
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL.into_iter().find(|r| r.path() == trimmed)
    }

    pub fn access(&self) -> Access {
        match self {
            Self::Home => Access::Public,
            Self::Login | Self::Register => Access::Guest,
            Self::Dashboard => Access::Authenticated,
            Self::AdminDashboard => Access::Admin,
            Self::SuperAdminDashboard
            | Self::SuperAdminUsers
            | Self::SuperAdminPlans
            | Self::SuperAdminCurrencies => Access::SuperAdmin,
        }
    }
}

/// Landing page after sign-in
pub fn dashboard_route(role: Option<UserRole>) -> &'static str {
    match role {
        Some(UserRole::SuperAdmin) => Route::SuperAdminDashboard.path(),
        Some(UserRole::Admin) => Route::AdminDashboard.path(),
        Some(UserRole::User) | None => Route::Dashboard.path(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(&'static str),
}

/// Decide whether the session may open `route`
///
/// Without both a token and a user every protected route sends the visitor
/// to `/login`. A signed-in user lacking the role lands on their own
/// dashboard.
pub fn guard(route: Route, session: &Session) -> Decision {
    let access = route.access();
    if matches!(access, Access::Public | Access::Guest) {
        return Decision::Allow;
    }

    let Some(user) = session.user.as_ref().filter(|_| session.is_authenticated()) else {
        return Decision::Redirect(LOGIN_ROUTE);
    };

    let permitted = match access {
        Access::Public | Access::Guest | Access::Authenticated => true,
        Access::Admin => matches!(user.role, UserRole::Admin | UserRole::SuperAdmin),
        Access::SuperAdmin => user.role == UserRole::SuperAdmin,
    };

    if permitted {
        Decision::Allow
    } else {
        let target = dashboard_route(Some(user.role));
        tracing::debug!(route = route.path(), target, "Role lacks access, redirecting");
        Decision::Redirect(target)
    }
}

/// [`guard`] for a raw path; unknown paths are allowed through
pub fn guard_path(path: &str, session: &Session) -> Decision {
    Route::from_path(path).map_or(Decision::Allow, |route| guard(route, session))
}
