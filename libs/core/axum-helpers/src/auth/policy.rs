use axum::http::Method;

/// Access level a request needs before it reaches a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Public,
    Authenticated,
    Admin,
}

/// Resolves the access level for a request.
///
/// Reads under `/api` and the liveness probe are open, writes under `/api`
/// need the admin role, anything else needs an authenticated caller.
pub fn required_access(method: &Method, path: &str) -> AccessLevel {
    if path == "/health" {
        return AccessLevel::Public;
    }

    if path == "/api" || path.starts_with("/api/") {
        if *method == Method::GET || *method == Method::HEAD {
            AccessLevel::Public
        } else {
            AccessLevel::Admin
        }
    } else {
        AccessLevel::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_under_api_are_public() {
        assert_eq!(required_access(&Method::GET, "/api/categories"), AccessLevel::Public);
        assert_eq!(required_access(&Method::HEAD, "/api/products/1"), AccessLevel::Public);
    }

    #[test]
    fn test_writes_under_api_need_admin() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            assert_eq!(required_access(&method, "/api/categories/1"), AccessLevel::Admin);
        }
    }

    #[test]
    fn test_health_is_public() {
        assert_eq!(required_access(&Method::GET, "/health"), AccessLevel::Public);
    }

    #[test]
    fn test_everything_else_needs_authentication() {
        assert_eq!(required_access(&Method::GET, "/"), AccessLevel::Authenticated);
        assert_eq!(required_access(&Method::GET, "/apiary"), AccessLevel::Authenticated);
        assert_eq!(required_access(&Method::POST, "/health/x"), AccessLevel::Authenticated);
    }
}
