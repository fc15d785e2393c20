//! Backend path allowlist.
//!
//! Only sub-paths under a fixed set of resource prefixes may be forwarded.
//! Matching is purely textual and case-sensitive: a sub-path is allowed if
//! it equals a prefix or continues it with a `/` segment boundary, so
//! `/users/42` matches `/users` while `/usersettings` does not.

/// Backend resource prefixes reachable through the proxy.
pub const ALLOWED_PREFIXES: &[&str] = &[
    "/auth",
    "/users",
    "/roles",
    "/challenges",
    "/challenge-templates",
    "/smt-api",
    "/plans",
    "/withdrawals",
    "/verification",
    "/mailer",
    "/dashboard",
    "/addons",
    "/relation-addons",
    "/broker-accounts",
];

#[must_use]
pub fn is_allowed(sub_path: &str) -> bool {
    is_allowed_in(ALLOWED_PREFIXES, sub_path)
}

#[must_use]
pub fn is_allowed_in(prefixes: &[&str], sub_path: &str) -> bool {
    prefixes.iter().any(|prefix| {
        sub_path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}
