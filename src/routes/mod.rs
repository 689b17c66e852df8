/// Router Module Index
///
/// Page and API routes split by who may reach them. Protection is applied
/// per module as a route layer in `create_router`, so a handler cannot end
/// up in the wrong group by accident.

/// Routes reachable by anyone: feeds, search, the denial landing pages and
/// the auth/search/theme JSON endpoints.
pub mod public;

/// Reader and creator pages behind the role-0 guard (redirects to `/400`).
pub mod authenticated;

/// Admin center pages behind the role-1 guard (redirects to `/403`).
pub mod admin;
