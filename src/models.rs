use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Identity & Session ---

/// Role
///
/// The RBAC field of an identity. Encoded on the wire as an integer:
/// `0` is a regular authenticated reader/author, `1` is an administrator.
/// No other values are defined, so deserialization rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Role {
    #[default]
    Regular,
    Admin,
}

impl Role {
    /// satisfies
    ///
    /// A `Regular` requirement is met by any authenticated role; an `Admin`
    /// requirement only by `Admin`.
    pub fn satisfies(self, required: Role) -> bool {
        match required {
            Role::Regular => true,
            Role::Admin => self == Role::Admin,
        }
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> u8 {
        match role {
            Role::Regular => 0,
            Role::Admin => 1,
        }
    }
}

impl TryFrom<u8> for Role {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Regular),
            1 => Ok(Role::Admin),
            other => Err(format!("unknown role {other}")),
        }
    }
}

/// User
///
/// The identity record returned by the auth API. Its JSON form is also what
/// gets persisted under the `user` key of client storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[ts(type = "0 | 1")]
    #[schema(value_type = u8)]
    pub role: Role,
    pub avatar_url: Option<String>,
}

/// Session
///
/// Snapshot of the visitor's authentication state. The live value is owned by
/// `SessionStore`; everything else only ever sees clones of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub user: Option<User>,
    pub is_logged_in: bool,
    pub is_initializing: bool,
}

impl Default for Session {
    /// A fresh process starts uninitialized and logged out.
    fn default() -> Self {
        Self {
            user: None,
            is_logged_in: false,
            is_initializing: true,
        }
    }
}

impl Session {
    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.avatar_url.as_deref())
    }
}

// --- Auth API Payloads ---

/// Credentials
///
/// Input payload for `POST /api/auth/login`. Not `Debug`: carries the
/// plaintext password.
#[derive(Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// RegisterRequest
///
/// Input payload for `POST /api/auth/register`. Not `Debug` for the same
/// reason as `Credentials`.
#[derive(Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

// --- UI State ---

/// Modal
///
/// Which auth dialog is currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Modal {
    #[default]
    #[serde(rename = "none")]
    Hidden,
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme {other}")),
        }
    }
}

// --- Search ---

/// SortOrder
///
/// Feed ordering selectable from the search page. `Comprehensive` is the
/// default and is left out of the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortOrder {
    #[default]
    Comprehensive,
    Latest,
    Hottest,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Comprehensive => "comprehensive",
            SortOrder::Latest => "latest",
            SortOrder::Hottest => "hottest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comprehensive" => Ok(SortOrder::Comprehensive),
            "latest" => Ok(SortOrder::Latest),
            "hottest" => Ok(SortOrder::Hottest),
            other => Err(format!("unknown sort order {other}")),
        }
    }
}

/// SearchQuery
///
/// In-memory search state. Mirrors the `q`, `tag` and `sort` parameters of
/// the `/search` location.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SearchQuery {
    pub keyword: String,
    pub tag: Option<String>,
    pub sort: SortOrder,
}

/// SearchUpdate
///
/// Partial update payload for `PATCH /api/search`. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SearchUpdate {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

// --- View Models (Output) ---

/// PageView
///
/// What a page route hands to the hydrated client: which page, who is looking
/// at it, and the auth/theme chrome around it. Layout is the client's business.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageView {
    pub page: String,
    pub session: Session,
    pub modal: Modal,
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SearchView {
    pub query: SearchQuery,
    pub location: String,
    pub changed: bool,
}

/// LoginOutcome
///
/// Result of a successful modal login. `navigate_to` carries the path recorded
/// by an earlier guard denial, if any.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginOutcome {
    pub session: Session,
    pub navigate_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ModalView {
    pub modal: Modal,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ThemeView {
    pub theme: Theme,
}
