use press_portal::models::{
    Modal, Role, SearchQuery, SearchUpdate, Session, SortOrder, Theme, User,
};
use uuid::Uuid;

// --- Role ---

#[test]
fn test_role_is_an_integer_on_the_wire() {
    assert_eq!(serde_json::to_string(&Role::Regular).unwrap(), "0");
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "1");
    assert_eq!(serde_json::from_str::<Role>("1").unwrap(), Role::Admin);
}

#[test]
fn test_undefined_role_is_rejected() {
    assert!(serde_json::from_str::<Role>("2").is_err());
    assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
}

#[test]
fn test_role_satisfaction() {
    assert!(Role::Regular.satisfies(Role::Regular));
    assert!(Role::Admin.satisfies(Role::Regular));
    assert!(Role::Admin.satisfies(Role::Admin));
    assert!(!Role::Regular.satisfies(Role::Admin));
}

#[test]
fn test_user_record_matches_auth_api_shape() {
    let json = r#"{"id":"00000000-0000-0000-0000-000000000002","username":"admin","role":1,"avatar_url":null}"#;
    let user: User = serde_json::from_str(json).unwrap();
    assert_eq!(user.id, Uuid::from_u128(2));
    assert_eq!(user.role, Role::Admin);

    let back = serde_json::to_value(&user).unwrap();
    assert_eq!(back["role"], 1);
}

// --- Session ---

#[test]
fn test_default_session_is_initializing() {
    let session = Session::default();
    assert!(session.is_initializing);
    assert!(!session.is_logged_in);
    assert!(session.user.is_none());
    assert_eq!(session.role(), None);
    assert_eq!(session.username(), None);
}

// --- UI enums ---

#[test]
fn test_modal_serialization() {
    assert_eq!(serde_json::to_string(&Modal::Hidden).unwrap(), r#""none""#);
    assert_eq!(serde_json::to_string(&Modal::Login).unwrap(), r#""login""#);
    assert_eq!(
        serde_json::from_str::<Modal>(r#""register""#).unwrap(),
        Modal::Register
    );
    assert_eq!(Modal::default(), Modal::Hidden);
}

#[test]
fn test_theme_parsing_and_toggle() {
    assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
    assert!("sepia".parse::<Theme>().is_err());
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.toggled().as_str(), "light");
}

#[test]
fn test_sort_order_lowercase_names() {
    assert_eq!(
        serde_json::to_string(&SortOrder::Hottest).unwrap(),
        r#""hottest""#
    );
    assert_eq!("latest".parse::<SortOrder>().unwrap(), SortOrder::Latest);
    assert!("Latest".parse::<SortOrder>().is_err());
    assert_eq!(SortOrder::default(), SortOrder::Comprehensive);
}

#[test]
fn test_search_update_fields_are_optional() {
    let update: SearchUpdate = serde_json::from_str(r#"{"keyword":"rust"}"#).unwrap();
    assert_eq!(update.keyword.as_deref(), Some("rust"));
    assert!(update.tag.is_none());
    assert!(update.sort.is_none());

    let empty: SearchUpdate = serde_json::from_str("{}").unwrap();
    assert!(empty.keyword.is_none());
}

#[test]
fn test_default_search_query() {
    let query = SearchQuery::default();
    assert!(query.keyword.is_empty());
    assert!(query.tag.is_none());
    assert_eq!(query.sort, SortOrder::Comprehensive);
}
