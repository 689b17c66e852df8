use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    models::Theme,
    storage::{StorageState, THEME_KEY},
};

/// ThemeStore
///
/// Light/dark preference, remembered in client storage across visits.
pub struct ThemeStore {
    storage: StorageState,
    current: Mutex<Theme>,
}

pub type ThemeStoreState = Arc<ThemeStore>;

impl ThemeStore {
    pub fn new(storage: StorageState) -> Self {
        Self {
            storage,
            current: Mutex::new(Theme::default()),
        }
    }

    pub fn current(&self) -> Theme {
        *self.current.lock()
    }

    /// Reads the stored preference; anything missing or unrecognized is light.
    pub async fn load(&self) -> Theme {
        let theme = match self.storage.get(THEME_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!("theme: could not read preference: {}", e);
                Theme::default()
            }
        };
        *self.current.lock() = theme;
        theme
    }

    pub async fn set(&self, theme: Theme) -> Theme {
        *self.current.lock() = theme;
        if let Err(e) = self.storage.set(THEME_KEY, theme.as_str()).await {
            tracing::warn!("theme: could not persist preference: {}", e);
        }
        theme
    }

    pub async fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.set(next).await
    }
}
