use press_portal::storage::{
    ClientStorage, FileStorage, MemoryStorage, THEME_KEY, TOKEN_KEY, USER_KEY,
};
use std::path::PathBuf;
use uuid::Uuid;

fn temp_storage_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("press-portal-{}", Uuid::new_v4()))
        .join("storage.json")
}

#[cfg(test)]
mod memory_tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_set_get_remove() {
        let storage = MemoryStorage::new();

        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);

        storage.set(TOKEN_KEY, "abc").await.unwrap();
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("abc"));

        storage.remove(TOKEN_KEY).await.unwrap();
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
        // Removing twice is fine.
        storage.remove(TOKEN_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_failure() {
        let storage = MemoryStorage::new_failing();
        assert!(storage.get(USER_KEY).await.is_err());
        assert!(storage.set(USER_KEY, "{}").await.is_err());
        assert!(storage.remove(USER_KEY).await.is_err());
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;

    #[tokio::test]
    async fn test_file_storage_missing_file_reads_empty() {
        let storage = FileStorage::new(temp_storage_path());
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
        // Removing from a missing file does not create it.
        storage.remove(TOKEN_KEY).await.unwrap();
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_file_storage_persists_across_instances() {
        let path = temp_storage_path();

        let first = FileStorage::new(path.clone());
        first.set(TOKEN_KEY, "token-1").await.unwrap();
        first.set(THEME_KEY, "dark").await.unwrap();

        // A new instance over the same file sees the same data (page reload).
        let second = FileStorage::new(path.clone());
        assert_eq!(second.get(TOKEN_KEY).await.unwrap().as_deref(), Some("token-1"));
        assert_eq!(second.get(THEME_KEY).await.unwrap().as_deref(), Some("dark"));

        second.remove(TOKEN_KEY).await.unwrap();
        assert_eq!(first.get(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(first.get(THEME_KEY).await.unwrap().as_deref(), Some("dark"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_storage_corrupt_file_is_an_error() {
        let path = temp_storage_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(path.clone());
        assert!(storage.get(TOKEN_KEY).await.is_err());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
