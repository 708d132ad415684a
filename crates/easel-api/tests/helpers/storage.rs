use async_trait::async_trait;
use easel_storage::{Storage, StorageBackend, StorageError, StorageResult};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

pub const TEST_MEDIA_BASE_URL: &str = "http://localhost:4000/media";

/// Temporary directory backing a `LocalStorage` for one test.
pub struct TestStorage {
    pub temp_dir: TempDir,
    pub base_path: PathBuf,
    pub base_url: String,
}

impl TestStorage {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let base_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            base_path,
            base_url: TEST_MEDIA_BASE_URL.to_string(),
        }
    }

    pub fn base_path_str(&self) -> String {
        self.base_path.to_string_lossy().to_string()
    }

    /// Storage key of a URL handed out by the local backend.
    pub fn key_for_url<'a>(&self, url: &'a str) -> &'a str {
        url.strip_prefix(&format!("{}/", self.base_url))
            .unwrap_or_else(|| panic!("{url} is not under {}", self.base_url))
    }

    pub fn path_for_url(&self, url: &str) -> PathBuf {
        self.base_path.join(self.key_for_url(url))
    }

    pub fn root(&self) -> &Path {
        &self.base_path
    }
}

impl Default for TestStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Backend where every key is already taken.
pub struct OccupiedStorage;

#[async_trait]
impl Storage for OccupiedStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<()> {
        Err(StorageError::AlreadyExists(storage_key.to_string()))
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Ok(true)
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", TEST_MEDIA_BASE_URL, storage_key)
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// In-memory backend serving objects from a CDN host; remembers every upload.
#[derive(Default)]
pub struct CdnStorage {
    uploads: Mutex<Vec<(String, String)>>,
}

impl CdnStorage {
    pub const BASE_URL: &'static str = "https://cdn.test/bucket";

    /// `(key, content_type)` of each upload, in order.
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for CdnStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        _data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.uploads
            .lock()
            .unwrap()
            .push((storage_key.to_string(), content_type.to_string()));
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.uploads.lock().unwrap().iter().any(|(k, _)| k == storage_key))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", Self::BASE_URL, storage_key)
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
