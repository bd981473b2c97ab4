use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::Deserialize;

use staffgate_core::StoreError;

use crate::{StaffRecord, StaffRole};

/// Source of staff records, queried by email within one category.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(
        &self,
        role: StaffRole,
        email: &str,
    ) -> Result<Option<StaffRecord>, StoreError>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn find_by_email(
        &self,
        role: StaffRole,
        email: &str,
    ) -> Result<Option<StaffRecord>, StoreError> {
        (**self).find_by_email(role, email).await
    }
}

/// Seed document for [`InMemoryStaffDirectory`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffSeed {
    #[serde(default)]
    pub teaching: Vec<StaffRecord>,
    #[serde(default)]
    pub nonteaching: Vec<StaffRecord>,
}

/// In-memory staff directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStaffDirectory {
    inner: RwLock<HashMap<(StaffRole, String), StaffRecord>>,
}

impl InMemoryStaffDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: StaffSeed) -> Self {
        let teaching = seed.teaching.into_iter().map(|r| (StaffRole::Teaching, r));
        let nonteaching = seed.nonteaching.into_iter().map(|r| (StaffRole::NonTeaching, r));
        let map = teaching
            .chain(nonteaching)
            .map(|(role, r)| ((role, r.off_email.clone()), r))
            .collect();
        Self {
            inner: RwLock::new(map),
        }
    }

    /// Insert or replace; emails are unique within a category.
    pub fn insert(&self, role: StaffRole, record: StaffRecord) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| Self::poisoned())?;
        map.insert((role, record.off_email.clone()), record);
        Ok(())
    }

    fn poisoned() -> StoreError {
        StoreError::new("staff directory lock poisoned")
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryStaffDirectory {
    async fn find_by_email(
        &self,
        role: StaffRole,
        email: &str,
    ) -> Result<Option<StaffRecord>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| Self::poisoned())?;
        Ok(map.get(&(role, email.to_string())).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn categories_are_disjoint() {
        let dir = InMemoryStaffDirectory::new();
        dir.insert(StaffRole::Teaching, StaffRecord::new("t@x.edu", "secret"))
            .unwrap();

        assert!(dir
            .find_by_email(StaffRole::Teaching, "t@x.edu")
            .await
            .unwrap()
            .is_some());
        assert!(dir
            .find_by_email(StaffRole::NonTeaching, "t@x.edu")
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn seed_loads_both_categories() {
        let seed: StaffSeed = serde_json::from_str(
            r#"{
                "teaching": [{"off_email":"t@x.edu","password":"a","emp_id":"TCH00123"}],
                "nonteaching": [{"off_email":"n@x.edu","password":"b","id":7}]
            }"#,
        )
        .unwrap();
        let dir = InMemoryStaffDirectory::from_seed(seed);
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn insert_reports_poisoned_lock() {
        let dir = Arc::new(InMemoryStaffDirectory::new());
        let held = Arc::clone(&dir);
        let _ = std::thread::spawn(move || {
            let _guard = held.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        let err = dir
            .insert(StaffRole::Teaching, StaffRecord::new("t@x.edu", "secret"))
            .unwrap_err();
        assert_eq!(err, StoreError::new("staff directory lock poisoned"));
    }
}
