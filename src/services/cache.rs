use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Lead;

const LEADS_FILE: &str = "apollo_leads_cache.json";
const METADATA_FILE: &str = "apollo_cache_metadata.json";

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Freshness metadata stored next to the cached leads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Epoch seconds at save time
    pub timestamp: f64,
    pub leads_count: usize,
    pub cache_expiry_hours: f64,
    pub created_at: String,
}

/// Cache state as reported to the operator
#[derive(Debug, Clone, PartialEq)]
pub enum CacheStatus {
    NoCache,
    Valid {
        leads_count: usize,
        age_hours: f64,
        expires_in_hours: f64,
        created_at: String,
    },
    Expired {
        leads_count: usize,
        age_hours: f64,
        created_at: String,
    },
}

/// Single-slot on-disk cache for fetched leads
///
/// Holds exactly one batch, the most recently fetched one, regardless of
/// the search parameters that produced it. Freshness comes from the
/// metadata file: the cache is usable while its age stays under the
/// configured expiry. A force refresh or `clear` drops the slot.
#[derive(Debug, Clone)]
pub struct LeadCache {
    dir: PathBuf,
    expiry_hours: f64,
}

impl LeadCache {
    pub fn new(dir: impl Into<PathBuf>, expiry_hours: f64) -> Self {
        Self {
            dir: dir.into(),
            expiry_hours,
        }
    }

    fn leads_path(&self) -> PathBuf {
        self.dir.join(LEADS_FILE)
    }

    fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    /// Whether the cached batch exists and has not expired
    pub fn is_valid(&self) -> bool {
        match self.read_metadata() {
            Ok(metadata) => {
                let age_hours = (now_epoch_secs() - metadata.timestamp) / 3600.0;
                age_hours < self.expiry_hours
            }
            Err(_) => false,
        }
    }

    /// Load the cached batch when present and fresh
    ///
    /// Expired or unreadable caches return None so the caller falls back
    /// to a live fetch.
    pub fn load(&self) -> Option<Vec<Lead>> {
        if !self.leads_path().exists() {
            return None;
        }

        if !self.is_valid() {
            tracing::debug!("Lead cache expired, will fetch fresh data");
            return None;
        }

        match self.read_leads() {
            Ok(leads) => {
                tracing::debug!("Loaded {} leads from cache", leads.len());
                Some(leads)
            }
            Err(e) => {
                tracing::warn!("Failed to read lead cache: {}", e);
                None
            }
        }
    }

    /// Persist a batch of leads together with freshness metadata
    pub fn save(&self, leads: &[Lead]) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir)?;

        let metadata = CacheMetadata {
            timestamp: now_epoch_secs(),
            leads_count: leads.len(),
            cache_expiry_hours: self.expiry_hours,
            created_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        std::fs::write(self.leads_path(), serde_json::to_string_pretty(leads)?)?;
        std::fs::write(
            self.metadata_path(),
            serde_json::to_string_pretty(&metadata)?,
        )?;

        tracing::debug!("Cached {} leads", leads.len());
        Ok(())
    }

    /// Remove both cache files if present
    pub fn clear(&self) -> Result<(), CacheError> {
        for path in [self.leads_path(), self.metadata_path()] {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }

        tracing::debug!("Cleared lead cache");
        Ok(())
    }

    /// Report the cache state without touching the cached leads
    pub fn status(&self) -> Result<CacheStatus, CacheError> {
        if !self.metadata_path().exists() {
            return Ok(CacheStatus::NoCache);
        }

        let metadata = self.read_metadata()?;
        let age_hours = (now_epoch_secs() - metadata.timestamp) / 3600.0;

        if age_hours < self.expiry_hours {
            Ok(CacheStatus::Valid {
                leads_count: metadata.leads_count,
                age_hours: round_hours(age_hours),
                expires_in_hours: round_hours(self.expiry_hours - age_hours),
                created_at: metadata.created_at,
            })
        } else {
            Ok(CacheStatus::Expired {
                leads_count: metadata.leads_count,
                age_hours: round_hours(age_hours),
                created_at: metadata.created_at,
            })
        }
    }

    fn read_leads(&self) -> Result<Vec<Lead>, CacheError> {
        let raw = std::fs::read_to_string(self.leads_path())?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn read_metadata(&self) -> Result<CacheMetadata, CacheError> {
        let raw = std::fs::read_to_string(self.metadata_path())?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn now_epoch_secs() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_leads() -> Vec<Lead> {
        vec![
            Lead {
                email: "a@example.com".to_string(),
                company_name: "Acme".to_string(),
                ..Default::default()
            },
            Lead {
                email: "b@example.com".to_string(),
                company_name: "Globex".to_string(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LeadCache::new(dir.path(), 24.0);

        cache.save(&sample_leads()).unwrap();

        let loaded = cache.load().expect("fresh cache should load");
        assert_eq!(loaded, sample_leads());
    }

    #[test]
    fn test_expired_cache_is_not_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LeadCache::new(dir.path(), 0.0);

        cache.save(&sample_leads()).unwrap();

        assert!(!cache.is_valid());
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_missing_cache_reports_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LeadCache::new(dir.path(), 24.0);

        assert!(!cache.is_valid());
        assert!(cache.load().is_none());
        assert_eq!(cache.status().unwrap(), CacheStatus::NoCache);
    }

    #[test]
    fn test_status_reports_valid_batch() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LeadCache::new(dir.path(), 24.0);

        cache.save(&sample_leads()).unwrap();

        match cache.status().unwrap() {
            CacheStatus::Valid {
                leads_count,
                age_hours,
                expires_in_hours,
                ..
            } => {
                assert_eq!(leads_count, 2);
                assert!(age_hours < 0.01);
                assert!(expires_in_hours > 23.0);
            }
            other => panic!("expected valid cache, got {:?}", other),
        }
    }

    #[test]
    fn test_clear_removes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LeadCache::new(dir.path(), 24.0);

        cache.save(&sample_leads()).unwrap();
        cache.clear().unwrap();

        assert_eq!(cache.status().unwrap(), CacheStatus::NoCache);
        assert!(cache.load().is_none());
    }
}
