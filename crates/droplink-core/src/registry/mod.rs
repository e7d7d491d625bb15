//! Pairing-code registry and file-association ledger.
//!
//! Both maps are guarded by a single mutex, and every public operation holds
//! it for its full duration. A code observed as live by one operation cannot
//! be retracted by a concurrently running sweep before that operation's write
//! lands. Critical sections are a handful of map operations; nothing awaits
//! while the lock is held.

mod codes;
mod files;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::error::AppError;
use crate::models::{CodeIssued, DeviceInfo, FileRecord};
use codes::CodeTable;
use files::FileLedger;

/// Attempts before giving up when every generated code collides with an
/// active one. With a 900k value space this only trips when the active set
/// is pathologically dense.
const MAX_GENERATE_ATTEMPTS: usize = 16;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

#[derive(Debug, Default)]
struct RegistryInner {
    codes: CodeTable,
    ledger: FileLedger,
}

/// Owned, explicitly-lifetimed registry injected into request handlers.
pub struct PairingRegistry {
    ttl: Duration,
    inner: Mutex<RegistryInner>,
}

/// One expired code removed by a sweep pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweptCode {
    pub code: String,
    pub file_count: usize,
}

impl PairingRegistry {
    pub fn new(ttl: StdDuration) -> Self {
        Self {
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(600)),
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the maps themselves are always in a consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a fresh 6-digit code with an empty join list.
    ///
    /// A candidate colliding with a currently active code is rejected and
    /// regenerated instead of overwriting that code's join history.
    pub fn generate(&self) -> Result<CodeIssued, AppError> {
        let now = Utc::now();
        let mut inner = self.lock();
        let mut rng = rand::rng();
        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let code = rng.random_range(CODE_MIN..=CODE_MAX).to_string();
            if inner.codes.contains(&code) {
                continue;
            }
            inner.codes.issue(code.clone(), now);
            tracing::debug!(code = %code, active_codes = inner.codes.len(), "Issued pairing code");
            return Ok(CodeIssued {
                code,
                created_at: now,
                expires_at: now + self.ttl,
            });
        }
        Err(AppError::Internal(
            "could not find a free pairing code".to_string(),
        ))
    }

    /// Append a join record with a freshly generated opaque id.
    pub fn join(&self, code: &str) -> Result<(), AppError> {
        self.lock().codes.join(code, Utc::now())
    }

    pub fn info(&self, code: &str) -> Result<DeviceInfo, AppError> {
        self.lock().codes.info(code)
    }

    /// Append upload records for an active code, preserving arrival order.
    ///
    /// The code-exists check and the append happen under one lock
    /// acquisition; a record is never associated with a code absent from
    /// the registry.
    pub fn record_upload(&self, code: &str, records: Vec<FileRecord>) -> Result<(), AppError> {
        let mut inner = self.lock();
        if !inner.codes.contains(code) {
            return Err(AppError::InvalidCode(code.to_string()));
        }
        inner.ledger.record(code, records);
        Ok(())
    }

    pub fn list(&self, code: &str) -> Result<Vec<FileRecord>, AppError> {
        let inner = self.lock();
        if !inner.codes.contains(code) {
            return Err(AppError::InvalidCode(code.to_string()));
        }
        Ok(inner.ledger.list(code))
    }

    /// Drop every code older than the TTL, cascading to its ledger entries.
    /// Returns what was removed so the caller can delete the stored bytes.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<SweptCode> {
        let mut inner = self.lock();
        let expired = inner.codes.expired(now, self.ttl);
        expired
            .into_iter()
            .map(|code| {
                inner.codes.remove(&code);
                let file_count = inner.ledger.remove(&code);
                SweptCode { code, file_count }
            })
            .collect()
    }

    pub fn active_codes(&self) -> usize {
        self.lock().codes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileKind;

    fn registry() -> PairingRegistry {
        PairingRegistry::new(StdDuration::from_secs(600))
    }

    fn file_record(original_name: &str, stored_name: &str) -> FileRecord {
        FileRecord {
            stored_name: stored_name.to_string(),
            original_name: original_name.to_string(),
            kind: FileKind::Image,
            uploaded_at: Utc::now(),
            size_bytes: 64,
        }
    }

    #[test]
    fn test_unknown_code_fails_everywhere() {
        let registry = registry();
        assert!(matches!(
            registry.join("123456"),
            Err(AppError::InvalidCode(_))
        ));
        assert!(matches!(
            registry.info("123456"),
            Err(AppError::InvalidCode(_))
        ));
        assert!(matches!(
            registry.list("123456"),
            Err(AppError::InvalidCode(_))
        ));
        assert!(matches!(
            registry.record_upload("123456", vec![file_record("a.png", "x.png")]),
            Err(AppError::InvalidCode(_))
        ));
    }

    #[test]
    fn test_generate_code_format() {
        let registry = registry();
        for _ in 0..100 {
            let issued = registry.generate().expect("generate");
            assert_eq!(issued.code.len(), 6);
            assert!(issued.code.chars().all(|c| c.is_ascii_digit()));
            let value: u32 = issued.code.parse().expect("numeric");
            assert!((100_000..=999_999).contains(&value));
            assert_eq!(issued.expires_at - issued.created_at, Duration::seconds(600));
        }
    }

    #[test]
    fn test_generated_codes_unique_among_active() {
        let registry = registry();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let issued = registry.generate().expect("generate");
            assert!(seen.insert(issued.code), "active code issued twice");
        }
        assert_eq!(registry.active_codes(), 500);
    }

    #[test]
    fn test_fresh_code_has_no_joins_and_no_files() {
        let registry = registry();
        let issued = registry.generate().expect("generate");

        let info = registry.info(&issued.code).expect("info");
        assert_eq!(info.device_count, 0);
        assert_eq!(info.created_at, issued.created_at);

        assert!(registry.list(&issued.code).expect("list").is_empty());
    }

    #[test]
    fn test_join_count_accumulates() {
        let registry = registry();
        let issued = registry.generate().expect("generate");

        for n in 1..=5 {
            registry.join(&issued.code).expect("join");
            let info = registry.info(&issued.code).expect("info");
            assert_eq!(info.device_count, n);
        }
    }

    #[test]
    fn test_record_upload_preserves_order_and_list_is_idempotent() {
        let registry = registry();
        let issued = registry.generate().expect("generate");

        let f1 = file_record("a.png", "1-1.png");
        let f2 = file_record("b.pdf", "2-2.pdf");
        registry
            .record_upload(&issued.code, vec![f1.clone(), f2.clone()])
            .expect("record");

        let first = registry.list(&issued.code).expect("list");
        assert_eq!(first, vec![f1.clone(), f2.clone()]);

        let second = registry.list(&issued.code).expect("list again");
        assert_eq!(first, second);

        // Later batches append after earlier ones.
        let f3 = file_record("c.png", "3-3.png");
        registry
            .record_upload(&issued.code, vec![f3.clone()])
            .expect("record");
        assert_eq!(registry.list(&issued.code).expect("list"), vec![f1, f2, f3]);
    }

    #[test]
    fn test_sweep_removes_expired_and_cascades() {
        let registry = registry();
        let issued = registry.generate().expect("generate");
        registry.join(&issued.code).expect("join");
        registry
            .record_upload(&issued.code, vec![file_record("a.png", "1-1.png")])
            .expect("record");

        let swept = registry.sweep_expired(Utc::now() + Duration::seconds(601));
        assert_eq!(swept.len(), 1);
        assert_eq!(swept[0].code, issued.code);
        assert_eq!(swept[0].file_count, 1);

        assert!(matches!(
            registry.info(&issued.code),
            Err(AppError::InvalidCode(_))
        ));
        assert!(matches!(
            registry.list(&issued.code),
            Err(AppError::InvalidCode(_))
        ));
        assert_eq!(registry.active_codes(), 0);
    }

    #[test]
    fn test_sweep_keeps_unexpired_codes() {
        let registry = registry();
        let issued = registry.generate().expect("generate");

        let swept = registry.sweep_expired(Utc::now() + Duration::seconds(300));
        assert!(swept.is_empty());
        assert!(registry.info(&issued.code).is_ok());
    }

    #[test]
    fn test_sweep_is_selective() {
        // Tiny TTL so only the older of two codes has aged past it.
        let registry = PairingRegistry::new(StdDuration::from_millis(50));
        let old = registry.generate().expect("generate");

        std::thread::sleep(std::time::Duration::from_millis(60));
        let fresh = registry.generate().expect("generate");

        let swept = registry.sweep_expired(Utc::now());
        assert_eq!(swept.len(), 1);
        assert_eq!(swept[0].code, old.code);
        assert!(registry.info(&fresh.code).is_ok());
    }

    #[test]
    fn test_swept_code_leaves_no_trace() {
        let registry = registry();
        let issued = registry.generate().expect("generate");
        registry.sweep_expired(Utc::now() + Duration::seconds(601));

        // The value is free for reuse: nothing in either map still keys on it.
        assert_eq!(registry.active_codes(), 0);
        assert!(matches!(
            registry.info(&issued.code),
            Err(AppError::InvalidCode(_))
        ));
        assert!(matches!(
            registry.record_upload(&issued.code, vec![file_record("a.png", "1-1.png")]),
            Err(AppError::InvalidCode(_))
        ));
    }
}
