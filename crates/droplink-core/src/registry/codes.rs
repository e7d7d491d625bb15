use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{DeviceInfo, DeviceJoin, PairingCode};

/// Active pairing codes keyed by code value. Uniqueness holds among active
/// codes only; a value freed by the sweep may be issued again.
#[derive(Debug, Default)]
pub(crate) struct CodeTable {
    codes: HashMap<String, PairingCode>,
}

impl CodeTable {
    pub(crate) fn contains(&self, code: &str) -> bool {
        self.codes.contains_key(code)
    }

    pub(crate) fn issue(&mut self, code: String, now: DateTime<Utc>) {
        self.codes
            .insert(code.clone(), PairingCode::new(code, now));
    }

    pub(crate) fn join(&mut self, code: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        let entry = self
            .codes
            .get_mut(code)
            .ok_or_else(|| AppError::InvalidCode(code.to_string()))?;
        entry.joins.push(DeviceJoin {
            id: Uuid::new_v4(),
            joined_at: now,
        });
        Ok(())
    }

    pub(crate) fn info(&self, code: &str) -> Result<DeviceInfo, AppError> {
        let entry = self
            .codes
            .get(code)
            .ok_or_else(|| AppError::InvalidCode(code.to_string()))?;
        Ok(DeviceInfo {
            code: entry.code.clone(),
            device_count: entry.joins.len(),
            created_at: entry.created_at,
        })
    }

    pub(crate) fn expired(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<String> {
        self.codes
            .values()
            .filter(|entry| entry.is_expired(now, ttl))
            .map(|entry| entry.code.clone())
            .collect()
    }

    pub(crate) fn remove(&mut self, code: &str) -> bool {
        self.codes.remove(code).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.codes.len()
    }
}
