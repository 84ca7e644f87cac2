use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::capabilities::LeadStore;

/// A quote request raised from the chat after a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub room_type: String,
    pub style: String,
    pub image_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    pub session_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub room_type: String,
    pub style: String,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl LeadRecord {
    pub fn from_request(session_id: &str, request: LeadRequest) -> Result<Self> {
        let email = non_empty(request.email);
        let phone = non_empty(request.phone);
        if request.name.trim().is_empty() {
            bail!("lead name is required");
        }
        if email.is_none() && phone.is_none() {
            bail!("lead needs an email or a phone number");
        }
        if let Some(address) = email.as_deref() {
            if !address.contains('@') {
                bail!("lead email is not valid: {address}");
            }
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            name: request.name.trim().to_string(),
            email,
            phone,
            room_type: request.room_type.trim().to_string(),
            style: request.style.trim().to_string(),
            image_url: non_empty(request.image_url),
            notes: non_empty(request.notes),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

/// Appends one JSON object per lead.
pub struct JsonlLeadStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlLeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

impl LeadStore for JsonlLeadStore {
    fn save(&self, record: &LeadRecord) -> Result<String> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(record)?;
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("lead store lock poisoned"))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(record.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LeadRequest {
        LeadRequest {
            name: " Ada ".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: Some("  ".to_string()),
            room_type: "kitchen".to_string(),
            style: "industrial".to_string(),
            image_url: Some("https://cdn.example/s/k.png".to_string()),
            notes: None,
        }
    }

    #[test]
    fn record_normalizes_contact_fields() -> anyhow::Result<()> {
        let record = LeadRecord::from_request("s-1", request())?;
        assert_eq!(record.name, "Ada");
        assert_eq!(record.phone, None);
        assert_eq!(record.session_id, "s-1");
        assert!(uuid::Uuid::parse_str(&record.id).is_ok());
        Ok(())
    }

    #[test]
    fn record_requires_a_contact() {
        let mut lead = request();
        lead.email = None;
        assert!(LeadRecord::from_request("s-1", lead).is_err());

        let mut lead = request();
        lead.email = Some("not-an-address".to_string());
        assert!(LeadRecord::from_request("s-1", lead).is_err());
    }

    #[test]
    fn store_appends_jsonl_and_returns_id() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let store = JsonlLeadStore::new(temp.path().join("leads").join("leads.jsonl"));
        let first = LeadRecord::from_request("s-1", request())?;
        let second = LeadRecord::from_request("s-2", request())?;
        assert_eq!(store.save(&first)?, first.id);
        store.save(&second)?;

        let raw = std::fs::read_to_string(temp.path().join("leads").join("leads.jsonl"))?;
        let rows: Vec<LeadRecord> = raw
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?;
        assert_eq!(rows, vec![first, second]);
        Ok(())
    }
}
