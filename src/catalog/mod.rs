//! Static registries of events and passes.
//!
//! A [`Catalog`] is loaded once at process start (built-in lineup or a JSON
//! file) and shared read-only through an `Arc`; nothing mutates it afterwards.

pub mod builtin;
pub mod event;
pub mod pass;

pub use event::{AdmissionMode, Category, Event, TimeSlot, Track};
pub use pass::Pass;

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("duplicate event id: {0}")]
    DuplicateEvent(String),

    #[error("duplicate pass id: {0}")]
    DuplicatePass(String),

    #[error("default pass {0} is not in the catalog")]
    MissingDefaultPass(String),

    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
struct CatalogFile {
    events: Vec<Event>,
    passes: Vec<Pass>,
}

/// Read-only event and pass registry
#[derive(Debug, Clone)]
pub struct Catalog {
    events: Vec<Event>,
    passes: Vec<Pass>,
    event_index: HashMap<String, usize>,
    pass_index: HashMap<String, usize>,
    default_pass_id: String,
}

impl Catalog {
    pub fn new(
        events: Vec<Event>,
        passes: Vec<Pass>,
        default_pass_id: &str,
    ) -> Result<Self, CatalogError> {
        let mut event_index = HashMap::with_capacity(events.len());
        for (i, event) in events.iter().enumerate() {
            if event_index.insert(event.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateEvent(event.id.clone()));
            }
        }

        let mut pass_index = HashMap::with_capacity(passes.len());
        for (i, pass) in passes.iter().enumerate() {
            if pass_index.insert(pass.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicatePass(pass.id.clone()));
            }
        }

        if !pass_index.contains_key(default_pass_id) {
            return Err(CatalogError::MissingDefaultPass(default_pass_id.to_string()));
        }

        Ok(Self {
            events,
            passes,
            event_index,
            pass_index,
            default_pass_id: default_pass_id.to_string(),
        })
    }

    /// The Gusto lineup compiled into the binary
    pub fn builtin(default_pass_id: &str) -> Result<Self, CatalogError> {
        Self::new(builtin::events(), builtin::passes(), default_pass_id)
    }

    /// Load `{ "events": [...], "passes": [...] }` from disk
    pub fn from_json_file(path: &Path, default_pass_id: &str) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw, default_pass_id)
    }

    pub fn from_json_str(raw: &str, default_pass_id: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::new(file.events, file.passes, default_pass_id)
    }

    pub fn lookup_event(&self, id: &str) -> Option<&Event> {
        self.event_index.get(id).map(|&i| &self.events[i])
    }

    pub fn lookup_pass(&self, id: &str) -> Option<&Pass> {
        self.pass_index.get(id).map(|&i| &self.passes[i])
    }

    pub fn list_events(&self) -> &[Event] {
        &self.events
    }

    pub fn list_passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn default_pass(&self) -> &Pass {
        // Presence checked in `new`
        &self.passes[self.pass_index[&self.default_pass_id]]
    }

    /// Resolve ids in order, returning every id that is not in the catalog on failure
    pub fn resolve_events<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&Event>, Vec<String>> {
        let mut resolved = Vec::with_capacity(ids.len());
        let mut unknown = Vec::new();

        for id in ids {
            match self.lookup_event(id.as_ref()) {
                Some(event) => resolved.push(event),
                None => unknown.push(id.as_ref().to_string()),
            }
        }

        if unknown.is_empty() {
            Ok(resolved)
        } else {
            Err(unknown)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin(builtin::DEFAULT_PASS_ID).unwrap();
        assert_eq!(catalog.list_events().len(), 8);
        assert_eq!(catalog.list_passes().len(), 3);
        assert_eq!(catalog.default_pass().id, "all-access");

        let icon_iq = catalog.lookup_event("icon-iq").expect("icon-iq exists");
        assert_eq!(icon_iq.category, Category::NonTechnical);
        assert_eq!(icon_iq.admission_mode, AdmissionMode::Direct);

        let paper = catalog.lookup_event("paper-presentation").expect("paper exists");
        assert!(paper.is_abstract());
        assert!(catalog.lookup_event("does-not-exist").is_none());
    }

    #[test]
    fn test_missing_default_pass_rejected() {
        let err = Catalog::builtin("platinum").unwrap_err();
        assert!(matches!(err, CatalogError::MissingDefaultPass(ref id) if id == "platinum"));
    }

    #[test]
    fn test_duplicate_event_rejected() {
        let mut events = builtin::events();
        events.push(events[0].clone());
        let err = Catalog::new(events, builtin::passes(), "solo").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateEvent(_)));
    }

    #[test]
    fn test_resolve_events_reports_unknown_ids() {
        let catalog = Catalog::builtin("solo").unwrap();
        let resolved = catalog.resolve_events(&["icon-iq", "code-sprint"]).unwrap();
        assert_eq!(resolved.len(), 2);

        let unknown = catalog.resolve_events(&["icon-iq", "nope", "nada"]).unwrap_err();
        assert_eq!(unknown, vec!["nope".to_string(), "nada".to_string()]);
    }

    #[test]
    fn test_from_json_str() {
        let raw = r#"{
            "events": [
                {"id": "quiz", "title": "Quiz", "category": "Non-Technical",
                 "admissionMode": "DIRECT", "track": "A", "timeSlot": "SLOT_1100"}
            ],
            "passes": [
                {"id": "basic", "name": "Basic", "price": "99", "maxTotal": 1,
                 "maxTechnical": 0, "maxNonTechnical": 1}
            ]
        }"#;

        let catalog = Catalog::from_json_str(raw, "basic").unwrap();
        assert_eq!(catalog.lookup_event("quiz").unwrap().title, "Quiz");
        assert_eq!(catalog.default_pass().max_technical, 0);
    }
}
