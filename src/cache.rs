use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::ClassifiedEmail;

/// Classification results from the most recent fetch pass, keyed by message
/// id. The fetch pass replaces the contents wholesale; readers get a
/// point-in-time snapshot.
#[derive(Default)]
pub struct ScheduleCache {
    inner: Mutex<HashMap<String, ClassifiedEmail>>,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&self, entries: HashMap<String, ClassifiedEmail>) {
        *self.inner.lock().unwrap() = entries;
    }

    /// Entries in a stable order (by message id).
    pub fn snapshot(&self) -> Vec<ClassifiedEmail> {
        let mut entries: Vec<ClassifiedEmail> =
            self.inner.lock().unwrap().values().cloned().collect();
        entries.sort_by(|a, b| a.email_id.cmp(&b.email_id));
        entries
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
