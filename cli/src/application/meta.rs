//! Shared, cached access to metadata records.
//!
//! Every facade opened on the same root within one process sees the same
//! record: the manager hands out handles to a single in-memory copy and
//! writes it back through the [`MetaStore`] port on `sync`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use serde_json::Value;
use webapps_common::{AppMeta, MetaPatch, Options};

use crate::application::ports::MetaStore;
use crate::domain::options::strip_transient;

/// A handle on one cached record.
#[derive(Debug, Clone)]
pub struct MetaHandle {
    root: PathBuf,
    record: Rc<RefCell<AppMeta>>,
}

impl MetaHandle {
    /// Root directory the record is keyed by.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy of the current record.
    #[must_use]
    pub fn snapshot(&self) -> AppMeta {
        self.record.borrow().clone()
    }

    #[must_use]
    pub fn hostname(&self) -> String {
        self.record.borrow().hostname.clone()
    }

    #[must_use]
    pub fn path(&self) -> String {
        self.record.borrow().path.clone()
    }

    #[must_use]
    pub fn app_type(&self) -> Option<String> {
        self.record.borrow().app_type.clone()
    }

    #[must_use]
    pub fn version(&self) -> Option<String> {
        self.record.borrow().version.clone()
    }

    #[must_use]
    pub fn failed(&self) -> bool {
        self.record.borrow().failed
    }

    #[must_use]
    pub fn is_installing(&self) -> bool {
        self.record.borrow().is_installing()
    }

    #[must_use]
    pub fn options(&self) -> Options {
        self.record.borrow().options.clone()
    }

    /// Raw option value at a dotted key.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<Value> {
        self.record.borrow().options.get_path(key).cloned()
    }

    /// Overwrite top-level fields.
    pub fn replace(&self, patch: MetaPatch) {
        self.record.borrow_mut().replace(patch);
    }

    /// Merge option writes. Transient keys are dropped and a `null` value
    /// deletes its key.
    pub fn set_options(&self, fields: BTreeMap<String, Value>) {
        let fields = strip_transient(fields);
        if fields.is_empty() {
            return;
        }
        self.record.borrow_mut().options.merge(fields);
    }

    pub fn set_option(&self, key: &str, value: Value) {
        self.set_options(BTreeMap::from([(key.to_string(), value)]));
    }

    /// Put back an options map taken earlier with [`options`](Self::options).
    pub fn restore_options(&self, options: Options) {
        self.record.borrow_mut().options = options;
    }
}

/// Process-wide cache of metadata records keyed by root.
pub struct MetaManager {
    store: Box<dyn MetaStore>,
    records: RefCell<HashMap<PathBuf, Rc<RefCell<AppMeta>>>>,
}

impl MetaManager {
    #[must_use]
    pub fn new(store: Box<dyn MetaStore>) -> Self {
        Self {
            store,
            records: RefCell::new(HashMap::new()),
        }
    }

    /// Handle on the record for `root`, loading it on first use. A root
    /// without a stored record yields an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be read.
    pub fn open(&self, root: &Path) -> Result<MetaHandle> {
        if let Some(record) = self.records.borrow().get(root) {
            return Ok(MetaHandle {
                root: root.to_path_buf(),
                record: Rc::clone(record),
            });
        }
        let meta = self.load(root)?;
        let record = Rc::new(RefCell::new(meta));
        self.records
            .borrow_mut()
            .insert(root.to_path_buf(), Rc::clone(&record));
        Ok(MetaHandle {
            root: root.to_path_buf(),
            record,
        })
    }

    /// Re-read the record for `root` from the store, in place, so every
    /// outstanding handle observes the stored state.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be read.
    pub fn reload(&self, root: &Path) -> Result<MetaHandle> {
        let meta = self.load(root)?;
        let handle = self.open(root)?;
        *handle.record.borrow_mut() = meta;
        Ok(handle)
    }

    fn load(&self, root: &Path) -> Result<AppMeta> {
        Ok(self
            .store
            .load(root)
            .with_context(|| format!("reading metadata for {}", root.display()))?
            .unwrap_or_default())
    }

    /// Persist the record behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn sync(&self, handle: &MetaHandle) -> Result<()> {
        let meta = handle.snapshot();
        self.store
            .save(&handle.root, &meta)
            .with_context(|| format!("saving metadata for {}", handle.root.display()))
    }

    /// Delete the stored record for `root` and forget the cached copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot delete the record.
    pub fn remove(&self, root: &Path) -> Result<()> {
        self.records.borrow_mut().remove(root);
        self.store
            .remove(root)
            .with_context(|| format!("removing metadata for {}", root.display()))
    }

    /// Drop cached records no handle refers to any more. Returns how many
    /// were released.
    pub fn release_unused(&self) -> usize {
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|_, record| Rc::strong_count(record) > 1);
        before - records.len()
    }

    /// Number of records currently cached.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.records.borrow().len()
    }
}

impl std::fmt::Debug for MetaManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaManager")
            .field("cached", &self.cached())
            .finish_non_exhaustive()
    }
}
