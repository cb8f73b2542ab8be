//! The module corpus and its copy-on-write store.
//!
//! A [`Corpus`] is an immutable snapshot of every extracted module. The
//! [`CorpusStore`] serializes inserts (single writer at a time) and
//! publishes each update by swapping an `Arc`, so readers holding a
//! snapshot are never affected by concurrent inserts.

use rtlscope_extract::Module;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// An immutable snapshot of all extracted modules.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    modules: Vec<Module>,
    by_name: HashMap<String, usize>,
    by_file: HashMap<PathBuf, Vec<usize>>,
}

impl Corpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all modules in insertion order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Returns the module with the given name, if present.
    ///
    /// When two files declare the same module name, the most recently
    /// inserted one wins the name lookup; both remain in [`modules`](Self::modules).
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.by_name.get(name).map(|&i| &self.modules[i])
    }

    /// Returns `true` if a module with the given name is present.
    pub fn contains_module(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns the number of modules in the corpus.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if the corpus contains no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Replaces every module previously extracted from `path` with the
    /// given list, then rebuilds the lookup indexes.
    fn replace_file(&mut self, path: &Path, modules: Vec<Module>) {
        self.modules.retain(|m| m.file != path);
        self.modules.extend(modules);
        self.rebuild_indexes();
    }

    fn rebuild_indexes(&mut self) {
        self.by_name.clear();
        self.by_file.clear();
        for (idx, module) in self.modules.iter().enumerate() {
            self.by_name.insert(module.name.clone(), idx);
            self.by_file.entry(module.file.clone()).or_default().push(idx);
        }
    }
}

/// Copy-on-write store publishing [`Corpus`] snapshots.
///
/// Inserts are serialized by the internal mutex; each successful insert
/// builds a new corpus and swaps the shared `Arc`, so a reader's snapshot
/// is always a complete, consistent corpus.
pub struct CorpusStore {
    current: Mutex<Arc<Corpus>>,
}

impl CorpusStore {
    /// Creates a store holding an empty corpus.
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Arc::new(Corpus::new())),
        }
    }

    /// Returns the current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<Corpus> {
        self.current.lock().unwrap().clone()
    }

    /// Inserts (or re-inserts) the modules extracted from one file.
    ///
    /// Re-inserting a path replaces that file's previous modules instead
    /// of duplicating them.
    pub fn insert_file(&self, path: &Path, modules: Vec<Module>) {
        let mut guard = self.current.lock().unwrap();
        let mut next = Corpus::clone(&guard);
        next.replace_file(path, modules);
        *guard = Arc::new(next);
    }
}

impl Default for CorpusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, file: &str) -> Module {
        Module {
            name: name.to_string(),
            file: PathBuf::from(file),
            line: 1,
            ports: Vec::new(),
            parameters: Vec::new(),
            signals: Vec::new(),
            registers: Vec::new(),
            instances: Vec::new(),
            blocks: Vec::new(),
            assigns: Vec::new(),
        }
    }

    #[test]
    fn empty_store() {
        let store = CorpusStore::new();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn insert_and_lookup() {
        let store = CorpusStore::new();
        store.insert_file(Path::new("a.v"), vec![module("alu", "a.v")]);
        let snap = store.snapshot();
        assert_eq!(snap.len(), 1);
        assert!(snap.contains_module("alu"));
        assert!(!snap.contains_module("fpu"));
    }

    #[test]
    fn reinsert_replaces_not_duplicates() {
        let store = CorpusStore::new();
        store.insert_file(
            Path::new("a.v"),
            vec![module("alu", "a.v"), module("adder", "a.v")],
        );
        store.insert_file(Path::new("a.v"), vec![module("alu", "a.v")]);
        let snap = store.snapshot();
        assert_eq!(snap.len(), 1);
        assert!(snap.contains_module("alu"));
        assert!(!snap.contains_module("adder"));
    }

    #[test]
    fn old_snapshot_unaffected_by_insert() {
        let store = CorpusStore::new();
        store.insert_file(Path::new("a.v"), vec![module("alu", "a.v")]);
        let before = store.snapshot();
        store.insert_file(Path::new("b.v"), vec![module("fpu", "b.v")]);
        // The earlier snapshot still sees exactly one module.
        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn modules_from_other_files_survive() {
        let store = CorpusStore::new();
        store.insert_file(Path::new("a.v"), vec![module("alu", "a.v")]);
        store.insert_file(Path::new("b.v"), vec![module("fpu", "b.v")]);
        store.insert_file(Path::new("a.v"), vec![module("alu2", "a.v")]);
        let snap = store.snapshot();
        assert!(snap.contains_module("fpu"));
        assert!(snap.contains_module("alu2"));
        assert!(!snap.contains_module("alu"));
    }

    #[test]
    fn concurrent_inserts_serialize() {
        use std::sync::Arc as StdArc;
        let store = StdArc::new(CorpusStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = StdArc::clone(&store);
                std::thread::spawn(move || {
                    let file = format!("f{i}.v");
                    let name = format!("m{i}");
                    store.insert_file(Path::new(&file), vec![module(&name, &file)]);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.snapshot().len(), 8);
    }
}
