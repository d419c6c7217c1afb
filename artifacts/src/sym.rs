//! Symbol listing (`.sym`) parser.
//!
//! Each meaningful line has four comma-separated fields:
//! `label_index,var_index,component_index,signal_name`, where `var_index`
//! is the signal's position in the witness vector. Lines with any other
//! arity are skipped outright (trailing blank lines are common); lines
//! with the right arity but non-numeric index fields are skipped with a
//! warning.

use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SymError {
    /// Lookup of a name the listing never declared.
    #[error("signal not found in symbol table: `{0}`")]
    UndefinedSignal(String),
    #[error("failed to read symbol listing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One symbol listing line: where a named signal lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    pub label_index: u64,
    /// Position of this signal inside the witness vector.
    pub var_index: usize,
    pub component_index: u64,
}

/// Immutable mapping from fully-qualified signal names (`main.a[2].b`) to
/// their witness positions. Iteration yields entries in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<(String, SymbolEntry)>,
    index: FxHashMap<String, usize>,
}

impl SymbolTable {
    /// Parse a symbol listing. Never fails: unusable lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<(String, SymbolEntry)> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();

        for (line_no, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 4 {
                continue;
            }
            let parsed = (|| {
                Some(SymbolEntry {
                    label_index: fields[0].parse().ok()?,
                    var_index: fields[1].parse().ok()?,
                    component_index: fields[2].parse().ok()?,
                })
            })();
            let Some(entry) = parsed else {
                warn!(line = line_no + 1, "skipping malformed symbol entry: {line}");
                continue;
            };
            let name = fields[3].to_string();
            match index.entry(name) {
                Entry::Occupied(slot) => entries[*slot.get()].1 = entry,
                Entry::Vacant(slot) => {
                    let name = slot.key().clone();
                    slot.insert(entries.len());
                    entries.push((name, entry));
                }
            }
        }

        debug!(symbols = entries.len(), "parsed symbol listing");
        Self { entries, index }
    }

    /// Read and parse a `.sym` file.
    pub fn load(path: &Path) -> Result<Self, SymError> {
        let text = fs::read_to_string(path).map_err(|source| SymError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Look a signal up by its fully-qualified name.
    pub fn resolve(&self, name: &str) -> Result<&SymbolEntry, SymError> {
        self.get(name)
            .ok_or_else(|| SymError::UndefinedSignal(name.to_string()))
    }

    /// Non-failing lookup.
    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
0,1,0,main.c
1,2,0,main.a
2,3,0,main.b
";

    #[test]
    fn test_parse_and_resolve() {
        let table = SymbolTable::parse(LISTING);
        assert_eq!(table.len(), 3);

        let entry = table.resolve("main.a").unwrap();
        assert_eq!(entry.label_index, 1);
        assert_eq!(entry.var_index, 2);
        assert_eq!(entry.component_index, 0);
    }

    #[test]
    fn test_resolve_is_stable() {
        let table = SymbolTable::parse(LISTING);
        let first = table.resolve("main.b").unwrap().var_index;
        let second = table.resolve("main.b").unwrap().var_index;
        assert_eq!(first, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_undefined_signal() {
        let table = SymbolTable::parse(LISTING);
        let err = table.resolve("main.nope").unwrap_err();
        assert!(matches!(err, SymError::UndefinedSignal(name) if name == "main.nope"));
    }

    #[test]
    fn test_wrong_arity_lines_skipped() {
        // Trailing blank line and a comment-ish line with no commas
        let table = SymbolTable::parse("0,1,0,main.x\nnot a symbol line\n\n");
        assert_eq!(table.len(), 1);
        assert!(table.get("main.x").is_some());
    }

    #[test]
    fn test_non_numeric_indices_skipped() {
        let table = SymbolTable::parse("0,oops,0,main.x\n1,2,0,main.y\n");
        assert_eq!(table.len(), 1);
        assert!(table.get("main.x").is_none());
        assert_eq!(table.resolve("main.y").unwrap().var_index, 2);
    }

    #[test]
    fn test_negative_var_index_skipped() {
        // circom can emit -1 for signals optimized out of the witness;
        // such entries are not addressable and are dropped.
        let table = SymbolTable::parse("0,-1,0,main.gone\n1,1,0,main.kept\n");
        assert_eq!(table.len(), 1);
        assert!(table.get("main.gone").is_none());
    }

    #[test]
    fn test_duplicate_key_keeps_last_entry_and_order() {
        let table = SymbolTable::parse("0,1,0,main.x\n1,2,0,main.y\n2,3,0,main.x\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("main.x").unwrap().var_index, 3);
        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["main.x", "main.y"]);
    }

    #[test]
    fn test_iteration_order_is_declaration_order() {
        let table = SymbolTable::parse(LISTING);
        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["main.c", "main.a", "main.b"]);
    }

    #[test]
    fn test_bracketed_and_nested_names() {
        let table = SymbolTable::parse("0,1,0,main.out[0]\n1,2,0,main.a[2].b\n");
        assert_eq!(table.resolve("main.out[0]").unwrap().var_index, 1);
        assert_eq!(table.resolve("main.a[2].b").unwrap().var_index, 2);
    }

    #[test]
    fn test_empty_listing() {
        let table = SymbolTable::parse("");
        assert!(table.is_empty());
    }
}
