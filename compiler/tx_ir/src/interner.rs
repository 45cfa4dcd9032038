//! Append-only string interner for identifier storage.
//!
//! Interning takes `&self` so the interner can be shared by the binding cache
//! and every pass that synthesizes names while the tree is mutably borrowed.
//! Names are keyed by content and live as long as the interner: a cache reset
//! keeps them, so re-interning an identifier in a later run returns the same
//! name and reuses its storage.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    /// The host handed the interner a missing string.
    #[error("null name passed to the name interner")]
    NullName,
    /// Handle space exhausted (over 4 billion distinct names).
    #[error("name interner exceeded capacity: {count} names")]
    Overflow { count: usize },
}

/// Interned strings; name `n` is stored at index `n - 1`.
#[derive(Default)]
struct InternTable {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl InternTable {
    fn next_raw(&self) -> Result<u32, InternError> {
        u32::try_from(self.strings.len())
            .ok()
            .and_then(|len| len.checked_add(1))
            .ok_or(InternError::Overflow {
                count: self.strings.len(),
            })
    }
}

/// String interner producing [`Name`] handles.
///
/// The empty string is always [`Name::EMPTY`]. Interned text is leaked to get
/// `'static` lookups. Each distinct string is leaked once per interner, so
/// storage is bounded by the distinct identifiers seen, not by the number of
/// runs.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new, empty interner.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(InternTable::default()),
        }
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if s.is_empty() {
            return Ok(Name::EMPTY);
        }

        // Fast path: check if already interned
        {
            let guard = self.table.read();
            if let Some(&raw) = guard.map.get(s) {
                return Ok(Name::from_raw(raw));
            }
        }

        let mut guard = self.table.write();
        if let Some(&raw) = guard.map.get(s) {
            return Ok(Name::from_raw(raw));
        }

        let raw = guard.next_raw()?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, raw);
        tracing::trace!(name = leaked, raw, "interned name");
        Ok(Name::from_raw(raw))
    }

    /// Intern a host-supplied string that may be missing.
    ///
    /// A missing string is a contract violation of the host analyzer.
    pub fn try_intern_opt(&self, s: Option<&str>) -> Result<Name, InternError> {
        match s {
            Some(s) => self.try_intern(s),
            None => Err(InternError::NullName),
        }
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if the handle space is exhausted.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a Name.
    ///
    /// # Panics
    /// Panics if `name` came from another interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.try_lookup(name)
            .unwrap_or_else(|| panic!("foreign {name:?} looked up in interner"))
    }

    /// Look up the string for a Name, returning `None` for foreign names.
    pub fn try_lookup(&self, name: Name) -> Option<&'static str> {
        if name == Name::EMPTY {
            return Some("");
        }
        let guard = self.table.read();
        let index = name.raw().checked_sub(1)?;
        guard.strings.get(index as usize).copied()
    }

    /// Number of interned names (excluding the empty string).
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Check if nothing but the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
