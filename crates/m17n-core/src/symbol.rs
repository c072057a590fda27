//! Interned backend key symbols.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Pseudo-key the backend expects when its context gains focus.
pub const FOCUS_IN: &str = "input-focus-in";

fn interner() -> &'static Mutex<HashSet<Arc<str>>> {
    static INSTANCE: OnceLock<Mutex<HashSet<Arc<str>>>> = OnceLock::new();
    INSTANCE.get_or_init(|| Mutex::new(HashSet::new()))
}

/// A symbolic key name in the backend's notation, e.g. `C-A`, `S- `,
/// `G-F1`. Equal names share one allocation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeySymbol(Arc<str>);

impl KeySymbol {
    pub fn intern(name: &str) -> Self {
        let mut set = interner().lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = set.get(name) {
            return Self(Arc::clone(existing));
        }
        let name: Arc<str> = Arc::from(name);
        set.insert(Arc::clone(&name));
        Self(name)
    }

    pub fn focus_in() -> Self {
        Self::intern(FOCUS_IN)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// True when both symbols come from the same interned allocation.
    pub fn same_interned(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeySymbol({:?})", &*self.0)
    }
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_shares_allocation() {
        let a = KeySymbol::intern("C-A");
        let b = KeySymbol::intern(&format!("C-{}", 'A'));
        assert_eq!(a, b);
        assert!(a.same_interned(&b));
        assert_eq!(a.name(), "C-A");
    }

    #[test]
    fn focus_symbol() {
        assert_eq!(KeySymbol::focus_in().name(), "input-focus-in");
    }
}
