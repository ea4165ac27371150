use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

///
/// ErrorTree
///
/// Validation issues collected by path. Validation is non-failing at the
/// traversal level; all issues are gathered and returned together so a
/// schema author sees every problem in one pass.
///

#[derive(Clone, Debug, Default)]
pub struct ErrorTree {
    entries: BTreeMap<String, Vec<String>>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record one issue under the given path.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.entries
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    /// Fold another tree into this one.
    pub fn merge(&mut self, other: Self) {
        for (path, mut messages) in other.entries {
            self.entries.entry(path).or_default().append(&mut messages);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Consume the tree, returning `Err(self)` if any issue was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Iterate `(path, message)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(path, messages)| {
            messages
                .iter()
                .map(move |message| (path.as_str(), message.as_str()))
        })
    }
}

impl Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{path}: {message}")?;
            first = false;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorTree {}
