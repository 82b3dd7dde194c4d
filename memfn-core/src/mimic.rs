//! Descriptive metadata copied from a target function onto its wrapper.
//!
//! Rust functions carry no runtime name or docs, so the name is recovered
//! from the target's type via [`std::any::type_name`]. For a `fn` item that
//! is its path (`my_crate::fibonacci`); for a closure it is the enclosing
//! function followed by `{{closure}}`.

use std::any::type_name;

/// Name and optional documentation exposed by a memoized wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnInfo {
    pub name: String,
    pub description: Option<String>,
}

impl FnInfo {
    /// Captures the name of `F` as introspection tools would see it.
    ///
    /// # Examples
    ///
    /// ```
    /// use memfn_core::FnInfo;
    ///
    /// fn fibonacci(n: u64) -> u64 {
    ///     n
    /// }
    ///
    /// assert_eq!(FnInfo::of_val(&fibonacci).name, "fibonacci");
    /// ```
    pub fn of<F: ?Sized>() -> Self {
        Self {
            name: short_name(type_name::<F>()),
            description: None,
        }
    }

    pub fn of_val<F: ?Sized>(_f: &F) -> Self {
        Self::of::<F>()
    }

    /// Replaces the captured name and/or attaches documentation.
    pub fn with_overrides(mut self, name: Option<String>, description: Option<String>) -> Self {
        if let Some(name) = name {
            self.name = name;
        }
        if description.is_some() {
            self.description = description;
        }
        self
    }
}

fn short_name(full: &str) -> String {
    // Generic arguments may contain `::` themselves
    let path = full.split('<').next().unwrap_or(full);

    path.rsplit("::")
        .find(|segment| !segment.is_empty() && !segment.starts_with("{{"))
        .unwrap_or("anonymous")
        .to_string()
}
