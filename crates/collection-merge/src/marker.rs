//! Name policies: how machine-touched nodes are marked and recognised.

/// Suffix appended to the names of nodes the merge engine created or touched.
pub const DEFAULT_MARKER: &str = " [AI]";

/// Maps node names between their logical form and their marked form.
///
/// Lookup compares `normalize(a) == normalize(b)`; tagging must be
/// idempotent so repeated runs never stack markers.
pub trait NamePolicy {
    /// Strip at most one trailing marker.
    fn normalize<'a>(&self, name: &'a str) -> &'a str;

    /// Apply the marker unless it is already present.
    fn tag(&self, name: &str) -> String;

    fn same_name(&self, a: &str, b: &str) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

/// Marks names with a fixed trailing suffix, `" [AI]"` by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixMarker {
    suffix: String,
}

impl SuffixMarker {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl Default for SuffixMarker {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl NamePolicy for SuffixMarker {
    fn normalize<'a>(&self, name: &'a str) -> &'a str {
        name.strip_suffix(self.suffix.as_str()).unwrap_or(name)
    }

    fn tag(&self, name: &str) -> String {
        // empty names stay empty
        if name.is_empty() || name.ends_with(self.suffix.as_str()) {
            name.to_string()
        } else {
            format!("{name}{}", self.suffix)
        }
    }
}

/// Leaves names untouched; lookup is plain string equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unmarked;

impl NamePolicy for Unmarked {
    fn normalize<'a>(&self, name: &'a str) -> &'a str {
        name
    }

    fn tag(&self, name: &str) -> String {
        name.to_string()
    }
}
