//! Per-package change counts.

/// What a link, unlink or relink of one package did (or would do).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    /// Target directories created.
    pub dirs_created: u32,
    /// Symlinks created.
    pub linked: u32,
    /// Symlinks that were already correct.
    pub already_linked: u32,
    /// Symlinks removed.
    pub removed: u32,
    /// Target entries not ours, left untouched by an unlink.
    pub left_alone: u32,
}

impl Report {
    /// Sum two reports (used by relink to combine both phases).
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            dirs_created: self.dirs_created + other.dirs_created,
            linked: self.linked + other.linked,
            already_linked: self.already_linked + other.already_linked,
            removed: self.removed + other.removed,
            left_alone: self.left_alone + other.left_alone,
        }
    }

    /// Number of filesystem changes made (or that would be made).
    #[must_use]
    pub const fn changes(&self) -> u32 {
        self.dirs_created + self.linked + self.removed
    }

    /// One-line description, phrased conditionally for simulate mode.
    #[must_use]
    pub fn describe(&self, simulate: bool) -> String {
        let (linked, removed, dirs) = if simulate {
            ("would link", "would remove", "would create dir")
        } else {
            ("linked", "removed", "dirs created")
        };
        let parts: Vec<String> = [
            (self.linked, linked),
            (self.removed, removed),
            (self.dirs_created, dirs),
            (self.already_linked, "already linked"),
            (self.left_alone, "left alone"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{count} {label}"))
        .collect();

        if parts.is_empty() {
            "nothing to do".to_string()
        } else {
            parts.join(", ")
        }
    }
}
