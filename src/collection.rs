//! Logical collections and their static file mapping.

use std::fmt;

use crate::consts::DOC_EXT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Employees,
    Branches,
    Shifts,
    Overview,
    CalendarWeeks,
    Teams,
    WorkActivities,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Employees,
        Collection::Branches,
        Collection::Shifts,
        Collection::Overview,
        Collection::CalendarWeeks,
        Collection::Teams,
        Collection::WorkActivities,
    ];

    /// Route/CLI name.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Employees => "employees",
            Collection::Branches => "branches",
            Collection::Shifts => "shifts",
            Collection::Overview => "overview",
            Collection::CalendarWeeks => "calendar-weeks",
            Collection::Teams => "teams",
            Collection::WorkActivities => "work-activities",
        }
    }

    /// File name under the data directory, e.g. `calendar-weeks.json`.
    pub fn file_name(self) -> String {
        format!("{}.{}", self.name(), DOC_EXT)
    }

    pub fn parse(s: &str) -> Option<Collection> {
        let s = s.trim();
        Self::ALL.iter().copied().find(|c| c.name() == s)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_roundtrip_and_files_unique() {
        let mut files = HashSet::new();
        for c in Collection::ALL {
            assert_eq!(Collection::parse(c.name()), Some(c));
            assert!(files.insert(c.file_name()), "duplicate file for {c}");
        }
        assert_eq!(Collection::CalendarWeeks.file_name(), "calendar-weeks.json");
        assert_eq!(Collection::parse("nope"), None);
    }
}
