//! Collision-free identifier allocation

use std::collections::HashSet;

/// Hands out unique names within one scope.
///
/// The first request for a name returns it unchanged; later requests get a numeric
/// suffix starting at 2 (`list`, `list2`, `list3`). Allocation order is the only input,
/// so identical synthesis runs produce identical names.
#[derive(Debug, Clone, Default)]
pub struct Namer {
    taken: HashSet<String>,
}

impl Namer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a name without renaming it. Returns false if it was already taken.
    pub fn register(&mut self, name: &str) -> bool {
        self.taken.insert(name.to_string())
    }

    /// Allocate a fresh name derived from `base`.
    pub fn name(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut counter = 2usize;
        loop {
            let candidate = format!("{}{}", base, counter);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes_on_collision() {
        let mut namer = Namer::new();
        assert_eq!(namer.name("list"), "list");
        assert_eq!(namer.name("list"), "list2");
        assert_eq!(namer.name("list"), "list3");
        assert_eq!(namer.name("map"), "map");
    }

    #[test]
    fn test_registered_names_are_avoided() {
        let mut namer = Namer::new();
        assert!(namer.register("source"));
        assert!(!namer.register("source"));
        assert_eq!(namer.name("source"), "source2");

        namer.register("item2");
        assert_eq!(namer.name("item"), "item");
        assert_eq!(namer.name("item"), "item3");
    }
}
