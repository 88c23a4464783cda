//! Rebuild-on-change policy for the composite toolbox.
//!
//! The tracker always holds the latest document of every fragment
//! category. It refuses to build while References or ArgumentFields are
//! missing, and rebuilds on every change once both are present, so a
//! fragment that arrives late is never dropped.

use super::{
    assemble_set, CompositeToolbox, Fragment, FragmentSet, ToolboxGeneration, BUILTIN_TOOLBOX,
};

/// Categories that must be present before a toolbox is built.
const REQUIRED: [Fragment; 2] = [Fragment::References, Fragment::ArgumentFields];

#[derive(Debug, Clone)]
pub struct ToolboxTracker {
    fragments: FragmentSet,
    generation: u64,
    latest: Option<CompositeToolbox>,
}

impl Default for ToolboxTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolboxTracker {
    /// Creates a tracker seeded with [`BUILTIN_TOOLBOX`].
    pub fn new() -> Self {
        Self::with_builtin(BUILTIN_TOOLBOX)
    }

    pub fn with_builtin(builtin: impl Into<String>) -> Self {
        let mut fragments = FragmentSet::new();
        fragments.insert(Fragment::Builtin, builtin.into());
        ToolboxTracker {
            fragments,
            generation: 0,
            latest: None,
        }
    }

    /// Records the latest document for `fragment`.
    ///
    /// Returns the freshly assembled toolbox when the value changed and all
    /// required categories are present; `None` otherwise.
    pub fn update(
        &mut self,
        fragment: Fragment,
        document: impl Into<String>,
    ) -> Option<CompositeToolbox> {
        let document = document.into();
        if self.fragments.get(&fragment) == Some(&document) {
            return None;
        }
        self.fragments.insert(fragment, document);
        self.rebuild()
    }

    fn rebuild(&mut self) -> Option<CompositeToolbox> {
        if !self.is_ready() {
            return None;
        }
        self.generation += 1;
        let toolbox = CompositeToolbox {
            document: assemble_set(&self.fragments),
            generation: ToolboxGeneration(self.generation),
        };
        self.latest = Some(toolbox.clone());
        Some(toolbox)
    }

    /// True once every required category has a document.
    pub fn is_ready(&self) -> bool {
        self.missing().is_empty()
    }

    /// Required categories that have not arrived yet.
    pub fn missing(&self) -> Vec<Fragment> {
        REQUIRED
            .into_iter()
            .filter(|fragment| !self.fragments.contains_key(fragment))
            .collect()
    }

    /// The most recently assembled toolbox, if any.
    pub fn latest(&self) -> Option<&CompositeToolbox> {
        self.latest.as_ref()
    }

    pub fn fragment(&self, fragment: Fragment) -> Option<&str> {
        self.fragments.get(&fragment).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolbox::assemble;

    #[test]
    fn waits_for_required_fragments() {
        let mut tracker = ToolboxTracker::with_builtin("<b/>");
        assert!(tracker.update(Fragment::FunctionLibs, "<l/>").is_none());
        assert!(tracker.update(Fragment::References, "<r/>").is_none());
        assert_eq!(tracker.missing(), vec![Fragment::ArgumentFields]);

        let toolbox = tracker.update(Fragment::ArgumentFields, "<a/>").unwrap();
        assert_eq!(toolbox.generation, ToolboxGeneration(1));
        assert_eq!(toolbox.document, assemble("<b/>", "<r/>", "<a/>", "<l/>"));
    }

    #[test]
    fn late_fragment_triggers_rebuild_with_latest_values() {
        let mut tracker = ToolboxTracker::with_builtin("<b/>");
        tracker.update(Fragment::References, "<r1/>");
        tracker.update(Fragment::ArgumentFields, "<a/>").unwrap();

        let rebuilt = tracker.update(Fragment::FunctionLibs, "<l/>").unwrap();
        assert_eq!(rebuilt.generation, ToolboxGeneration(2));
        assert_eq!(rebuilt.document, assemble("<b/>", "<r1/>", "<a/>", "<l/>"));

        let rebuilt = tracker.update(Fragment::References, "<r2/>").unwrap();
        assert_eq!(rebuilt.document, assemble("<b/>", "<r2/>", "<a/>", "<l/>"));
        assert_eq!(tracker.latest(), Some(&rebuilt));
    }

    #[test]
    fn unchanged_fragment_does_not_rebuild() {
        let mut tracker = ToolboxTracker::new();
        tracker.update(Fragment::References, "<r/>");
        tracker.update(Fragment::ArgumentFields, "<a/>").unwrap();
        assert!(tracker.update(Fragment::ArgumentFields, "<a/>").is_none());
        assert_eq!(tracker.latest().unwrap().generation, ToolboxGeneration(1));
        assert_eq!(tracker.fragment(Fragment::Builtin), Some(BUILTIN_TOOLBOX));
    }
}
