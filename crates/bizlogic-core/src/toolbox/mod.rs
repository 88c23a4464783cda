//! Composite toolbox assembly.
//!
//! The toolbox shown by the program editor is one `<xml>` document built
//! from four independently sourced fragments. [`assemble`] is a pure
//! function over those fragments; [`ToolboxTracker`] owns the triggering
//! policy of rebuilding whenever the available fragment set changes.

pub mod fragments;
pub mod tracker;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use fragments::{
    argument_fields_fragment, escape_xml, function_libs_fragment, references_fragment,
    BUILTIN_TOOLBOX,
};
pub use tracker::ToolboxTracker;

/// The fragment categories, declared in assembly order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Fragment {
    Builtin,
    References,
    ArgumentFields,
    FunctionLibs,
}

impl Fragment {
    /// All categories in the order they appear in the composite document.
    pub const ALL: [Fragment; 4] = [
        Fragment::Builtin,
        Fragment::References,
        Fragment::ArgumentFields,
        Fragment::FunctionLibs,
    ];
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Fragment::Builtin => "builtin",
            Fragment::References => "references",
            Fragment::ArgumentFields => "argument-fields",
            Fragment::FunctionLibs => "function-libs",
        };
        f.write_str(name)
    }
}

/// Latest known document per fragment category.
pub type FragmentSet = BTreeMap<Fragment, String>;

/// Monotonic counter identifying one assembled toolbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ToolboxGeneration(pub u64);

impl fmt::Display for ToolboxGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An assembled toolbox document tagged with its generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositeToolbox {
    pub document: String,
    pub generation: ToolboxGeneration,
}

/// Wraps the four fragments in one root element, in fixed order.
///
/// Fragments are neither reordered, deduplicated nor validated.
pub fn assemble(builtin: &str, refs: &str, args: &str, libs: &str) -> String {
    let mut document = String::with_capacity(
        builtin.len() + refs.len() + args.len() + libs.len() + 16,
    );
    document.push_str("<xml>\n");
    for fragment in [builtin, refs, args, libs] {
        document.push_str(fragment);
        document.push('\n');
    }
    document.push_str("</xml>");
    document
}

/// [`assemble`] over a fragment mapping; absent categories contribute nothing.
pub fn assemble_set(fragments: &FragmentSet) -> String {
    let get = |fragment: Fragment| fragments.get(&fragment).map(String::as_str).unwrap_or("");
    assemble(
        get(Fragment::Builtin),
        get(Fragment::References),
        get(Fragment::ArgumentFields),
        get(Fragment::FunctionLibs),
    )
}
