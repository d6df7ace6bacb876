//! The compiled event catalog — deliberately opaque here.
//!
//! Matching a catalog to the running CPU (vendor/family/model/stepping
//! regex games, the way `x86/util.h`'s `strcmp_cpuid_str` does it upstream)
//! and decoding whatever compact on-disk representation the catalog uses
//! for event and PMU-class names are both out of scope for this crate.
//! What it needs from a catalog is a small, stable surface: enumerate the
//! PMU classes it describes, and hand back the events belonging to any one
//! of them. Callers plug in their own catalog by implementing
//! [`PmuCatalog`].

use crate::parse::AssignmentList;

/// One named event within a PMU class, as the catalog stores it.
///
/// `assignment` is the raw `event=0x40,umask=1`-style string this crate
/// parses with [`crate::parse::parse_assignment_list`]; the catalog is not
/// expected to have parsed it itself. The remaining fields are metadata
/// carried through for inspection — this crate never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogEvent {
    pub name: String,
    pub assignment: String,
    pub desc: String,
    pub topic: String,
    pub long_desc: String,
    pub unit: String,
    pub compat: String,
    pub retirement_latency_mean: String,
    pub retirement_latency_min: String,
    pub retirement_latency_max: String,
    pub perpkg: bool,
    pub deprecated: bool,
}

/// A compiled, architecture-specific event catalog already matched to the
/// running CPU.
///
/// Implementors decide how events are stored and how class names map to
/// the catalog's own namespace.
pub trait PmuCatalog {
    /// The PMU classes this catalog describes, in catalog order.
    fn classes(&self) -> Vec<&str>;

    /// Events belonging to the named PMU class (e.g. `"core"`, `"uncore_cbox"`).
    /// An unknown class returns an empty slice rather than an error — a
    /// topology that enumerates instances the catalog has nothing to say
    /// about is not itself a catalog error.
    fn events_for_class(&self, class: &str) -> &[CatalogEvent];
}

/// A plain in-memory catalog, useful for tests and small embedded tables.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    classes: Vec<(String, Vec<CatalogEvent>)>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        StaticCatalog::default()
    }

    pub fn with_class(mut self, class: impl Into<String>, events: Vec<CatalogEvent>) -> Self {
        self.classes.push((class.into(), events));
        self
    }
}

impl PmuCatalog for StaticCatalog {
    fn classes(&self) -> Vec<&str> {
        self.classes.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn events_for_class(&self, class: &str) -> &[CatalogEvent] {
        self.classes
            .iter()
            .find(|(name, _)| name == class)
            .map(|(_, events)| events.as_slice())
            .unwrap_or(&[])
    }
}

/// Parse an event's raw assignment string. Kept here, rather than on
/// [`CatalogEvent`], so catalogs that never need synthesis (e.g. a pure
/// listing tool) don't pay for parsing they don't use.
pub fn parse_event_assignment(event: &CatalogEvent) -> crate::error::Result<AssignmentList> {
    crate::parse::parse_assignment_list(&event.assignment)
}
