//! Bridges a compiled PMU event catalog to the live `perf_event_open`
//! sysfs topology.
//!
//! Given a catalog (something implementing [`catalog::PmuCatalog`]) and
//! the set of PMU classes it describes, [`topology::discover`] walks
//! `/sys/bus/event_source/devices` and builds a [`topology::Topology`] of
//! the PMU instances actually present on this machine. From there,
//! [`event::find_event`] looks an event up by name within one instance,
//! and [`attr::synthesize`] fills in the `type`/`config`/`config1`/
//! `config2` fields of an [`attr::EventAttr`] ready to hand to
//! `perf_event_open` — which, along with everything downstream of it
//! (opening the fd, reading counters, sampling), is outside this crate.

pub mod attr;
pub mod bits;
pub mod catalog;
pub mod cpu;
pub mod error;
pub mod event;
pub mod parse;
pub mod sysfs;
pub mod topology;

pub use attr::{synthesize, EventAttr};
pub use catalog::{CatalogEvent, PmuCatalog, StaticCatalog};
pub use error::{Error, Result};
pub use event::find_event;
pub use sysfs::SysfsRoot;
pub use topology::{discover, PmuClass, PmuInstance, Topology};
