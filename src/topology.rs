//! Resolves catalog PMU classes to the live sysfs PMU instances actually
//! present on this machine, with their CPU affinity.

use log::{debug, warn};

use crate::catalog::{CatalogEvent, PmuCatalog};
use crate::cpu::default_cpu_range;
use crate::parse::{parse_range_list, RangeList};
use crate::sysfs::SysfsRoot;

const DEFAULT_CORE_CLASS: &str = "default_core";

/// A live PMU device instance under sysfs.
///
/// Borrows its events from the [`crate::catalog::PmuCatalog`] that produced
/// the [`Topology`] it belongs to — a `Topology` never outlives the catalog
/// it was built from.
#[derive(Debug, Clone)]
pub struct PmuInstance<'catalog> {
    pub name: String,
    pub cpus: RangeList,
    pub events: &'catalog [CatalogEvent],
}

/// One catalog PMU class together with the live instances it resolved to.
#[derive(Debug, Clone)]
pub struct PmuClass<'catalog> {
    pub name: String,
    pub instances: Vec<PmuInstance<'catalog>>,
}

/// The full resolved PMU tree: every catalog class that has at least one
/// live instance on this machine.
#[derive(Debug, Clone, Default)]
pub struct Topology<'catalog> {
    pub classes: Vec<PmuClass<'catalog>>,
}

impl<'catalog> Topology<'catalog> {
    pub fn find_instance(&self, class: &str, instance: &str) -> Option<&PmuInstance<'catalog>> {
        self.classes
            .iter()
            .find(|c| c.name == class)?
            .instances
            .iter()
            .find(|i| i.name == instance)
    }
}

/// Walk `root` for every class the catalog knows about and build a
/// [`Topology`] containing only the classes that resolved to at least one
/// live instance.
///
/// The class roster comes from `catalog.classes()` (§4.D's "iterate PMU
/// classes" contract) rather than from the caller, so turning a catalog
/// into a topology needs no prior knowledge of the catalog's structure.
pub fn discover<'catalog>(root: &SysfsRoot, catalog: &'catalog dyn PmuCatalog) -> Topology<'catalog> {
    let mut classes = Vec::new();

    for class_name in catalog.classes() {
        let events = catalog.events_for_class(class_name);
        let instances = if class_name == DEFAULT_CORE_CLASS {
            resolve_default_core(root)
        } else {
            resolve_class(root, class_name)
        };

        if instances.is_empty() {
            debug!("pmu class {:?} has no live instances, omitting", class_name);
            continue;
        }

        classes.push(PmuClass {
            name: class_name.to_owned(),
            instances: instances
                .into_iter()
                .map(|(name, cpus)| PmuInstance { name, cpus, events })
                .collect(),
        });
    }

    Topology { classes }
}

/// `default_core`'s privileged discovery path: a literal `cpu` directory,
/// if present, is authoritative and short-circuits everything else.
fn resolve_default_core(root: &SysfsRoot) -> Vec<(String, RangeList)> {
    let entries = match root.list_dir(root.path()) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot list {}: {}", root.path().display(), e);
            return Vec::new();
        }
    };

    if entries.iter().any(|d| d == "cpu") {
        let cpus = RangeList(vec![default_cpu_range()]);
        return vec![("cpu".to_owned(), cpus)];
    }

    let mut instances = Vec::new();
    for d in entries {
        let cpus_path = root.join(&[&d, "cpus"]);
        match root.read_first_line(&cpus_path).and_then(|s| parse_range_list(&s)) {
            Ok(cpus) => instances.push((d, cpus)),
            Err(e) => debug!("skipping default_core candidate {:?}: {}", d, e),
        }
    }
    instances
}

/// Any other class: prefix-match directory names against `class`, either
/// exactly or as `class_N` for a decimal `N`, then resolve CPU affinity.
fn resolve_class(root: &SysfsRoot, class: &str) -> Vec<(String, RangeList)> {
    let entries = match root.list_dir(root.path()) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot list {}: {}", root.path().display(), e);
            return Vec::new();
        }
    };

    let mut instances = Vec::new();
    for d in entries {
        if !matches_class(&d, class) {
            continue;
        }

        let cpus = resolve_cpu_affinity(root, &d);
        instances.push((d, cpus));
    }
    instances
}

/// `d == class`, or `d == class + "_" + N` where `N` is one or more
/// decimal digits and nothing else. Rejects unrelated classes that merely
/// share a prefix (`foobar_0` does not match class `foo`).
fn matches_class(d: &str, class: &str) -> bool {
    if d == class {
        return true;
    }
    match d.strip_prefix(class) {
        Some(rest) => match rest.strip_prefix('_') {
            Some(suffix) => !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        },
        None => false,
    }
}

/// `cpus` file, else `cpumask` file, else all online CPUs.
fn resolve_cpu_affinity(root: &SysfsRoot, instance_dir: &str) -> RangeList {
    let cpus_path = root.join(&[instance_dir, "cpus"]);
    if let Ok(parsed) = root
        .read_first_line(&cpus_path)
        .and_then(|s| parse_range_list(&s))
    {
        return parsed;
    }

    let cpumask_path = root.join(&[instance_dir, "cpumask"]);
    if let Ok(parsed) = root
        .read_first_line(&cpumask_path)
        .and_then(|s| parse_range_list(&s))
    {
        return parsed;
    }

    RangeList(vec![default_cpu_range()])
}

/// Type of the PMU's own `type` sysfs file, used by the attribute
/// synthesizer. Kept here since it shares the instance-directory-path
/// logic with discovery.
pub fn instance_dir(root: &SysfsRoot, instance_name: &str) -> std::path::PathBuf {
    root.join(&[instance_name])
}

pub(crate) fn type_file(root: &SysfsRoot, instance_name: &str) -> std::path::PathBuf {
    let mut p: std::path::PathBuf = instance_dir(root, instance_name);
    p.push("type");
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use std::fs;

    fn event(name: &str) -> CatalogEvent {
        CatalogEvent {
            name: name.to_owned(),
            assignment: "event=0x00".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn default_core_cpu_dir_is_authoritative() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("cpu")).unwrap();
        fs::create_dir(dir.path().join("junk")).unwrap();

        let root = SysfsRoot::at(dir.path());
        let catalog = StaticCatalog::new().with_class("default_core", vec![event("cycles")]);
        let topo = discover(&root, &catalog);

        assert_eq!(topo.classes.len(), 1);
        assert_eq!(topo.classes[0].instances.len(), 1);
        assert_eq!(topo.classes[0].instances[0].name, "cpu");
    }

    #[test]
    fn default_core_falls_back_to_per_dir_cpus_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("armv8_pmuv3_0")).unwrap();
        fs::write(dir.path().join("armv8_pmuv3_0").join("cpus"), "0-3\n").unwrap();
        fs::create_dir(dir.path().join("armv8_pmuv3_1")).unwrap();
        fs::write(dir.path().join("armv8_pmuv3_1").join("cpus"), "4-7\n").unwrap();

        let root = SysfsRoot::at(dir.path());
        let catalog = StaticCatalog::new().with_class("default_core", vec![event("cycles")]);
        let topo = discover(&root, &catalog);

        assert_eq!(topo.classes[0].instances.len(), 2);
    }

    #[test]
    fn uncore_numbered_instances_match_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("uncore_cbox_0")).unwrap();
        fs::write(dir.path().join("uncore_cbox_0").join("cpus"), "0\n").unwrap();
        fs::create_dir(dir.path().join("uncore_cbox_1")).unwrap();
        fs::write(dir.path().join("uncore_cbox_1").join("cpus"), "1\n").unwrap();
        fs::create_dir(dir.path().join("foobar_0")).unwrap();

        let root = SysfsRoot::at(dir.path());
        let catalog = StaticCatalog::new().with_class("uncore_cbox", vec![event("llc_lookup")]);
        let topo = discover(&root, &catalog);

        assert_eq!(topo.classes[0].instances.len(), 2);
        let names: Vec<_> = topo.classes[0].instances.iter().map(|i| i.name.as_str()).collect();
        assert!(names.contains(&"uncore_cbox_0"));
        assert!(names.contains(&"uncore_cbox_1"));
        assert!(!names.contains(&"foobar_0"));
    }

    #[test]
    fn class_with_no_live_instances_is_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let root = SysfsRoot::at(dir.path());
        let catalog = StaticCatalog::new().with_class("uncore_cbox", vec![event("llc_lookup")]);
        let topo = discover(&root, &catalog);
        assert!(topo.classes.is_empty());
    }

    #[test]
    fn cpumask_used_when_cpus_file_absent() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("uncore_cbox_0")).unwrap();
        fs::write(dir.path().join("uncore_cbox_0").join("cpumask"), "0-1\n").unwrap();

        let root = SysfsRoot::at(dir.path());
        let catalog = StaticCatalog::new().with_class("uncore_cbox", vec![event("llc_lookup")]);
        let topo = discover(&root, &catalog);

        assert_eq!(topo.classes[0].instances[0].cpus, RangeList(vec![crate::parse::Range { start: 0, end: 1 }]));
    }
}
