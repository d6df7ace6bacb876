//! Walks the live sysfs PMU topology against a small built-in catalog and
//! prints what it finds, one PMU instance per line.

use pmu_topology::{discover, CatalogEvent, StaticCatalog, SysfsRoot};

fn main() {
    let catalog = StaticCatalog::new()
        .with_class(
            "default_core",
            vec![
                CatalogEvent {
                    name: "cycles".into(),
                    assignment: "event=0x3c".into(),
                    ..Default::default()
                },
                CatalogEvent {
                    name: "inst_retired".into(),
                    assignment: "event=0xc0,umask=0x01".into(),
                    ..Default::default()
                },
            ],
        )
        .with_class(
            "uncore_cbox",
            vec![CatalogEvent {
                name: "llc_lookup".into(),
                assignment: "event=0x34,umask=0x01".into(),
                ..Default::default()
            }],
        );

    let root = SysfsRoot::default();
    let topology = discover(&root, &catalog);

    println!("PMU topology under {}:", root.path().display());
    for class in &topology.classes {
        println!("  class {:?}:", class.name);
        for instance in &class.instances {
            println!(
                "    instance {:?}: cpus={:?}, {} event(s) in catalog",
                instance.name,
                instance.cpus,
                instance.events.len()
            );
        }
    }

    if topology.classes.is_empty() {
        println!("  (no PMU classes resolved to a live instance on this machine)");
    }
}
