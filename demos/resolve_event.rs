//! Resolves one event on the host's default core PMU and prints the
//! synthesized attribute words, without ever calling `perf_event_open`.

use pmu_topology::attr::{synthesize, EventAttr};
use pmu_topology::{discover, find_event, CatalogEvent, StaticCatalog, SysfsRoot};

fn main() {
    env_logger::init();

    let catalog = StaticCatalog::new().with_class(
        "default_core",
        vec![CatalogEvent {
            name: "inst_retired".into(),
            assignment: "event=0xc0,umask=0x01".into(),
            ..Default::default()
        }],
    );

    let root = SysfsRoot::default();
    let topology = discover(&root, &catalog);

    let Some(class) = topology.classes.first() else {
        eprintln!("no default_core instance found on this host");
        return;
    };
    let instance = &class.instances[0];

    let event = match find_event(instance, "inst_retired") {
        Ok(event) => event,
        Err(e) => {
            eprintln!("event lookup failed: {}", e);
            return;
        }
    };

    let mut attr = EventAttr::default();
    match synthesize(&root, instance, event, &mut attr) {
        Ok(()) => println!(
            "type={} config={:#x} config1={:#x} config2={:#x}",
            attr.attr_type, attr.config, attr.config1, attr.config2
        ),
        Err(e) => eprintln!("synthesis failed: {}", e),
    }
}
