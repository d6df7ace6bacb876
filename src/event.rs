//! Looks up a named event within a PMU instance's event list.

use crate::catalog::CatalogEvent;
use crate::error::{Error, Result};
use crate::topology::PmuInstance;

/// Find the event named `name` in `instance`, by exact string equality.
/// Catalogs are small enough (hundreds to low thousands of entries per
/// PMU) that a linear scan is fine.
pub fn find_event<'a>(instance: &'a PmuInstance<'_>, name: &str) -> Result<&'a CatalogEvent> {
    instance
        .events
        .iter()
        .find(|e| e.name == name)
        .ok_or_else(|| Error::EventNotFound(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::RangeList;

    fn instance(events: &[CatalogEvent]) -> PmuInstance<'_> {
        PmuInstance {
            name: "cpu".to_owned(),
            cpus: RangeList::default(),
            events,
        }
    }

    #[test]
    fn finds_exact_match() {
        let events = vec![
            CatalogEvent {
                name: "cycles".into(),
                assignment: "event=0x3c".into(),
                ..Default::default()
            },
            CatalogEvent {
                name: "inst_retired".into(),
                assignment: "event=0xc0".into(),
                ..Default::default()
            },
        ];
        let inst = instance(&events);
        let found = find_event(&inst, "inst_retired").unwrap();
        assert_eq!(found.assignment, "event=0xc0");
    }

    #[test]
    fn missing_event_is_not_found() {
        let events = vec![CatalogEvent {
            name: "cycles".into(),
            assignment: "event=0x3c".into(),
            ..Default::default()
        }];
        let inst = instance(&events);
        assert!(matches!(
            find_event(&inst, "nope"),
            Err(Error::EventNotFound(_))
        ));
    }
}
