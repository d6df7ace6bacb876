//! The kernel-ABI attribute record and the synthesizer that fills in its
//! `type`/`config`/`config1`/`config2` fields from a catalog event.
//!
//! `EventAttr` mirrors the subset of `struct perf_event_attr` this crate's
//! callers need, in the same `#[repr(C)]` struct-with-`bitflags`-fields
//! shape `perfcnt::linux`'s own `EventAttr` uses, trimmed to the fields
//! synthesis writes or must leave untouched.

use bitflags::bitflags;

use crate::error::Result;
use crate::parse::parse_assignment_list;
use crate::sysfs::SysfsRoot;
use crate::topology::{type_file, PmuInstance};

bitflags! {
    /// `perf_event_attr.read_format`.
    pub struct ReadFormatFlags: u64 {
        const TOTAL_TIME_ENABLED = 1 << 0;
        const TOTAL_TIME_RUNNING = 1 << 1;
        const ID                = 1 << 2;
        const GROUP              = 1 << 3;
    }
}

bitflags! {
    /// `perf_event_attr.sample_type`.
    pub struct SampleFormatFlags: u64 {
        const IP           = 1 << 0;
        const TID          = 1 << 1;
        const TIME         = 1 << 2;
        const ADDR         = 1 << 3;
        const READ         = 1 << 4;
        const CALLCHAIN    = 1 << 5;
        const ID           = 1 << 6;
        const CPU          = 1 << 7;
        const PERIOD       = 1 << 8;
        const STREAM_ID    = 1 << 9;
        const RAW          = 1 << 10;
        const BRANCH_STACK = 1 << 11;
    }
}

bitflags! {
    /// The settings bitfield — caller-controlled, synthesis never writes it.
    pub struct EventAttrFlags: u64 {
        const DISABLED          = 1 << 0;
        const INHERIT           = 1 << 1;
        const PINNED            = 1 << 2;
        const EXCLUSIVE         = 1 << 3;
        const EXCLUDE_USER      = 1 << 4;
        const EXCLUDE_KERNEL    = 1 << 5;
        const EXCLUDE_HV        = 1 << 6;
        const EXCLUDE_IDLE      = 1 << 7;
        const FREQ              = 1 << 10;
    }
}

/// The subset of `struct perf_event_attr` this crate cares about.
///
/// Synthesis only ever writes `attr_type`, `config`, `config1`, `config2`.
/// Every other field is the caller's to set beforehand and is left alone.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct EventAttr {
    pub attr_type: u32,
    pub size: u32,
    pub config: u64,
    pub sample_period_freq: u64,
    pub sample_type: SampleFormatFlags,
    pub read_format: ReadFormatFlags,
    pub settings: EventAttrFlags,
    pub config1: u64,
    pub config2: u64,
}

impl Default for EventAttr {
    fn default() -> EventAttr {
        EventAttr {
            attr_type: 0,
            size: std::mem::size_of::<EventAttr>() as u32,
            config: 0,
            sample_period_freq: 0,
            sample_type: SampleFormatFlags::empty(),
            read_format: ReadFormatFlags::empty(),
            settings: EventAttrFlags::empty(),
            config1: 0,
            config2: 0,
        }
    }
}

/// Fill in `attr.{attr_type, config, config1, config2}` for `event` as it
/// applies to `instance`.
///
/// Not transactional: on failure, whatever fields were already written
/// stay written — the caller is expected to discard `attr` rather than
/// reuse it.
pub fn synthesize(
    root: &SysfsRoot,
    instance: &PmuInstance<'_>,
    event: &crate::catalog::CatalogEvent,
    attr: &mut EventAttr,
) -> Result<()> {
    let type_path = type_file(root, &instance.name);
    let type_str = root.read_first_line(&type_path)?;
    attr.attr_type = type_str.trim().parse::<u32>().map_err(|_| crate::error::Error::Parse {
        what: "pmu type",
        input: type_str.clone(),
    })?;

    let assignments = parse_assignment_list(&event.assignment)?;

    for assignment in &assignments.0 {
        if assignment.key == "period" {
            continue;
        }

        let format_path = root.join(&[&instance.name, "format", &assignment.key]);
        let format_str = root.read_first_line(&format_path)?;
        let def = crate::parse::parse_config_def(&format_str)?;

        crate::bits::apply_to_attr(
            &mut attr.config,
            &mut attr.config1,
            &mut attr.config2,
            def.var,
            &def.layout,
            assignment.value,
        );
    }

    Ok(())
}
