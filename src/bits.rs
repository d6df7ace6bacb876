//! Bit-splicing: copying a value's bits into the positions named by a
//! [`RangeList`] layout, least-significant bit first.

use crate::parse::{ConfigVar, RangeList};

/// Copy the bits of `value` into `target` at the positions described by
/// `layout`, in list order, starting from `value`'s least significant bit.
///
/// After the last range in `layout` is applied, any remaining high bits of
/// `value` are silently discarded — catalogs are assumed well-formed.
pub fn apply(layout: &RangeList, mut value: u64, target: &mut u64) {
    for range in &layout.0 {
        let width = range.len();
        if width == 0 || width > 64 {
            continue;
        }
        let mask = if width == 64 {
            u64::MAX
        } else {
            ((1u64 << width) - 1) << range.start
        };
        let field = if width == 64 {
            value
        } else {
            (value & ((1u64 << width) - 1)) << range.start
        };

        *target = (*target & !mask) | (field & mask);

        value = if width >= 64 { 0 } else { value >> width };
    }
}

/// Apply `value` to whichever attribute word `def.var` names.
pub fn apply_to_attr(config: &mut u64, config1: &mut u64, config2: &mut u64, var: ConfigVar, layout: &RangeList, value: u64) {
    match var {
        ConfigVar::Config => apply(layout, value, config),
        ConfigVar::Config1 => apply(layout, value, config1),
        ConfigVar::Config2 => apply(layout, value, config2),
    }
}
