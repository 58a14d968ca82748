//! Greedy fill of leftover capacity.
//!
//! After repair (or mutation) a selection often leaves slack that could
//! hold more items. [`fill`] adds unselected items in descending efficiency
//! order whenever they fit.
//!
//! One pass is enough to reach a fix-point: loads only grow, so an item
//! that did not fit earlier in the pass cannot fit later.

use crate::efficiency::Efficiency;
use crate::instance::Instance;
use crate::usage::ResourceUsage;

/// Adds every unselected item that still fits, best efficiency first.
///
/// `usage` must describe `genes` and is updated in place. Returns the number
/// of items added. Never removes an item, so profit cannot decrease, and
/// never adds an item that would break a capacity.
pub fn fill(
    instance: &Instance,
    efficiency: &Efficiency,
    genes: &mut [bool],
    usage: &mut ResourceUsage,
) -> usize {
    debug_assert_eq!(*usage, ResourceUsage::of(instance, genes));
    let mut added = 0;
    for &j in efficiency.insertion_order() {
        if !genes[j] && usage.fits(instance, j) {
            genes[j] = true;
            usage.add(instance, j);
            added += 1;
        }
    }
    added
}
