//! Visual ordering of individual flower instances.
//!
//! Every flower type contributes `count` instances. An order array assigns
//! each instance a rendering slot; instances are drawn in ascending slot
//! order, ties keeping enumeration order.

use rand::Rng;

use super::catalog::FlowerCatalog;
use super::models::{Bouquet, BouquetFlower, Flower, MAX_FLOWERS};

/// Most instances [`arrange`] lays out. Stored rows can claim far more
/// flowers than a composed bouquet ever holds.
pub const MAX_ARRANGED: usize = MAX_FLOWERS as usize * 10;

/// The identity order over every instance in `flowers`.
///
/// # Examples
///
/// ```
/// use bloomy::domain::{default_order, BouquetFlower};
///
/// let flowers = [BouquetFlower { id: 1, count: 2 }, BouquetFlower { id: 4, count: 1 }];
/// assert_eq!(default_order(&flowers), vec![0, 1, 2]);
/// ```
pub fn default_order(flowers: &[BouquetFlower]) -> Vec<usize> {
    let total = flowers
        .iter()
        .fold(0usize, |total, flower| total.saturating_add(flower.count as usize));
    (0..total).collect()
}

/// A uniformly random permutation of `0..total` (Fisher-Yates).
pub fn shuffled_order<R: Rng + ?Sized>(total: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..total).collect();
    for i in (1..indices.len()).rev() {
        let j = rng.gen_range(0..=i);
        indices.swap(i, j);
    }
    indices
}

/// Rendering slot of one flower instance.
///
/// The flat position is `flower_index * count + instance_index`. The slot is
/// the order value stored there, or the flat position itself when the order
/// is empty or too short.
pub fn order_slot(order: &[usize], flower_index: usize, count: u32, instance_index: u32) -> usize {
    let position = flower_index
        .saturating_mul(count as usize)
        .saturating_add(instance_index as usize);
    order.get(position).copied().unwrap_or(position)
}

/// One flower instance placed in the arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<'a> {
    pub flower: &'a Flower,
    pub flower_index: usize,
    pub instance_index: u32,
    pub slot: usize,
}

/// Lays out every instance of `bouquet` in rendering order.
///
/// Flowers missing from the catalog are skipped; the flat positions of the
/// remaining instances are unaffected. At most [`MAX_ARRANGED`] instances
/// are placed, taken in enumeration order.
pub fn arrange<'a>(bouquet: &Bouquet, catalog: &'a FlowerCatalog) -> Vec<Placement<'a>> {
    let mut placements: Vec<Placement<'a>> = bouquet
        .flowers
        .iter()
        .enumerate()
        .filter_map(|(flower_index, entry)| {
            catalog.get(entry.id).map(|flower| (flower_index, entry.count, flower))
        })
        .flat_map(|(flower_index, count, flower)| {
            (0..count).map(move |instance_index| Placement {
                flower,
                flower_index,
                instance_index,
                slot: order_slot(&bouquet.flower_order, flower_index, count, instance_index),
            })
        })
        .take(MAX_ARRANGED)
        .collect();
    placements.sort_by_key(|placement| placement.slot);
    placements
}
