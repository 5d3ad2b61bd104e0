//! The bouquet under construction and the actions that change it.
//!
//! [`reduce`] is a pure transition from one bouquet to the next.
//! [`BouquetStore`] owns the current bouquet together with the random source
//! used for shuffling, and is handed to whichever component needs it.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::arrangement::{default_order, shuffled_order};
use super::models::{Bouquet, BouquetFlower, Flower, FlowerId, LetterField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BouquetAction {
    AddFlower(FlowerId),
    RemoveFlower(FlowerId),
    ShuffleOrder,
    CycleGreenery,
    ToggleWrapper(String),
    UpdateLetter(LetterField, String),
}

/// Applies `action` to `prev` and returns the resulting bouquet.
pub fn reduce<R: Rng + ?Sized>(prev: &Bouquet, action: BouquetAction, rng: &mut R) -> Bouquet {
    let mut next = prev.clone();
    match action {
        BouquetAction::AddFlower(id) => {
            match next.flowers.iter_mut().find(|flower| flower.id == id) {
                Some(existing) => existing.count += 1,
                None => next.flowers.push(BouquetFlower { id, count: 1 }),
            }
            next.flower_order = default_order(&next.flowers);
        }
        BouquetAction::RemoveFlower(id) => {
            let Some(position) = next.flowers.iter().position(|flower| flower.id == id) else {
                return next;
            };
            if next.flowers[position].count <= 1 {
                next.flowers.remove(position);
            } else {
                next.flowers[position].count -= 1;
            }
            next.flower_order = default_order(&next.flowers);
        }
        BouquetAction::ShuffleOrder => {
            next.flower_order = shuffled_order(next.total_flowers() as usize, rng);
        }
        BouquetAction::CycleGreenery => {
            next.greenery = next.greenery.next();
        }
        BouquetAction::ToggleWrapper(id) => {
            next.wrapper = if next.wrapper.as_deref() == Some(id.as_str()) {
                None
            } else {
                Some(id)
            };
        }
        BouquetAction::UpdateLetter(field, value) => {
            next.letter.set_field(field, &value);
        }
    }
    next
}

/// Handle on the bouquet being composed in one session.
///
/// # Examples
///
/// ```
/// use bloomy::domain::{BouquetStore, FlowerCatalog};
///
/// let catalog = FlowerCatalog::builtin();
/// let mut store = BouquetStore::new("mono");
/// for flower in &catalog.flowers()[..6] {
///     store.add_flower(flower);
/// }
/// assert_eq!(store.total_flowers(), 6);
/// assert!(store.can_proceed());
/// assert_eq!(store.bouquet().flower_order, vec![0, 1, 2, 3, 4, 5]);
/// ```
#[derive(Debug)]
pub struct BouquetStore {
    bouquet: Bouquet,
    rng: StdRng,
}

impl BouquetStore {
    pub fn new(mode: &str) -> Self {
        Self::with_rng(Bouquet::new(mode), StdRng::from_entropy())
    }

    /// Builds a store around an existing bouquet and a specific random source.
    pub fn with_rng(bouquet: Bouquet, rng: StdRng) -> Self {
        Self { bouquet, rng }
    }

    pub fn bouquet(&self) -> &Bouquet {
        &self.bouquet
    }

    pub fn dispatch(&mut self, action: BouquetAction) {
        self.bouquet = reduce(&self.bouquet, action, &mut self.rng);
    }

    /// Adds one instance of `flower`. The ten-flower cap is the caller's to check.
    pub fn add_flower(&mut self, flower: &Flower) {
        self.dispatch(BouquetAction::AddFlower(flower.id));
    }

    pub fn remove_flower(&mut self, id: FlowerId) {
        self.dispatch(BouquetAction::RemoveFlower(id));
    }

    pub fn shuffle_order(&mut self) {
        self.dispatch(BouquetAction::ShuffleOrder);
    }

    pub fn cycle_greenery(&mut self) {
        self.dispatch(BouquetAction::CycleGreenery);
    }

    pub fn toggle_wrapper(&mut self, id: &str) {
        self.dispatch(BouquetAction::ToggleWrapper(id.to_string()));
    }

    pub fn update_letter(&mut self, field: LetterField, value: &str) {
        self.dispatch(BouquetAction::UpdateLetter(field, value.to_string()));
    }

    pub fn total_flowers(&self) -> u32 {
        self.bouquet.total_flowers()
    }

    pub fn can_proceed(&self) -> bool {
        self.bouquet.can_proceed()
    }
}

impl Default for BouquetStore {
    fn default() -> Self {
        Self::new(super::models::DEFAULT_MODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlowerCatalog;
    use proptest::prelude::*;

    fn seeded_store() -> BouquetStore {
        BouquetStore::with_rng(Bouquet::new("mono"), StdRng::seed_from_u64(42))
    }

    fn flower(id: FlowerId) -> Flower {
        FlowerCatalog::builtin().get(id).unwrap().clone()
    }

    fn identity(len: u32) -> Vec<usize> {
        (0..len as usize).collect()
    }

    #[test]
    fn test_add_flower_appends_new_types() {
        let mut store = seeded_store();
        store.add_flower(&flower(3));
        store.add_flower(&flower(1));
        store.add_flower(&flower(3));

        let flowers = &store.bouquet().flowers;
        assert_eq!(flowers, &vec![BouquetFlower { id: 3, count: 2 }, BouquetFlower { id: 1, count: 1 }]);
        assert_eq!(store.bouquet().flower_order, vec![0, 1, 2]);
    }

    #[test]
    fn test_six_distinct_flowers_can_proceed() {
        let mut store = seeded_store();
        for id in 1..=6 {
            store.add_flower(&flower(id));
        }
        assert_eq!(store.total_flowers(), 6);
        assert!(store.can_proceed());
        assert_eq!(store.bouquet().flower_order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_store_does_not_enforce_ceiling() {
        let mut store = seeded_store();
        for _ in 0..11 {
            store.add_flower(&flower(2));
        }
        assert_eq!(store.total_flowers(), 11);
        assert!(!store.can_proceed());
    }

    #[test]
    fn test_remove_flower_decrements_then_drops() {
        let mut store = seeded_store();
        store.add_flower(&flower(5));
        store.add_flower(&flower(5));
        store.add_flower(&flower(7));

        store.remove_flower(5);
        assert_eq!(store.bouquet().count_of(5), 1);
        store.remove_flower(5);
        assert_eq!(store.bouquet().flowers, vec![BouquetFlower { id: 7, count: 1 }]);
        assert_eq!(store.bouquet().flower_order, vec![0]);
    }

    #[test]
    fn test_remove_absent_flower_is_noop() {
        let mut store = seeded_store();
        store.add_flower(&flower(1));
        store.add_flower(&flower(2));
        store.shuffle_order();
        let before = store.bouquet().clone();

        store.remove_flower(9);
        assert_eq!(store.bouquet(), &before);
    }

    #[test]
    fn test_shuffle_is_permutation_over_many_trials() {
        let mut store = seeded_store();
        for id in [1, 1, 4, 6, 6, 6, 8, 9] {
            store.add_flower(&flower(id));
        }
        for _ in 0..1000 {
            store.shuffle_order();
            let mut order = store.bouquet().flower_order.clone();
            assert_eq!(order.len(), 8);
            order.sort_unstable();
            assert_eq!(order, identity(8));
        }
    }

    #[test]
    fn test_add_after_shuffle_resets_order() {
        let mut store = seeded_store();
        for id in 1..=7 {
            store.add_flower(&flower(id));
        }
        store.shuffle_order();
        store.add_flower(&flower(8));
        assert_eq!(store.bouquet().flower_order, identity(8));
    }

    #[test]
    fn test_cycle_greenery_wraps() {
        let mut store = seeded_store();
        let start = store.bouquet().greenery;
        store.cycle_greenery();
        store.cycle_greenery();
        assert_eq!(store.bouquet().greenery.index(), 2);
        store.cycle_greenery();
        assert_eq!(store.bouquet().greenery, start);
    }

    #[test]
    fn test_toggle_wrapper_round_trip() {
        let mut store = seeded_store();
        store.toggle_wrapper("w1");
        assert_eq!(store.bouquet().wrapper.as_deref(), Some("w1"));
        store.toggle_wrapper("w1");
        assert!(store.bouquet().wrapper.is_none());
    }

    #[test]
    fn test_toggle_wrapper_switches_selection() {
        let mut store = seeded_store();
        store.toggle_wrapper("wrapper-1");
        store.toggle_wrapper("wrapper-3");
        assert_eq!(store.bouquet().wrapper.as_deref(), Some("wrapper-3"));
    }

    #[test]
    fn test_update_letter_truncates_message() {
        let mut store = seeded_store();
        store.update_letter(LetterField::Message, &"x".repeat(501));
        store.update_letter(LetterField::Recipient, "Mina");
        assert_eq!(store.bouquet().letter.message.len(), 500);
        assert_eq!(store.bouquet().letter.recipient, "Mina");
    }

    #[test]
    fn test_reduce_leaves_previous_state_untouched() {
        let prev = Bouquet::new("color");
        let mut rng = StdRng::seed_from_u64(3);
        let next = reduce(&prev, BouquetAction::AddFlower(4), &mut rng);
        assert!(prev.flowers.is_empty());
        assert_eq!(next.total_flowers(), 1);
        assert_eq!(next.mode, "color");
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Add(FlowerId),
        Remove(FlowerId),
    }

    fn edit_strategy() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (1u32..=5).prop_map(Edit::Add),
            (1u32..=6).prop_map(Edit::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

        #[test]
        fn counts_stay_positive_and_order_is_identity(edits in proptest::collection::vec(edit_strategy(), 0..40)) {
            let mut store = seeded_store();
            for edit in edits {
                match edit {
                    Edit::Add(id) => store.dispatch(BouquetAction::AddFlower(id)),
                    Edit::Remove(id) => store.dispatch(BouquetAction::RemoveFlower(id)),
                }
                let bouquet = store.bouquet();
                let sum: u32 = bouquet.flowers.iter().map(|f| f.count).sum();
                prop_assert_eq!(store.total_flowers(), sum);
                prop_assert!(bouquet.flowers.iter().all(|f| f.count >= 1));
                prop_assert_eq!(&bouquet.flower_order, &identity(sum));
            }
        }

        #[test]
        fn greenery_stays_in_range(cycles in 0usize..50) {
            let mut store = seeded_store();
            for _ in 0..cycles {
                store.cycle_greenery();
            }
            prop_assert!(store.bouquet().greenery.index() < 3);
            prop_assert_eq!(store.bouquet().greenery.index() as usize, cycles % 3);
        }
    }
}
