//! Application state for the terminal bouquet composer.
//!
//! This module holds the session state the UI renders from: the bouquet
//! store, the current composition stage, and the garden and viewing screens.

use crate::domain::{
    BouquetId, BouquetStore, DEFAULT_MODE, Flower, FlowerCatalog, LetterField, MAX_FLOWERS,
    MIN_FLOWERS, NewBouquet, StoredBouquet, WRAPPERS,
};
use crate::infrastructure::{
    BouquetGateway, ExportError, ShareLink, config::DEFAULT_BASE_URL, generate_short_id,
};

/// The four steps of composing a bouquet, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Picking 6 to 10 flowers from the catalog
    Flowers,
    /// Arranging, greenery and wrapper
    Bundling,
    /// Writing the card
    Message,
    /// Saving and sharing
    Send,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Flowers, Stage::Bundling, Stage::Message, Stage::Send];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|stage| *stage == self).unwrap_or(0)
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Flowers => "Flowers",
            Stage::Bundling => "Bundling",
            Stage::Message => "Message",
            Stage::Send => "Send",
        }
    }

    fn next(self) -> Option<Stage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn previous(self) -> Option<Stage> {
        self.index().checked_sub(1).map(|index| Self::ALL[index])
    }
}

/// Which screen the application is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Walking through the composition stages
    Composing,
    /// Read-only display of one stored bouquet
    Viewing,
    /// List of every stored bouquet
    Garden,
    /// Help screen is displayed
    Help,
}

/// Outcome of looking up a stored bouquet.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loaded(Box<StoredBouquet>),
    NotFound(BouquetId),
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use bloomy::application::{App, Stage};
///
/// let mut app = App::default();
/// assert_eq!(app.stage, Stage::Flowers);
/// assert!(!app.next_stage()); // nothing picked yet
/// ```
#[derive(Debug)]
pub struct App {
    /// The bouquet being composed
    pub store: BouquetStore,
    /// Flowers available to pick from
    pub catalog: FlowerCatalog,
    /// Current screen
    pub mode: AppMode,
    /// Screen to return to when help closes
    pub help_return: AppMode,
    /// Current composition stage
    pub stage: Stage,
    /// Display mode fresh bouquets start in
    pub display_mode: String,
    /// Highlighted catalog row on the Flowers stage
    pub selected_flower: usize,
    /// Card field receiving typed text on the Message stage
    pub letter_field: LetterField,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Links for the bouquet most recently saved
    pub share_link: Option<ShareLink>,
    /// Bouquet shown on the viewing screen
    pub view: Option<ViewState>,
    /// Garden listing, newest first
    pub garden: Vec<StoredBouquet>,
    /// Highlighted garden row
    pub garden_selected: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Origin viewing links are built on
    pub share_base_url: String,
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_MODE, DEFAULT_BASE_URL)
    }
}

impl App {
    pub fn new(display_mode: &str, share_base_url: &str) -> Self {
        Self {
            store: BouquetStore::new(display_mode),
            catalog: FlowerCatalog::builtin(),
            mode: AppMode::Composing,
            help_return: AppMode::Composing,
            stage: Stage::Flowers,
            display_mode: display_mode.to_string(),
            selected_flower: 0,
            letter_field: LetterField::Recipient,
            status_message: None,
            share_link: None,
            view: None,
            garden: Vec::new(),
            garden_selected: 0,
            help_scroll: 0,
            share_base_url: share_base_url.to_string(),
        }
    }

    /// Moves to the next stage. Refused while the flower count is out of range.
    pub fn next_stage(&mut self) -> bool {
        if !self.store.can_proceed() {
            self.status_message = Some(format!(
                "Pick {} to {} blooms to continue",
                MIN_FLOWERS, MAX_FLOWERS
            ));
            return false;
        }
        match self.stage.next() {
            Some(stage) => {
                self.stage = stage;
                self.status_message = None;
                true
            }
            None => false,
        }
    }

    pub fn previous_stage(&mut self) -> bool {
        match self.stage.previous() {
            Some(stage) => {
                self.stage = stage;
                self.status_message = None;
                true
            }
            None => false,
        }
    }

    pub fn selected_catalog_flower(&self) -> Option<&Flower> {
        self.catalog.flowers().get(self.selected_flower)
    }

    pub fn select_next_flower(&mut self) {
        if self.selected_flower + 1 < self.catalog.len() {
            self.selected_flower += 1;
        }
    }

    pub fn select_previous_flower(&mut self) {
        self.selected_flower = self.selected_flower.saturating_sub(1);
    }

    /// Adds one of the highlighted flower unless the bouquet is already full.
    pub fn add_selected_flower(&mut self) {
        if self.store.total_flowers() >= MAX_FLOWERS {
            self.status_message = Some(format!("A bouquet holds at most {} blooms", MAX_FLOWERS));
            return;
        }
        if let Some(flower) = self.catalog.flowers().get(self.selected_flower) {
            self.store.add_flower(flower);
            self.bouquet_changed();
            self.status_message = None;
        }
    }

    pub fn remove_selected_flower(&mut self) {
        if let Some(id) = self.selected_catalog_flower().map(|flower| flower.id) {
            self.store.remove_flower(id);
            self.bouquet_changed();
            self.status_message = None;
        }
    }

    /// Toggles the wrapper at `index` in the wrapper list.
    pub fn toggle_wrapper_at(&mut self, index: usize) {
        if let Some(wrapper) = WRAPPERS.get(index) {
            self.store.toggle_wrapper(wrapper.id);
            self.bouquet_changed();
        }
    }

    pub fn shuffle_order(&mut self) {
        self.store.shuffle_order();
        self.bouquet_changed();
    }

    pub fn cycle_greenery(&mut self) {
        self.store.cycle_greenery();
        self.bouquet_changed();
    }

    pub fn next_letter_field(&mut self) {
        self.letter_field = self.letter_field.next();
    }

    pub fn type_letter_char(&mut self, c: char) {
        let mut value = self.store.bouquet().letter.field(self.letter_field).to_string();
        value.push(c);
        self.store.update_letter(self.letter_field, &value);
        self.bouquet_changed();
    }

    pub fn delete_letter_char(&mut self) {
        let mut value = self.store.bouquet().letter.field(self.letter_field).to_string();
        if value.pop().is_some() {
            self.store.update_letter(self.letter_field, &value);
            self.bouquet_changed();
        }
    }

    /// A saved link no longer describes an edited bouquet.
    fn bouquet_changed(&mut self) {
        self.share_link = None;
    }

    /// Stores the bouquet and builds its share links.
    ///
    /// On failure the bouquet is left untouched and the user stays on the
    /// current stage.
    pub fn submit(&mut self, gateway: &dyn BouquetGateway) -> Option<ShareLink> {
        if !self.store.can_proceed() {
            self.status_message = Some(format!(
                "Pick {} to {} blooms before sending",
                MIN_FLOWERS, MAX_FLOWERS
            ));
            return None;
        }

        let row = NewBouquet {
            short_id: generate_short_id(&mut rand::thread_rng()),
            bouquet: self.store.bouquet(),
        };
        match gateway.create(&row) {
            Ok(stored) => {
                let link = ShareLink::new(&self.share_base_url, stored.id);
                tracing::info!(id = stored.id, short_id = %row.short_id, "bouquet created");
                self.status_message = Some(format!("Bouquet planted at {}", link.view_url));
                self.share_link = Some(link.clone());
                Some(link)
            }
            Err(e) => {
                tracing::error!(error = %e, "error creating bouquet");
                self.status_message = Some(format!("Could not save bouquet: {}", e));
                None
            }
        }
    }

    /// Loads one stored bouquet for display, falling back to "not found".
    pub fn open_bouquet(&mut self, gateway: &dyn BouquetGateway, id: BouquetId) {
        let view = match gateway.get_by_id(id) {
            Ok(Some(stored)) => ViewState::Loaded(Box::new(stored)),
            Ok(None) => ViewState::NotFound(id),
            Err(e) => {
                tracing::warn!(id, error = %e, "bouquet lookup failed");
                ViewState::NotFound(id)
            }
        };
        self.view = Some(view);
        self.mode = AppMode::Viewing;
        self.status_message = None;
    }

    pub fn open_garden(&mut self, gateway: &dyn BouquetGateway) {
        match gateway.list_all() {
            Ok(bouquets) => {
                self.garden = bouquets;
                self.status_message = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "garden listing failed");
                self.garden.clear();
                self.status_message = Some(format!("Could not load the garden: {}", e));
            }
        }
        self.garden_selected = 0;
        self.mode = AppMode::Garden;
    }

    pub fn select_next_garden_entry(&mut self) {
        if self.garden_selected + 1 < self.garden.len() {
            self.garden_selected += 1;
        }
    }

    pub fn select_previous_garden_entry(&mut self) {
        self.garden_selected = self.garden_selected.saturating_sub(1);
    }

    /// Shows the highlighted garden entry on the viewing screen.
    pub fn view_selected_garden_entry(&mut self) {
        if let Some(stored) = self.garden.get(self.garden_selected) {
            self.view = Some(ViewState::Loaded(Box::new(stored.clone())));
            self.mode = AppMode::Viewing;
            self.status_message = None;
        }
    }

    pub fn garden_export_filename(&self) -> String {
        "garden.csv".to_string()
    }

    /// Processes the result of a garden CSV export.
    pub fn set_export_result(&mut self, result: Result<String, ExportError>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported to {}", filename));
            }
            Err(error) => {
                tracing::warn!(error = %error, "garden export failed");
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }
    }

    pub fn open_help(&mut self) {
        if self.mode != AppMode::Help {
            self.help_return = self.mode;
        }
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = self.help_return;
    }

    /// Starts over with an empty bouquet on the Flowers stage.
    pub fn go_home(&mut self) {
        self.store = BouquetStore::new(&self.display_mode);
        self.mode = AppMode::Composing;
        self.stage = Stage::Flowers;
        self.selected_flower = 0;
        self.letter_field = LetterField::Recipient;
        self.share_link = None;
        self.view = None;
        self.status_message = None;
    }

    /// Whether a plain `q` should quit rather than be typed or close help.
    pub fn accepts_quit(&self) -> bool {
        match self.mode {
            AppMode::Composing => self.stage != Stage::Message,
            AppMode::Help => false,
            AppMode::Viewing | AppMode::Garden => true,
        }
    }
}
