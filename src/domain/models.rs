use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::errors::DomainError;

/// Fewest flowers a bouquet may hold before leaving the selection stage.
pub const MIN_FLOWERS: u32 = 6;
/// Most flowers a bouquet may hold.
pub const MAX_FLOWERS: u32 = 10;
/// Longest letter message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;
/// Number of greenery variants the bouquet cycles through.
pub const GREENERY_VARIANTS: u8 = 3;
/// Display mode used when none is requested.
pub const DEFAULT_MODE: &str = "mono";

pub type FlowerId = u32;
pub type BouquetId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowerSize {
    Small,
    Medium,
    Large,
}

impl FlowerSize {
    /// Preview edge length for a flower of this size.
    pub fn dimension(self) -> u16 {
        match self {
            FlowerSize::Small => 80,
            FlowerSize::Medium => 120,
            FlowerSize::Large => 160,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlowerSize::Small => "small",
            FlowerSize::Medium => "medium",
            FlowerSize::Large => "large",
        }
    }
}

/// A catalog entry describing one kind of flower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flower {
    pub id: FlowerId,
    pub name: String,
    pub meaning: String,
    pub birth_month: String,
    pub size: FlowerSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One flower type inside a bouquet together with how many of it were picked.
///
/// Stored rows with a zero count are rejected when read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BouquetFlowerRow")]
pub struct BouquetFlower {
    pub id: FlowerId,
    pub count: u32,
}

#[derive(Deserialize)]
struct BouquetFlowerRow {
    id: FlowerId,
    count: u32,
}

impl TryFrom<BouquetFlowerRow> for BouquetFlower {
    type Error = DomainError;

    fn try_from(row: BouquetFlowerRow) -> Result<Self, Self::Error> {
        if row.count == 0 {
            return Err(DomainError::EmptyFlowerCount(row.id));
        }
        Ok(BouquetFlower {
            id: row.id,
            count: row.count,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterField {
    Recipient,
    Message,
    Sender,
}

impl LetterField {
    /// Field that follows this one when tabbing through the card.
    pub fn next(self) -> Self {
        match self {
            LetterField::Recipient => LetterField::Message,
            LetterField::Message => LetterField::Sender,
            LetterField::Sender => LetterField::Recipient,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sender: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recipient: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

impl Letter {
    pub fn field(&self, field: LetterField) -> &str {
        match field {
            LetterField::Recipient => &self.recipient,
            LetterField::Message => &self.message,
            LetterField::Sender => &self.sender,
        }
    }

    /// Replaces one field. Messages are cut to [`MAX_MESSAGE_CHARS`] characters.
    pub fn set_field(&mut self, field: LetterField, value: &str) {
        match field {
            LetterField::Recipient => self.recipient = value.to_string(),
            LetterField::Sender => self.sender = value.to_string(),
            LetterField::Message => {
                self.message = value.chars().take(MAX_MESSAGE_CHARS).collect();
            }
        }
    }
}

/// Background foliage variant, always one of `0..GREENERY_VARIANTS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Greenery(u8);

impl Greenery {
    pub fn index(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Self {
        Greenery((self.0 + 1) % GREENERY_VARIANTS)
    }
}

impl TryFrom<i64> for Greenery {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..i64::from(GREENERY_VARIANTS)).contains(&value) {
            Ok(Greenery(value as u8))
        } else {
            Err(DomainError::InvalidGreenery(value))
        }
    }
}

impl From<Greenery> for u8 {
    fn from(greenery: Greenery) -> Self {
        greenery.0
    }
}

/// The bouquet a user composes, in the shape it is persisted.
///
/// # Examples
///
/// ```
/// use bloomy::domain::Bouquet;
///
/// let bouquet = Bouquet::new("color");
/// assert_eq!(bouquet.total_flowers(), 0);
/// assert!(!bouquet.can_proceed());
/// assert!(bouquet.wrapper.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bouquet {
    pub mode: String,
    #[serde(default)]
    pub flowers: Vec<BouquetFlower>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub letter: Letter,
    #[serde(default)]
    pub greenery: Greenery,
    pub timestamp: i64,
    #[serde(rename = "flowerOrder", default, deserialize_with = "null_as_default")]
    pub flower_order: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,
}

impl Default for Bouquet {
    fn default() -> Self {
        Self::new(DEFAULT_MODE)
    }
}

impl Bouquet {
    /// Starts an empty bouquet stamped with the current time.
    pub fn new(mode: &str) -> Self {
        Self {
            mode: mode.to_string(),
            flowers: Vec::new(),
            letter: Letter::default(),
            greenery: Greenery::default(),
            timestamp: Utc::now().timestamp_millis(),
            flower_order: Vec::new(),
            wrapper: None,
        }
    }

    /// Sum of all counts. Saturates, since stored rows can carry any count.
    pub fn total_flowers(&self) -> u32 {
        self.flowers
            .iter()
            .fold(0u32, |total, flower| total.saturating_add(flower.count))
    }

    pub fn can_proceed(&self) -> bool {
        (MIN_FLOWERS..=MAX_FLOWERS).contains(&self.total_flowers())
    }

    pub fn count_of(&self, id: FlowerId) -> u32 {
        self.flowers
            .iter()
            .find(|flower| flower.id == id)
            .map(|flower| flower.count)
            .unwrap_or(0)
    }
}

/// The row written to the table store on submission.
#[derive(Debug, Clone, Serialize)]
pub struct NewBouquet<'a> {
    pub short_id: String,
    #[serde(flatten)]
    pub bouquet: &'a Bouquet,
}

/// A bouquet as read back from the table store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBouquet {
    pub id: BouquetId,
    #[serde(default)]
    pub short_id: Option<String>,
    #[serde(flatten)]
    pub bouquet: Bouquet,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredBouquet {
    /// When the bouquet was planted: the server creation time, else its own timestamp.
    pub fn planted_on(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .or_else(|| DateTime::<Utc>::from_timestamp_millis(self.bouquet.timestamp))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
