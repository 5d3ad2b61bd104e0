//! CSV export of the garden listing.

use thiserror::Error;

use crate::domain::{FlowerCatalog, StoredBouquet};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("io failed: {0}")]
    Io(#[from] std::io::Error),
}

pub struct GardenExporter;

impl GardenExporter {
    pub const HEADERS: [&'static str; 7] =
        ["id", "short_id", "recipient", "sender", "flowers", "mode", "planted_on"];

    /// Writes one row per bouquet to `filename` and returns the filename.
    pub fn export_to_csv(
        bouquets: &[StoredBouquet],
        catalog: &FlowerCatalog,
        filename: &str,
    ) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_path(filename)?;
        writer.write_record(Self::HEADERS)?;
        for stored in bouquets {
            writer.write_record([
                stored.id.to_string(),
                stored.short_id.clone().unwrap_or_default(),
                stored.bouquet.letter.recipient.clone(),
                stored.bouquet.letter.sender.clone(),
                Self::describe_flowers(stored, catalog),
                stored.bouquet.mode.clone(),
                stored
                    .planted_on()
                    .map(|date| date.to_rfc3339())
                    .unwrap_or_default(),
            ])?;
        }
        writer.flush()?;
        tracing::info!(rows = bouquets.len(), filename, "garden exported");
        Ok(filename.to_string())
    }

    /// `"rose x2; daisy x1"`, with unknown ids shown by number.
    pub fn describe_flowers(stored: &StoredBouquet, catalog: &FlowerCatalog) -> String {
        stored
            .bouquet
            .flowers
            .iter()
            .map(|entry| match catalog.get(entry.id) {
                Some(flower) => format!("{} x{}", flower.name, entry.count),
                None => format!("#{} x{}", entry.id, entry.count),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
