//! Storage of finished bouquets.
//!
//! [`BouquetGateway`] is the seam the application talks to. [`FileGateway`]
//! keeps every record in one local JSON file; the hosted table store lives in
//! [`super::rest`].

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::{BouquetId, NewBouquet, StoredBouquet};

const SHORT_ID_LEN: usize = 8;
const SHORT_ID_ALPHABET: &[u8] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("insert returned no row")]
    EmptyInsert,
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

pub trait BouquetGateway {
    /// Stores a finished bouquet and returns the row with its assigned id.
    fn create(&self, bouquet: &NewBouquet<'_>) -> GatewayResult<StoredBouquet>;

    /// Reads one bouquet back. `Ok(None)` when no record has this id.
    fn get_by_id(&self, id: BouquetId) -> GatewayResult<Option<StoredBouquet>>;

    /// Every stored bouquet, newest id first.
    fn list_all(&self) -> GatewayResult<Vec<StoredBouquet>>;
}

/// Random 8-character identifier over the URL-safe alphabet.
pub fn generate_short_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SHORT_ID_LEN)
        .map(|_| SHORT_ID_ALPHABET[rng.gen_range(0..SHORT_ID_ALPHABET.len())] as char)
        .collect()
}

/// Keeps all bouquets in a single JSON array on disk.
#[derive(Debug, Clone)]
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> GatewayResult<Vec<StoredBouquet>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file and renames it over the store, so a
    /// failed write leaves the previous records intact.
    fn save(&self, records: &[StoredBouquet]) -> GatewayResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, records)?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl BouquetGateway for FileGateway {
    fn create(&self, bouquet: &NewBouquet<'_>) -> GatewayResult<StoredBouquet> {
        let mut records = self.load()?;
        let id = records.iter().map(|record| record.id).max().unwrap_or(0) + 1;
        let stored = StoredBouquet {
            id,
            short_id: Some(bouquet.short_id.clone()),
            bouquet: bouquet.bouquet.clone(),
            created_at: Some(Utc::now()),
        };
        records.push(stored.clone());
        self.save(&records)?;
        tracing::debug!(id, path = %self.path.display(), "bouquet written to local store");
        Ok(stored)
    }

    fn get_by_id(&self, id: BouquetId) -> GatewayResult<Option<StoredBouquet>> {
        Ok(self.load()?.into_iter().find(|record| record.id == id))
    }

    fn list_all(&self) -> GatewayResult<Vec<StoredBouquet>> {
        let mut records = self.load()?;
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bouquet, BouquetFlower};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    fn sample(recipient: &str) -> Bouquet {
        let mut bouquet = Bouquet::new("color");
        bouquet.flowers = vec![BouquetFlower { id: 6, count: 4 }, BouquetFlower { id: 4, count: 2 }];
        bouquet.flower_order = vec![5, 4, 3, 2, 1, 0];
        bouquet.letter.recipient = recipient.to_string();
        bouquet
    }

    fn new_row(bouquet: &Bouquet) -> NewBouquet<'_> {
        NewBouquet { short_id: "abcd1234".to_string(), bouquet }
    }

    #[test]
    fn test_short_id_shape() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let id = generate_short_id(&mut rng);
            assert_eq!(id.len(), 8);
            assert!(id.bytes().all(|b| SHORT_ID_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let gateway = FileGateway::new(dir.path().join("nothing.json"));
        assert!(gateway.list_all().unwrap().is_empty());
        assert!(gateway.get_by_id(1).unwrap().is_none());
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let dir = TempDir::new().unwrap();
        let gateway = FileGateway::new(dir.path().join("bouquets.json"));

        let first = sample("Ada");
        let second = sample("Grace");
        let a = gateway.create(&new_row(&first)).unwrap();
        let b = gateway.create(&new_row(&second)).unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(b.created_at.is_some());
        assert_eq!(b.short_id.as_deref(), Some("abcd1234"));
    }

    #[test]
    fn test_get_by_id_round_trips_record() {
        let dir = TempDir::new().unwrap();
        let gateway = FileGateway::new(dir.path().join("bouquets.json"));
        let bouquet = sample("Ada");
        let created = gateway.create(&new_row(&bouquet)).unwrap();

        let loaded = gateway.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.bouquet.flower_order, vec![5, 4, 3, 2, 1, 0]);
        assert!(gateway.get_by_id(created.id + 1).unwrap().is_none());
    }

    #[test]
    fn test_list_all_newest_first() {
        let dir = TempDir::new().unwrap();
        let gateway = FileGateway::new(dir.path().join("bouquets.json"));
        for name in ["a", "b", "c"] {
            let bouquet = sample(name);
            gateway.create(&new_row(&bouquet)).unwrap();
        }

        let ids: Vec<_> = gateway.list_all().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_corrupt_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bouquets.json");
        fs::write(&path, "{ not json").unwrap();
        let gateway = FileGateway::new(&path);

        assert!(matches!(gateway.list_all(), Err(GatewayError::Malformed(_))));
    }

    #[test]
    fn test_writes_leave_only_the_store_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bouquets.json");
        let gateway = FileGateway::new(&path);
        for name in ["a", "b"] {
            let bouquet = sample(name);
            gateway.create(&new_row(&bouquet)).unwrap();
        }

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("bouquets.json")]);
        let on_disk: Vec<StoredBouquet> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 2);
    }

    #[test]
    fn test_failed_write_keeps_previous_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bouquets.json");
        let gateway = FileGateway::new(&path);
        let bouquet = sample("kept");
        gateway.create(&new_row(&bouquet)).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let missing = FileGateway::new(dir.path().join("gone").join("bouquets.json"));
        assert!(matches!(missing.create(&new_row(&bouquet)), Err(GatewayError::Io(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
