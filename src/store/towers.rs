//! SQLite-backed tower database
//!
//! Maps cell identity tuples to surveyed coordinates. Lookups are exact:
//! a tuple is either known or it is not, and a miss is an expected outcome
//! rather than an error.

use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};

use crate::core::{CellReading, GeoPoint, TowerRecord};

/// Offline store of surveyed cell towers.
pub struct TowerStore {
    db: Connection,
}

impl TowerStore {
    /// Open (or create) a tower database at the given path.
    pub fn open(path: &str) -> SqlResult<Self> {
        let db = Connection::open(path)?;
        Self::init_schema(&db)?;
        Ok(Self { db })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> SqlResult<Self> {
        Self::open(":memory:")
    }

    fn init_schema(conn: &Connection) -> SqlResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS towers (
                id INTEGER PRIMARY KEY,
                mcc INTEGER NOT NULL,
                mnc INTEGER NOT NULL,
                lac INTEGER NOT NULL,
                cid INTEGER NOT NULL,
                lat REAL NOT NULL,
                lon REAL NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_towers_identity
            ON towers(mcc, mnc, lac, cid);
            "#,
        )
    }

    /// Look up the exact identity tuple of a reading.
    ///
    /// Returns `Ok(None)` when the tuple is not in the database.
    pub fn find_tower(
        &self,
        mcc: u16,
        mnc: u16,
        lac: u32,
        cid: u64,
    ) -> SqlResult<Option<TowerRecord>> {
        self.db
            .query_row(
                "SELECT mcc, mnc, lac, cid, lat, lon FROM towers
                 WHERE mcc = ?1 AND mnc = ?2 AND lac = ?3 AND cid = ?4",
                params![mcc, mnc, lac, cid],
                |row| {
                    Ok(TowerRecord {
                        mcc: row.get(0)?,
                        mnc: row.get(1)?,
                        lac: row.get(2)?,
                        cid: row.get(3)?,
                        position: GeoPoint::new(row.get(4)?, row.get(5)?),
                    })
                },
            )
            .optional()
    }

    /// Insert a tower unless its identity tuple is already known.
    ///
    /// Returns whether a new row was written. The first record for a tuple
    /// wins; later inserts with the same tuple are ignored.
    pub fn insert(&self, record: &TowerRecord) -> SqlResult<bool> {
        let changed = self.db.execute(
            "INSERT OR IGNORE INTO towers (mcc, mnc, lac, cid, lat, lon)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.mcc,
                record.mnc,
                record.lac,
                record.cid,
                record.position.lat,
                record.position.lon
            ],
        )?;
        Ok(changed > 0)
    }

    /// Import a batch of towers inside one transaction.
    ///
    /// Returns the number of rows actually written; duplicates of rows
    /// already present count as zero.
    pub fn import(&mut self, records: &[TowerRecord]) -> SqlResult<usize> {
        let tx = self.db.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO towers (mcc, mnc, lac, cid, lat, lon)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in records {
                inserted += stmt.execute(params![
                    record.mcc,
                    record.mnc,
                    record.lac,
                    record.cid,
                    record.position.lat,
                    record.position.lon
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Record a tower seen in the field but absent from the database,
    /// pinned at the given position.
    pub fn contribute(&self, reading: &CellReading, position: GeoPoint) -> SqlResult<bool> {
        let record = TowerRecord {
            mcc: reading.mcc,
            mnc: reading.mnc,
            lac: reading.lac,
            cid: reading.cid,
            position,
        };
        let inserted = self.insert(&record)?;
        if inserted {
            log::info!(
                "Contributed tower {}-{}-{}-{} at ({:.5}, {:.5})",
                reading.mcc,
                reading.mnc,
                reading.lac,
                reading.cid,
                position.lat,
                position.lon
            );
        }
        Ok(inserted)
    }

    /// Number of towers currently stored.
    pub fn count(&self) -> SqlResult<u64> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM towers", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Remove every stored tower.
    pub fn clear(&self) -> SqlResult<()> {
        self.db.execute("DELETE FROM towers", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RadioType;

    fn sample_tower() -> TowerRecord {
        TowerRecord {
            mcc: 404,
            mnc: 86,
            lac: 11000,
            cid: 5001,
            position: GeoPoint::new(12.9716, 77.5946),
        }
    }

    #[test]
    fn test_lookup_miss_returns_none() {
        let store = TowerStore::in_memory().unwrap();
        let found = store.find_tower(404, 86, 11000, 9999).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_insert_and_find() {
        let store = TowerStore::in_memory().unwrap();
        assert!(store.insert(&sample_tower()).unwrap());

        let found = store.find_tower(404, 86, 11000, 5001).unwrap().unwrap();
        assert_eq!(found.position, GeoPoint::new(12.9716, 77.5946));
    }

    #[test]
    fn test_near_identical_tuple_is_distinct() {
        let store = TowerStore::in_memory().unwrap();
        store.insert(&sample_tower()).unwrap();

        // Same cell id under a different area code is a different tower
        assert!(store.find_tower(404, 86, 11001, 5001).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_identity_keeps_first_position() {
        let store = TowerStore::in_memory().unwrap();
        assert!(store.insert(&sample_tower()).unwrap());

        let mut moved = sample_tower();
        moved.position = GeoPoint::new(0.0, 0.0);
        assert!(!store.insert(&moved).unwrap());

        let found = store.find_tower(404, 86, 11000, 5001).unwrap().unwrap();
        assert_eq!(found.position.lat, 12.9716);
    }

    #[test]
    fn test_import_counts_new_rows_only() {
        let mut store = TowerStore::in_memory().unwrap();
        let mut second = sample_tower();
        second.cid = 5002;

        assert_eq!(store.import(&[sample_tower(), second.clone()]).unwrap(), 2);
        assert_eq!(store.import(&[sample_tower(), second]).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_contribute_stores_both_axes() {
        let store = TowerStore::in_memory().unwrap();
        let reading = CellReading::new(404, 86, 11000, 7777, RadioType::Lte);
        assert!(store
            .contribute(&reading, GeoPoint::new(12.97, 77.59))
            .unwrap());

        let found = store.find_tower(404, 86, 11000, 7777).unwrap().unwrap();
        assert_eq!(found.position.lat, 12.97);
        assert_eq!(found.position.lon, 77.59);
    }

    #[test]
    fn test_clear_empties_store() {
        let store = TowerStore::in_memory().unwrap();
        store.insert(&sample_tower()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}
