use tracing::info;

use crate::record::{set_field, CharField};
use crate::store::RecordStore;
use crate::Result;

/// One requested field update.
#[derive(Copy, Clone, Debug)]
pub struct FieldPatch {
    pub field: CharField,
    pub value: u64,
}

/// Fetches the record for `key`, applies every patch to the in-memory copy,
/// then writes the record back once. Any failure aborts before the write, so
/// a rejected value never leaves a partial update behind. With an empty patch
/// list the record is fetched but never written.
pub fn patch_record(store: &RecordStore, key: &str, patches: &[FieldPatch]) -> Result<()> {
    let mut data = store.fetch(key)?;
    for patch in patches {
        set_field(&mut data, patch.field.descriptor(), patch.value)?;
    }
    if patches.is_empty() {
        return Ok(());
    }
    store.store(key, &data)?;
    info!(key, patched = patches.len(), "record updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::get_field;
    use crate::MaintError;
    use rusqlite::{params, Connection};
    use tempfile::TempDir;

    fn seed_store(dir: &TempDir, key: &str, blob: &[u8]) -> RecordStore {
        let path = dir.path().join("WCCUSERS.DB");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE data_t (id INTEGER PRIMARY KEY, data BLOB NOT NULL, key_0 TEXT NOT NULL);",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO data_t (data, key_0) VALUES (?1, ?2)",
            params![blob, key],
        )
        .unwrap();
        drop(conn);
        RecordStore::open(&path).unwrap()
    }

    #[test]
    fn experience_patch_persists() {
        let dir = TempDir::new().unwrap();
        let store = seed_store(&dir, "Sysop", &vec![0u8; 0x500]);
        patch_record(
            &store,
            "Sysop",
            &[FieldPatch {
                field: CharField::Experience,
                value: 100_000,
            }],
        )
        .unwrap();

        let data = store.fetch("Sysop").unwrap();
        assert_eq!(&data[0x46F..0x473], &[0xA0, 0x86, 0x01, 0x00]);
        assert!(data[..0x46F].iter().all(|b| *b == 0));
        assert!(data[0x473..].iter().all(|b| *b == 0));
        assert_eq!(
            get_field(&data, CharField::Experience.descriptor()).unwrap(),
            100_000
        );
    }

    #[test]
    fn missing_key_aborts_without_write() {
        let dir = TempDir::new().unwrap();
        let store = seed_store(&dir, "Sysop", &vec![0u8; 0x500]);
        let err = patch_record(
            &store,
            "nobody",
            &[FieldPatch {
                field: CharField::Experience,
                value: 1,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, MaintError::NotFound(_)));
        assert_eq!(store.fetch("Sysop").unwrap(), vec![0u8; 0x500]);
    }

    #[test]
    fn empty_patch_list_never_writes() {
        let dir = TempDir::new().unwrap();
        let blob: Vec<u8> = (0..=255).cycle().take(0x500).map(|b| b as u8).collect();
        let store = seed_store(&dir, "Sysop", &blob);
        patch_record(&store, "Sysop", &[]).unwrap();
        assert_eq!(store.fetch("Sysop").unwrap(), blob);
    }

    #[test]
    fn rejected_value_aborts_the_whole_patch() {
        let dir = TempDir::new().unwrap();
        let store = seed_store(&dir, "Sysop", &vec![0u8; 0x500]);
        let patches = [
            FieldPatch {
                field: CharField::Experience,
                value: 100,
            },
            FieldPatch {
                field: CharField::Experience,
                value: 1 << 32,
            },
        ];
        let err = patch_record(&store, "Sysop", &patches).unwrap_err();
        assert!(matches!(err, MaintError::ValueOutOfBounds { .. }));
        // The first patch was valid, but nothing may reach the store.
        assert_eq!(store.fetch("Sysop").unwrap(), vec![0u8; 0x500]);
    }

    #[test]
    fn short_record_aborts_before_write() {
        let dir = TempDir::new().unwrap();
        let store = seed_store(&dir, "Sysop", &[0u8; 16]);
        let err = patch_record(
            &store,
            "Sysop",
            &[FieldPatch {
                field: CharField::Experience,
                value: 1,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, MaintError::OutOfRange { .. }));
        assert_eq!(store.fetch("Sysop").unwrap(), vec![0u8; 16]);
    }
}
