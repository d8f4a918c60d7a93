use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use hashdrive_types::{Account, ContentLocator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::traits::{AppendAck, RegistryLedger, Visibility};

/// Flush strategy for appended entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// `fsync` after every append.
    EveryWrite,
    /// Flush to the OS and let it decide when to persist.
    #[default]
    OsDefault,
}

#[derive(Clone, Debug, Default)]
pub struct FileLedgerConfig {
    pub sync_mode: SyncMode,
}

/// One framed record in the log file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct LedgerEntry {
    account: Account,
    locator: String,
}

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

struct LogWriter {
    file: File,
    offset: u64,
}

impl LogWriter {
    fn append(&mut self, frame: &[u8], sync_mode: SyncMode) -> io::Result<()> {
        self.file.write_all(frame)?;
        if sync_mode == SyncMode::EveryWrite {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

/// Append-only registry persisted to a single log file.
///
/// On-disk format, repeated per entry:
/// ```text
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized entry)]
/// ```
///
/// The whole log is replayed into an in-memory index on open. A torn entry
/// at the tail stops replay and is truncated away; an entry whose CRC does
/// not match is skipped. A failed append is rolled back to its start offset.
/// Appends are visible as soon as `add` returns.
pub struct FileLedger {
    path: PathBuf,
    config: FileLedgerConfig,
    writer: Mutex<LogWriter>,
    index: RwLock<HashMap<Account, Vec<String>>>,
}

impl FileLedger {
    /// Open (or create) the log at `path` and replay it.
    ///
    /// A torn tail is truncated away so later appends start on a frame
    /// boundary.
    pub fn open(path: &Path, config: FileLedgerConfig) -> LedgerResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;
        let file_len = file.metadata()?.len();

        let (recovered, valid_len) = replay(path)?;
        if valid_len < file_len {
            warn!(path = %path.display(), valid_len, file_len, "truncating torn ledger tail");
            file.set_len(valid_len)?;
            file.sync_all()?;
        }

        let mut index: HashMap<Account, Vec<String>> = HashMap::new();
        let count = recovered.len();
        for entry in recovered {
            index.entry(entry.account).or_default().push(entry.locator);
        }
        info!(path = %path.display(), entries = count, accounts = index.len(), "ledger opened");

        Ok(Self {
            path: path.to_path_buf(),
            config,
            writer: Mutex::new(LogWriter {
                file,
                offset: valid_len,
            }),
            index: RwLock::new(index),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current size of the log in bytes.
    pub fn offset(&self) -> LedgerResult<u64> {
        let w = self.writer.lock().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(w.offset)
    }

    fn write_entry(&self, entry: &LedgerEntry) -> LedgerResult<u64> {
        let payload =
            bincode::serialize(entry).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let length = payload.len() as u32;
        let crc = crc32fast::hash(&payload);

        let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
        frame.extend_from_slice(&length.to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&payload);

        let mut w = self.writer.lock().map_err(|_| LedgerError::LockPoisoned)?;
        let entry_offset = w.offset;

        if let Err(e) = w.append(&frame, self.config.sync_mode) {
            // Drop any partial frame so the next append starts on a boundary.
            if let Err(rollback) = w.file.set_len(entry_offset) {
                warn!(offset = entry_offset, error = %rollback, "failed to roll back partial ledger entry");
            }
            return Err(e.into());
        }

        w.offset += frame.len() as u64;
        Ok(entry_offset)
    }
}

#[async_trait]
impl RegistryLedger for FileLedger {
    async fn add(&self, account: &Account, locator: &ContentLocator) -> LedgerResult<AppendAck> {
        let entry = LedgerEntry {
            account: *account,
            locator: locator.to_string(),
        };

        // Holding the index lock across the write keeps positions in step
        // with the order entries land in the file.
        let mut index = self.index.write().map_err(|_| LedgerError::LockPoisoned)?;
        let offset = self.write_entry(&entry)?;

        let stream = index.entry(*account).or_default();
        stream.push(entry.locator);
        let position = (stream.len() - 1) as u64;
        debug!(%account, %locator, position, offset, "ledger append");

        Ok(AppendAck {
            account: *account,
            position,
            visibility: Visibility::Visible,
        })
    }

    async fn display(&self, account: &Account) -> LedgerResult<Vec<String>> {
        let index = self.index.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(index.get(account).cloned().unwrap_or_default())
    }
}

/// Read every intact entry. Also returns the length of the framed prefix,
/// which excludes a torn tail.
fn replay(path: &Path) -> LedgerResult<(Vec<LedgerEntry>, u64)> {
    let mut file = BufReader::new(File::open(path)?);
    let file_len = file.get_ref().metadata()?.len();
    let mut entries = Vec::new();
    let mut offset: u64 = 0;

    while offset + HEADER_SIZE as u64 <= file_len {
        let mut header = [0u8; HEADER_SIZE];
        match file.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }

        let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        if length == 0 || offset + HEADER_SIZE as u64 + length as u64 > file_len {
            warn!(offset, length, file_len, "torn ledger entry; stopping replay");
            break;
        }

        let mut payload = vec![0u8; length as usize];
        match file.read_exact(&mut payload) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                warn!(offset, "truncated ledger entry; stopping replay");
                break;
            }
            Err(e) => return Err(e.into()),
        }
        offset += HEADER_SIZE as u64 + length as u64;

        let actual_crc = crc32fast::hash(&payload);
        if actual_crc != expected_crc {
            warn!(offset, expected = expected_crc, actual = actual_crc, "CRC mismatch; skipping entry");
            continue;
        }

        match bincode::deserialize::<LedgerEntry>(&payload) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(offset, error = %e, "undecodable ledger entry; skipping"),
        }
    }

    debug!(recovered = entries.len(), valid_len = offset, "ledger replay complete");
    Ok((entries, offset))
}
