//! Persistent on-disk cache of the revision file-status index.
//!
//! [`RevisionCache`] turns a [`CacheContents`] into a compressed binary file
//! inside a repository's git directory and reads it back on a later run, so
//! the history walker only computes status for revisions it has not seen.
//!
//! # File layout
//! Inside the zlib envelope (see [`crate::core::stream`]):
//! 1. `u32` magic, `i32` version
//! 2. directory table: `i32` count + strings
//! 3. file table: `i32` count + strings
//! 4. `i32` size hint, then every persisted key concatenated into one string
//! 5. one record per key, in blob order, until the stream ends
//!
//! Writing the keys as a single fixed-width run compresses noticeably better
//! than one length-prefixed string per key; on load they are re-split every
//! [`SHA_LENGTH`] characters.

use crate::core::{
    error::{RevCacheError, Result},
    file_status::FileStatus,
    record::{CacheContents, FileStatusRecord, MergeParent, PathTable, RevFileMap},
    revision::{RevisionKey, SHA_LENGTH},
    stream::{self, StreamReader, StreamWriter},
};
use std::fs;
use std::path::{Path, PathBuf};

pub const CACHE_MAGIC: u32 = 0xA0B0C0D0;
pub const CACHE_VERSION: i32 = 2;

/// Cache file name, relative to the root directory.
pub const CACHE_FILE_NAME: &str = "revcache.dat";

/// Suffix of the temporary file written before replacing the cache.
pub const BAK_EXT: &str = ".bak";

/// Slack added to the advisory blob size hint.
const SIZE_HINT_SLACK: usize = 1000;

pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

#[derive(Debug, Clone)]
pub struct RevisionCache {
    root: PathBuf,
    compression_level: u32,
}

impl RevisionCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_path(&self) -> PathBuf {
        self.root.join(CACHE_FILE_NAME)
    }

    pub fn temp_path(&self) -> PathBuf {
        self.root.join(format!("{CACHE_FILE_NAME}{BAK_EXT}"))
    }

    /// Persist `contents`, replacing any previous cache file.
    ///
    /// The file is first written next to the cache under a `.bak` name. The
    /// previous cache is only removed once that write succeeded, and if the
    /// removal fails the previous cache stays in place untouched.
    pub fn save(&self, contents: &CacheContents) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(RevCacheError::EmptyRootPath);
        }
        if contents.revisions.is_empty() {
            return Err(RevCacheError::EmptyCache);
        }
        if !self.root.is_dir() {
            log::warn!("Git directory not found, unable to save cache");
            return Err(RevCacheError::cache_directory_not_found(&self.root));
        }

        let path = self.cache_path();
        let tmp_path = self.temp_path();

        log::info!("Saving cache. Please wait...");
        let data = encode(contents)?;

        log::info!("Compressing data...");
        let packed = stream::compress(&data, self.compression_level)?;
        log::debug!(
            "Cache body {} bytes, compressed {} bytes",
            data.len(),
            packed.len()
        );

        if let Err(e) = fs::write(&tmp_path, &packed) {
            log::error!("Failed to write '{}': {}", tmp_path.display(), e);
            let _ = fs::remove_file(&tmp_path);
            return Err(RevCacheError::cache_write_failed(&tmp_path, e));
        }

        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                log::error!("access denied to {}", path.display());
                let _ = fs::remove_file(&tmp_path);
                return Err(RevCacheError::cache_replace_failed(&path, e));
            }
        }
        fs::rename(&tmp_path, &path).map_err(|e| {
            log::error!(
                "Failed to rename '{}' to '{}': {}",
                tmp_path.display(),
                path.display(),
                e
            );
            RevCacheError::cache_write_failed(&path, e)
        })?;

        log::info!("Done.");
        Ok(())
    }

    /// Read the cache back.
    ///
    /// A missing cache file is a cold start and yields empty contents. A file
    /// that fails the format checks is rejected as a whole.
    pub fn load(&self) -> Result<CacheContents> {
        let path = self.cache_path();
        let packed = match fs::read(&path) {
            Ok(packed) => packed,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No cache file at {}", path.display());
                return Ok(CacheContents::new());
            }
            Err(e) => return Err(RevCacheError::cache_read_failed(&path, e)),
        };
        let data = stream::decompress(&packed)?;
        let contents = decode(&data, &path)?;

        log::debug!(
            "Loaded {} revisions, {} dirs, {} files from {}",
            contents.revisions.len(),
            contents.dirs.len(),
            contents.files.len(),
            path.display()
        );
        Ok(contents)
    }

    /// Delete the cache file and any leftover temporary file.
    ///
    /// Returns whether a cache file was present.
    pub fn remove(&self) -> Result<bool> {
        let tmp_path = self.temp_path();
        if tmp_path.exists() {
            fs::remove_file(&tmp_path)?;
        }
        let path = self.cache_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| RevCacheError::cache_replace_failed(&path, e))?;
        Ok(true)
    }
}

fn persisted_keys(
    revisions: &RevFileMap,
) -> impl Iterator<Item = (&RevisionKey, &FileStatusRecord)> {
    revisions.iter().filter(|(key, _)| key.is_persistable())
}

/// Serialize `contents` into the uncompressed cache body.
pub(crate) fn encode(contents: &CacheContents) -> Result<Vec<u8>> {
    let mut out = StreamWriter::new();
    out.write_u32(CACHE_MAGIC);
    out.write_i32(CACHE_VERSION);

    write_table(&mut out, &contents.dirs);
    write_table(&mut out, &contents.files);

    out.write_i32(size_hint(contents.revisions.len()));

    let mut blob = String::new();
    for (key, record) in persisted_keys(&contents.revisions) {
        if !key.has_persisted_width() {
            return Err(RevCacheError::invalid_revision_key(key.as_str()));
        }
        check_record(key, record)?;
        blob.push_str(key.as_str());
    }
    out.write_string(&blob);

    for (_, record) in persisted_keys(&contents.revisions) {
        out.write_indices(&record.names);
        out.write_indices(&record.dirs);
        let flags: String = record.status.iter().map(FileStatus::as_char).collect();
        out.write_string(&flags);
        out.write_i32(record.merge_parent.to_wire());
    }
    Ok(out.into_inner())
}

/// Advisory blob length: 40 characters per map key plus slack, saturating at
/// `i32::MAX` so it never wraps below the real length.
fn size_hint(key_count: usize) -> i32 {
    key_count
        .saturating_mul(SHA_LENGTH)
        .saturating_add(SIZE_HINT_SLACK)
        .try_into()
        .unwrap_or(i32::MAX)
}

/// Reject a record that `decode` would refuse, before anything reaches disk.
fn check_record(key: &RevisionKey, record: &FileStatusRecord) -> Result<()> {
    if record.names.len() != record.status.len() {
        return Err(RevCacheError::invalid_record(
            key.as_str(),
            format!(
                "{} file names but {} status flags",
                record.names.len(),
                record.status.len()
            ),
        ));
    }
    let max_index = i32::MAX as u32;
    if let Some(index) = record
        .names
        .iter()
        .chain(&record.dirs)
        .find(|&&index| index > max_index)
    {
        return Err(RevCacheError::invalid_record(
            key.as_str(),
            format!("table index {index} does not fit the file format"),
        ));
    }
    Ok(())
}

fn write_table(out: &mut StreamWriter, table: &PathTable) {
    out.write_i32(table.len() as i32);
    for entry in table.as_slice() {
        out.write_string(entry);
    }
}

/// Rebuild contents from an uncompressed cache body read from `path`.
pub(crate) fn decode(data: &[u8], path: &Path) -> Result<CacheContents> {
    let mut input = StreamReader::new(data);

    let magic = input.read_u32()?;
    let version = input.read_i32()?;
    if magic != CACHE_MAGIC || version != CACHE_VERSION {
        log::warn!(
            "Ignoring cache {} with magic {:#010x} version {}",
            path.display(),
            magic,
            version
        );
        return Err(RevCacheError::cache_format_mismatch(path, magic, version));
    }

    let dirs = read_table(&mut input)?;
    let files = read_table(&mut input)?;

    // advisory only
    let size_hint = input.read_i32()?;
    log::debug!("SHA blob size hint {size_hint}");
    let blob = input.read_string()?;
    if blob.len() % SHA_LENGTH != 0 || !blob.is_ascii() {
        return Err(RevCacheError::cache_corrupted(format!(
            "revision key blob of length {} does not split into {SHA_LENGTH}-character keys",
            blob.len()
        )));
    }

    let key_count = blob.len() / SHA_LENGTH;
    let mut revisions = RevFileMap::with_capacity(key_count);
    let mut offset = 0;
    while !input.at_end() {
        if offset >= blob.len() {
            return Err(RevCacheError::cache_corrupted(format!(
                "more records than the {key_count} revision keys"
            )));
        }
        let key = RevisionKey::new(&blob[offset..offset + SHA_LENGTH]);
        offset += SHA_LENGTH;

        let record = read_record(&mut input)?;
        revisions.insert(key, record);
    }
    if offset != blob.len() {
        return Err(RevCacheError::cache_corrupted(format!(
            "{} revision keys but only {} records",
            key_count,
            offset / SHA_LENGTH
        )));
    }

    Ok(CacheContents {
        revisions,
        dirs,
        files,
    })
}

fn read_table(input: &mut StreamReader<'_>) -> Result<PathTable> {
    let count = input.read_count()?;
    let mut entries = Vec::with_capacity(count.min(1 << 16));
    for _ in 0..count {
        entries.push(input.read_string()?);
    }
    Ok(PathTable::from(entries))
}

fn read_record(input: &mut StreamReader<'_>) -> Result<FileStatusRecord> {
    let names = input.read_indices()?;
    let dirs = input.read_indices()?;
    let status = input
        .read_string()?
        .chars()
        .map(|c| {
            FileStatus::from_char(c).ok_or_else(|| {
                RevCacheError::cache_corrupted(format!("unknown file status flag '{c}'"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if status.len() != names.len() {
        return Err(RevCacheError::cache_corrupted(format!(
            "{} file names but {} status flags",
            names.len(),
            status.len()
        )));
    }
    let merge_parent = MergeParent::from_wire(input.read_i32()?);
    Ok(FileStatusRecord {
        names,
        dirs,
        status,
        merge_parent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sha(n: u32) -> String {
        format!("{n:040x}")
    }

    fn sample_contents() -> CacheContents {
        let mut contents = CacheContents::new();
        for n in 1..=3 {
            let mut record = FileStatusRecord::new(MergeParent::NotMerge);
            let dir = contents.dirs.intern(&format!("dir{n}"));
            let name = contents.files.intern(&format!("file{n}.rs"));
            record.push(dir, name, FileStatus::Modified);
            contents.revisions.insert(RevisionKey::new(sha(n)), record);
        }
        contents
    }

    #[test]
    fn test_paths() {
        let cache = RevisionCache::new("/repo/.git");
        assert_eq!(cache.cache_path(), PathBuf::from("/repo/.git/revcache.dat"));
        assert_eq!(
            cache.temp_path(),
            PathBuf::from("/repo/.git/revcache.dat.bak")
        );
    }

    #[test]
    fn test_encode_header() {
        let data = encode(&sample_contents()).unwrap();
        assert_eq!(&data[..4], &CACHE_MAGIC.to_be_bytes());
        assert_eq!(&data[4..8], &CACHE_VERSION.to_be_bytes());
        assert_eq!(&data[8..12], &3i32.to_be_bytes());
    }

    #[test]
    fn test_size_hint_is_an_overestimate() {
        let contents = sample_contents();
        let data = encode(&contents).unwrap();
        let mut input = StreamReader::new(&data);
        input.read_u32().unwrap();
        input.read_i32().unwrap();
        read_table(&mut input).unwrap();
        read_table(&mut input).unwrap();
        assert_eq!(input.read_i32().unwrap(), 3 * 40 + 1000);
        assert_eq!(input.read_string().unwrap().len(), 3 * 40);
    }

    #[test]
    fn test_fixed_width_slicing() {
        let contents = sample_contents();
        let data = encode(&contents).unwrap();
        let decoded = decode(&data, Path::new("mem")).unwrap();
        let keys: Vec<_> = decoded.revisions.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec![sha(1), sha(2), sha(3)]);
    }

    #[test]
    fn test_decode_rejects_version_mismatch() {
        let mut data = encode(&sample_contents()).unwrap();
        data[4..8].copy_from_slice(&(CACHE_VERSION + 1).to_be_bytes());
        assert!(matches!(
            decode(&data, Path::new("mem")),
            Err(RevCacheError::CacheFormatMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_missing_records() {
        let contents = sample_contents();
        let mut data = encode(&contents).unwrap();
        // drop the last record: 4 + 4 + 4 + 4 + 4 + 2 + 4 bytes
        data.truncate(data.len() - 26);
        assert!(matches!(
            decode(&data, Path::new("mem")),
            Err(RevCacheError::CacheCorrupted { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_short_key() {
        let mut contents = sample_contents();
        contents
            .revisions
            .insert(RevisionKey::new("deadbeef"), FileStatusRecord::default());
        assert!(matches!(
            encode(&contents),
            Err(RevCacheError::InvalidRevisionKey { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_mismatched_record() {
        let mut contents = sample_contents();
        let bad = FileStatusRecord {
            names: vec![0],
            dirs: vec![0],
            status: Vec::new(),
            merge_parent: MergeParent::NotMerge,
        };
        contents.revisions.insert(RevisionKey::new(sha(4)), bad);
        assert!(matches!(
            encode(&contents),
            Err(RevCacheError::InvalidRecord { ref key, .. }) if key == &sha(4)
        ));
    }

    #[test]
    fn test_encode_rejects_oversized_index() {
        let mut contents = sample_contents();
        let mut record = FileStatusRecord::new(MergeParent::NotMerge);
        record.push(0, u32::MAX, FileStatus::New);
        contents.revisions.insert(RevisionKey::new(sha(4)), record);
        assert!(matches!(
            encode(&contents),
            Err(RevCacheError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_encode_skips_checks_for_excluded_keys() {
        let mut contents = sample_contents();
        let bad = FileStatusRecord {
            names: vec![0, 1],
            dirs: Vec::new(),
            status: Vec::new(),
            merge_parent: MergeParent::NotMerge,
        };
        contents.revisions.insert(RevisionKey::custom(), bad);
        assert!(encode(&contents).is_ok());
    }

    #[test]
    fn test_size_hint_saturates() {
        assert_eq!(size_hint(3), 3 * 40 + 1000);
        assert_eq!(size_hint(usize::MAX / 40), i32::MAX);
        assert_eq!(size_hint(usize::MAX), i32::MAX);
    }

    #[test]
    fn test_save_rejects_empty_input() {
        let dir = TempDir::new().unwrap();
        let cache = RevisionCache::new(dir.path());
        assert!(matches!(
            cache.save(&CacheContents::new()),
            Err(RevCacheError::EmptyCache)
        ));
        assert!(!cache.cache_path().exists());

        let cache = RevisionCache::new("");
        assert!(matches!(
            cache.save(&sample_contents()),
            Err(RevCacheError::EmptyRootPath)
        ));
    }

    #[test]
    fn test_save_rejects_missing_directory() {
        let dir = TempDir::new().unwrap();
        let cache = RevisionCache::new(dir.path().join("missing"));
        assert!(matches!(
            cache.save(&sample_contents()),
            Err(RevCacheError::CacheDirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let cache = RevisionCache::new(dir.path()).with_compression_level(9);
        let contents = sample_contents();
        cache.save(&contents).unwrap();
        assert!(!cache.temp_path().exists());
        assert_eq!(cache.load().unwrap(), contents);
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let cache = RevisionCache::new(dir.path());
        assert!(!cache.remove().unwrap());
        cache.save(&sample_contents()).unwrap();
        assert!(cache.remove().unwrap());
        assert!(cache.load().unwrap().is_empty());
    }
}
