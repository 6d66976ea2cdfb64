//! JSON file storage for sessions.
//!
//! A session saved under id `20240115_093000` becomes five files in the
//! data directory: `movements_`, `clicks_`, `scrolls_`, `hover_` and
//! `stats_` each followed by the id and `.json`. Only the movements file is
//! required when loading; the others are picked up when present.
//!
//! Two saves within the same second get ids `20240115_093000` and
//! `20240115_093000_2`; existing sessions are never overwritten.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::{HoverMap, Session};
use crate::error::{Error, Result};
use crate::event::{HoverCell, MouseClick, MouseMove, MouseScroll};

/// Format of session ids (local time of the save).
pub const SESSION_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

const MOVEMENTS_PREFIX: &str = "movements_";

fn movements_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^movements_(\d{8}_\d{6}(?:_\d+)?)\.json$").expect("Invalid session file pattern")
    })
}

/// Paths of the files that make up one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFiles {
    /// Session id.
    pub id: String,
    /// Movement records.
    pub movements: PathBuf,
    /// Button records.
    pub clicks: PathBuf,
    /// Scroll records.
    pub scrolls: PathBuf,
    /// Hover cells.
    pub hover: PathBuf,
    /// Statistics.
    pub stats: PathBuf,
}

impl SessionFiles {
    /// File set for an id inside a directory.
    #[must_use]
    pub fn for_id(dir: &Path, id: &str) -> Self {
        let file = |prefix: &str| dir.join(format!("{prefix}{id}.json"));
        Self {
            id: id.to_string(),
            movements: file(MOVEMENTS_PREFIX),
            clicks: file("clicks_"),
            scrolls: file("scrolls_"),
            hover: file("hover_"),
            stats: file("stats_"),
        }
    }

    /// Companion files of a movements file, found next to it.
    ///
    /// The id is the file name with the `movements_` prefix and `.json`
    /// extension removed; a file not following that naming keeps its stem.
    #[must_use]
    pub fn from_movements(movements: &Path) -> Self {
        let name = movements
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = name.strip_prefix(MOVEMENTS_PREFIX).unwrap_or(&name);
        let id = name.strip_suffix(".json").unwrap_or(name);
        let dir = movements.parent().unwrap_or_else(|| Path::new(""));

        let mut files = Self::for_id(dir, id);
        files.movements = movements.to_path_buf();
        files
    }
}

/// A saved session discovered in the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEntry {
    /// Session id.
    pub id: String,
    /// Path of the movements file.
    pub movements: PathBuf,
    /// Size of the movements file in bytes.
    pub size_bytes: u64,
    /// Whether click, scroll and hover companions all exist.
    pub complete: bool,
}

/// Session storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Create a store for the given directory. Nothing is touched on disk
    /// until a session is saved.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save a session under a fresh id derived from the local time.
    ///
    /// If that id is taken, a `_2`, `_3`, ... suffix is added.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file cannot
    /// be written.
    pub fn save(&self, session: &Session) -> Result<SessionFiles> {
        let base = chrono::Local::now().format(SESSION_ID_FORMAT).to_string();
        let id = self.free_id(&base);
        self.save_as(session, &id)
    }

    /// Save a session under an explicit id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionExists`] if a session with this id is already
    /// stored, or an I/O error if the directory cannot be created or a file
    /// cannot be written.
    pub fn save_as(&self, session: &Session, id: &str) -> Result<SessionFiles> {
        std::fs::create_dir_all(&self.dir).map_err(|source| Error::DirectoryCreate {
            path: self.dir.clone(),
            source,
        })?;

        let files = SessionFiles::for_id(&self.dir, id);
        if files.movements.exists() {
            return Err(Error::SessionExists { id: id.to_string() });
        }
        write_json(&files.movements, &session.moves)?;
        write_json(&files.clicks, &session.clicks)?;
        write_json(&files.scrolls, &session.scrolls)?;
        write_json(&files.hover, &session.hover_cells())?;
        write_json(&files.stats, &session.stats)?;

        info!("Session saved with id {id} in {}", self.dir.display());
        Ok(files)
    }

    /// First id of `base`, `base_2`, `base_3`, ... with no movements file.
    fn free_id(&self, base: &str) -> String {
        let taken = |id: &str| SessionFiles::for_id(&self.dir, id).movements.exists();
        if !taken(base) {
            return base.to_string();
        }
        (2u32..)
            .map(|n| format!("{base}_{n}"))
            .find(|id| !taken(id))
            .unwrap_or_else(|| base.to_string())
    }

    /// Resolve a session reference to its movements file.
    ///
    /// A reference is either a path to an existing file or a session id
    /// inside this store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if neither interpretation exists.
    pub fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let as_path = PathBuf::from(reference);
        if as_path.is_file() {
            return Ok(as_path);
        }

        let by_id = SessionFiles::for_id(&self.dir, reference).movements;
        if by_id.is_file() {
            return Ok(by_id);
        }

        Err(Error::session_not_found(reference))
    }

    /// Load a session by id or movements-file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be found or a file is malformed.
    pub fn load(&self, reference: &str) -> Result<Session> {
        let movements = self.resolve(reference)?;
        load_movements(&movements)
    }

    /// List saved sessions, newest first.
    ///
    /// A missing data directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn list(&self) -> Result<Vec<SessionEntry>> {
        if !self.dir.is_dir() {
            debug!("Data directory {} does not exist", self.dir.display());
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dir_entry in std::fs::read_dir(&self.dir)? {
            let dir_entry = dir_entry?;
            let file_name = dir_entry.file_name();
            let name = file_name.to_string_lossy();
            let Some(captures) = movements_file_pattern().captures(&name) else {
                continue;
            };
            let id = captures[1].to_string();
            let files = SessionFiles::for_id(&self.dir, &id);
            let complete =
                files.clicks.is_file() && files.scrolls.is_file() && files.hover.is_file();

            entries.push(SessionEntry {
                id,
                size_bytes: dir_entry.metadata().map(|m| m.len()).unwrap_or(0),
                movements: files.movements,
                complete,
            });
        }

        entries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(entries)
    }
}

/// Load a session from its movements file and whatever companions exist.
///
/// Statistics are recomputed rather than read back.
///
/// # Errors
///
/// Returns an error if the movements file is missing or any present file
/// is malformed.
pub fn load_movements(movements: &Path) -> Result<Session> {
    let files = SessionFiles::from_movements(movements);

    let moves: Vec<MouseMove> = read_json(&files.movements)?;
    let clicks: Vec<MouseClick> = read_optional(&files.clicks)?;
    let scrolls: Vec<MouseScroll> = read_optional(&files.scrolls)?;
    let hover: HoverMap = read_optional::<HoverCell>(&files.hover)?
        .into_iter()
        .map(|cell| ((cell.x, cell.y), cell.duration))
        .collect();

    info!(
        "Loaded session {} ({} moves, {} clicks, {} scrolls)",
        files.id,
        moves.len(),
        clicks.len(),
        scrolls.len()
    );
    Ok(Session::new(moves, clicks, scrolls, hover))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, data)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read(path).map_err(|source| Error::SessionRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| Error::SessionParse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if path.is_file() {
        read_json(path)
    } else {
        debug!("No companion file at {}", path.display());
        Ok(Vec::new())
    }
}
