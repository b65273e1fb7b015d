use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
};

use crate::model::{Cue, PlayerState};

/// Opaque key/value blob storage.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, blob: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<()> {
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("failed reading state file: {}", path.display()))
            }
        }
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed creating state dir: {}", self.dir.display()))?;
        let path = self.path_for(key);
        fs::write(&path, blob)
            .with_context(|| format!("failed writing state file: {}", path.display()))
    }
}

/// Stored schema. Every field is optional on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default = "no_selection")]
    pub current_index: i64,
    #[serde(default)]
    pub cues: Vec<Cue>,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_true")]
    pub sentence_list_visible: bool,
    #[serde(default)]
    pub is_video_locked: bool,
}

fn no_selection() -> i64 {
    -1
}

fn default_true() -> bool {
    true
}

impl From<&PlayerState> for PersistedState {
    fn from(state: &PlayerState) -> Self {
        Self {
            current_index: state.current_index_signed(),
            cues: state.cues.clone(),
            notes: state.notes.clone(),
            sentence_list_visible: state.sentence_list_visible,
            is_video_locked: state.is_video_locked,
        }
    }
}

impl From<PersistedState> for PlayerState {
    fn from(p: PersistedState) -> Self {
        // Clamp a stored index that runs past the end.
        let current_index = match usize::try_from(p.current_index) {
            Ok(i) if !p.cues.is_empty() => Some(i.min(p.cues.len() - 1)),
            _ => None,
        };

        PlayerState {
            cues: p.cues,
            current_index,
            sentence_list_visible: p.sentence_list_visible,
            is_video_locked: p.is_video_locked,
            notes: p.notes,
            text_blurred: false,
        }
    }
}

pub fn encode_state(state: &PlayerState) -> Result<String> {
    serde_json::to_string(&PersistedState::from(state)).context("failed serializing player state")
}

pub fn decode_state(blob: &str) -> Result<PlayerState> {
    let persisted: PersistedState =
        serde_json::from_str(blob).context("failed parsing stored player state")?;
    Ok(persisted.into())
}
