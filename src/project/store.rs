/*!
 * Project persistence.
 *
 * Stores hold whole project snapshots. `JsonFileProjectStore` keeps every
 * project in one JSON file and caches it behind a `RwLock`; writes go through
 * a temporary file and a rename so a crash never leaves a half-written store.
 */

use log::{debug, info};
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::StoreError;
use crate::project::merge::{reconcile, MergeStrategy};
use crate::project::Project;

const DEFAULT_STORE_DIRNAME: &str = "subgen";
const DEFAULT_STORE_FILENAME: &str = "projects.json";

/// Whole-snapshot project storage
pub trait ProjectStore: Send + Sync {
    /// All projects, in stored order
    fn load_all(&self) -> Result<Vec<Project>, StoreError>;

    /// Replace the stored set
    fn replace_all(&self, projects: Vec<Project>) -> Result<(), StoreError>;

    /// Read-modify-write under one write lock. Nothing is stored when `apply` fails.
    fn transact(
        &self,
        apply: &mut dyn FnMut(&mut Vec<Project>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Project, StoreError> {
        self.load_all()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Insert or replace by id. New projects go to the front.
    fn save(&self, project: Project) -> Result<(), StoreError> {
        let mut pending = Some(project);
        self.transact(&mut |projects| {
            if let Some(project) = pending.take() {
                match projects.iter().position(|p| p.id == project.id) {
                    Some(position) => projects[position] = project,
                    None => projects.insert(0, project),
                }
            }
            Ok(())
        })
    }

    fn delete(&self, id: &str) -> Result<Project, StoreError> {
        let mut removed = None;
        self.transact(&mut |projects| {
            let position = projects
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            removed = Some(projects.remove(position));
            Ok(())
        })?;
        removed.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Reconcile the stored set with a remote replica and persist the result
    fn sync_with(
        &self,
        remote: Vec<Project>,
        strategy: &dyn MergeStrategy,
    ) -> Result<Vec<Project>, StoreError> {
        let mut remote = Some(remote);
        let mut merged = Vec::new();
        self.transact(&mut |projects| {
            let local = std::mem::take(projects);
            *projects = reconcile(local, remote.take().unwrap_or_default(), strategy);
            merged = projects.clone();
            Ok(())
        })?;
        Ok(merged)
    }
}

/// In-process store, used in tests and as a scratch replica
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: RwLock<Vec<Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects: RwLock::new(projects),
        }
    }
}

impl ProjectStore for MemoryProjectStore {
    fn load_all(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects.read().clone())
    }

    fn replace_all(&self, projects: Vec<Project>) -> Result<(), StoreError> {
        *self.projects.write() = projects;
        Ok(())
    }

    fn transact(
        &self,
        apply: &mut dyn FnMut(&mut Vec<Project>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut stored = self.projects.write();
        let mut projects = stored.clone();
        apply(&mut projects)?;
        *stored = projects;
        Ok(())
    }
}

/// Store backed by a single JSON file
#[derive(Debug)]
pub struct JsonFileProjectStore {
    path: PathBuf,
    cache: RwLock<Option<Vec<Project>>>,
}

impl JsonFileProjectStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: RwLock::new(None),
        }
    }

    /// Store at the default location in the platform data directory
    pub fn new_default() -> anyhow::Result<Self> {
        Ok(Self::new(Self::default_store_path()?))
    }

    pub fn default_store_path() -> anyhow::Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir
            .join(DEFAULT_STORE_DIRNAME)
            .join(DEFAULT_STORE_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Vec<Project>, StoreError> {
        if !self.path.exists() {
            debug!("Project store {} does not exist yet", self.path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_file(&self, projects: &[Project]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(projects)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        info!("Saved {} projects to {}", projects.len(), self.path.display());
        Ok(())
    }
}

impl ProjectStore for JsonFileProjectStore {
    fn load_all(&self) -> Result<Vec<Project>, StoreError> {
        if let Some(projects) = self.cache.read().as_ref() {
            return Ok(projects.clone());
        }

        let mut cache = self.cache.write();
        if let Some(projects) = cache.as_ref() {
            return Ok(projects.clone());
        }
        let projects = self.read_file()?;
        *cache = Some(projects.clone());
        Ok(projects)
    }

    fn replace_all(&self, projects: Vec<Project>) -> Result<(), StoreError> {
        let mut cache = self.cache.write();
        self.write_file(&projects)?;
        *cache = Some(projects);
        Ok(())
    }

    fn transact(
        &self,
        apply: &mut dyn FnMut(&mut Vec<Project>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut cache = self.cache.write();
        let mut projects = match cache.as_ref() {
            Some(projects) => projects.clone(),
            None => self.read_file()?,
        };
        apply(&mut projects)?;
        self.write_file(&projects)?;
        *cache = Some(projects);
        Ok(())
    }
}
