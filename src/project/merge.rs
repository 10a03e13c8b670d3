/*!
 * Reconciliation of two project replicas (e.g. local cache and server copy).
 */

use log::debug;
use std::collections::HashMap;
use std::fmt::Debug;

use crate::project::Project;

/// Which replica wins a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    KeepLocal,
    TakeRemote,
}

/// Conflict policy for projects present on both sides
pub trait MergeStrategy: Send + Sync + Debug {
    fn resolve(&self, local: &Project, remote: &Project) -> Resolution;
}

/// Remote replaces local only when strictly newer
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWriteWins;

impl MergeStrategy for LastWriteWins {
    fn resolve(&self, local: &Project, remote: &Project) -> Resolution {
        if remote.updated_at > local.updated_at {
            Resolution::TakeRemote
        } else {
            Resolution::KeepLocal
        }
    }
}

/// Merge two replicas by project id.
///
/// Projects only on one side are kept. Conflicts go to `strategy`. The result
/// is sorted by `updated_at`, newest first.
pub fn reconcile(
    local: Vec<Project>,
    remote: Vec<Project>,
    strategy: &dyn MergeStrategy,
) -> Vec<Project> {
    let mut merged: Vec<Project> = Vec::with_capacity(local.len() + remote.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for project in local {
        match index.get(&project.id) {
            // Duplicate ids within one replica: last one wins
            Some(&position) => merged[position] = project,
            None => {
                index.insert(project.id.clone(), merged.len());
                merged.push(project);
            }
        }
    }

    for project in remote {
        match index.get(&project.id) {
            Some(&position) => {
                if strategy.resolve(&merged[position], &project) == Resolution::TakeRemote {
                    debug!("Taking remote copy of project {}", project.id);
                    merged[position] = project;
                }
            }
            None => {
                index.insert(project.id.clone(), merged.len());
                merged.push(project);
            }
        }
    }

    merged.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    merged
}
