//! Bulk create/destroy of filesystem trees.
//!
//! Both helpers fan out through `ConcurrentJobRunner`, so sibling
//! filesystems are created or destroyed concurrently and every failure is
//! reported, not just the first one.

use thiserror::Error;
use tracing::debug;

use nstor_core::{CoreError, CoreResult, ResourcePath};
use nstor_jobs::{AggregateError, ConcurrentJobRunner, JobBatch};
use nstor_pagination::{CursorPaginator, PaginationError, PaginatorConfig};

use crate::client::{ClientError, ResourceClient};

/// Provisioning failure.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    InvalidPath(#[from] CoreError),

    #[error(transparent)]
    Jobs(#[from] AggregateError),

    #[error("destroy {path} with dependents: failed to get children: {source}")]
    ListChildren {
        path: ResourcePath,
        source: PaginationError<ClientError>,
    },

    #[error("destroy {path} with dependents: failed to remove child filesystems: {source}")]
    RemoveChildren {
        path: ResourcePath,
        source: AggregateError,
    },

    #[error("destroy {path} with dependents: failed to destroy filesystem: {source}")]
    Destroy {
        path: ResourcePath,
        source: ClientError,
    },
}

/// `child_path("fs", 13)` is `fs/child-013`.
pub fn child_path(parent: &ResourcePath, id: usize) -> CoreResult<ResourcePath> {
    parent.join(&format!("child-{id:03}"))
}

/// Create `parent/child-001` through `parent/child-{count}` concurrently.
pub fn create_children<C: ResourceClient>(
    client: &C,
    runner: &ConcurrentJobRunner,
    parent: &ResourcePath,
    count: usize,
) -> Result<(), ProvisionError> {
    let mut batch = JobBatch::new("create filesystem");
    for id in 1..=count {
        let path = child_path(parent, id)?;
        batch.push(move || Ok(client.create_filesystem(&path)?));
    }

    debug!(%parent, count, batch_id = %batch.id(), "creating children");
    runner.run_batch(batch)?;
    Ok(())
}

/// Destroy `path` and everything below it.
///
/// Children are listed with a full cursor walk, destroyed recursively as
/// one concurrent batch per level, then `path` itself goes.
pub fn destroy_with_dependents<C: ResourceClient>(
    client: &C,
    runner: &ConcurrentJobRunner,
    config: PaginatorConfig,
    path: &ResourcePath,
) -> Result<(), ProvisionError> {
    let children = CursorPaginator::with_config(client, config)
        .list_all(path)
        .map_err(|source| ProvisionError::ListChildren {
            path: path.clone(),
            source,
        })?;

    if !children.is_empty() {
        debug!(%path, children = children.len(), "destroying children");
        let mut batch = JobBatch::new("delete filesystem");
        for child in children {
            batch.push(move || Ok(destroy_with_dependents(client, runner, config, &child.path)?));
        }
        runner
            .run_batch(batch)
            .map_err(|source| ProvisionError::RemoveChildren {
                path: path.clone(),
                source,
            })?;
    }

    client
        .destroy_filesystem(path)
        .map_err(|source| ProvisionError::Destroy {
            path: path.clone(),
            source,
        })
}
