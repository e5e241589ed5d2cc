//! Filesystem resource root: an ordered list of directories searched for a
//! suite, first match wins.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::usecases::ports::FixtureError;
use crate::usecases::ports::ResourceRoot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsResourceRoot {
    roots: Vec<PathBuf>,
}

impl FsResourceRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            roots: vec![root.into()],
        }
    }

    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn searched(&self) -> String {
        self.roots
            .iter()
            .map(|root| root.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ResourceRoot for FsResourceRoot {
    fn locate(&self, suite: &str) -> Result<PathBuf, FixtureError> {
        let found = self
            .roots
            .iter()
            .map(|root| root.join(suite))
            .find(|candidate| candidate.is_dir());
        match found {
            Some(path) => {
                debug!(suite, path = %path.display(), "Resolved suite resource root");
                Ok(path)
            }
            None => {
                debug!(suite, roots = %self.searched(), "Suite resource root not found");
                Err(FixtureError::NotFound {
                    what: "suite resource root",
                    location: format!("{suite} (searched: {})", self.searched()),
                })
            }
        }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, FixtureError> {
        match fs::read(path) {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Read artifact");
                Ok(bytes)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(FixtureError::NotFound {
                what: "artifact",
                location: path.display().to_string(),
            }),
            Err(err) => Err(FixtureError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: err,
            }),
        }
    }
}
