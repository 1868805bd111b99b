//! Seed loading service
//!
//! Reads the starting hierarchy from a TOML file. Two shapes are accepted:
//!
//! ```toml
//! [[nodes]]
//! id = 1
//! label = "My Queries"
//! [[nodes.children]]
//! id = 2
//! label = "Equality"
//! ```
//!
//! or an outline, where tables and arrays become branches:
//!
//! ```toml
//! [outline]
//! Groceries = ["Almond Meal flour", "Organic eggs"]
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use toml::Table;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{validate_unique_ids, DomainError, TreeBuilder, TreeNode};
use crate::infrastructure::traits::FileSystem;

/// On-disk seed document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SeedFile {
    pub nodes: Option<Vec<TreeNode>>,
    pub outline: Option<Table>,
}

impl SeedFile {
    /// Converts the document into a validated root sequence.
    pub fn into_roots(self) -> Result<Vec<TreeNode>, DomainError> {
        let roots = match (self.nodes, self.outline) {
            (Some(_), Some(_)) => return Err(DomainError::AmbiguousSeed),
            (Some(nodes), None) => nodes,
            (None, Some(outline)) => TreeBuilder::new().build_from_outline(&outline)?,
            (None, None) => Vec::new(),
        };
        validate_unique_ids(&roots)?;
        Ok(roots)
    }
}

/// Service for loading seed hierarchies.
pub struct SeedService {
    fs: Arc<dyn FileSystem>,
}

impl SeedService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<TreeNode>> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::SeedNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read seed", path)?;
        let roots = Self::parse(&content).map_err(|e| match e {
            ApplicationError::InvalidSeed { message, .. } => ApplicationError::InvalidSeed {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        debug!(roots = roots.len(), "seed loaded");
        Ok(roots)
    }

    pub fn parse(content: &str) -> ApplicationResult<Vec<TreeNode>> {
        let seed: SeedFile = toml::from_str(content).map_err(|e| ApplicationError::InvalidSeed {
            path: Default::default(),
            message: e.message().to_string(),
        })?;
        Ok(seed.into_roots()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeId;

    #[test]
    fn given_explicit_nodes_when_parsing_then_keeps_ids_and_kinds() {
        let roots = SeedService::parse(
            r#"
            [[nodes]]
            id = 10
            item = "My Queries"

            [[nodes.children]]
            id = 11
            label = "Equality"

            [[nodes.children]]
            id = 12
            label = "Bias"
            children = []
            "#,
        )
        .unwrap();

        assert_eq!(roots.len(), 1);
        let children = roots[0].children.as_ref().unwrap();
        assert_eq!(children[0], TreeNode::leaf(NodeId(11), "Equality"));
        assert_eq!(children[1], TreeNode::branch(NodeId(12), "Bias", vec![]));
    }

    #[test]
    fn given_both_shapes_when_parsing_then_ambiguous() {
        let err = SeedService::parse(
            r#"
            [[nodes]]
            id = 1
            label = "a"
            [outline]
            b = "b"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::AmbiguousSeed)
        ));
    }

    #[test]
    fn given_unknown_key_when_parsing_then_invalid_seed() {
        let err = SeedService::parse("tree = 1\n").unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidSeed { .. }));
    }
}
