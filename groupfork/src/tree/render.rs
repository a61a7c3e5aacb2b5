//! Text rendering of a hierarchy for terminal output.

use std::fmt::Write;

use super::HierarchyTree;
use crate::models::EntityId;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

impl HierarchyTree {
    /// Render one line per node as `path [id] name`, indented with box
    /// drawing characters. Returns an empty string for an empty tree.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let Some(root) = self.root() else {
            return out;
        };

        // (node, prefix inherited from ancestors, connector for this line)
        let mut stack: Vec<(EntityId, String, &str)> = vec![(root, String::new(), "")];

        while let Some((id, prefix, connector)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let descriptor = &node.descriptor;
            let _ = writeln!(
                out,
                "{prefix}{connector}{} [{}] {}",
                descriptor.path, descriptor.id, descriptor.name
            );

            let child_prefix = match connector {
                "" => prefix,
                LAST_BRANCH => format!("{prefix}{SPACE}"),
                _ => format!("{prefix}{PIPE}"),
            };

            let count = node.children.len();
            for (index, child) in node.children.iter().enumerate().rev() {
                let child_connector = if index + 1 == count { LAST_BRANCH } else { BRANCH };
                stack.push((*child, child_prefix.clone(), child_connector));
            }
        }

        out
    }
}
