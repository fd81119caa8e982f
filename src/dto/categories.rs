use std::collections::HashMap;

use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::types::CategoryId;

/// Category with its live descendants, ready for rendering a picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    pub id: i32,
    pub name: String,
    pub seo_desc: String,
    pub depth: usize,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Builds the forest from a flat list ordered by id. Categories whose
    /// parent is not in the list become roots.
    pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
        let known: Vec<CategoryId> = categories.iter().map(|c| c.id).collect();
        let mut by_parent: HashMap<Option<CategoryId>, Vec<Category>> = HashMap::new();
        for category in categories {
            let parent = category.parent_id.filter(|p| known.contains(p));
            by_parent.entry(parent).or_default().push(category);
        }
        Self::children_of(None, 0, &mut by_parent)
    }

    fn children_of(
        parent: Option<CategoryId>,
        depth: usize,
        by_parent: &mut HashMap<Option<CategoryId>, Vec<Category>>,
    ) -> Vec<CategoryNode> {
        let Some(categories) = by_parent.remove(&parent) else {
            return Vec::new();
        };
        categories
            .into_iter()
            .map(|category| CategoryNode {
                id: category.id.get(),
                name: category.name.into_inner(),
                seo_desc: category.seo_desc,
                depth,
                children: Self::children_of(Some(category.id), depth + 1, by_parent),
            })
            .collect()
    }

    /// Depth-first flattening, parents before their children.
    pub fn flatten(&self) -> Vec<&CategoryNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::category;

    #[test]
    fn nests_children_under_parents() {
        let tree = CategoryNode::build_tree(vec![
            category(1, "Tech", None),
            category(2, "Rust", Some(1)),
            category(3, "Async", Some(2)),
            category(4, "Life", None),
            category(5, "Orphan", Some(99)),
        ]);

        let roots: Vec<i32> = tree.iter().map(|n| n.id).collect();
        assert_eq!(roots, vec![1, 4, 5]);
        assert_eq!(tree[0].children[0].children[0].name, "Async");
        assert_eq!(tree[0].children[0].children[0].depth, 2);

        let order: Vec<i32> = tree[0].flatten().iter().map(|n| n.id).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }
}
