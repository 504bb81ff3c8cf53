//! Aggregate assembly: a stored post plus its author and categories.

use std::collections::{HashMap, HashSet};

use domains::{Author, Category, CategoryId, Post, PostCategoryLink, PostId, PostView};

/// Builds the public post shape. Categories keep the order they were given in.
pub fn build_post(post: &Post, author: Author, categories: Vec<Category>) -> PostView {
    PostView {
        post: post.clone(),
        author,
        categories,
    }
}

/// Distinct category ids across `links`, in first-seen order.
pub fn distinct_category_ids(links: &[PostCategoryLink]) -> Vec<CategoryId> {
    let mut seen = HashSet::new();
    links
        .iter()
        .map(|l| l.category_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Resolves the categories linked to `post_id`, following link order.
/// Links whose category could not be looked up are skipped.
pub fn categories_for(
    post_id: PostId,
    links: &[PostCategoryLink],
    resolved: &HashMap<CategoryId, Category>,
) -> Vec<Category> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter(|l| l.post_id == post_id && seen.insert(l.category_id))
        .filter_map(|l| resolved.get(&l.category_id).cloned())
        .collect()
}
