//! In-memory implementation of `PostRepository`, `FavoriteRepository` and
//! `EntityLookup`, backed by `DashMap`s so a single `Arc<MemoryStore>` can be
//! handed to the service as all three ports.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    Category, CategoryId, EntityLookup, Favorite, FavoriteRepository, NewPost, Post,
    PostCategoryLink, PostFilter, PostId, PostRepository, Requester, SortOrder, User, UserId,
};

pub const DEFAULT_PAGE_SIZE: usize = 10;

pub struct MemoryStore {
    posts: DashMap<PostId, Post>,
    /// Category ids per post, in insertion order
    links: DashMap<PostId, Vec<CategoryId>>,
    favorites: DashMap<(UserId, PostId), Favorite>,
    users: DashMap<UserId, User>,
    categories: DashMap<CategoryId, Category>,
    next_id: AtomicI64,
    page_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl MemoryStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            posts: DashMap::new(),
            links: DashMap::new(),
            favorites: DashMap::new(),
            users: DashMap::new(),
            categories: DashMap::new(),
            next_id: AtomicI64::new(1),
            page_size: page_size.max(1),
        }
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn insert_category(&self, category: Category) {
        self.categories.insert(category.id, category);
    }

    /// Stores a fully-formed post as-is (useful for fixtures with a fixed
    /// rating or creation date). Later `add` calls never reuse its id.
    pub fn insert_post(&self, post: Post) {
        self.next_id.fetch_max(post.id.0 + 1, AtomicOrdering::SeqCst);
        self.posts.insert(post.id, post);
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    fn matches(post: &Post, ids: Option<&[PostId]>, filter: &PostFilter) -> bool {
        let day = post.created_at.format("%Y-%m-%d").to_string();

        ids.map_or(true, |ids| ids.contains(&post.id))
            && filter.status.map_or(true, |s| s == post.status)
            && filter.title.as_deref().map_or(true, |t| {
                post.title.to_lowercase().contains(&t.to_lowercase())
            })
            && filter.from.as_deref().map_or(true, |from| day.as_str() >= from)
            && filter.to.as_deref().map_or(true, |to| day.as_str() <= to)
    }

    fn compare(a: &Post, b: &Post, filter: &PostFilter) -> Ordering {
        let directed = |ord: Ordering, order: SortOrder| match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        };

        filter
            .date
            .map_or(Ordering::Equal, |o| directed(a.created_at.cmp(&b.created_at), o))
            .then_with(|| directed(a.rating.cmp(&b.rating), filter.rating))
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_all(
        &self,
        _requester: Option<Requester>,
        ids: Option<Vec<PostId>>,
        filter: PostFilter,
    ) -> anyhow::Result<Vec<Post>> {
        let mut found: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| Self::matches(entry.value(), ids.as_deref(), &filter))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| Self::compare(a, b, &filter));

        let offset = usize::try_from(filter.page.saturating_sub(1))
            .unwrap_or(usize::MAX)
            .saturating_mul(self.page_size);
        let page: Vec<Post> = found.into_iter().skip(offset).take(self.page_size).collect();

        tracing::debug!(page = filter.page, returned = page.len(), "memory find_all");
        Ok(page)
    }

    async fn find_post_category_links(
        &self,
        post_ids: Vec<PostId>,
    ) -> anyhow::Result<Vec<PostCategoryLink>> {
        Ok(post_ids
            .into_iter()
            .filter_map(|post_id| {
                self.links.get(&post_id).map(|ids| {
                    ids.iter()
                        .map(|&category_id| PostCategoryLink { post_id, category_id })
                        .collect::<Vec<_>>()
                })
            })
            .flatten()
            .collect())
    }

    async fn find_by_id(&self, id: PostId) -> anyhow::Result<Option<Post>> {
        Ok(self.posts.get(&id).map(|p| p.value().clone()))
    }

    async fn add(&self, post: &NewPost, owner: UserId) -> anyhow::Result<PostId> {
        let id = PostId(self.next_id.fetch_add(1, AtomicOrdering::SeqCst));
        self.posts.insert(
            id,
            Post {
                id,
                title: post.title.clone(),
                content: post.content.clone(),
                user_id: owner,
                status: post.status,
                rating: 0,
                created_at: post.created_at,
            },
        );
        Ok(id)
    }

    async fn add_categories(
        &self,
        post_id: PostId,
        category_ids: Vec<CategoryId>,
    ) -> anyhow::Result<()> {
        if category_ids.is_empty() {
            return Ok(());
        }
        let mut linked = self.links.entry(post_id).or_default();
        for id in category_ids {
            if !linked.contains(&id) {
                linked.push(id);
            }
        }
        Ok(())
    }

    async fn remove_categories(
        &self,
        post_id: PostId,
        category_ids: Vec<CategoryId>,
    ) -> anyhow::Result<()> {
        if let Some(mut linked) = self.links.get_mut(&post_id) {
            linked.retain(|id| !category_ids.contains(id));
        }
        Ok(())
    }

    async fn save(&self, post: &Post) -> anyhow::Result<()> {
        self.posts
            .entry(post.id)
            .and_modify(|stored| {
                stored.title = post.title.clone();
                stored.content = post.content.clone();
                stored.status = post.status;
            })
            .or_insert_with(|| post.clone());
        Ok(())
    }

    async fn remove(&self, id: PostId) -> anyhow::Result<()> {
        self.posts.remove(&id);
        self.links.remove(&id);
        self.favorites.retain(|(_, post_id), _| *post_id != id);
        Ok(())
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn find(&self, user_id: UserId, post_id: PostId) -> anyhow::Result<Option<Favorite>> {
        Ok(self
            .favorites
            .get(&(user_id, post_id))
            .map(|f| f.value().clone()))
    }

    async fn add(&self, user_id: UserId, post_id: PostId) -> anyhow::Result<()> {
        match self.favorites.entry((user_id, post_id)) {
            Entry::Occupied(_) => {
                anyhow::bail!("favorite ({user_id}, {post_id}) already exists")
            }
            Entry::Vacant(slot) => {
                slot.insert(Favorite { user_id, post_id, created_at: Utc::now() });
                Ok(())
            }
        }
    }

    async fn remove(&self, user_id: UserId, post_id: PostId) -> anyhow::Result<()> {
        self.favorites.remove(&(user_id, post_id));
        Ok(())
    }
}

#[async_trait]
impl EntityLookup for MemoryStore {
    async fn get_users(&self, ids: Vec<UserId>) -> anyhow::Result<HashMap<UserId, User>> {
        Ok(ids
            .into_iter()
            .filter_map(|id| self.users.get(&id).map(|u| (id, u.value().clone())))
            .collect())
    }

    async fn get_categories(
        &self,
        ids: Vec<CategoryId>,
    ) -> anyhow::Result<HashMap<CategoryId, Category>> {
        Ok(ids
            .into_iter()
            .filter_map(|id| self.categories.get(&id).map(|c| (id, c.value().clone())))
            .collect())
    }

    async fn get_author(&self, id: UserId) -> anyhow::Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use domains::{PostStatus, SortOrder};
    use tokio_test::assert_ok;

    use super::*;

    fn post(id: i64, title: &str, rating: i64, day: u32, status: PostStatus) -> Post {
        Post {
            id: PostId(id),
            title: title.into(),
            content: "body".into(),
            user_id: UserId(1),
            status,
            rating,
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
        }
    }

    fn fixture(page_size: usize) -> MemoryStore {
        let store = MemoryStore::new(page_size);
        store.insert_post(post(1, "Rust ownership", 5, 10, PostStatus::Active));
        store.insert_post(post(2, "Async rust", 9, 12, PostStatus::Inactive));
        store.insert_post(post(3, "Gardening", 1, 15, PostStatus::Active));
        store
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id.0).collect()
    }

    #[tokio::test]
    async fn default_listing_sorts_by_rating_desc() {
        let store = fixture(10);
        let found = store.find_all(None, None, PostFilter::default()).await.unwrap();
        assert_eq!(ids(&found), vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn date_order_takes_precedence_over_rating() {
        let store = fixture(10);
        let filter = PostFilter { date: Some(SortOrder::Asc), ..Default::default() };
        let found = store.find_all(None, None, filter).await.unwrap();
        assert_eq!(ids(&found), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn filters_combine() {
        let store = fixture(10);
        let filter = PostFilter {
            title: Some("RUST".into()),
            status: Some(PostStatus::Active),
            ..Default::default()
        };
        assert_eq!(ids(&store.find_all(None, None, filter).await.unwrap()), vec![1]);

        let filter = PostFilter {
            from: Some("2024-01-11".into()),
            to: Some("2024-01-15".into()),
            ..Default::default()
        };
        assert_eq!(ids(&store.find_all(None, None, filter).await.unwrap()), vec![2, 3]);

        let restricted = store
            .find_all(None, Some(vec![PostId(3), PostId(1)]), PostFilter::default())
            .await
            .unwrap();
        assert_eq!(ids(&restricted), vec![1, 3]);
    }

    #[tokio::test]
    async fn pages_are_sliced_by_page_size() {
        let store = fixture(2);
        let second = PostFilter { page: 2, ..Default::default() };
        assert_eq!(ids(&store.find_all(None, None, second).await.unwrap()), vec![3]);

        let beyond = PostFilter { page: 5, ..Default::default() };
        assert!(store.find_all(None, None, beyond).await.unwrap().is_empty());

        let huge = PostFilter { page: u64::MAX, ..Default::default() };
        assert!(store.find_all(None, None, huge).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn added_posts_get_fresh_ids_after_fixtures() {
        let store = fixture(10);
        let new_post = NewPost::create("T", "C").unwrap();
        let id = PostRepository::add(&store, &new_post, UserId(4)).await.unwrap();

        assert_eq!(id, PostId(4));
        let stored = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.user_id, UserId(4));
        assert_eq!(stored.status, PostStatus::Active);
    }

    #[tokio::test]
    async fn category_links_keep_order_and_ignore_duplicates() {
        let store = fixture(10);
        assert_ok!(store.add_categories(PostId(1), vec![CategoryId(7), CategoryId(5)]).await);
        assert_ok!(store.add_categories(PostId(1), vec![CategoryId(5), CategoryId(9)]).await);
        assert_ok!(store.remove_categories(PostId(1), vec![CategoryId(7)]).await);

        let links = store
            .find_post_category_links(vec![PostId(1), PostId(2)])
            .await
            .unwrap();
        let linked: Vec<i64> = links.iter().map(|l| l.category_id.0).collect();
        assert_eq!(linked, vec![5, 9]);
    }

    #[tokio::test]
    async fn save_updates_only_mutable_fields() {
        let store = fixture(10);
        let mut changed = post(1, "Renamed", 100, 1, PostStatus::Inactive);
        changed.user_id = UserId(99);
        assert_ok!(store.save(&changed).await);

        let stored = store.find_by_id(PostId(1)).await.unwrap().unwrap();
        assert_eq!(stored.title, "Renamed");
        assert_eq!(stored.status, PostStatus::Inactive);
        assert_eq!(stored.rating, 5);
        assert_eq!(stored.user_id, UserId(1));
    }

    #[tokio::test]
    async fn favorites_are_unique_per_pair() {
        let store = fixture(10);
        assert_ok!(FavoriteRepository::add(&store, UserId(2), PostId(1)).await);
        assert!(FavoriteRepository::add(&store, UserId(2), PostId(1)).await.is_err());
        assert!(store.find(UserId(2), PostId(1)).await.unwrap().is_some());

        assert_ok!(FavoriteRepository::remove(&store, UserId(2), PostId(1)).await);
        assert!(store.find(UserId(2), PostId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn removing_a_post_drops_its_links() {
        let store = fixture(10);
        assert_ok!(store.add_categories(PostId(1), vec![CategoryId(5)]).await);
        assert_ok!(PostRepository::remove(&store, PostId(1)).await);

        assert!(store.find_by_id(PostId(1)).await.unwrap().is_none());
        assert!(store
            .find_post_category_links(vec![PostId(1)])
            .await
            .unwrap()
            .is_empty());
        assert_eq!(store.post_count(), 2);
    }

    #[tokio::test]
    async fn lookups_skip_unknown_ids() {
        let store = MemoryStore::default();
        store.insert_category(Category { id: CategoryId(5), name: "rust".into() });

        let found = store
            .get_categories(vec![CategoryId(5), CategoryId(6)])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.get_author(UserId(1)).await.unwrap().is_none());
    }
}
