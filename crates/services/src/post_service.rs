//! # PostService
//!
//! Orchestrates the post use cases over the injected ports. Holds no state of
//! its own; everything lives in the persistence collaborator.

use std::collections::HashSet;
use std::sync::Arc;

use domains::{
    Author, Category, CategoryId, CreatePostInput, DomainError, EntityLookup,
    FavoriteRepository, ListParams, NewPost, Post, PostId, PostRepository, PostView, Requester,
    Result, UpdatePostInput, UserId,
};

use crate::assembler::{build_post, categories_for, distinct_category_ids};
use crate::policy::{
    ensure_author_fields, ensure_can_modify, ensure_exists, ensure_visible, ALREADY_FAVORITE,
    AUTHOR_NOT_FOUND, FAVORITE_NOT_FOUND, POST_NOT_FOUND,
};
use crate::query::normalize_list_params;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    favorites: Arc<dyn FavoriteRepository>,
    entities: Arc<dyn EntityLookup>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        favorites: Arc<dyn FavoriteRepository>,
        entities: Arc<dyn EntityLookup>,
    ) -> Self {
        Self {
            posts,
            favorites,
            entities,
        }
    }

    /// Lists posts matching `params`, optionally restricted to `ids`.
    ///
    /// Unlike [`PostService::get`], INACTIVE posts are not hidden per item here:
    /// the status filter in `params` is the only visibility control.
    #[tracing::instrument(skip_all, fields(requester = ?requester.map(|r| r.id)))]
    pub async fn get_all(
        &self,
        requester: Option<&Requester>,
        ids: Option<Vec<PostId>>,
        params: &ListParams,
    ) -> Result<Vec<PostView>> {
        let filter = normalize_list_params(params);
        let posts = self
            .posts
            .find_all(requester.copied(), ids, filter)
            .await?;
        let links = self
            .posts
            .find_post_category_links(posts.iter().map(|p| p.id).collect())
            .await?;

        let mut seen = HashSet::new();
        let author_ids: Vec<UserId> = posts
            .iter()
            .map(|p| p.user_id)
            .filter(|id| seen.insert(*id))
            .collect();

        let (authors, categories) = futures::try_join!(
            self.entities.get_users(author_ids),
            self.entities.get_categories(distinct_category_ids(&links)),
        )?;
        tracing::debug!(posts = posts.len(), links = links.len(), "resolved list lookups");

        posts
            .iter()
            .map(|post| {
                let author = authors
                    .get(&post.user_id)
                    .ok_or_else(|| DomainError::not_found(AUTHOR_NOT_FOUND))?;
                Ok(build_post(
                    post,
                    Author::from(author),
                    categories_for(post.id, &links, &categories),
                ))
            })
            .collect()
    }

    #[tracing::instrument(skip(self, requester), fields(requester = ?requester.map(|r| r.id)))]
    pub async fn get(&self, id: PostId, requester: Option<&Requester>) -> Result<PostView> {
        let post = ensure_exists(self.posts.find_by_id(id).await?, POST_NOT_FOUND)?;
        ensure_visible(&post, requester)?;
        self.assemble(&post).await
    }

    /// Categories linked to a post, in link order.
    #[tracing::instrument(skip(self))]
    pub async fn get_post_categories(&self, id: PostId) -> Result<Vec<Category>> {
        ensure_exists(self.posts.find_by_id(id).await?, POST_NOT_FOUND)?;

        let links = self.posts.find_post_category_links(vec![id]).await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let resolved = self
            .entities
            .get_categories(distinct_category_ids(&links))
            .await?;
        Ok(categories_for(id, &links, &resolved))
    }

    #[tracing::instrument(skip(self, input, requester), fields(requester = %requester.id))]
    pub async fn create(&self, input: CreatePostInput, requester: &Requester) -> Result<PostId> {
        let post = NewPost::create(&input.title, &input.content)?;
        let id = self
            .write_new_post(&post, requester.id, input.categories)
            .await?;

        tracing::info!(post_id = %id, "post created");
        Ok(id)
    }

    #[tracing::instrument(
        skip(self, input, requester),
        fields(requester = ?requester.map(|r| r.id))
    )]
    pub async fn update(
        &self,
        target: PostId,
        input: UpdatePostInput,
        requester: Option<&Requester>,
    ) -> Result<()> {
        let stored = ensure_exists(self.posts.find_by_id(target).await?, POST_NOT_FOUND)?;
        let current = self.assemble(&stored).await?;

        let requester = ensure_can_modify(requester, current.author.id)?;
        let patch = input.patch();
        ensure_author_fields(requester, current.author.id, &patch)?;

        let updated = current.post.apply(&patch);
        self.write_update(&updated, input.categories_to_delete, input.categories_to_add)
            .await?;

        tracing::info!(post_id = %target, status = ?updated.status, "post updated");
        Ok(())
    }

    #[tracing::instrument(skip(self, requester), fields(requester = ?requester.map(|r| r.id)))]
    pub async fn remove(&self, id: PostId, requester: Option<&Requester>) -> Result<()> {
        let stored = ensure_exists(self.posts.find_by_id(id).await?, POST_NOT_FOUND)?;
        ensure_can_modify(requester, stored.user_id)?;

        self.posts.remove(id).await?;
        tracing::info!(post_id = %id, "post removed");
        Ok(())
    }

    #[tracing::instrument(skip(self, requester), fields(requester = %requester.id))]
    pub async fn make_favorite(&self, id: PostId, requester: &Requester) -> Result<()> {
        ensure_exists(self.posts.find_by_id(id).await?, POST_NOT_FOUND)?;

        if self.favorites.find(requester.id, id).await?.is_some() {
            return Err(DomainError::conflict(ALREADY_FAVORITE));
        }

        self.favorites.add(requester.id, id).await?;
        tracing::info!(post_id = %id, "post added to favorites");
        Ok(())
    }

    /// Checks the favorite link itself, not the post: a deleted post can still
    /// be unfavorited if its link survived.
    #[tracing::instrument(skip(self, requester), fields(requester = %requester.id))]
    pub async fn unfavorite(&self, id: PostId, requester: &Requester) -> Result<()> {
        ensure_exists(
            self.favorites.find(requester.id, id).await?,
            FAVORITE_NOT_FOUND,
        )?;

        self.favorites.remove(requester.id, id).await?;
        tracing::info!(post_id = %id, "post removed from favorites");
        Ok(())
    }

    /// Author and categories are independent lookups and run concurrently.
    async fn assemble(&self, post: &Post) -> Result<PostView> {
        let links = self.posts.find_post_category_links(vec![post.id]).await?;
        let (author, categories) = futures::try_join!(
            self.entities.get_author(post.user_id),
            self.entities.get_categories(distinct_category_ids(&links)),
        )?;
        let author = ensure_exists(author, AUTHOR_NOT_FOUND)?;

        Ok(build_post(
            post,
            Author::from(&author),
            categories_for(post.id, &links, &categories),
        ))
    }

    /// Write boundary for creation. Not atomic: if linking categories fails the
    /// post stays persisted without them. A transactional adapter wraps this call.
    async fn write_new_post(
        &self,
        post: &NewPost,
        owner: UserId,
        categories: Vec<CategoryId>,
    ) -> Result<PostId> {
        let id = self.posts.add(post, owner).await?;
        self.posts.add_categories(id, categories).await?;
        Ok(id)
    }

    /// Write boundary for updates: unlink, link, then save. Same atomicity
    /// caveat as [`PostService::write_new_post`].
    async fn write_update(
        &self,
        post: &Post,
        to_delete: Vec<CategoryId>,
        to_add: Vec<CategoryId>,
    ) -> Result<()> {
        if !to_delete.is_empty() {
            self.posts.remove_categories(post.id, to_delete).await?;
        }
        if !to_add.is_empty() {
            self.posts.add_categories(post.id, to_add).await?;
        }
        self.posts.save(post).await?;
        Ok(())
    }
}
