//! Shared fixtures for the scenario tests: a `MemoryStore` seeded with three
//! users and three categories, wrapped in a `PostService`.

use std::sync::Arc;

use domains::{Category, CategoryId, CreatePostInput, PostId, Requester, Role, User, UserId};
use services::PostService;
use storage_adapters::MemoryStore;

pub const ALICE: UserId = UserId(1);
pub const BOB: UserId = UserId(2);
pub const ADMIN: UserId = UserId(3);

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub service: PostService,
}

pub fn harness() -> Harness {
    harness_with_page_size(10)
}

pub fn harness_with_page_size(page_size: usize) -> Harness {
    let store = Arc::new(MemoryStore::new(page_size));
    let users = [
        (ALICE, "alice", Role::User),
        (BOB, "bob", Role::User),
        (ADMIN, "root", Role::Admin),
    ];
    for (id, login, role) in users {
        store.insert_user(User {
            id,
            login: login.to_string(),
            email: format!("{login}@example.com"),
            role,
            avatar: Some(format!("/avatars/{login}.png")),
        });
    }
    for (id, name) in [(5, "rust"), (7, "databases"), (9, "meta")] {
        store.insert_category(Category { id: CategoryId(id), name: name.to_string() });
    }

    let service = PostService::new(store.clone(), store.clone(), store.clone());
    Harness { store, service }
}

pub fn alice() -> Requester {
    Requester::user(ALICE)
}

pub fn bob() -> Requester {
    Requester::user(BOB)
}

pub fn admin() -> Requester {
    Requester::admin(ADMIN)
}

pub fn input(title: &str, content: &str, categories: &[i64]) -> CreatePostInput {
    CreatePostInput {
        title: title.to_string(),
        content: content.to_string(),
        categories: categories.iter().copied().map(CategoryId).collect(),
    }
}

impl Harness {
    pub async fn post_as(&self, author: &Requester, title: &str, categories: &[i64]) -> PostId {
        self.service
            .create(input(title, "some content", categories), author)
            .await
            .expect("fixture post is valid")
    }
}
