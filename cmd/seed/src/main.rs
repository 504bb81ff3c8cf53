//! # seed
//!
//! Fills an in-memory store with demo users and categories, then drives the
//! main post flows through `PostService` and prints the results as JSON.

use std::sync::Arc;

use anyhow::Context;
use configs::{LogSettings, Settings};
use domains::{
    Category, CategoryId, CreatePostInput, ListParams, Requester, Role, UpdatePostInput, User,
    UserId,
};
use services::PostService;
use storage_adapters::MemoryStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn seed_lookups(store: &MemoryStore) {
    let users = [
        (1, "alice", Role::User),
        (2, "bob", Role::User),
        (3, "root", Role::Admin),
    ];
    for (id, login, role) in users {
        store.insert_user(User {
            id: UserId(id),
            login: login.to_string(),
            email: format!("{login}@example.com"),
            role,
            avatar: None,
        });
    }
    for (id, name) in [(5, "rust"), (7, "databases"), (9, "meta")] {
        store.insert_category(Category { id: CategoryId(id), name: name.to_string() });
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    init_tracing(&settings.log);

    let store = Arc::new(MemoryStore::new(settings.listing.page_size));
    seed_lookups(&store);
    let service = PostService::new(store.clone(), store.clone(), store.clone());

    let alice = Requester::user(UserId(1));
    let bob = Requester::user(UserId(2));
    let admin = Requester::admin(UserId(3));

    let first = service
        .create(
            CreatePostInput {
                title: "Borrowing without tears".into(),
                content: "Lifetimes, explained with diagrams.".into(),
                categories: vec![CategoryId(5), CategoryId(7)],
            },
            &alice,
        )
        .await?;
    let second = service
        .create(
            CreatePostInput {
                title: "Draft: release notes".into(),
                content: "Work in progress.".into(),
                categories: vec![CategoryId(9)],
            },
            &bob,
        )
        .await?;

    // an admin may hide someone else's post but not rewrite it
    service
        .update(
            second,
            UpdatePostInput { is_active: Some(false), ..Default::default() },
            Some(&admin),
        )
        .await?;

    service.make_favorite(first, &bob).await?;
    if let Err(err) = service.make_favorite(first, &bob).await {
        tracing::info!(code = err.status_code(), %err, "second favorite rejected");
    }

    let listing = service.get_all(None, None, &ListParams::default()).await?;
    println!("{}", serde_json::to_string_pretty(&listing)?);

    match service.get(second, None).await {
        Ok(post) => println!("{}", serde_json::to_string_pretty(&post)?),
        Err(err) => tracing::info!(code = err.status_code(), %err, "hidden post not served"),
    }

    let categories = service.get_post_categories(first).await?;
    println!("{}", serde_json::to_string_pretty(&categories)?);

    tracing::info!(posts = store.post_count(), "seed complete");
    Ok(())
}
