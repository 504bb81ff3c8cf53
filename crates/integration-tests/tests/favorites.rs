use domains::{DomainError, PostId};
use integration_tests::{alice, bob, harness};
use tokio_test::assert_ok;

#[tokio::test]
async fn favorite_is_unique_per_user_and_post() {
    let h = harness();
    let id = h.post_as(&alice(), "Worth keeping", &[]).await;

    assert_ok!(h.service.make_favorite(id, &bob()).await);

    let err = h.service.make_favorite(id, &bob()).await.unwrap_err();
    assert_eq!(err.status_code(), 409);
    assert!(matches!(err, DomainError::Conflict(_)));

    // another user may still favorite the same post
    assert_ok!(h.service.make_favorite(id, &alice()).await);
}

#[tokio::test]
async fn unfavorite_round_trip() {
    let h = harness();
    let id = h.post_as(&alice(), "Bookmarked", &[]).await;

    assert_ok!(h.service.make_favorite(id, &bob()).await);
    assert_ok!(h.service.unfavorite(id, &bob()).await);

    let err = h.service.unfavorite(id, &bob()).await.unwrap_err();
    match err {
        DomainError::NotFound(msg) => assert_eq!(msg, "There was no such post in favorites"),
        other => panic!("expected NotFound, got {other:?}"),
    }

    // the link is gone, so favoriting again succeeds
    assert_ok!(h.service.make_favorite(id, &bob()).await);
}

#[tokio::test]
async fn never_favorited_post_cannot_be_unfavorited() {
    let h = harness();
    let id = h.post_as(&alice(), "Unloved", &[]).await;

    let err = h.service.unfavorite(id, &bob()).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn favoriting_a_missing_post_is_not_found() {
    let h = harness();

    let err = h.service.make_favorite(PostId(77), &bob()).await.unwrap_err();
    match err {
        DomainError::NotFound(msg) => assert_eq!(msg, "Post was not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn deleting_a_post_drops_its_favorites() {
    let h = harness();
    let id = h.post_as(&alice(), "Going away", &[]).await;
    assert_ok!(h.service.make_favorite(id, &bob()).await);

    assert_ok!(h.service.remove(id, Some(&alice())).await);

    let err = h.service.unfavorite(id, &bob()).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}
