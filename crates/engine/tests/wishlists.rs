use engine::{Engine, EngineError, MoneyCents, NewWishCmd, NewWishlistCmd, SignupCmd, UpdateWishlistCmd};
use migration::MigratorTrait;
use sea_orm::ConnectOptions;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn signup(engine: &Engine, name: &str) -> String {
    engine
        .signup(SignupCmd::new(name, format!("{name}@example.com"), "secret"))
        .await
        .unwrap()
        .id
}

async fn new_wish(engine: &Engine, owner_id: &str, name: &str) -> engine::Wish {
    engine
        .new_wish(NewWishCmd {
            user_id: owner_id.to_string(),
            name: name.to_string(),
            link: "https://shop.example/item".to_string(),
            image: "https://shop.example/item.jpg".to_string(),
            description: "Something nice".to_string(),
            price: MoneyCents::new(5_000),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn signup_rejects_duplicate_username_or_email() {
    let engine = engine_with_db().await;
    signup(&engine, "alice").await;

    let same_name = engine
        .signup(SignupCmd::new("alice", "other@example.com", "secret"))
        .await;
    assert!(matches!(same_name, Err(EngineError::ExistingKey(_))));

    let same_email = engine
        .signup(SignupCmd::new("alicia", "alice@example.com", "secret"))
        .await;
    assert!(matches!(same_email, Err(EngineError::ExistingKey(_))));
}

#[tokio::test]
async fn user_lookups() {
    let engine = engine_with_db().await;
    let alice = signup(&engine, "alice").await;

    let by_id = engine.find_user_by_id(&alice).await.unwrap();
    assert_eq!(by_id.unwrap().username, "alice");

    let by_name = engine.find_user_by_username("alice").await.unwrap();
    assert!(by_name.is_some());

    let by_email = engine
        .find_user_by_username_or_email("nobody", Some("alice@example.com"))
        .await
        .unwrap();
    assert!(by_email.is_some());

    let missing = engine.find_user_by_username("nobody").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn wishlist_drops_unknown_ids_silently() {
    let engine = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let wish = new_wish(&engine, &alice, "Espresso machine").await;

    let (wishlist, items) = engine
        .new_wishlist(NewWishlistCmd {
            user_id: alice.clone(),
            name: "Kitchen".to_string(),
            image: "https://img.example/kitchen.jpg".to_string(),
            item_ids: vec![wish.id, Uuid::new_v4(), Uuid::new_v4()],
        })
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].0.id, wish.id.to_string());

    let (_, owner, items) = engine.wishlist_detail(wishlist_id(&wishlist)).await.unwrap();
    assert_eq!(owner.id, alice);
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn wishlist_update_replaces_member_set_wholesale() {
    let engine = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let first = new_wish(&engine, &alice, "Espresso machine").await;
    let second = new_wish(&engine, &alice, "Grinder").await;

    let (wishlist, _) = engine
        .new_wishlist(NewWishlistCmd {
            user_id: alice.clone(),
            name: "Kitchen".to_string(),
            image: "https://img.example/kitchen.jpg".to_string(),
            item_ids: vec![first.id],
        })
        .await
        .unwrap();

    let (_, items) = engine
        .update_wishlist(
            UpdateWishlistCmd::new(wishlist_id(&wishlist), &alice)
                .name("Kitchen upgrade")
                .item_ids(vec![second.id]),
        )
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].0.id, second.id.to_string());

    // Name/image edits leave the member set alone.
    let (updated, items) = engine
        .update_wishlist(UpdateWishlistCmd::new(wishlist_id(&wishlist), &alice).name("Kitchen v3"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Kitchen v3");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].0.id, second.id.to_string());
}

#[tokio::test]
async fn wishlist_ownership_is_enforced() {
    let engine = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let bob = signup(&engine, "bob").await;

    let (wishlist, _) = engine
        .new_wishlist(NewWishlistCmd {
            user_id: alice.clone(),
            name: "Kitchen".to_string(),
            image: "https://img.example/kitchen.jpg".to_string(),
            item_ids: Vec::new(),
        })
        .await
        .unwrap();

    let update = engine
        .update_wishlist(UpdateWishlistCmd::new(wishlist_id(&wishlist), &bob).name("Not yours"))
        .await;
    assert!(matches!(update, Err(EngineError::Forbidden(_))));

    let delete = engine.delete_wishlist(wishlist_id(&wishlist), &bob).await;
    assert!(matches!(delete, Err(EngineError::Forbidden(_))));

    engine
        .delete_wishlist(wishlist_id(&wishlist), &alice)
        .await
        .unwrap();
    let gone = engine.wishlist_detail(wishlist_id(&wishlist)).await;
    assert!(matches!(gone, Err(EngineError::KeyNotFound(_))));
}

fn wishlist_id(model: &engine::wishlists::Model) -> Uuid {
    Uuid::parse_str(&model.id).unwrap()
}
