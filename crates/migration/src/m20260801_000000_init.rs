//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: accounts (authentication happens per request)
//! - `wishes`: desired items with a funding target and raised total
//! - `offers`: append-only contributions toward a wish
//! - `wishlists`: shareable groupings of wishes
//! - `wishlist_items`: wishlist membership join table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    Password,
    About,
    Avatar,
    CreatedAt,
}

#[derive(Iden)]
enum Wishes {
    Table,
    Id,
    OwnerId,
    Name,
    Link,
    Image,
    Description,
    PriceMinor,
    RaisedMinor,
    Copied,
    CreatedAt,
}

#[derive(Iden)]
enum Offers {
    Table,
    Id,
    ItemId,
    UserId,
    AmountMinor,
    Hidden,
    CreatedAt,
}

#[derive(Iden)]
enum Wishlists {
    Table,
    Id,
    OwnerId,
    Name,
    Image,
    CreatedAt,
}

#[derive(Iden)]
enum WishlistItems {
    Table,
    WishlistId,
    WishId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::About).string())
                    .col(ColumnDef::new(Users::Avatar).string())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-username-unique")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-email-unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Wishes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wishes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Wishes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Wishes::OwnerId).string().not_null())
                    .col(ColumnDef::new(Wishes::Name).string().not_null())
                    .col(ColumnDef::new(Wishes::Link).string().not_null())
                    .col(ColumnDef::new(Wishes::Image).string().not_null())
                    .col(ColumnDef::new(Wishes::Description).string().not_null())
                    .col(ColumnDef::new(Wishes::PriceMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Wishes::RaisedMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Wishes::Copied)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Wishes::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishes-owner_id")
                            .from(Wishes::Table, Wishes::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wishes-owner_id")
                    .table(Wishes::Table)
                    .col(Wishes::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wishes-created_at")
                    .table(Wishes::Table)
                    .col(Wishes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Offers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Offers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Offers::ItemId).string().not_null())
                    .col(ColumnDef::new(Offers::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Offers::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Offers::Hidden)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Offers::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-offers-item_id")
                            .from(Offers::Table, Offers::ItemId)
                            .to(Wishes::Table, Wishes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-offers-user_id")
                            .from(Offers::Table, Offers::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-offers-item_id")
                    .table(Offers::Table)
                    .col(Offers::ItemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-offers-user_id")
                    .table(Offers::Table)
                    .col(Offers::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Wishlists
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wishlists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wishlists::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wishlists::OwnerId).string().not_null())
                    .col(ColumnDef::new(Wishlists::Name).string().not_null())
                    .col(ColumnDef::new(Wishlists::Image).string().not_null())
                    .col(ColumnDef::new(Wishlists::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishlists-owner_id")
                            .from(Wishlists::Table, Wishlists::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wishlists-owner_id")
                    .table(Wishlists::Table)
                    .col(Wishlists::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Wishlist items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(WishlistItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WishlistItems::WishlistId).string().not_null())
                    .col(ColumnDef::new(WishlistItems::WishId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(WishlistItems::WishlistId)
                            .col(WishlistItems::WishId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishlist_items-wishlist_id")
                            .from(WishlistItems::Table, WishlistItems::WishlistId)
                            .to(Wishlists::Table, Wishlists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishlist_items-wish_id")
                            .from(WishlistItems::Table, WishlistItems::WishId)
                            .to(Wishes::Table, Wishes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WishlistItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wishlists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Offers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wishes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
