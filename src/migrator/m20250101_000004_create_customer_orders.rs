use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_catalog::MenuItems;
use super::m20250101_000002_create_accounts::Customers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomerOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerOrders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomerOrders::OrderNumber)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CustomerOrders::CustomerId).uuid().null())
                    .col(
                        ColumnDef::new(CustomerOrders::CustomerName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerOrders::CustomerEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerOrders::CustomerPhone)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerOrders::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(CustomerOrders::PaymentStatus)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(CustomerOrders::TotalAmount)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(CustomerOrders::TotalAmount).gte(0)),
                    )
                    .col(
                        ColumnDef::new(CustomerOrders::OrderType)
                            .string_len(20)
                            .not_null()
                            .default("dine_in"),
                    )
                    .col(ColumnDef::new(CustomerOrders::TableNumber).integer().null())
                    .col(ColumnDef::new(CustomerOrders::DeliveryAddress).text().null())
                    .col(ColumnDef::new(CustomerOrders::Notes).text().null())
                    .col(
                        ColumnDef::new(CustomerOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_orders_customer_id")
                            .from(CustomerOrders::Table, CustomerOrders::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerOrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerOrderItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomerOrderItems::OrderId).uuid().not_null())
                    .col(
                        ColumnDef::new(CustomerOrderItems::MenuItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerOrderItems::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(CustomerOrderItems::PriceAtTime)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_order_items_order_id")
                            .from(CustomerOrderItems::Table, CustomerOrderItems::OrderId)
                            .to(CustomerOrders::Table, CustomerOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_order_items_menu_item_id")
                            .from(CustomerOrderItems::Table, CustomerOrderItems::MenuItemId)
                            .to(MenuItems::Table, MenuItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customer_orders_created_at")
                    .table(CustomerOrders::Table)
                    .col(CustomerOrders::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customer_orders_status")
                    .table(CustomerOrders::Table)
                    .col(CustomerOrders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customer_order_items_order_id")
                    .table(CustomerOrderItems::Table)
                    .col(CustomerOrderItems::OrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerOrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CustomerOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CustomerOrders {
    Table,
    Id,
    OrderNumber,
    CustomerId,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    Status,
    PaymentStatus,
    TotalAmount,
    OrderType,
    TableNumber,
    DeliveryAddress,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CustomerOrderItems {
    Table,
    Id,
    OrderId,
    MenuItemId,
    Quantity,
    PriceAtTime,
}
