use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customer_order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    /// Menu price at checkout. Never rewritten afterwards.
    pub price_at_time: i64,
}

impl Model {
    pub fn subtotal(&self) -> i64 {
        self.price_at_time * i64::from(self.quantity)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer_orders::Entity",
        from = "Column::OrderId",
        to = "super::customer_orders::Column::Id",
        on_delete = "Cascade"
    )]
    CustomerOrders,
    #[sea_orm(
        belongs_to = "super::menu_items::Entity",
        from = "Column::MenuItemId",
        to = "super::menu_items::Column::Id",
        on_delete = "Cascade"
    )]
    MenuItems,
}

impl Related<super::customer_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerOrders.def()
    }
}

impl Related<super::menu_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
