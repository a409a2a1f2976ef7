use axum_restaurant_api::{
    db::{create_orm_conn, run_migrations},
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        menu_items::{ActiveModel as MenuItemActive, Column as MenuCol, Entity as MenuItems},
        sea_orm_active_enums::CategoryType,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    middleware::auth::ADMIN_ROLE,
    services::auth_service::hash_password,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

// (category, type, display order, items as (name, description, price in cents, stock))
type SeedCategory = (
    &'static str,
    CategoryType,
    i32,
    &'static [(&'static str, &'static str, i64, i32)],
);

const MENU: &[SeedCategory] = &[
    (
        "Starters",
        CategoryType::Appetizer,
        1,
        &[
            ("Garlic Bread", "Toasted sourdough with garlic butter", 450, 40),
            ("Bruschetta", "Tomato, basil and olive oil on grilled bread", 650, 25),
        ],
    ),
    (
        "Soups",
        CategoryType::Soup,
        2,
        &[("Tomato Soup", "Slow roasted tomatoes with cream", 550, 30)],
    ),
    (
        "Mains",
        CategoryType::MainCourse,
        3,
        &[
            ("Margherita Pizza", "San Marzano tomato, mozzarella, basil", 1200, 50),
            ("Grilled Salmon", "With lemon butter and seasonal greens", 1850, 8),
        ],
    ),
    (
        "Desserts",
        CategoryType::Dessert,
        4,
        &[("Tiramisu", "Espresso soaked ladyfingers and mascarpone", 700, 20)],
    ),
    (
        "Drinks",
        CategoryType::Beverage,
        5,
        &[
            ("Lemonade", "Freshly squeezed", 350, 100),
            ("Espresso", "Double shot", 300, 200),
        ],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin@example.com", "admin12345", ADMIN_ROLE).await?;
    let user_id = ensure_user(&orm, "user@example.com", "user12345", "user").await?;
    seed_menu(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(role.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user.id)
}

async fn seed_menu(orm: &DatabaseConnection) -> anyhow::Result<()> {
    for (name, category_type, display_order, items) in MENU {
        let category = match Categories::find()
            .filter(CategoryCol::Name.eq(*name))
            .one(orm)
            .await?
        {
            Some(category) => category,
            None => {
                CategoryActive {
                    id: Set(Uuid::new_v4()),
                    name: Set(name.to_string()),
                    category_type: Set(*category_type),
                    description: Set(None),
                    display_order: Set(*display_order),
                    is_active: Set(true),
                }
                .insert(orm)
                .await?
            }
        };

        for (item_name, description, price, stock) in items.iter() {
            let exists = MenuItems::find()
                .filter(MenuCol::CategoryId.eq(category.id))
                .filter(MenuCol::Name.eq(*item_name))
                .one(orm)
                .await?
                .is_some();
            if exists {
                continue;
            }

            let now = Utc::now();
            MenuItemActive {
                id: Set(Uuid::new_v4()),
                category_id: Set(category.id),
                name: Set(item_name.to_string()),
                description: Set(Some(description.to_string())),
                price: Set(*price),
                image: Set(None),
                is_available: Set(true),
                stock_quantity: Set(*stock),
                low_stock_threshold: Set(10),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(orm)
            .await?;
        }
    }

    println!("Seeded menu");
    Ok(())
}
