use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use hotel_storefront::{
    config::AppConfig,
    db::{DbPool, create_pool, orm_from_pool, run_migrations},
    middleware::auth::{ROLE_ADMIN, ROLE_USER},
    models::ProductCategory,
};
use rust_decimal::Decimal;
use uuid::Uuid;

struct SeedHotel {
    name: &'static str,
    description: &'static str,
    location: &'static str,
    rating: f64,
    image_url: &'static str,
    amenities: &'static [&'static str],
    price_range: &'static str,
}

const HOTELS: &[SeedHotel] = &[
    SeedHotel {
        name: "Serena Hotel Nairobi",
        description: "Experience luxury in the heart of Nairobi with stunning city views and world-class amenities.",
        location: "Processional Way, Nairobi",
        rating: 4.8,
        image_url: "https://images.unsplash.com/photo-1542314831-068cd1dbfeeb?auto=format&fit=crop&w=1170&q=80",
        amenities: &["Spa", "Pool", "Gym", "Multiple Restaurants", "Business Center"],
        price_range: "$$$",
    },
    SeedHotel {
        name: "Villa Rosa Kempinski",
        description: "Luxury five-star hotel offering European refinement with an East African flair.",
        location: "Chiromo Road, Westlands, Nairobi",
        rating: 4.9,
        image_url: "https://images.unsplash.com/photo-1571896349842-33c89424de2d?auto=format&fit=crop&w=1170&q=80",
        amenities: &["Spa", "Pool", "Multiple Restaurants", "Luxury Suites", "Conference Center"],
        price_range: "$$$$",
    },
    SeedHotel {
        name: "Tribe Hotel",
        description: "A luxury boutique hotel celebrating African art and culture with modern amenities.",
        location: "Limuru Road, Gigiri, Nairobi",
        rating: 4.7,
        image_url: "https://images.unsplash.com/photo-1585543805890-6051f7829f98?auto=format&fit=crop&w=1170&q=80",
        amenities: &["Spa", "Gourmet Restaurant", "Art Gallery", "Business Center", "Fitness Center"],
        price_range: "$$$",
    },
    SeedHotel {
        name: "Sankara Nairobi",
        description: "Contemporary urban hotel offering personalized service and distinctive experiences.",
        location: "Woodvale Grove, Westlands, Nairobi",
        rating: 4.8,
        image_url: "https://images.unsplash.com/photo-1566073771259-6a8506099945?auto=format&fit=crop&w=1170&q=80",
        amenities: &["Rooftop Pool", "Spa", "Steakhouse", "Champagne Bar", "Meeting Rooms"],
        price_range: "$$$",
    },
];

// (name, description, price in cents, stock, category)
const PRODUCTS: &[(&str, &str, i64, i32, ProductCategory)] = &[
    ("Deluxe King Room", "Spacious room with a king bed and city views.", 2500000, 12, ProductCategory::Room),
    ("Executive Suite", "Separate lounge, workspace and butler service.", 4800000, 4, ProductCategory::Room),
    ("Nyama Choma Platter", "Grilled meats with kachumbari and ugali for two.", 350000, 40, ProductCategory::Food),
    ("Continental Breakfast", "Pastries, fruit, eggs to order and Kenyan coffee.", 180000, 60, ProductCategory::Food),
    ("Airport Transfer", "Private car between the hotel and JKIA.", 450000, 20, ProductCategory::Service),
    ("Spa Massage", "Sixty minute full body massage.", 600000, 8, ProductCategory::Service),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 2).await?;
    run_migrations(&orm_from_pool(&pool)).await?;

    let admin_id = ensure_user(&pool, ("Admin", "User"), "admin@example.com", "admin123", ROLE_ADMIN).await?;
    let user_id = ensure_user(&pool, ("Jane", "Wanjiru"), "user@example.com", "user123", ROLE_USER).await?;

    let mut product_ids = Vec::new();
    for hotel in HOTELS {
        let hotel_id = ensure_hotel(&pool, hotel, admin_id).await?;
        product_ids.extend(seed_products(&pool, hotel_id).await?);
    }
    seed_orders(&pool, user_id, &product_ids).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    (first_name, last_name): (&str, &str),
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, first_name, last_name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_hotel(pool: &DbPool, hotel: &SeedHotel, owner_id: Uuid) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM hotels WHERE name = $1")
        .bind(hotel.name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO hotels (id, name, description, location, rating, image_url, amenities, price_range, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(hotel.name)
    .bind(hotel.description)
    .bind(hotel.location)
    .bind(hotel.rating)
    .bind(hotel.image_url)
    .bind(serde_json::json!(hotel.amenities))
    .bind(hotel.price_range)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    println!("Seeded hotel {}", hotel.name);
    Ok(id)
}

async fn seed_products(pool: &DbPool, hotel_id: Uuid) -> anyhow::Result<Vec<(Uuid, Decimal)>> {
    let mut seeded = Vec::with_capacity(PRODUCTS.len());
    for (name, description, cents, stock, category) in PRODUCTS {
        let price = Decimal::new(*cents, 2);
        let existing: Option<(Uuid, Decimal)> =
            sqlx::query_as("SELECT id, price FROM products WHERE hotel_id = $1 AND name = $2")
                .bind(hotel_id)
                .bind(*name)
                .fetch_optional(pool)
                .await?;
        if let Some(row) = existing {
            seeded.push(row);
            continue;
        }

        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO products (id, hotel_id, name, description, price, quantity, category, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(hotel_id)
        .bind(*name)
        .bind(*description)
        .bind(price)
        .bind(*stock)
        .bind(category.as_str())
        .bind("https://images.unsplash.com/photo-1551882547-ff40c63fe5fa?auto=format&fit=crop&w=800&q=80")
        .fetch_one(pool)
        .await?;
        seeded.push((id, price));
    }
    Ok(seeded)
}

/// A few historical orders so the sales and revenue reports have data.
async fn seed_orders(
    pool: &DbPool,
    user_id: Uuid,
    products: &[(Uuid, Decimal)],
) -> anyhow::Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    if count > 0 || products.is_empty() {
        return Ok(());
    }

    for (days_ago, picks) in [(1_i32, &[0_usize, 2][..]), (3, &[1, 3, 4][..]), (7, &[5][..])] {
        let lines: Vec<(Uuid, Decimal, i32)> = picks
            .iter()
            .filter_map(|index| products.get(*index))
            .map(|(id, price)| (*id, *price, 1))
            .collect();
        let total: Decimal = lines
            .iter()
            .map(|(_, price, quantity)| *price * Decimal::from(*quantity))
            .sum();

        let mut tx = pool.begin().await?;
        let order_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total_amount, status, created_at)
            VALUES ($1, $2, $3, 'completed', NOW() - make_interval(days => $4))
            "#,
        )
        .bind(order_id)
        .bind(user_id)
        .bind(total)
        .bind(days_ago)
        .execute(&mut *tx)
        .await?;

        for (product_id, price, quantity) in lines {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, quantity, price) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(product_id)
            .bind(quantity)
            .bind(price)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
    }

    println!("Seeded orders");
    Ok(())
}
