//! Database seeder for Taajir development and testing.
//!
//! Seeds an admin user, an operator user, and a handful of customers for
//! local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use taajir_core::auth::hash_password;
use taajir_db::entities::{customers, sea_orm_active_enums::UserRole, users};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = taajir_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    seed_user(&db, "admin@taajir.dev", "Admin User", "admin123", UserRole::Admin).await;
    seed_user(
        &db,
        "operator@taajir.dev",
        "Operator User",
        "operator123",
        UserRole::Operator,
    )
    .await;

    println!("Seeding customers...");
    seed_customer(&db, "Al Madina Traders", Some("100123456700003")).await;
    seed_customer(&db, "Karachi Freight Co", None).await;
    seed_customer(&db, "Gulf Horizon LLC", Some("100987654300001")).await;

    println!("Seeding complete!");
}

/// Seeds one user; skips when the email is already registered.
async fn seed_user(
    db: &DatabaseConnection,
    email: &str,
    full_name: &str,
    password: &str,
    role: UserRole,
) {
    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  User {email} already exists, skipping...");
        return;
    }

    let password_hash = hash_password(password).expect("Failed to hash password");
    let now = Utc::now().into();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        full_name: Set(full_name.to_string()),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert user {email}: {e}");
    } else {
        println!("  Created user: {email}");
    }
}

/// Seeds one customer; skips when a customer with the same name exists.
async fn seed_customer(db: &DatabaseConnection, name: &str, trn: Option<&str>) {
    let existing = customers::Entity::find()
        .filter(customers::Column::Name.eq(name))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  Customer {name} already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let customer = customers::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        trn: Set(trn.map(ToString::to_string)),
        phone: Set(None),
        address: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = customer.insert(db).await {
        eprintln!("Failed to insert customer {name}: {e}");
    } else {
        println!("  Created customer: {name}");
    }
}
