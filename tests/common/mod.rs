//! Shared test infrastructure for model-layer and API tests.
//!
//! `setup_test_db()` returns an in-memory SQLite pool with the schema
//! applied. The pool is capped at one connection: every `:memory:`
//! connection is its own database, so a larger pool would hand tests a
//! blank database on the second checkout.

#![allow(dead_code)]

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use pms::auth::password;
use pms::db::MIGRATIONS;
use pms::models::admin::{Admin, NewAdmin};
use pms::models::proposal::types::{DocumentRef, Documents, ProposalInput};
use pms::models::user::{NewUser, User};
use pms::models::{admin, user};

pub const TEST_PASSWORD: &str = "password123";

pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open test DB");

    sqlx::raw_sql(MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn create_test_user(pool: &SqlitePool, email: &str, number: &str) -> User {
    let hash = password::hash_password(TEST_PASSWORD).unwrap();
    user::create(
        pool,
        &NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            number: number.to_string(),
            password: TEST_PASSWORD.to_string(),
        },
        &hash,
    )
    .await
    .expect("Failed to create test user")
}

pub async fn create_test_admin(pool: &SqlitePool, username: &str) -> Admin {
    let hash = password::hash_password(TEST_PASSWORD).unwrap();
    admin::create(
        pool,
        &NewAdmin {
            name: "Test Admin".to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            number: "9876543210".to_string(),
            password: TEST_PASSWORD.to_string(),
        },
        &hash,
    )
    .await
    .expect("Failed to create test admin")
}

/// A fully populated proposal submission.
pub fn sample_input(title: &str) -> ProposalInput {
    ProposalInput {
        title: title.to_string(),
        description: "A community development proposal".to_string(),
        objective: "Improve local infrastructure".to_string(),
        duration: "12 months".to_string(),
        budget: "500000".to_string(),
        state: "West Bengal".to_string(),
        district: "Nadia".to_string(),
        pincode: "741101".to_string(),
        post_office: "Krishnanagar".to_string(),
        police_station: "Kotwali".to_string(),
        address: "12 Station Road".to_string(),
        bank_name: "State Bank".to_string(),
        ifsc: "SBIN0000123".to_string(),
        account_number: "12345678901".to_string(),
        bank_branch: "Krishnanagar".to_string(),
        income_source: "Agriculture".to_string(),
        income_amount: "120000".to_string(),
        owner_name: "Land Owner".to_string(),
        owner_number: "9000000000".to_string(),
        owner_email: "owner@example.com".to_string(),
        land_location: "Plot 7, Mouza Ghurni".to_string(),
        land_area: "2 acres".to_string(),
        land_type: "Agricultural".to_string(),
        usage: "Community center".to_string(),
        ownership_status: "Owned".to_string(),
        land_description: "Flat land near the main road".to_string(),
        remarks: String::new(),
    }
}

pub fn sample_documents() -> Documents {
    Documents {
        photo: DocumentRef {
            public_id: "pms/1/photo".to_string(),
            secure_url: "https://store.example.com/pms/1/photo.png".to_string(),
        },
        address_proof: DocumentRef {
            public_id: "pms/1/address".to_string(),
            secure_url: "https://store.example.com/pms/1/address.png".to_string(),
        },
        income_proof: DocumentRef {
            public_id: "pms/1/income".to_string(),
            secure_url: "https://store.example.com/pms/1/income.png".to_string(),
        },
    }
}
