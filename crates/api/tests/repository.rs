//! Database tests for the repositories.
//!
//! These tests require a `PostgreSQL` server reachable through `DATABASE_URL`.
//! `sqlx::test` creates a fresh database per test and applies `./migrations`.
//!
//! Run with: cargo test -p retail-api -- --ignored

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use sqlx::PgPool;

use retail_api::db::{OrderRepository, Repository, RepositoryError, UserKey, UserRepository};
use retail_api::models::{
    Brand, BrandInput, Category, CategoryInput, CategoryPatch, Code, CodeInput, Customer,
    CustomerInput, CustomerPatch, DiscountType, NewUser, Order, OrderInput, OrderItem,
    OrderItemInput, Product, ProductInput, Staff, StaffInput, Store, StoreInput,
};
use retail_core::{ListQuery, OrderId, ProductId};

fn customer(first_name: &str, email: Option<&str>) -> CustomerInput {
    CustomerInput {
        first_name: first_name.to_owned(),
        last_name: "Tester".to_owned(),
        phone: Some("555-0100".to_owned()),
        email: email.map(str::to_owned),
        street: None,
        city: None,
        state: None,
        zip_code: None,
    }
}

fn new_user(login: &str) -> NewUser {
    NewUser {
        first_name: "Alice".to_owned(),
        last_name: "Liddell".to_owned(),
        login: login.to_owned(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo".to_owned(),
        phone_number: None,
    }
}

async fn seed_product(pool: &PgPool) -> ProductId {
    let brand = Repository::<Brand>::new(pool)
        .create(&BrandInput {
            brand_name: "Trek".to_owned(),
        })
        .await
        .unwrap();
    let category = Repository::<Category>::new(pool)
        .create(&CategoryInput {
            category_name: "Road".to_owned(),
        })
        .await
        .unwrap();

    Repository::<Product>::new(pool)
        .create(&ProductInput {
            product_name: "Domane".to_owned(),
            brand_id: brand,
            category_id: category,
            model_year: 2023,
            list_price: Decimal::new(150_000, 2),
        })
        .await
        .unwrap()
}

async fn seed_order(pool: &PgPool) -> OrderId {
    let store = Repository::<Store>::new(pool)
        .create(&StoreInput {
            store_name: "Downtown".to_owned(),
            phone: None,
            email: None,
            street: None,
            city: Some("Santa Cruz".to_owned()),
            state: None,
            zip_code: None,
        })
        .await
        .unwrap();
    let staff = Repository::<Staff>::new(pool)
        .create(&StaffInput {
            first_name: "Fabiola".to_owned(),
            last_name: "Jackson".to_owned(),
            email: "fabiola@example.com".to_owned(),
            phone: None,
            active: true,
            store_id: store,
            manager_id: None,
        })
        .await
        .unwrap();
    let today = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    Repository::<Order>::new(pool)
        .create(&OrderInput {
            customer_id: None,
            order_status: 1,
            order_date: today,
            required_date: today,
            shipped_date: None,
            store_id: store,
            staff_id: staff,
        })
        .await
        .unwrap()
}

// =============================================================================
// Generic Repository
// =============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_create_then_get(pool: PgPool) {
    let repo = Repository::<Customer>::new(&pool);

    let id = repo.create(&customer("Ada", Some("ada@example.com"))).await.unwrap();
    let row = repo.get_by_id(id).await.unwrap();

    assert_eq!(row.customer_id, id);
    assert_eq!(row.first_name, "Ada");
    assert_eq!(row.email.as_deref(), Some("ada@example.com"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_get_missing_is_not_found(pool: PgPool) {
    let result = Repository::<Customer>::new(&pool)
        .get_by_id(retail_core::CustomerId::generate())
        .await;

    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_update_replaces_and_touches_updated_at(pool: PgPool) {
    let repo = Repository::<Customer>::new(&pool);
    let id = repo.create(&customer("Ada", None)).await.unwrap();
    let before = repo.get_by_id(id).await.unwrap();

    let after = repo.update(id, &customer("Grace", None)).await.unwrap();

    assert_eq!(after.first_name, "Grace");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_patch_null_clears_and_absent_keeps(pool: PgPool) {
    let repo = Repository::<Customer>::new(&pool);
    let id = repo.create(&customer("Ada", Some("ada@example.com"))).await.unwrap();

    let patch: CustomerPatch = serde_json::from_str(r#"{"phone": null}"#).unwrap();
    let row = repo.update_partial(id, &patch).await.unwrap();

    assert_eq!(row.phone, None);
    assert_eq!(row.email.as_deref(), Some("ada@example.com"));
    assert_eq!(row.first_name, "Ada");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_empty_patch_returns_current_row(pool: PgPool) {
    let repo = Repository::<Category>::new(&pool);
    let id = repo
        .create(&CategoryInput {
            category_name: "Road".to_owned(),
        })
        .await
        .unwrap();
    let before = repo.get_by_id(id).await.unwrap();

    let after = repo.update_partial(id, &CategoryPatch::default()).await.unwrap();
    assert_eq!(after, before);

    let missing = repo
        .update_partial(retail_core::CategoryId::generate(), &CategoryPatch::default())
        .await;
    assert!(matches!(missing, Err(RepositoryError::NotFound)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_delete_twice_is_not_found(pool: PgPool) {
    let repo = Repository::<Customer>::new(&pool);
    let id = repo.create(&customer("Ada", None)).await.unwrap();

    repo.delete(id).await.unwrap();
    assert!(matches!(repo.delete(id).await, Err(RepositoryError::NotFound)));
    assert!(matches!(repo.get_by_id(id).await, Err(RepositoryError::NotFound)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_list_counts_whole_filtered_set(pool: PgPool) {
    let repo = Repository::<Customer>::new(&pool);
    for i in 0..15 {
        repo.create(&customer(&format!("Ada{i}"), None)).await.unwrap();
    }

    let first = repo.get_list(&ListQuery::default()).await.unwrap();
    assert_eq!(first.count, 15);
    assert_eq!(first.items.len(), 10);

    let second = repo.get_list(&ListQuery::new(10, 10, None)).await.unwrap();
    assert_eq!(second.count, 15);
    assert_eq!(second.items.len(), 5);

    let past_end = repo.get_list(&ListQuery::new(100, 10, None)).await.unwrap();
    assert_eq!(past_end.count, 15);
    assert!(past_end.items.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_list_count_consistent_with_concurrent_inserts(pool: PgPool) {
    let writer_pool = pool.clone();
    let writer = tokio::spawn(async move {
        let repo = Repository::<Category>::new(&writer_pool);
        for i in 0..200 {
            repo.create(&CategoryInput {
                category_name: format!("Category {i}"),
            })
            .await
            .unwrap();
        }
    });

    let repo = Repository::<Category>::new(&pool);
    while !writer.is_finished() {
        let page = repo.get_list(&ListQuery::new(0, 1000, None)).await.unwrap();
        assert!(
            page.count >= i64::try_from(page.items.len()).unwrap(),
            "count {} below page size {}",
            page.count,
            page.items.len()
        );
    }
    writer.await.unwrap();

    let page = repo.get_list(&ListQuery::new(0, 1000, None)).await.unwrap();
    assert_eq!(page.count, 200);
    assert_eq!(page.items.len(), 200);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_list_search_is_case_insensitive_and_literal(pool: PgPool) {
    let repo = Repository::<Customer>::new(&pool);
    repo.create(&customer("Ada", Some("ada@example.com"))).await.unwrap();
    repo.create(&customer("Grace", Some("grace@example.com"))).await.unwrap();
    repo.create(&customer("100%", None)).await.unwrap();

    let result = repo
        .get_list(&ListQuery::default().with_search("ADA"))
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.items[0].first_name, "Ada");

    let result = repo
        .get_list(&ListQuery::default().with_search("%"))
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.items[0].first_name, "100%");

    let result = repo
        .get_list(&ListQuery::default().with_search("x' OR '1'='1"))
        .await
        .unwrap();
    assert_eq!(result.count, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_unique_violation_is_conflict(pool: PgPool) {
    let repo = Repository::<Code>::new(&pool);
    let input = CodeInput {
        code_name: "SPRING".to_owned(),
        discount: Decimal::new(10, 0),
        discount_type: DiscountType::Percent,
        valid_until: None,
    };

    let id = repo.create(&input).await.unwrap();
    assert_eq!(repo.get_by_id(id).await.unwrap().discount_type, DiscountType::Percent);
    assert!(matches!(repo.create(&input).await, Err(RepositoryError::Conflict(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_foreign_key_violation_is_validation(pool: PgPool) {
    let result = Repository::<Product>::new(&pool)
        .create(&ProductInput {
            product_name: "Orphan".to_owned(),
            brand_id: retail_core::BrandId::generate(),
            category_id: retail_core::CategoryId::generate(),
            model_year: 2024,
            list_price: Decimal::ONE,
        })
        .await;

    assert!(matches!(result, Err(RepositoryError::Validation(_))));
}

// =============================================================================
// Credential Store
// =============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_user_lookup_by_id_and_login(pool: PgPool) {
    let users = UserRepository::new(&pool);
    let id = users.create(&new_user("alice")).await.unwrap();

    let by_id = users.get(&UserKey::Id(id)).await.unwrap();
    let by_login = users.get(&UserKey::Login("alice".to_owned())).await.unwrap();
    assert_eq!(by_id, by_login);

    let (user, hash) = users.get_password_hash("alice").await.unwrap().unwrap();
    assert_eq!(user.user_id, id);
    assert!(hash.starts_with("$argon2id$"));

    assert!(users.get_password_hash("nobody").await.unwrap().is_none());
    assert!(matches!(
        users.get(&UserKey::Login("nobody".to_owned())).await,
        Err(RepositoryError::NotFound)
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_duplicate_login_is_conflict(pool: PgPool) {
    let users = UserRepository::new(&pool);
    users.create(&new_user("alice")).await.unwrap();

    let result = users.create(&new_user("alice")).await;
    assert!(matches!(result, Err(RepositoryError::Conflict(msg)) if msg.contains("login")));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_user_list_searches_login(pool: PgPool) {
    let users = UserRepository::new(&pool);
    users.create(&new_user("alice")).await.unwrap();
    users.create(&new_user("bob")).await.unwrap();

    let result = users
        .get_list(&ListQuery::default().with_search("bo"))
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.items[0].login, "bob");
}

// =============================================================================
// Orders
// =============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_order_total_sum(pool: PgPool) {
    let product = seed_product(&pool).await;
    let order = seed_order(&pool).await;
    let orders = OrderRepository::new(&pool);

    assert_eq!(orders.total_sum(order).await.unwrap(), Decimal::ZERO);

    let items = Repository::<OrderItem>::new(&pool);
    items
        .create(&OrderItemInput {
            order_id: order,
            product_id: product,
            quantity: 2,
            list_price: Decimal::new(10_000, 2),
            discount: Decimal::new(20, 2),
        })
        .await
        .unwrap();
    items
        .create(&OrderItemInput {
            order_id: order,
            product_id: product,
            quantity: 1,
            list_price: Decimal::new(5_000, 2),
            discount: Decimal::ZERO,
        })
        .await
        .unwrap();

    // 2 * 100 * 0.8 + 1 * 50 * 1
    assert_eq!(orders.total_sum(order).await.unwrap().normalize(), Decimal::new(210, 0));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_total_sum_of_missing_order_is_not_found(pool: PgPool) {
    let result = OrderRepository::new(&pool).total_sum(OrderId::generate()).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_order_status_out_of_range_is_validation(pool: PgPool) {
    let order = seed_order(&pool).await;
    let repo = Repository::<Order>::new(&pool);
    let mut input = {
        let row = repo.get_by_id(order).await.unwrap();
        OrderInput {
            customer_id: row.customer_id,
            order_status: row.order_status,
            order_date: row.order_date,
            required_date: row.required_date,
            shipped_date: row.shipped_date,
            store_id: row.store_id,
            staff_id: row.staff_id,
        }
    };
    input.order_status = 9;

    assert!(matches!(
        repo.update(order, &input).await,
        Err(RepositoryError::Validation(_))
    ));
}
