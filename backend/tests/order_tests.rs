//! Order, product catalog and buyer account tests

mod common;

use rust_decimal::Decimal;
use shared::models::FarmerStatus;

use common::{TestContext, PASSWORD};
use farm_market::error::AppError;
use farm_market::services::buyer::{
    BuyerLoginInput, BuyerService, RegisterBuyerInput, UpdateBuyerInput,
};
use farm_market::services::order::{CreateOrderInput, OrderService, PaymentConfirmation};
use farm_market::services::product::{ProductInput, ProductService};

fn checkout(buyer_id: i64, farmer_id: i64, product_id: i64, amount: i64) -> CreateOrderInput {
    CreateOrderInput {
        quantity: 2,
        amount: Decimal::from(amount),
        status: None,
        address: Some("14 Mandi Road, Pune".to_string()),
        buyer_id,
        farmer_id,
        product_id,
        payment_id: None,
    }
}

fn product_input(farmer_id: i64, name: &str, cost: Decimal) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        category: "Fruits".to_string(),
        description: "Alphonso, hand picked".to_string(),
        cost,
        farmer_id,
    }
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_new_order_defaults_to_pending() {
    let ctx = TestContext::new();
    let farmer = ctx.seed_farmer("asha", FarmerStatus::Approved).await;
    let buyer = ctx.seed_buyer("Meera").await;
    let product = ctx.seed_product(farmer.id, "Mangoes", 120).await;

    let order = OrderService::new(&ctx.repos)
        .create_order(checkout(buyer.id, farmer.id, product.id, 240))
        .await
        .unwrap();

    assert_eq!(order.status, "Pending");
    assert!(!order.is_completed());
    assert_eq!(order.amount, Decimal::from(240));
    assert!(order.payment_id.is_none());
}

#[tokio::test]
async fn test_payment_completes_order() {
    let ctx = TestContext::new();
    let farmer = ctx.seed_farmer("asha", FarmerStatus::Approved).await;
    let buyer = ctx.seed_buyer("Meera").await;
    let product = ctx.seed_product(farmer.id, "Mangoes", 120).await;
    let orders = OrderService::new(&ctx.repos);
    let order = orders
        .create_order(checkout(buyer.id, farmer.id, product.id, 240))
        .await
        .unwrap();

    let paid = orders
        .record_payment(PaymentConfirmation {
            order_id: order.id,
            payment_id: "pay_Nx81kQ".to_string(),
        })
        .await
        .unwrap();

    assert!(paid.is_completed());
    assert_eq!(orders.find_by_payment_id("pay_Nx81kQ").await.unwrap().id, order.id);
}

#[tokio::test]
async fn test_payment_for_unknown_order() {
    let ctx = TestContext::new();
    let result = OrderService::new(&ctx.repos)
        .record_payment(PaymentConfirmation {
            order_id: 31,
            payment_id: "pay_missing".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(resource)) if resource == "Order"));
}

#[tokio::test]
async fn test_orders_by_buyer_projection() {
    let ctx = TestContext::new();
    let farmer = ctx.seed_farmer("asha", FarmerStatus::Approved).await;
    let buyer = ctx.seed_buyer("Meera").await;
    let other_buyer = ctx.seed_buyer("Kiran").await;
    let product = ctx.seed_product(farmer.id, "Mangoes", 120).await;
    let orders = OrderService::new(&ctx.repos);
    orders
        .create_order(checkout(buyer.id, farmer.id, product.id, 240))
        .await
        .unwrap();
    orders
        .create_order(checkout(other_buyer.id, farmer.id, product.id, 120))
        .await
        .unwrap();

    let details = orders.orders_by_buyer(buyer.id).await.unwrap();

    assert_eq!(details.len(), 1);
    assert_eq!(details[0].product.id, product.id);
    assert_eq!(details[0].product.farmer_id, farmer.id);
    assert!(details[0].buyer_name.is_none());

    let json = serde_json::to_value(&details[0]).unwrap();
    assert!(json.get("buyerName").is_none());
    assert_eq!(json["product"]["name"], "Mangoes");
}

#[tokio::test]
async fn test_orders_by_unknown_buyer() {
    let ctx = TestContext::new();
    let result = OrderService::new(&ctx.repos).orders_by_buyer(404).await;
    assert!(matches!(result, Err(AppError::NotFound(resource)) if resource == "Buyer"));
}

#[tokio::test]
async fn test_orders_by_farmer_include_buyer() {
    let ctx = TestContext::new();
    let farmer = ctx.seed_farmer("asha", FarmerStatus::Approved).await;
    let buyer = ctx.seed_buyer("Meera").await;
    let product = ctx.seed_product(farmer.id, "Mangoes", 120).await;
    let orders = OrderService::new(&ctx.repos);
    orders
        .create_order(checkout(buyer.id, farmer.id, product.id, 240))
        .await
        .unwrap();

    let details = orders.orders_by_farmer(farmer.id).await.unwrap();

    assert_eq!(details.len(), 1);
    assert_eq!(details[0].buyer_name.as_deref(), Some("Meera"));
    assert_eq!(details[0].buyer_email.as_deref(), Some("meera@example.com"));

    // No existence check for farmers
    assert!(orders.orders_by_farmer(9_999).await.unwrap().is_empty());
}

// ============================================================================
// Product catalog
// ============================================================================

#[tokio::test]
async fn test_product_lifecycle() {
    let ctx = TestContext::new();
    let farmer = ctx.seed_farmer("asha", FarmerStatus::Approved).await;
    let products = ProductService::new(&ctx.repos);

    let product = products
        .add(product_input(farmer.id, "Mangoes", Decimal::new(14950, 2)))
        .await
        .unwrap();
    assert_eq!(products.list_by_farmer(farmer.id).await.unwrap().len(), 1);
    assert_eq!(products.list_by_category("fruits").await.unwrap().len(), 1);

    let updated = products
        .update(product.id, product_input(farmer.id, "Kesar Mangoes", Decimal::from(160)))
        .await
        .unwrap();
    assert_eq!(updated.name, "Kesar Mangoes");
    assert_eq!(products.get(product.id).await.unwrap().cost, Decimal::from(160));

    products.delete(product.id).await.unwrap();
    assert!(products.list_all().await.unwrap().is_empty());
    assert!(matches!(products.delete(product.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_product_needs_existing_farmer_and_positive_cost() {
    let ctx = TestContext::new();
    let farmer = ctx.seed_farmer("asha", FarmerStatus::Approved).await;
    let products = ProductService::new(&ctx.repos);

    let orphan = products
        .add(product_input(9_999, "Mangoes", Decimal::from(100)))
        .await;
    assert!(matches!(orphan, Err(AppError::NotFound(resource)) if resource == "Farmer"));

    let free = products
        .add(product_input(farmer.id, "Mangoes", Decimal::ZERO))
        .await;
    assert!(matches!(free, Err(AppError::Validation { field, .. }) if field == "cost"));
}

// ============================================================================
// Buyer accounts
// ============================================================================

#[tokio::test]
async fn test_buyer_register_login_and_update() {
    let ctx = TestContext::new();
    let buyers = BuyerService::new(&ctx.repos, &ctx.config);

    let buyer = buyers
        .register(RegisterBuyerInput {
            name: "Meera Joshi".to_string(),
            email: "Meera@Example.com".to_string(),
            password: PASSWORD.to_string(),
            mobile_no: "9123456780".to_string(),
            address: "14 Mandi Road, Pune".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(buyer.email, "meera@example.com");

    let session = buyers
        .login(BuyerLoginInput {
            email: "meera@example.com".to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.buyer.id, buyer.id);

    let updated = buyers
        .update_profile(UpdateBuyerInput {
            id: buyer.id,
            name: "Meera J".to_string(),
            mobile_no: "8123456789".to_string(),
            address: "2 Station Road, Nagpur".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(updated.email, "meera@example.com");
    assert_eq!(updated.address, "2 Station Road, Nagpur");
}

#[tokio::test]
async fn test_buyer_duplicate_email_and_bad_login() {
    let ctx = TestContext::new();
    let buyers = BuyerService::new(&ctx.repos, &ctx.config);
    ctx.seed_buyer("Meera").await;

    let duplicate = buyers
        .register(RegisterBuyerInput {
            name: "Another Meera".to_string(),
            email: "meera@example.com".to_string(),
            password: PASSWORD.to_string(),
            mobile_no: "9123456780".to_string(),
            address: "Elsewhere".to_string(),
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::DuplicateEntry(_))));

    let login = buyers
        .login(BuyerLoginInput {
            email: "meera@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await;
    assert!(matches!(login, Err(AppError::Unauthorized(_))));
}
