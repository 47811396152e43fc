//! Route definitions for the Farm Market API

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::require_admin, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/farmer", farmer_routes())
        .nest("/buyer", buyer_routes())
        .nest("/product", product_routes())
        .nest("/order", order_routes())
        .nest("/admin", admin_routes(state))
}

/// Farmer routes (public); approval goes through /admin
fn farmer_routes() -> Router<AppState> {
    use handlers::farmer;

    Router::new()
        .route("/registration", post(farmer::register))
        .route("/checkfarmerlogin", post(farmer::login))
        .route("/pending", get(farmer::list_pending))
        .route("/reject/:id", put(farmer::reject))
        .route("/delete", delete(farmer::delete))
        .route("/updatefarmer", put(farmer::update_profile))
        .route("/viewallfarmers", get(farmer::list_all))
        .route("/fforgot-password", post(farmer::forgot_password))
        .route("/freset-password", post(farmer::reset_password))
        .route("/:farmer_id", get(farmer::get_farmer))
        .route("/:farmer_id/products/count", get(farmer::total_products))
        .route("/:farmer_id/orders/count", get(farmer::total_orders))
        .route("/:farmer_id/orders", get(farmer::orders))
        .route("/:farmer_id/revenue", get(farmer::total_revenue))
        .route("/:farmer_id/sales-data", get(farmer::sales_data))
}

/// Buyer routes (public)
fn buyer_routes() -> Router<AppState> {
    use handlers::buyer;

    Router::new()
        .route("/registration", post(buyer::register))
        .route("/checkbuyerlogin", post(buyer::login))
        .route("/updatebuyer", put(buyer::update_profile))
        .route("/:buyer_id", get(buyer::get_buyer))
        .route("/:buyer_id/orders", get(buyer::orders))
}

/// Product catalog routes (public)
fn product_routes() -> Router<AppState> {
    use handlers::product;

    Router::new()
        .route("/add", post(product::add_product))
        .route("/all", get(product::list_products))
        .route("/category/:category", get(product::list_by_category))
        .route("/farmer/:farmer_id", get(product::list_by_farmer))
        .route(
            "/:product_id",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
}

/// Order routes (public)
fn order_routes() -> Router<AppState> {
    use handlers::order;

    Router::new()
        .route("/create", post(order::create_order))
        .route("/payment/confirm", post(order::confirm_payment))
        .route("/payment/:payment_id", get(order::get_by_payment))
}

/// Admin routes; everything but login needs an admin token
fn admin_routes(state: AppState) -> Router<AppState> {
    use handlers::admin;

    let protected = Router::new()
        .route("/addfarmer", post(admin::add_farmer))
        .route("/viewallfarmers", get(admin::list_farmers))
        .route("/viewallbuyers", get(admin::list_buyers))
        .route("/pendingfarmers", get(admin::pending_farmers))
        .route("/approvefarmer/:id", put(admin::approve_farmer))
        .route("/rejectfarmer/:id", put(admin::reject_farmer))
        .route("/deletefarmer", delete(admin::delete_farmer))
        .route("/deletebuyer", delete(admin::delete_buyer))
        .route("/stats", get(admin::dashboard_stats))
        .route("/revenue", get(admin::total_revenue))
        .route("/sales-data", get(admin::sales_data))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/checkadminlogin", post(admin::login))
        .merge(protected)
}
