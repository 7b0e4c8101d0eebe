//! # Routes
//!
//! Axum router configuration for the marketplace API.
//!
//! Guards are attached per method router with `route_layer`. Unknown paths
//! fall through to the JSON 404 and unsupported methods to the JSON 405,
//! neither of them behind a guard.

use crate::guard::{require_role, require_token, RoleGate};
use crate::handlers::{self, advertisements, auth, carts, categories, medicines, payments, users};
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put, MethodRouter},
    Router,
};
use medi_core::Role;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Create the main application router
///
/// Guards:
/// - public: `/`, `/health`, `/jwt`, user signup and lookup, catalogue reads
/// - token: `/create-payment-intent`
/// - admin: user management, categories, revenue, payment status
/// - seller: own listings, advertisements, seller revenue
/// - user: cart and payment records
/// - seller or admin: `POST /medicine`
pub fn create_router(state: AppState) -> Router {
    let guard = Guards::new(&state);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Auth & users
        .route("/jwt", post(auth::issue_token))
        .route("/user", post(users::create_user))
        .route(
            "/user/{email}",
            get(users::get_user).merge(guard.admin(patch(users::update_user))),
        )
        .route("/users", guard.admin(get(users::list_users)))
        // Medicines
        .route("/medicine", guard.seller_or_admin(post(medicines::create_medicine)))
        .route("/medicines", get(medicines::list_medicines))
        .route("/medicines/{email}", guard.seller(get(medicines::seller_medicines)))
        .route("/mediDetails/{id}", get(medicines::get_medicine))
        .route("/discount", get(medicines::discounted_medicines))
        // Categories
        .route("/category", guard.admin(post(categories::create_category)))
        .route(
            "/category/{id}",
            guard.admin(put(categories::replace_category).delete(categories::delete_category)),
        )
        .route("/categories", get(categories::list_categories))
        .route("/categories/{email}", guard.admin(get(categories::admin_categories)))
        .route("/ctgDetails/{id}", get(categories::get_category))
        .route(
            "/categoryDetails/{categoryName}",
            get(categories::categories_by_name),
        )
        .route(
            "/specificCategories/{categoryName}",
            get(categories::categories_by_name),
        )
        // Advertisements
        .route(
            "/advertisement",
            guard.seller(post(advertisements::create_advertisement)),
        )
        .route(
            "/advertisement/{id}",
            guard.admin(patch(advertisements::update_advertisement)),
        )
        .route(
            "/advertisements/{email}",
            guard.seller(get(advertisements::seller_advertisements)),
        )
        .route(
            "/sliderAdvertisement",
            get(advertisements::list_advertisements),
        )
        .route(
            "/manageAdvertisements",
            guard.admin(get(advertisements::list_advertisements)),
        )
        // Carts
        .route("/selectedCart", guard.user(post(carts::add_to_cart)))
        .route("/selectedCarts/{email}", guard.user(get(carts::user_cart)))
        .route("/massUnit/{id}", guard.user(patch(carts::update_mass_unit)))
        .route("/cart/{id}", guard.user(delete(carts::delete_cart_item)))
        // Payments
        .route(
            "/create-payment-intent",
            guard.token(post(payments::create_payment_intent)),
        )
        .route("/payment", guard.user(post(payments::save_payment)))
        .route("/seles", guard.admin(get(payments::paid_payments)))
        .route("/sales", guard.admin(get(payments::paid_payments)))
        .route("/adminPaidRevenue", guard.admin(get(payments::paid_payments)))
        .route(
            "/adminPendingRevenue",
            guard.admin(get(payments::pending_payments)),
        )
        .route(
            "/adminPaymentHistory",
            guard.admin(get(payments::admin_payment_history)),
        )
        .route(
            "/sellerPaidRevenue/{email}",
            guard.seller(get(payments::seller_paid_revenue)),
        )
        .route(
            "/sellerPendingRevenue/{email}",
            guard.seller(get(payments::seller_pending_revenue)),
        )
        .route(
            "/sellerPaymentHistory",
            guard.seller(get(payments::seller_payment_history)),
        )
        .route(
            "/userPaymentHistory/{email}",
            guard.user(get(payments::user_payment_history)),
        )
        .route(
            "/paymentStatus/{id}",
            guard.admin(patch(payments::update_payment_status)),
        )
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.allowed_origins)),
        )
        .with_state(state)
}

/// Wraps method routers in the auth middleware.
///
/// Only the handlers are wrapped, not the method fallback, so an unsupported
/// method on a guarded path answers 405 before any token check.
struct Guards {
    state: AppState,
}

impl Guards {
    fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    fn token(&self, routes: MethodRouter<AppState>) -> MethodRouter<AppState> {
        routes.route_layer(from_fn_with_state(self.state.clone(), require_token))
    }

    // Layers run outside-in, so the token check wraps the role check.
    fn role(
        &self,
        routes: MethodRouter<AppState>,
        admitted: &'static [Role],
    ) -> MethodRouter<AppState> {
        let gate = RoleGate::new(self.state.clone(), admitted);
        self.token(routes.route_layer(from_fn_with_state(gate, require_role)))
    }

    fn admin(&self, routes: MethodRouter<AppState>) -> MethodRouter<AppState> {
        self.role(routes, RoleGate::ADMIN)
    }

    fn seller(&self, routes: MethodRouter<AppState>) -> MethodRouter<AppState> {
        self.role(routes, RoleGate::SELLER)
    }

    fn user(&self, routes: MethodRouter<AppState>) -> MethodRouter<AppState> {
        self.role(routes, RoleGate::USER)
    }

    fn seller_or_admin(&self, routes: MethodRouter<AppState>) -> MethodRouter<AppState> {
        self.role(routes, RoleGate::SELLER_OR_ADMIN)
    }
}

/// CORS for the configured origins; any origin when none are set
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}
