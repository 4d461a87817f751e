use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartLineDto, CartView, SyncCartRequest, UpdateCartItemRequest},
        delivery::{AssignCourierRequest, CancelDeliveryRequest, DeliveredResponse, MarkDeliveredRequest},
        notifications::NotificationList,
        orders::{CheckoutRequest, CheckoutResponse, OrderList, OrderWithItems},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        recipes::{
            CommentRequest, CommentThread, CommentThreadList, CreateRecipeRequest,
            EditCommentRequest, ReactionRequest, ReactionSummary, RecipeDetail, RecipeList,
            RejectRecipeRequest, ReviewList, ReviewRequest,
        },
    },
    models::{
        Notification, Order, OrderItem, Product, ProductLabel, ProofOfDelivery, Recipe,
        RecipeComment, RecipeReview, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, cart, delivery, health, notifications, orders, params,
        products as product_routes, recipes,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::create_product,
        product_routes::update_product,
        product_routes::delete_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::sync_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::cancel_order,
        delivery::list_assigned,
        delivery::accept_delivery,
        delivery::mark_delivered,
        delivery::cancel_delivery,
        delivery::settle_payment,
        delivery::lookup_by_qr,
        recipes::list_recipes,
        recipes::get_recipe,
        recipes::create_recipe,
        recipes::submit_recipe,
        recipes::list_reviews,
        recipes::create_review,
        recipes::update_review,
        recipes::delete_review,
        recipes::list_comments,
        recipes::create_comment,
        recipes::edit_comment,
        recipes::delete_comment,
        recipes::react_to_recipe,
        recipes::react_to_comment,
        notifications::list_notifications,
        notifications::mark_read,
        notifications::mark_all_read,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::update_payment_status,
        admin::assign_courier,
        admin::mark_label_printed,
        admin::list_low_stock,
        admin::adjust_inventory,
        admin::start_recipe_review,
        admin::approve_recipe,
        admin::reject_recipe
    ),
    components(
        schemas(
            User,
            Product,
            Order,
            OrderItem,
            ProductLabel,
            ProofOfDelivery,
            Recipe,
            RecipeReview,
            RecipeComment,
            Notification,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            AddToCartRequest,
            UpdateCartItemRequest,
            SyncCartRequest,
            CartLineDto,
            CartView,
            CheckoutRequest,
            CheckoutResponse,
            OrderList,
            OrderWithItems,
            MarkDeliveredRequest,
            CancelDeliveryRequest,
            AssignCourierRequest,
            DeliveredResponse,
            CreateRecipeRequest,
            ReviewRequest,
            CommentRequest,
            EditCommentRequest,
            ReactionRequest,
            RejectRecipeRequest,
            ReactionSummary,
            CommentThread,
            CommentThreadList,
            RecipeList,
            RecipeDetail,
            ReviewList,
            NotificationList,
            admin::UpdateOrderStatusRequest,
            admin::UpdatePaymentStatusRequest,
            admin::InventoryAdjustRequest,
            admin::LowStockQuery,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::RecipeQuery,
            params::NotificationQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<DeliveredResponse>,
            ApiResponse<RecipeDetail>,
            ApiResponse<ReactionSummary>,
            ApiResponse<NotificationList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order and checkout endpoints"),
        (name = "Delivery", description = "Courier endpoints"),
        (name = "Recipes", description = "Recipe, review and comment endpoints"),
        (name = "Notifications", description = "Notification endpoints"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
