pub mod audit_logs;
pub mod cart_items;
pub mod comment_reactions;
pub mod notifications;
pub mod order_items;
pub mod orders;
pub mod product_labels;
pub mod products;
pub mod proof_of_deliveries;
pub mod recipe_comments;
pub mod recipe_reactions;
pub mod recipe_reviews;
pub mod recipes;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use comment_reactions::Entity as CommentReactions;
pub use notifications::Entity as Notifications;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_labels::Entity as ProductLabels;
pub use products::Entity as Products;
pub use proof_of_deliveries::Entity as ProofOfDeliveries;
pub use recipe_comments::Entity as RecipeComments;
pub use recipe_reactions::Entity as RecipeReactions;
pub use recipe_reviews::Entity as RecipeReviews;
pub use recipes::Entity as Recipes;
pub use users::Entity as Users;
