//! Admin tables: products, categories, users and orders.
//!
//! Every command goes through [`AdminClient::connect`], so a non-admin
//! session fails before any request is made.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use shopfront_admin::{AdminClient, ImageUpload, Removal, delete_tolerant};
use shopfront_core::{
    CategoryId, CategoryInput, Email, OrderId, OrderStatus, ProductId, ProductInput, Role, UserId,
    UserInput, parse_price,
};
use shopfront_storefront::{ApiClient, PageView, catalog::paginate};

use super::CommandResult;
use crate::output;

#[derive(Subcommand)]
pub enum AdminArea {
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
pub enum ProductAction {
    /// List products (all pages unless --page is given)
    List {
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Update a product; omitted fields keep their current value
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete { id: ProductId },
}

#[derive(Args)]
pub struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long, value_parser = parse_price)]
    price: Option<Decimal>,
    #[arg(long)]
    stock: Option<i64>,
    #[arg(long)]
    category: Option<CategoryId>,
    #[arg(long)]
    description: Option<String>,
    /// Image file to upload
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories
    List,
    /// Create a category
    Create {
        name: String,
        /// Derived from the name when omitted
        #[arg(long)]
        slug: Option<String>,
    },
    /// Rename a category
    Update {
        id: CategoryId,
        name: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Delete a category
    Delete { id: CategoryId },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// List users
    List,
    /// Create a user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Email,
        #[arg(long, env = "SHOPFRONT_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "user")]
        role: Role,
        #[command(flatten)]
        contact: ContactFields,
    },
    /// Update a user; omitted fields keep their current value
    Update {
        id: UserId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<Email>,
        /// New password; the current one is kept when omitted
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[command(flatten)]
        contact: ContactFields,
    },
    /// Delete a user
    Delete { id: UserId },
}

#[derive(Args)]
pub struct ContactFields {
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// List every customer's orders
    List,
    /// Change an order's status
    Status { id: OrderId, status: OrderStatus },
    /// Delete an order
    Delete { id: OrderId },
}

pub async fn run(api: &ApiClient, page_size: usize, area: AdminArea) -> CommandResult {
    let admin = AdminClient::connect(api.clone()).await?;
    match area {
        AdminArea::Products { action } => products(&admin, page_size, action).await,
        AdminArea::Categories { action } => categories(&admin, action).await,
        AdminArea::Users { action } => users(&admin, action).await,
        AdminArea::Orders { action } => orders(&admin, action).await,
    }
}

async fn image(path: Option<PathBuf>) -> Result<Option<ImageUpload>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(ImageUpload::from_path(path).await?)),
        None => Ok(None),
    }
}

fn report(what: &str, removal: Removal) {
    match removal {
        Removal::Deleted => output::message(&format!("Deleted {what}.")),
        Removal::AlreadyGone => output::message(&format!("{what} was already gone.")),
    }
}

async fn products(admin: &AdminClient, page_size: usize, action: ProductAction) -> CommandResult {
    match action {
        ProductAction::List { page: Some(page) } => {
            let page = admin.list_products(page).await?;
            output::products(&PageView {
                current_page: page.current_page as usize,
                last_page: page.last_page as usize,
                total: usize::try_from(page.total)?,
                items: page.items,
            });
        }
        ProductAction::List { page: None } => {
            let all = admin.all_products().await?;
            output::products(&paginate(&all, all.len().max(page_size), 1));
        }
        ProductAction::Create { fields } => {
            let input = ProductInput {
                name: fields.name.ok_or("--name is required")?,
                description: fields.description,
                price: fields.price.ok_or("--price is required")?,
                stock: fields.stock.unwrap_or(0),
                category_id: fields.category.ok_or("--category is required")?,
            };
            let product = admin.create_product(&input, image(fields.image).await?).await?;
            output::product(&product);
        }
        ProductAction::Update { id, fields } => {
            let current = admin.api().product(id).await?;
            let input = ProductInput {
                name: fields.name.unwrap_or(current.name),
                description: fields.description.or(current.description),
                price: fields.price.unwrap_or(current.price),
                stock: fields.stock.unwrap_or(current.stock),
                category_id: fields
                    .category
                    .or(current.category_id)
                    .ok_or("--category is required")?,
            };
            let product = admin
                .update_product(id, &input, image(fields.image).await?)
                .await?;
            output::product(&product);
        }
        ProductAction::Delete { id } => {
            let removal = delete_tolerant(id, |id| admin.delete_product(id)).await?;
            report(&format!("product {id}"), removal);
        }
    }
    Ok(())
}

async fn categories(admin: &AdminClient, action: CategoryAction) -> CommandResult {
    match action {
        CategoryAction::List => output::categories(&admin.list_categories().await?),
        CategoryAction::Create { name, slug } => {
            let category = admin
                .create_category(&CategoryInput::new(&name, slug.as_deref()))
                .await?;
            output::categories(&[category]);
        }
        CategoryAction::Update { id, name, slug } => {
            let category = admin
                .update_category(id, &CategoryInput::new(&name, slug.as_deref()))
                .await?;
            output::categories(&[category]);
        }
        CategoryAction::Delete { id } => {
            let removal = delete_tolerant(id, |id| admin.delete_category(id)).await?;
            report(&format!("category {id}"), removal);
        }
    }
    Ok(())
}

async fn users(admin: &AdminClient, action: UserAction) -> CommandResult {
    match action {
        UserAction::List => output::users(&admin.list_users().await?),
        UserAction::Create {
            name,
            email,
            password,
            role,
            contact,
        } => {
            let user = admin
                .create_user(&UserInput {
                    name,
                    email,
                    password: Some(password),
                    role,
                    phone: contact.phone,
                    address: contact.address,
                    city: contact.city,
                })
                .await?;
            output::user(&user);
        }
        UserAction::Update {
            id,
            name,
            email,
            password,
            role,
            contact,
        } => {
            let current = admin.user(id).await?;
            let email = match email {
                Some(email) => email,
                None => current.email.parse()?,
            };
            let user = admin
                .update_user(
                    id,
                    &UserInput {
                        name: name.unwrap_or(current.name),
                        email,
                        password,
                        role: role.unwrap_or(current.role),
                        phone: contact.phone.or(current.phone),
                        address: contact.address.or(current.address),
                        city: contact.city.or(current.city),
                    },
                )
                .await?;
            output::user(&user);
        }
        UserAction::Delete { id } => {
            let removal = delete_tolerant(id, |id| admin.delete_user(id)).await?;
            report(&format!("user {id}"), removal);
        }
    }
    Ok(())
}

async fn orders(admin: &AdminClient, action: OrderAction) -> CommandResult {
    match action {
        OrderAction::List => output::orders(&admin.list_orders().await?),
        OrderAction::Status { id, status } => {
            let order = admin.update_order_status(id, status).await?;
            output::message(&format!("Order #{} is now {}.", order.id, order.status));
        }
        OrderAction::Delete { id } => {
            let removal = delete_tolerant(id, |id| admin.delete_order(id)).await?;
            report(&format!("order {id}"), removal);
        }
    }
    Ok(())
}
