//! Plain-text tables on stdout.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use shopfront_core::{Cart, Category, Order, Product, User, format_price};
use shopfront_storefront::{LineView, PageView};

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

pub fn message(text: &str) {
    println!("{text}");
}

pub fn hint(text: &str) {
    eprintln!("{text}");
}

pub fn products(page: &PageView<Product>) {
    if page.items.is_empty() {
        println!("No products found.");
        return;
    }
    println!("{:>6}  {:<32}  {:<16}  {:>10}  {:>5}", "ID", "NAME", "CATEGORY", "PRICE", "STOCK");
    for p in &page.items {
        println!(
            "{:>6}  {:<32}  {:<16}  {:>10}  {:>5}",
            p.id,
            truncate(&p.name, 32),
            truncate(p.category_name().unwrap_or("-"), 16),
            format_price(p.price),
            p.stock
        );
    }
    println!(
        "Page {} of {} ({} products)",
        page.current_page, page.last_page, page.total
    );
}

pub fn product(p: &Product) {
    println!("#{} {}", p.id, p.name);
    println!("  Price:    {}", format_price(p.price));
    println!(
        "  Stock:    {}",
        if p.in_stock() {
            p.stock.to_string()
        } else {
            "out of stock".to_string()
        }
    );
    if let Some(category) = p.category_name() {
        println!("  Category: {category}");
    }
    if let Some(description) = &p.description {
        println!();
        println!("  {description}");
    }
}

pub fn categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories.");
        return;
    }
    println!("{:>6}  {:<24}  {:<24}", "ID", "NAME", "SLUG");
    for c in categories {
        println!(
            "{:>6}  {:<24}  {:<24}",
            c.id,
            truncate(&c.name, 24),
            truncate(&c.slug, 24)
        );
    }
}

pub fn cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    println!("{:>6}  {:<32}  {:>4}  {:>10}", "LINE", "PRODUCT", "QTY", "TOTAL");
    for item in &cart.items {
        let name = item
            .product
            .as_ref()
            .map_or_else(|| format!("product {}", item.product_id), |p| p.name.clone());
        println!(
            "{:>6}  {:<32}  {:>4}  {:>10}",
            item.id,
            truncate(&name, 32),
            item.quantity,
            format_price(item.line_total())
        );
    }
    println!(
        "{} items, subtotal {}",
        cart.item_count(),
        format_price(cart.subtotal())
    );
}

pub fn cart_line(line: &LineView) {
    let name = line
        .name
        .clone()
        .unwrap_or_else(|| format!("product {}", line.product_id));
    match &line.error {
        Some(error) => println!("{name}: quantity {} ({error})", line.quantity),
        None => println!("{name}: quantity {}", line.quantity),
    }
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders.");
        return;
    }
    println!(
        "{:>6}  {:<20}  {:<12}  {:>5}  {:>10}  {:<16}",
        "ID", "CUSTOMER", "STATUS", "ITEMS", "TOTAL", "PLACED"
    );
    for o in orders {
        let customer = o
            .user
            .as_ref()
            .map_or_else(|| format!("user {}", o.user_id), |u| u.name.clone());
        let placed = o
            .created_at
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "{:>6}  {:<20}  {:<12}  {:>5}  {:>10}  {:<16}",
            o.id,
            truncate(&customer, 20),
            o.status,
            o.items.len(),
            format_price(o.total),
            placed
        );
    }
}

pub fn order(o: &Order) {
    println!("Order #{} ({})", o.id, o.status);
    if let Some(placed) = o.created_at {
        println!("  Placed: {}", placed.format("%Y-%m-%d %H:%M UTC"));
    }
    for item in &o.items {
        let name = item
            .product
            .as_ref()
            .map_or_else(|| format!("product {}", item.product_id), |p| p.name.clone());
        println!(
            "  {:>3} x {:<32} {:>10}",
            item.quantity,
            truncate(&name, 32),
            format_price(item.line_total())
        );
    }
    println!("  Total: {}", format_price(o.total));
}

pub fn users(users: &[User]) {
    if users.is_empty() {
        println!("No users.");
        return;
    }
    println!("{:>6}  {:<24}  {:<32}  {:<6}", "ID", "NAME", "EMAIL", "ROLE");
    for u in users {
        println!(
            "{:>6}  {:<24}  {:<32}  {:<6}",
            u.id,
            truncate(&u.name, 24),
            truncate(&u.email, 32),
            u.role
        );
    }
}

pub fn user(u: &User) {
    println!("{} <{}> ({})", u.name, u.email, u.role);
    for (label, value) in [("Phone", &u.phone), ("Address", &u.address), ("City", &u.city)] {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Mug", 5), "Mug");
        assert_eq!(truncate("Ceramic mug", 5), "Cera…");
    }
}
