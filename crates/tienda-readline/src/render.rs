//! Terminal rendering of shop views.

use colored::Colorize;
use tienda_application::{CartPanel, CatalogPage, Notice, NoticeLevel, ShopView};
use tienda_core::session::MessageRole;

/// Prints what changed after an action: any product list, the assistant
/// reply when the turn produced one, and notices.
pub fn print_view(view: &ShopView) {
    if let Some(page) = &view.catalog {
        print_catalog(page);
    }
    if let Some(reply) = &view.reply {
        print_reply(reply);
    }
    print_notices(&view.notices);
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        let line = match notice.level {
            NoticeLevel::Info => notice.text.bright_black(),
            NoticeLevel::Success => notice.text.green(),
            NoticeLevel::Warning => notice.text.yellow(),
            NoticeLevel::Error => notice.text.red(),
        };
        println!("{line}");
    }
}

pub fn print_catalog(page: &CatalogPage) {
    let title = if page.query.is_empty() {
        "Lista de precios".to_string()
    } else {
        format!("Resultados para \"{}\"", page.query)
    };
    println!(
        "{} {}",
        title.bright_magenta().bold(),
        format!("(actualizada {})", page.fetched_at.format("%H:%M")).bright_black()
    );
    if page.stale {
        println!("{}", "La lista puede estar desactualizada.".yellow());
    }
    for card in &page.cards {
        println!(
            "  {} {}  {}  {}",
            format!("[{}]", card.row).bright_cyan(),
            card.name.bold(),
            format!("${}", card.price).green(),
            card.stock.bright_black()
        );
    }
    if page.total_matches > page.cards.len() {
        println!(
            "{}",
            format!(
                "Mostrando {} de {}. Buscá por nombre para ver el resto.",
                page.cards.len(),
                page.total_matches
            )
            .bright_black()
        );
    }
}

pub fn print_cart(cart: &CartPanel) {
    if cart.items.is_empty() {
        println!("{}", "🛒 Carrito vacío".bright_black());
        return;
    }
    println!(
        "{}",
        format!("🛒 Carrito ({} ítems)", cart.count()).bright_magenta().bold()
    );
    for line in cart.order_text.lines() {
        println!("  {line}");
    }
    if cart.estimate.priced_items > 0 {
        let mut estimate = format!("Total estimado: ${}", format_amount(cart.estimate.amount));
        if cart.estimate.unpriced_items > 0 {
            estimate.push_str(&format!(
                " (sin contar {} ítems sin precio)",
                cart.estimate.unpriced_items
            ));
        }
        println!("  {}", estimate.bright_black());
    }
}

pub fn print_handoff(cart: &CartPanel) {
    if let Some(handoff) = &cart.handoff {
        println!("{}", "Mensaje del pedido:".bright_magenta().bold());
        for line in handoff.message.lines() {
            println!("  {line}");
        }
        println!("{}", "Abrí este enlace para enviarlo por WhatsApp:".bright_black());
        println!("{}", handoff.url.bright_cyan().underline());
    }
}

pub fn print_transcript(view: &ShopView) {
    for message in &view.transcript {
        match message.role {
            MessageRole::User => println!("{}", format!("> {}", message.content).green()),
            MessageRole::Assistant => print_reply(&message.content),
        }
    }
}

pub fn print_reply(content: &str) {
    for line in content.lines() {
        println!("{}", line.bright_blue());
    }
}

/// "1.800,50" style, matching how the price list writes amounts.
fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let (sign, cents) = if cents < 0 { ("-", -cents) } else { ("", cents) };
    let units = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped},{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0,00");
        assert_eq!(format_amount(300.0), "300,00");
        assert_eq!(format_amount(1800.0), "1.800,00");
        assert_eq!(format_amount(2300.5), "2.300,50");
        assert_eq!(format_amount(1234567.891), "1.234.567,89");
    }
}
