//! WhatsApp deep links handing orders and restock requests over to the merchant.

use crate::domain::types::{Order, OrderItem, Product, User};

const RULE: &str = "-----------------------------";

/// Builds `https://wa.me/<merchant>?text=...` links.
#[derive(Debug, Clone)]
pub struct WhatsAppHandoff {
    /// Country code and number, digits only.
    pub merchant_number: String,
    /// Origin used for product links inside messages.
    pub public_base_url: String,
    pub shop_name: String,
}

impl WhatsAppHandoff {
    pub fn link(&self, message: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.merchant_number,
            urlencoding::encode(message)
        )
    }

    pub fn product_url(&self, product_id: impl std::fmt::Display) -> String {
        format!(
            "{}/product/{product_id}",
            self.public_base_url.trim_end_matches('/')
        )
    }

    pub fn order_link(&self, order: &Order) -> String {
        self.link(&self.order_message(order))
    }

    pub fn restock_link(&self, product: &Product, requester: Option<&User>) -> String {
        self.link(&self.restock_request_message(product, requester))
    }

    pub fn order_message(&self, order: &Order) -> String {
        let customer = &order.customer;
        let mut header = vec![
            format!("*Nouvelle Commande de {}*", self.shop_name),
            RULE.to_owned(),
            format!("*Client:* {} {}", customer.first_name, customer.last_name),
            format!("*Téléphone:* {}", customer.phone),
        ];
        if let Some(address) = &customer.address {
            header.push(format!("*Adresse:* {address}"));
        }
        header.push(RULE.to_owned());

        let items = order
            .items
            .iter()
            .map(|item| self.item_block(item))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "{}\n\n*Détails de la commande:*\n\n{items}\n\n{RULE}\n*TOTAL: {} FCFA*\n\nMerci de confirmer la commande et de me communiquer les modalités de paiement et de livraison.",
            header.join("\n"),
            format_fcfa(order.total),
        )
    }

    fn item_block(&self, item: &OrderItem) -> String {
        let mut lines = vec![
            format!("*{}* (x{})", item.name, item.quantity),
            format!("- Prix: {} FCFA", format_fcfa(item.line_total())),
            format!("- Lien du produit: {}", self.product_url(item.product_id)),
        ];
        if let Some(image) = &item.image_url {
            lines.push(format!("- Lien de l'image: {image}"));
        }
        lines.join("\n")
    }

    pub fn restock_request_message(&self, product: &Product, requester: Option<&User>) -> String {
        let intro = match requester {
            Some(user) => format!(
                "Bonjour, c'est {} {}. Je souhaite être prévenu(e) lorsque le produit \"{}\" sera de nouveau disponible.",
                user.first_name, user.last_name, product.name
            ),
            None => format!(
                "Bonjour, je suis intéressé(e) par le produit \"{}\" qui est en rupture de stock. Veuillez me prévenir quand il sera disponible.",
                product.name
            ),
        };
        let mut info = format!("Lien du produit: {}", self.product_url(product.id));
        if let Some(image) = product.first_image() {
            info.push_str(&format!("\nLien de l'image: {image}"));
        }
        format!("{intro}\n\n{info}")
    }
}

/// Format an FCFA amount with French digit grouping (`45 000`, narrow no-break space).
pub fn format_fcfa(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{202f}');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
