use crate::db::models::Garment;

pub const PARSE_GARMENT_SYSTEM: &str = "You are a wardrobe cataloguing assistant. \
Read the user's description of a single clothing item and extract three fields:\n\
- \"name\": the kind of garment in one or two words, capitalized (e.g. \"Trousers\", \"Denim Jacket\")\n\
- \"category\": one of Top, Bottom, Outerwear, Dress, Shoes, Accessory\n\
- \"color\": the main color as a short name (e.g. \"Navy\", \"Black/White\")\n\n\
Output ONLY a JSON object of the form {\"name\":\"...\",\"category\":\"...\",\"color\":\"...\"}. \
Use an empty string for a field you cannot determine. No commentary.";

pub const OUTFIT_IDEA_SYSTEM: &str = "You are a friendly personal stylist. \
The user describes a garment, an occasion, or a look they want. \
Suggest one concrete outfit idea in a short paragraph: what to pair it with, \
colors that work, and one accessory. Plain text, no lists, no markdown headings.";

pub const CLOSET_OUTFIT_SYSTEM: &str = "You are a personal stylist working only with \
the user's own closet. Build one outfit from the items listed below. \
Use only listed items, refer to them by name, and explain in two or three sentences \
why they work together. If an item does not fit, say which one and why. \
Plain text, no markdown.";

pub fn parse_garment_message(text: &str) -> String {
    format!("Item description: {}", text.trim())
}

pub fn outfit_idea_message(text: &str) -> String {
    text.trim().to_string()
}

/// Compact one-line-per-item listing of the selected garments.
pub fn closet_message(garments: &[Garment]) -> String {
    let mut out = String::with_capacity(32 + garments.len() * 48);
    out.push_str("CLOSET ITEMS:\n");
    for g in garments {
        out.push_str("- ");
        out.push_str(&g.name);
        out.push_str(" (category: ");
        out.push_str(&g.category);
        out.push_str(", color: ");
        out.push_str(&g.color);
        out.push_str(")\n");
    }
    out
}
