//! Plain-text build summary for sharing.

use crate::cart::Cart;
use crate::power::total_price;

/// One line per item, `[Category] Name xQty = line total`, then the grand total.
pub fn render_share_text(cart: &Cart) -> String {
    let mut out = String::new();
    for item in cart.items() {
        out.push_str(&format!(
            "[{}] {} x{} = {}\n",
            item.category().label(),
            item.product.name,
            item.quantity,
            item.line_total()
        ));
    }
    out.push_str(&format!("Total: {}\n", total_price(cart.items())));
    out
}
