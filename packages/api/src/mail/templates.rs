use filigree_core::order::{Order, OrderItem};

fn format_amount(amount: i64) -> String {
    // Indian digit grouping, e.g. 1,25,000
    let digits = amount.abs().to_string();
    let mut grouped = String::new();
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        grouped.push(ch);
        let remaining = len - i - 1;
        if remaining > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            grouped.push(',');
        }
    }
    if amount < 0 {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

fn items_rows_html(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                r#"<tr>
    <td style="padding: 12px 0; border-bottom: 1px solid #ece5d8; color: #3d3528; font-size: 14px;">{} × {}</td>
    <td style="padding: 12px 0; border-bottom: 1px solid #ece5d8; color: #3d3528; font-size: 14px; text-align: right;">{}</td>
</tr>"#,
                item.quantity,
                item.name,
                format_amount(item.price * item.quantity as i64)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn items_lines_text(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "  {} x {} - {}",
                item.quantity,
                item.name,
                format_amount(item.price * item.quantity as i64)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Order confirmation sent after a successful payment. Returns (html, text).
pub fn order_confirmation(order: &Order, tracking_url: &str) -> (String, String) {
    let items_html = items_rows_html(&order.items);
    let order_number = &order.order_number;
    let customer_name = &order.customer.name;
    let subtotal = format_amount(order.subtotal);
    let shipping = format_amount(order.shipping_cost);
    let total = format_amount(order.total_amount);
    let savings = format_amount(order.total_savings);

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Order Confirmed</title>
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif; background-color: #faf7f0; color: #3d3528;">
    <table role="presentation" style="width: 100%; border-collapse: collapse;">
        <tr>
            <td style="padding: 40px 20px;">
                <table role="presentation" style="max-width: 600px; margin: 0 auto; background: #ffffff; border-radius: 16px; overflow: hidden; border: 1px solid #ece5d8;">
                    <tr>
                        <td style="padding: 40px 40px 20px; text-align: center; border-bottom: 1px solid #ece5d8;">
                            <div style="display: inline-block; background: linear-gradient(135deg, #b8860b 0%, #8a6508 100%); padding: 12px 20px; border-radius: 12px; margin-bottom: 20px;">
                                <span style="font-size: 24px; font-weight: 700; color: white;">Filigree</span>
                            </div>
                            <h1 style="margin: 0; font-size: 26px; font-weight: 700; color: #3d3528; line-height: 1.3;">
                                Thank you, {customer_name}!
                            </h1>
                            <p style="margin: 12px 0 0; font-size: 15px; color: #8a7d66;">
                                Your order <strong style="color: #b8860b;">{order_number}</strong> is confirmed.
                            </p>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 32px 40px;">
                            <table role="presentation" style="width: 100%; border-collapse: collapse;">
                                {items_html}
                                <tr>
                                    <td style="padding: 12px 0; color: #8a7d66; font-size: 14px;">Subtotal</td>
                                    <td style="padding: 12px 0; color: #3d3528; font-size: 14px; text-align: right;">{subtotal}</td>
                                </tr>
                                <tr>
                                    <td style="padding: 4px 0; color: #8a7d66; font-size: 14px;">Shipping</td>
                                    <td style="padding: 4px 0; color: #3d3528; font-size: 14px; text-align: right;">{shipping}</td>
                                </tr>
                                <tr>
                                    <td style="padding: 4px 0; color: #8a7d66; font-size: 14px;">You saved</td>
                                    <td style="padding: 4px 0; color: #2d7a3a; font-size: 14px; text-align: right;">{savings}</td>
                                </tr>
                                <tr>
                                    <td style="padding: 16px 0; border-top: 2px solid #ece5d8; color: #3d3528; font-size: 16px; font-weight: 700;">Total paid</td>
                                    <td style="padding: 16px 0; border-top: 2px solid #ece5d8; color: #3d3528; font-size: 16px; font-weight: 700; text-align: right;">{total}</td>
                                </tr>
                            </table>
                            <div style="text-align: center; margin-top: 24px;">
                                <a href="{tracking_url}" style="display: inline-block; background: linear-gradient(135deg, #b8860b 0%, #8a6508 100%); color: white; text-decoration: none; font-size: 16px; font-weight: 600; padding: 14px 32px; border-radius: 12px;">
                                    Track Your Order
                                </a>
                            </div>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 24px 40px; border-top: 1px solid #ece5d8; text-align: center;">
                            <p style="margin: 0; font-size: 12px; color: #8a7d66;">
                                Every piece is crafted to order. We will email you again when your order ships.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"##
    );

    let items_text = items_lines_text(&order.items);
    let text = format!(
        "Thank you, {customer_name}!\n\n\
Your order {order_number} is confirmed.\n\n\
{items_text}\n\n\
Subtotal: {subtotal}\n\
Shipping: {shipping}\n\
You saved: {savings}\n\
Total paid: {total}\n\n\
Track your order: {tracking_url}\n"
    );

    (html, text)
}

/// Acknowledgement for a submitted custom design request. Returns (html, text).
pub fn custom_request_received(name: &str, request_id: &str) -> (String, String) {
    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Design Request Received</title>
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif; background-color: #faf7f0; color: #3d3528;">
    <table role="presentation" style="width: 100%; border-collapse: collapse;">
        <tr>
            <td style="padding: 40px 20px;">
                <table role="presentation" style="max-width: 600px; margin: 0 auto; background: #ffffff; border-radius: 16px; overflow: hidden; border: 1px solid #ece5d8;">
                    <tr>
                        <td style="padding: 40px; text-align: center;">
                            <div style="display: inline-block; background: linear-gradient(135deg, #b8860b 0%, #8a6508 100%); padding: 12px 20px; border-radius: 12px; margin-bottom: 20px;">
                                <span style="font-size: 24px; font-weight: 700; color: white;">Filigree</span>
                            </div>
                            <h1 style="margin: 0 0 16px; font-size: 24px; font-weight: 700; color: #3d3528;">
                                We received your design request
                            </h1>
                            <p style="margin: 0 0 16px; font-size: 15px; line-height: 1.6; color: #8a7d66;">
                                Hi {name}, thank you for sharing your idea with us. A designer will
                                review it and get back to you within two business days.
                            </p>
                            <p style="margin: 0; font-size: 13px; color: #8a7d66;">
                                Reference: <code style="color: #b8860b; background: #faf7f0; padding: 4px 8px; border-radius: 4px;">{request_id}</code>
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"##
    );

    let text = format!(
        "Hi {name},\n\n\
Thank you for sharing your design idea with us. A designer will review it\n\
and get back to you within two business days.\n\n\
Reference: {request_id}\n"
    );

    (html, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_use_indian_grouping() {
        assert_eq!(format_amount(0), "₹0");
        assert_eq!(format_amount(999), "₹999");
        assert_eq!(format_amount(25200), "₹25,200");
        assert_eq!(format_amount(125000), "₹1,25,000");
        assert_eq!(format_amount(12500000), "₹1,25,00,000");
    }

    #[test]
    fn custom_request_template_mentions_reference() {
        let (html, text) = custom_request_received("Asha", "req_123");
        assert!(html.contains("req_123"));
        assert!(text.contains("req_123"));
        assert!(text.contains("Asha"));
    }
}
