use serde_json::Value;

use super::{FieldReader, Mode, ValidationErrors};
use crate::models::{NewOrder, OrderStatusUpdate};

/// Buyer order fields. The screenshot is attached by the upload handler.
pub fn new_order(raw: &Value) -> Result<NewOrder, ValidationErrors> {
    let mut r = FieldReader::new(raw, Mode::Create)?;

    let product_name = r.required_text("productName");
    let plan = r.text("plan");
    let price = r.required_price("price");
    let email = r.email("email");
    let telegram = r.optional_text("telegram");
    r.finish()?;

    Ok(NewOrder {
        product_name: product_name.unwrap_or_default(),
        plan: plan.unwrap_or_default(),
        price: price.unwrap_or(0.0),
        email: email.unwrap_or_default(),
        telegram,
        screenshot: None,
    })
}

/// `{status}` body of the payment status route
pub fn payment_status_update(raw: &Value) -> Result<OrderStatusUpdate, ValidationErrors> {
    let mut r = FieldReader::new(raw, Mode::Create)?;
    let payment_status = r.required_choice("status");
    r.finish()?;

    Ok(OrderStatusUpdate {
        payment_status,
        order_status: None,
    })
}

/// `{paymentStatus?, orderStatus?}`; at least one must be present
pub fn status_update(raw: &Value) -> Result<OrderStatusUpdate, ValidationErrors> {
    let mut r = FieldReader::new(raw, Mode::Update)?;
    let update = OrderStatusUpdate {
        payment_status: r.choice("paymentStatus"),
        order_status: r.choice("orderStatus"),
    };
    r.finish()?;

    if update.payment_status.is_none() && update.order_status.is_none() {
        return Err(ValidationErrors::single("body", "Nothing to update"));
    }
    Ok(update)
}
