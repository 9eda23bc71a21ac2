use serde_json::{json, Value};

use crate::registry::ConnectionState;
use crate::request::{Fields, FromFields};
use crate::{ProtocolError, Response};

pub(crate) enum InventoryRequest {
    View,
    Add { product: String, quantity: u64 },
    Buy { product: String, quantity: u64 },
}

impl FromFields for InventoryRequest {
    fn from_fields(fields: &Fields) -> Result<Self, ProtocolError> {
        match fields.require_str("task")? {
            "view" => Ok(Self::View),
            "add" => Ok(Self::Add {
                product: fields.require_str("productName")?.to_owned(),
                quantity: fields.require_u64("quantity")?,
            }),
            "buy" => Ok(Self::Buy {
                product: fields.require_str("productName")?.to_owned(),
                quantity: fields.require_u64("quantity")?,
            }),
            _ => Err(ProtocolError::InvalidTask),
        }
    }
}

pub(crate) fn inventory(
    req: InventoryRequest,
    conn: &mut ConnectionState,
) -> Result<Response, ProtocolError> {
    let inventory = conn.store().inventory();
    let listing = match req {
        InventoryRequest::View => inventory.snapshot(),
        InventoryRequest::Add { product, quantity } => inventory.increment(&product, quantity)?,
        InventoryRequest::Buy { product, quantity } => inventory.decrement(&product, quantity)?,
    };

    let items: Vec<Value> = listing
        .into_iter()
        .map(|entry| json!({"product": entry.product, "quantity": entry.quantity}))
        .collect();
    Ok(Response::success("inventory").with("inventory", items))
}
