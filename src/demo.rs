//! Historias de ejemplo: una tienda que reserva stock en un inventario
//! inyectado y aplica descuento por volumen.
//!
//! ```text
//! Shop.purchase(item, quantity)
//!   price
//!   reserve (Inventory.reserve)   failures: out_of_stock
//!     check_stock
//!     hold
//!   discount
//!     bulk_only                   Skip si quantity < BULK_THRESHOLD
//!     apply_discount
//!   receipt                       Result({item, total})
//! ```
//!
//! El contrato de `purchase` también valida lo que producen sus
//! sub-historias (`discount` debe ser no negativo); `reserved` lo declara el
//! contrato del inventario.

use std::sync::Arc;

use serde_json::json;
use story_adapters::SchemaContract;
use story_core::{outputs, BoundStory, CompileError, ContextView, Host, Outcome, Registry, StepError, StepResult,
                 StoryDeclaration};

pub const BULK_THRESHOLD: i64 = 10;
pub const OUT_OF_STOCK: &str = "out_of_stock";

pub struct Inventory {
    pub stock: i64,
}

impl Inventory {
    fn check_stock(&self, ctx: &ContextView<'_>) -> StepResult {
        let quantity: i64 = ctx.value("quantity")?;
        if quantity <= 0 {
            return Err(StepError::msg(format!("quantity must be positive, got {quantity}")));
        }
        if quantity > self.stock {
            return Ok(Outcome::failure_because(OUT_OF_STOCK).into());
        }
        Ok(None)
    }

    fn hold(&self, ctx: &ContextView<'_>) -> StepResult {
        let quantity: i64 = ctx.value("quantity")?;
        Ok(Outcome::Success(outputs! { "reserved" => quantity }).into())
    }
}

impl Host for Inventory {
    fn register(r: &mut Registry<Self>) {
        let schema = SchemaContract::new().field::<i64>("quantity").field::<i64>("reserved");
        r.step("check_stock", Self::check_stock)
         .step("hold", Self::hold)
         .story(StoryDeclaration::new("reserve").arguments(["quantity"])
                                                .body(["check_stock", "hold"])
                                                .failures([OUT_OF_STOCK])
                                                .contract(Arc::new(schema)));
    }
}

pub struct Shop {
    pub unit_price: i64,
    pub reserve: BoundStory,
}

impl Shop {
    fn price(&self, ctx: &ContextView<'_>) -> StepResult {
        let quantity: i64 = ctx.value("quantity")?;
        Ok(Outcome::Success(outputs! { "total" => self.unit_price * quantity }).into())
    }

    fn bulk_only(&self, ctx: &ContextView<'_>) -> StepResult {
        let quantity: i64 = ctx.value("quantity")?;
        if quantity < BULK_THRESHOLD {
            return Ok(Outcome::skip().into());
        }
        Ok(None)
    }

    fn apply_discount(&self, ctx: &ContextView<'_>) -> StepResult {
        let total: i64 = ctx.value("total")?;
        Ok(Outcome::Success(outputs! { "discount" => total / 10 }).into())
    }

    fn receipt(&self, ctx: &ContextView<'_>) -> StepResult {
        let item: String = ctx.value("item")?;
        let total: i64 = ctx.value("total")?;
        let discount: i64 = if ctx.contains("discount") { ctx.value("discount")? } else { 0 };
        Ok(Outcome::result(json!({ "item": item, "total": total - discount })).into())
    }
}

impl Host for Shop {
    fn register(r: &mut Registry<Self>) {
        let schema = SchemaContract::new().field::<String>("item")
                                          .field::<i64>("quantity")
                                          .field::<i64>("total")
                                          .field::<u64>("discount");
        r.step("price", Self::price)
         .step("bulk_only", Self::bulk_only)
         .step("apply_discount", Self::apply_discount)
         .step("receipt", Self::receipt)
         .inject("reserve", |shop| shop.reserve.clone())
         .story(StoryDeclaration::new("discount").arguments(["total"])
                                                 .body(["bulk_only", "apply_discount"]))
         .story(StoryDeclaration::new("purchase").arguments(["item", "quantity"])
                                                 .body(["price", "reserve", "discount", "receipt"])
                                                 .contract(Arc::new(schema)));
    }
}

/// Compila `Shop.purchase` con un inventario de `stock` unidades.
pub fn purchase_story(stock: i64, unit_price: i64) -> Result<BoundStory, CompileError> {
    let reserve = BoundStory::bind(Arc::new(Inventory { stock }), "reserve")?;
    BoundStory::bind(Arc::new(Shop { unit_price, reserve }), "purchase")
}
