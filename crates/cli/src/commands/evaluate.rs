use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use clearance_core::config::LoadOptions;
use clearance_core::domain::cart::{Cart, LineItem};
use clearance_core::domain::product::CatalogProduct;
use clearance_core::pricing::StripDigitsRenderer;
use rust_decimal::Decimal;
use serde_json::json;

use crate::commands::{application_failure, day_or_today, execute, CommandResult, Failure};
use crate::{KindArg, ProductArgs};

#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub product: String,
    pub variation: Option<String>,
    pub regular_price: Decimal,
    pub quantity: u32,
    pub date: Option<NaiveDate>,
}

pub fn quote(options: &LoadOptions, request: QuoteRequest) -> CommandResult {
    let mut item = LineItem::new(request.product, request.regular_price)
        .with_quantity(request.quantity);
    if let Some(variation) = request.variation {
        item = item.with_variation(variation);
    }

    execute("quote", options, |service, _config| async move {
        let today = day_or_today(&service, request.date);
        let resolved = service.quote_line(&item, today).await.map_err(application_failure)?;
        let line_total =
            resolved.price.checked_mul(Decimal::from(item.quantity)).ok_or_else(|| {
                (
                    "invalid_input",
                    format!("line total for {} x {} overflows", resolved.price, item.quantity),
                    7u8,
                )
            })?;
        let message = if resolved.is_clearance {
            format!("clearance price {} applies", resolved.price)
        } else {
            format!("regular price {} applies", resolved.price)
        };
        Ok::<_, Failure>((
            message,
            json!({
                "date": today,
                "price": resolved.price,
                "is_clearance": resolved.is_clearance,
                "source": resolved.source,
                "quantity": item.quantity,
                "line_total": line_total,
            }),
        ))
    })
}

pub fn cart(options: &LoadOptions, file: &Path, date: Option<NaiveDate>) -> CommandResult {
    let mut cart = match read_cart(file) {
        Ok(cart) => cart,
        Err(error) => {
            return CommandResult::failure("cart", "invalid_input", format!("{error:#}"), 7);
        }
    };

    execute("cart", options, |service, _config| async move {
        let today = day_or_today(&service, date);
        let summary = service.price_cart(&mut cart, today).await.map_err(application_failure)?;
        if summary.total.is_none() {
            return Err(("invalid_input", "cart total overflows".to_string(), 7));
        }
        let message = format!(
            "{} of {} lines priced at clearance",
            summary.lines_on_clearance, summary.lines_priced
        );
        Ok::<_, Failure>((message, json!({ "date": today, "summary": summary, "cart": cart })))
    })
}

pub fn display(
    options: &LoadOptions,
    product: &ProductArgs,
    html: &str,
    date: Option<NaiveDate>,
) -> CommandResult {
    let product = catalog_product(product);
    let html = html.to_string();

    execute("display", options, |service, _config| async move {
        let today = day_or_today(&service, date);
        let rendered = service
            .price_html(&product, &html, &StripDigitsRenderer, today)
            .await
            .map_err(application_failure)?;
        Ok::<_, Failure>((rendered.clone(), json!({ "date": today, "html": rendered })))
    })
}

pub fn label(
    options: &LoadOptions,
    product: &ProductArgs,
    default_label: Option<&str>,
    date: Option<NaiveDate>,
) -> CommandResult {
    let product = catalog_product(product);
    let default_label = default_label.map(str::to_string);

    execute("label", options, |service, config| async move {
        let today = day_or_today(&service, date);
        let default_label =
            default_label.unwrap_or_else(|| config.storefront.default_sale_label.clone());
        let chosen = service
            .sale_label(&product, &default_label, today)
            .await
            .map_err(application_failure)?;
        Ok::<_, Failure>((chosen.clone(), json!({ "date": today, "label": chosen })))
    })
}

pub(crate) fn catalog_product(args: &ProductArgs) -> CatalogProduct {
    match args.kind {
        KindArg::Simple => CatalogProduct::simple(args.product.clone()),
        KindArg::Variable => CatalogProduct::variable(args.product.clone(), args.variations.clone()),
        KindArg::Other => CatalogProduct {
            id: clearance_core::domain::product::ProductId(args.product.clone()),
            kind: clearance_core::domain::product::ProductKind::Other,
        },
    }
}

fn read_cart(file: &Path) -> anyhow::Result<Cart> {
    let raw = if file == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).context("failed to read cart from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read cart file {}", file.display()))?
    };

    serde_json::from_str(&raw).context("cart must be a JSON object with a `lines` array")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(kind: KindArg, variations: &[&str]) -> ProductArgs {
        ProductArgs {
            product: "100".to_string(),
            kind,
            variations: variations.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn maps_product_arguments_to_catalog_products() {
        assert!(catalog_product(&args(KindArg::Simple, &[])).is_simple());

        let variable = catalog_product(&args(KindArg::Variable, &["101", "102"]));
        assert!(variable.is_variable());
        assert_eq!(variable.variations().len(), 2);

        let other = catalog_product(&args(KindArg::Other, &["101"]));
        assert!(!other.is_simple() && !other.is_variable());
        assert!(other.variations().is_empty());
    }

    #[test]
    fn unreadable_cart_file_reports_path() {
        let error = read_cart(Path::new("/nonexistent/cart.json")).expect_err("missing file");
        assert!(format!("{error:#}").contains("/nonexistent/cart.json"));
    }
}
