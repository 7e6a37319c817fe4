use chrono::{FixedOffset, NaiveDate, Utc};
use tracing::{debug, info};

use clearance_core::admin::{accept_clearance_edit, clearance_column_value, SettingsForm};
use clearance_core::domain::cart::{Cart, LineItem};
use clearance_core::domain::clearance::ClearancePrice;
use clearance_core::domain::product::CatalogProduct;
use clearance_core::domain::settings::ClearanceSettings;
use clearance_core::errors::ApplicationError;
use clearance_core::pricing::{
    apply_clearance_prices, choose_sale_label, format_price, resolve_price, rewrite_sale_flash,
    store_today, CartPricingSummary, ClearanceSnapshot, EffectivePrice, PriceRenderer,
    PricingContext,
};

use crate::repositories::{ConfigStore, ProductMetadataStore};

/// Loads settings and the clearance prices a request needs from the stores,
/// then hands them to the pure pricing functions.
pub struct ClearanceService<C, M> {
    config_store: C,
    metadata_store: M,
    utc_offset: FixedOffset,
}

impl<C, M> ClearanceService<C, M>
where
    C: ConfigStore,
    M: ProductMetadataStore,
{
    pub fn new(config_store: C, metadata_store: M, utc_offset: FixedOffset) -> Self {
        Self { config_store, metadata_store, utc_offset }
    }

    pub fn config_store(&self) -> &C {
        &self.config_store
    }

    pub fn metadata_store(&self) -> &M {
        &self.metadata_store
    }

    /// Current calendar day in the store's local time.
    pub fn today(&self) -> NaiveDate {
        store_today(&Utc::now(), self.utc_offset)
    }

    pub async fn settings(&self) -> Result<ClearanceSettings, ApplicationError> {
        Ok(self.config_store.load_settings().await?)
    }

    pub async fn context_on(&self, today: NaiveDate) -> Result<PricingContext, ApplicationError> {
        let settings = self.settings().await?;
        Ok(PricingContext::new(settings, today))
    }

    pub async fn quote_line(
        &self,
        item: &LineItem,
        today: NaiveDate,
    ) -> Result<EffectivePrice, ApplicationError> {
        let context = self.context_on(today).await?;
        let snapshot = self.snapshot_for(line_entity_ids(std::slice::from_ref(item))).await?;
        let resolved = resolve_price(item, &context, &snapshot);

        debug!(
            event_name = "pricing.line.resolved",
            product_id = %item.product_id.0,
            variation_id = item.variation_id.as_ref().map(|v| v.0.as_str()).unwrap_or("none"),
            price = %resolved.price,
            is_clearance = resolved.is_clearance,
            "line item price resolved"
        );
        Ok(resolved)
    }

    pub async fn price_cart(
        &self,
        cart: &mut Cart,
        today: NaiveDate,
    ) -> Result<CartPricingSummary, ApplicationError> {
        let context = self.context_on(today).await?;
        let snapshot = self.snapshot_for(line_entity_ids(&cart.lines)).await?;
        let summary = apply_clearance_prices(cart, &context, &snapshot);

        info!(
            event_name = "pricing.cart.recalculated",
            lines_priced = summary.lines_priced,
            lines_on_clearance = summary.lines_on_clearance,
            total = ?summary.total,
            clearance_live = context.clearance_is_live(),
            "cart clearance prices applied"
        );
        Ok(summary)
    }

    pub async fn price_html<R>(
        &self,
        product: &CatalogProduct,
        default_html: &str,
        renderer: &R,
        today: NaiveDate,
    ) -> Result<String, ApplicationError>
    where
        R: PriceRenderer + Sync + ?Sized,
    {
        let context = self.context_on(today).await?;
        let snapshot = self.snapshot_for(vec![product.id.0.clone()]).await?;
        Ok(format_price(product, &context, &snapshot, default_html, renderer))
    }

    pub async fn sale_label(
        &self,
        product: &CatalogProduct,
        default_label: &str,
        today: NaiveDate,
    ) -> Result<String, ApplicationError> {
        let context = self.context_on(today).await?;
        let snapshot = self.snapshot_for(product_entity_ids(product)).await?;
        Ok(choose_sale_label(product, &context, &snapshot, default_label))
    }

    pub async fn sale_flash(
        &self,
        product: &CatalogProduct,
        flash_html: &str,
        today: NaiveDate,
    ) -> Result<String, ApplicationError> {
        let context = self.context_on(today).await?;
        let snapshot = self.snapshot_for(product_entity_ids(product)).await?;
        Ok(rewrite_sale_flash(flash_html, product, &context, &snapshot))
    }

    pub async fn submit_settings(
        &self,
        form: SettingsForm,
    ) -> Result<ClearanceSettings, ApplicationError> {
        let settings = form.into_settings()?;
        let saved = self.config_store.save_settings(&settings).await?;

        info!(
            event_name = "admin.settings.saved",
            enabled = saved.enabled,
            override_simple = saved.override_simple,
            override_variable = saved.override_variable,
            "clearance settings saved"
        );
        Ok(saved)
    }

    pub async fn save_clearance_price(
        &self,
        entity_id: &str,
        raw: &str,
    ) -> Result<ClearancePrice, ApplicationError> {
        let settings = self.settings().await?;
        let price = accept_clearance_edit(&settings, raw)?;
        self.metadata_store.set_clearance_price(entity_id, &price).await?;

        info!(
            event_name = "admin.clearance_price.saved",
            entity_id,
            value = price.as_str(),
            "clearance price saved"
        );
        Ok(price)
    }

    pub async fn clearance_price(
        &self,
        entity_id: &str,
    ) -> Result<Option<ClearancePrice>, ApplicationError> {
        Ok(self.metadata_store.clearance_price(entity_id).await?)
    }

    pub async fn clearance_column(&self, entity_id: &str) -> Result<Option<String>, ApplicationError> {
        let settings = self.settings().await?;
        let price = self.metadata_store.clearance_price(entity_id).await?;
        Ok(clearance_column_value(&settings, price.as_ref()))
    }

    /// Removes every clearance setting; stored per-entity prices are kept.
    pub async fn uninstall(&self) -> Result<(), ApplicationError> {
        self.config_store.delete_all().await?;
        info!(event_name = "admin.uninstalled", "clearance settings removed");
        Ok(())
    }

    async fn snapshot_for(
        &self,
        entity_ids: Vec<String>,
    ) -> Result<ClearanceSnapshot, ApplicationError> {
        Ok(self.metadata_store.clearance_snapshot(&entity_ids).await?)
    }
}

fn line_entity_ids(lines: &[LineItem]) -> Vec<String> {
    let mut ids: Vec<String> = lines
        .iter()
        .flat_map(|line| {
            std::iter::once(line.product_id.0.clone())
                .chain(line.variation_id.as_ref().map(|v| v.0.clone()))
        })
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

fn product_entity_ids(product: &CatalogProduct) -> Vec<String> {
    std::iter::once(product.id.0.clone())
        .chain(product.variations().iter().map(|v| v.0.clone()))
        .collect()
}
