//! System briefing for the sales assistant.
//!
//! Rendered from `templates/briefing.txt.j2` on every turn from the current
//! cart and catalog snapshot; never cached.

use minijinja::{AutoEscape, Environment, context};
use tienda_core::cart::Cart;
use tienda_core::catalog::CatalogSnapshot;
use tienda_core::config::AssistantConfig;
use tienda_core::{Result, TiendaError};
use tienda_infrastructure::csv_catalog::write_catalog_csv;

const TEMPLATE_NAME: &str = "briefing.txt.j2";
const TEMPLATE: &str = include_str!("templates/briefing.txt.j2");

pub struct BriefingBuilder {
    env: Environment<'static>,
    persona_name: String,
    store_name: String,
}

impl BriefingBuilder {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template(TEMPLATE_NAME, TEMPLATE)
            .map_err(|e| TiendaError::internal(format!("Invalid briefing template: {e}")))?;
        Ok(Self {
            env,
            persona_name: config.persona_name.clone(),
            store_name: config.store_name.clone(),
        })
    }

    /// Persona preamble, cart state, instructions and the full catalog as CSV.
    ///
    /// `catalog` is `None` when no snapshot was ever loaded; the briefing then
    /// says so instead of listing products.
    pub fn build(&self, cart: &Cart, catalog: Option<&CatalogSnapshot>) -> Result<String> {
        let catalog_csv = catalog.map(catalog_dump).transpose()?;
        let cart_summary = cart.summary_line();

        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| TiendaError::internal(e.to_string()))?;
        template
            .render(context! {
                persona_name => &self.persona_name,
                store_name => &self.store_name,
                cart_summary => cart_summary,
                catalog_csv => catalog_csv,
            })
            .map_err(|e| TiendaError::internal(format!("Failed to render briefing: {e}")))
    }
}

/// Every row and every column, in feed order.
fn catalog_dump(snapshot: &CatalogSnapshot) -> Result<String> {
    write_catalog_csv(
        snapshot.headers(),
        snapshot
            .products()
            .iter()
            .map(|product| snapshot.row_values(product)),
    )
}
