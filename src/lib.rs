pub mod ast;
pub mod config;
pub mod ir;
pub mod layout;
pub mod lexer;
pub mod measure;
pub mod parser;

use wasm_bindgen::prelude::*;

use config::DEFAULT_SPACING;
use ir::GraphIR;
use layout::{Layout, LayoutEngine, LayoutError, LayoutMode, RankDirection};
use parser::{ParseOptions, parse_with};

/// Parse schema text and lay it out in one call.
///
/// An unknown `mode` is reported before any parsing happens. Blank or
/// unparseable text yields an empty layout.
pub fn generate(source: &str, mode: &str, spacing: i64) -> Result<Layout, LayoutError> {
    let mode: LayoutMode = mode.parse()?;
    Ok(generate_with(
        source,
        mode,
        spacing,
        RankDirection::default(),
        ParseOptions::default(),
    ))
}

/// Like [`generate`], with every setting explicit.
pub fn generate_with(
    source: &str,
    mode: LayoutMode,
    spacing: i64,
    direction: RankDirection,
    options: ParseOptions,
) -> Layout {
    let schema = parse_with(source, &options);
    let ir = GraphIR::from_schema(&schema);
    LayoutEngine::default()
        .with_direction(direction)
        .layout(&ir, mode, spacing)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Lay out schema text and return the node/edge lists as a JS object
#[wasm_bindgen(js_name = "schemaToGraph")]
pub fn schema_to_graph(
    source: &str,
    layout: Option<String>,
    spacing: Option<i32>,
) -> Result<JsValue, JsValue> {
    let mode = layout.as_deref().unwrap_or("grid");
    let spacing = spacing.map_or(DEFAULT_SPACING, i64::from);

    let result = generate(source, mode, spacing).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let json = serde_json::to_string(&result).map_err(|e| JsValue::from_str(&e.to_string()))?;

    js_sys::JSON::parse(&json)
}
