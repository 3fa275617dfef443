//! Tidy Tree - WASM Module
//!
//! Computes non-overlapping, centered coordinates for the nodes of rooted
//! ordered trees so they can be drawn without subtree collisions. The core
//! is the linear-time Buchheim-Junger-Leipert algorithm; a quadratic
//! Walker-style layout is kept alongside for comparison. The crate compiles
//! to WebAssembly and exposes a JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `tree`: the [`LayoutTree`](tree::LayoutTree) boundary and an arena tree
//!   that can be built from flat edge pairs
//! - `layout`: the layout algorithms and the flat-buffer entry point
//! - `validate`: per-level overlap check of a laid-out tree
//! - `sample`: a small irregular demo tree

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod layout;
pub mod sample;
pub mod tree;
pub mod validate;

use layout::{TidyTreeConfig, TidyTreeLayout};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Tidy tree layout exposed to JavaScript.
#[wasm_bindgen]
pub struct TidyTreeWasm {
    layout: TidyTreeLayout,
}

#[wasm_bindgen]
impl TidyTreeWasm {
    /// Create a layout engine with default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            layout: TidyTreeLayout::with_defaults(),
        }
    }

    /// Create a layout engine from a (possibly partial) config object.
    ///
    /// Missing fields take their defaults, e.g.
    /// `{ algorithm: "walker", layout: { leaf_separation: 1 } }`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<TidyTreeWasm, JsError> {
        let config: TidyTreeConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(Self {
            layout: TidyTreeLayout::new(config),
        })
    }

    /// The active configuration as a plain JS object.
    #[wasm_bindgen(js_name = layoutConfig)]
    pub fn layout_config(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.layout.config())?)
    }

    /// Compute a tidy tree layout.
    ///
    /// Takes the tree edges as [parent0, child0, parent1, child1, ...] pairs.
    /// Returns a Float32Array of target positions [x0, y0, x1, y1, ...] with
    /// one (x, y) pair per node slot; slots outside the tree hold `f32::MAX`.
    ///
    /// # Arguments
    ///
    /// * `node_count` - Number of node slots
    /// * `edges` - Flat array of directed parent→child edge pairs
    /// * `root_id` - The root node ID (u32::MAX means auto-detect)
    #[wasm_bindgen(js_name = computeTreeLayout)]
    pub fn compute_tree_layout(
        &self,
        node_count: usize,
        edges: &[u32],
        root_id: u32,
    ) -> Result<Float32Array, JsError> {
        let positions = compute_interleaved(&self.layout, node_count, edges, root_id)?;
        Ok(Float32Array::from(&positions[..]))
    }
}

impl Default for TidyTreeWasm {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `layout` and interleave x and y into [x0, y0, x1, y1, ...].
fn compute_interleaved(
    layout: &TidyTreeLayout,
    node_count: usize,
    edges: &[u32],
    root_id: u32,
) -> layout::Result<Vec<f32>> {
    let root = if root_id == u32::MAX {
        None
    } else {
        Some(root_id)
    };
    Ok(layout.compute(node_count, edges, root)?.interleaved())
}
