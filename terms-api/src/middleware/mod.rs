//! Middleware for the terms module.
//!
//! - `gate`: the access gate applications layer around protected routes
//!
//! The gate expects [`crate::identity::identity_middleware`] to run
//! before it, so the identity extension is populated:
//!
//! ```ignore
//! Router::new()
//!     .route("/orders", get(orders_handler))
//!     .route_layer(middleware::from_fn_with_state(gate_state, latest_terms_gate))
//!     .layer(middleware::from_fn_with_state(config, identity_middleware))
//! ```

mod gate;

pub use gate::{latest_terms_gate, GateState};
