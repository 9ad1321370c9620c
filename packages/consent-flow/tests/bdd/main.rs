//! BDD Test Runner for the consent authorisation flow
//!
//! Runs the Gherkin scenarios in the workspace `features/` directory against
//! a wiremock bank.
//!
//! # Usage
//!
//! ```bash
//! cargo test --test bdd -- --nocapture
//! ```

// Allow panic/expect in test code - these are appropriate for test setup
#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

#[path = "../common/mod.rs"]
mod common;
mod steps;
mod world;

use cucumber::World;
use std::path::Path;

#[tokio::main]
async fn main() {
    common::init_tracing();

    // Find the features directory relative to the package
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let features_dir = Path::new(manifest_dir)
        .parent() // packages/
        .and_then(|p| p.parent()) // project root
        .map(|p| p.join("features"))
        .expect("Could not find features directory");

    if !features_dir.exists() {
        panic!("Features directory not found: {}", features_dir.display());
    }

    world::ConsentWorld::cucumber()
        .max_concurrent_scenarios(1) // One mock bank at a time keeps logs readable
        .with_default_cli()
        .run_and_exit(features_dir)
        .await;
}
