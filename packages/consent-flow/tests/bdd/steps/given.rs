//! Given step definitions
//!
//! Steps that start the mock bank and create the consent.

use consentflow_ais::steps::given as given_steps;
use consentflow_ais::ScaApproach;
use cucumber::given;
use wiremock::MockServer;

use crate::common::{mount_compliant_bank, mount_create_consent};
use crate::world::ConsentWorld;

// =============================================================================
// Mock bank
// =============================================================================

#[given("an open banking API that accepts the redirect flow")]
async fn compliant_bank(world: &mut ConsentWorld) {
    let server = MockServer::start().await;
    mount_compliant_bank(&server).await;
    world.server = Some(server);
}

#[given(expr = "an open banking API that answers consent creation with status {int}")]
async fn bank_with_consent_status(world: &mut ConsentWorld, status: u16) {
    let server = MockServer::start().await;
    mount_create_consent(&server, status).await;
    world.server = Some(server);
}

// =============================================================================
// Consent setup
// =============================================================================

#[given(expr = "a global consent is created for PSU {string} with SCA approach {string}")]
async fn global_consent_created(world: &mut ConsentWorld, psu_id: String, sca: String) {
    let sca_approach: ScaApproach = sca
        .parse()
        .unwrap_or_else(|e| panic!("Invalid SCA approach in feature file: {e}"));

    world
        .execute(move |ctx, client| {
            given_steps::create_global_consent(ctx, client, &psu_id, sca_approach)
        })
        .await;
    world.assert_passed();
}

#[given("a redirect authorisation is started")]
async fn redirect_authorisation_started(world: &mut ConsentWorld) {
    world
        .execute(|ctx, client| given_steps::create_authorization_redirect(ctx, client))
        .await;
    world.assert_passed();
}
