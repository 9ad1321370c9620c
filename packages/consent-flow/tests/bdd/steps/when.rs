//! When step definitions
//!
//! Steps that authenticate the PSU or run the whole scenario.

use consentflow_ais::steps::{given as given_steps, when as when_steps};
use consentflow_ais::{ClientConfig, ConsentScenario, ReqwestClient, ScaApproach};
use cucumber::when;

use crate::world::ConsentWorld;

// =============================================================================
// PSU authentication
// =============================================================================

#[when(expr = "PSU {string} authenticates with password {string}")]
async fn psu_authenticates(world: &mut ConsentWorld, psu_id: String, password: String) {
    world
        .execute(move |ctx, client| when_steps::authenticate_psu(ctx, client, &psu_id, &password))
        .await;
    world.assert_passed();
}

#[when(expr = "PSU {string} confirms the operation")]
async fn psu_confirms(world: &mut ConsentWorld, psu_id: String) {
    world
        .execute(move |ctx, client| when_steps::confirm_operation(ctx, client, &psu_id))
        .await;
    world.assert_passed();
}

// =============================================================================
// Misordered steps
// =============================================================================

#[when("a redirect authorisation is attempted")]
async fn redirect_authorisation_attempted(world: &mut ConsentWorld) {
    // Failure is expected here and checked by a Then step
    world
        .execute(|ctx, client| given_steps::create_authorization_redirect(ctx, client))
        .await;
}

// =============================================================================
// Full scenario
// =============================================================================

#[when(expr = "the redirect scenario runs for PSU {string} with password {string}")]
async fn redirect_scenario_runs(world: &mut ConsentWorld, psu_id: String, password: String) {
    let base_url = world.server().uri();
    let scenario = ConsentScenario::new(psu_id, password, ScaApproach::Redirect);

    let result = tokio::task::spawn_blocking(move || -> consentflow_ais::Result<_> {
        let config = ClientConfig::new(&base_url)?;
        let client = ReqwestClient::new(&config)?;
        scenario.run(&client)
    })
    .await
    .expect("scenario task panicked");

    match result {
        Ok(report) => {
            world.report = Some(report);
            world.error = None;
        }
        Err(e) => {
            world.report = None;
            world.error = Some(e);
        }
    }
}
