use crate::SimulatedProvider;
use common::position::Coordinates;
use provider_core::{
    AuthorizationStatus, LocationProvider, PowerMode, ProviderConfig, ProviderEvent,
};
use std::time::Duration;
use tokio::time::timeout;

const TICK: Duration = Duration::from_millis(10);
const RECV_TIMEOUT: Duration = Duration::from_millis(200);

fn route() -> Vec<Coordinates> {
    vec![
        Coordinates::new(52.026649, 11.282535),
        Coordinates::new(52.026751, 11.282047),
        Coordinates::new(52.026807, 11.281746),
    ]
}

fn active_config() -> ProviderConfig {
    ProviderConfig {
        active: true,
        power: PowerMode::Balanced,
        distance_filter_m: 10.0,
        interval: Duration::from_secs(1),
        background: false,
        indicate_background: false,
        significant_only: false,
    }
}

#[tokio::test]
async fn report_creation_error_with_empty_route() {
    let provider = SimulatedProvider::new(&[], 2.8, TICK);
    assert!(provider.is_err());
}

#[tokio::test]
#[test_log::test]
async fn no_fixes_without_an_active_configuration() {
    let provider = SimulatedProvider::new(&route(), 2.8, TICK).expect("Failed to create provider");
    let mut receiver = provider.events();
    assert!(
        timeout(Duration::from_millis(50), receiver.recv())
            .await
            .is_err(),
        "received a fix while inactive"
    );

    let mut stopped = active_config();
    stopped.active = false;
    provider.set_config(&stopped);
    assert!(
        timeout(Duration::from_millis(50), receiver.recv())
            .await
            .is_err(),
        "received a fix with a stop configuration"
    );
}

#[tokio::test]
#[test_log::test]
async fn fixes_follow_the_route_once_active() {
    let provider = SimulatedProvider::new(&route(), 2.8, TICK).expect("Failed to create provider");
    let mut receiver = provider.events();
    provider.set_config(&active_config());

    let event = timeout(RECV_TIMEOUT, receiver.recv())
        .await
        .expect("No fix received in timeout")
        .unwrap();
    let ProviderEvent::Fix(fix) = event else {
        panic!("expected a fix event, got {event:?}");
    };
    let position = Coordinates::new(fix.latitude, fix.longitude);
    let start = route()[0];
    // One tick of movement stays close to the route start.
    assert!(geodesy::distance(&start, &position) < 1.0);
    assert_eq!(fix.speed_mps, 2.8);
    assert!(fix.bearing_deg >= 0.0);
}

#[tokio::test]
#[test_log::test]
async fn authorization_prompt_is_granted_at_the_requested_level() {
    let provider = SimulatedProvider::new(&route(), 2.8, TICK).expect("Failed to create provider");
    let snapshot = provider.authorization_status().await;
    assert_eq!(snapshot.authorization, AuthorizationStatus::NotDetermined);
    assert!(snapshot.declares_background_location());

    let mut receiver = provider.events();
    provider.request_authorization(true);
    let event = timeout(RECV_TIMEOUT, receiver.recv())
        .await
        .expect("No event received in timeout")
        .unwrap();
    assert_eq!(
        event,
        ProviderEvent::AuthorizationChanged(AuthorizationStatus::AuthorizedAlways)
    );
    let snapshot = provider.authorization_status().await;
    assert_eq!(snapshot.authorization, AuthorizationStatus::AuthorizedAlways);
}

#[tokio::test]
#[test_log::test]
async fn capability_override_removes_background_modes() {
    let provider = SimulatedProvider::new(&route(), 2.8, TICK).expect("Failed to create provider");
    provider.set_background_modes(&[]);
    let snapshot = provider.authorization_status().await;
    assert!(!snapshot.declares_background_location());
}
