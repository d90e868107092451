use crate::PermissionController;
use common::{GeolocationError, PermissionStatus};
use provider_core::test_helper::FakeProvider;
use provider_core::AuthorizationStatus;
use std::sync::Arc;

fn controller(provider: &Arc<FakeProvider>) -> PermissionController {
    PermissionController::new(provider.clone())
}

#[tokio::test]
#[test_log::test]
async fn status_reports_granted_for_foreground_use() {
    let provider = Arc::new(FakeProvider::new(
        AuthorizationStatus::AuthorizedWhenInUse,
        &[],
    ));
    assert_eq!(
        controller(&provider).status(false).await,
        PermissionStatus::Granted
    );
}

#[tokio::test]
#[test_log::test]
async fn status_degrades_foreground_grant_to_denied_for_background() {
    let provider = Arc::new(FakeProvider::new(
        AuthorizationStatus::AuthorizedWhenInUse,
        &["location"],
    ));
    assert_eq!(
        controller(&provider).status(true).await,
        PermissionStatus::Denied
    );
}

#[tokio::test]
#[test_log::test]
async fn status_reports_unknown_while_undetermined_even_for_background() {
    let provider = Arc::new(FakeProvider::new(
        AuthorizationStatus::NotDetermined,
        &["location"],
    ));
    let controller = controller(&provider);
    assert_eq!(controller.status(true).await, PermissionStatus::Unknown);
    assert_eq!(controller.status(false).await, PermissionStatus::Unknown);
}

#[tokio::test]
#[test_log::test]
async fn status_reports_denied_when_denied() {
    let provider = Arc::new(FakeProvider::new(AuthorizationStatus::Denied, &[]));
    assert_eq!(
        controller(&provider).status(false).await,
        PermissionStatus::Denied
    );
}

#[tokio::test]
#[test_log::test]
async fn sufficient_grant_resolves_without_a_prompt() {
    let provider = Arc::new(FakeProvider::new(
        AuthorizationStatus::AuthorizedWhenInUse,
        &[],
    ));
    let status = controller(&provider).request(false).await.unwrap();
    assert_eq!(status, PermissionStatus::Granted);
    assert!(provider.prompts().is_empty());
}

#[tokio::test]
#[test_log::test]
async fn definitive_denial_resolves_without_a_prompt() {
    let provider = Arc::new(FakeProvider::new(AuthorizationStatus::Denied, &[]));
    let status = controller(&provider).request(false).await.unwrap();
    assert_eq!(status, PermissionStatus::Denied);
    assert!(provider.prompts().is_empty());
}

#[tokio::test]
#[test_log::test]
async fn undetermined_state_prompts_and_waits_for_the_change_event() {
    let provider = Arc::new(FakeProvider::new(AuthorizationStatus::NotDetermined, &[]));
    provider.respond_to_prompts_with(AuthorizationStatus::AuthorizedWhenInUse);
    let status = controller(&provider).request(false).await.unwrap();
    assert_eq!(status, PermissionStatus::Granted);
    assert_eq!(provider.prompts(), vec![false]);
}

#[tokio::test]
#[test_log::test]
async fn background_upgrade_prompts_with_always() {
    let provider = Arc::new(FakeProvider::new(
        AuthorizationStatus::AuthorizedWhenInUse,
        &["location"],
    ));
    provider.respond_to_prompts_with(AuthorizationStatus::AuthorizedAlways);
    let status = controller(&provider).request(true).await.unwrap();
    assert_eq!(status, PermissionStatus::Granted);
    assert_eq!(provider.prompts(), vec![true]);
}

#[tokio::test]
#[test_log::test]
async fn foreground_answer_to_an_always_prompt_resolves_denied() {
    let provider = Arc::new(FakeProvider::new(
        AuthorizationStatus::AuthorizedWhenInUse,
        &["location"],
    ));
    provider.respond_to_prompts_with(AuthorizationStatus::AuthorizedWhenInUse);
    let status = controller(&provider).request(true).await.unwrap();
    assert_eq!(status, PermissionStatus::Denied);
    assert_eq!(provider.prompts(), vec![true]);
}

#[tokio::test]
#[test_log::test]
async fn missing_background_capability_fails_without_a_prompt() {
    let provider = Arc::new(FakeProvider::new(AuthorizationStatus::NotDetermined, &[]));
    let error = controller(&provider).request(true).await.unwrap_err();
    assert_eq!(error, GeolocationError::MissingBackgroundCapability);
    assert!(provider.prompts().is_empty());
}

#[tokio::test]
#[test_log::test]
async fn overlapping_requests_share_one_prompt() {
    let provider = Arc::new(FakeProvider::new(AuthorizationStatus::NotDetermined, &[]));
    provider.respond_to_prompts_with(AuthorizationStatus::AuthorizedAlways);
    let controller = Arc::new(controller(&provider));

    let (first, second) = tokio::join!(controller.request(false), controller.request(false));
    assert_eq!(first.unwrap(), PermissionStatus::Granted);
    assert_eq!(second.unwrap(), PermissionStatus::Granted);
    // The second caller re-reads the settled state instead of prompting.
    assert_eq!(provider.prompts(), vec![false]);
}
