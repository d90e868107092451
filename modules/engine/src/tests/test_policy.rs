use crate::{derive_config, reconcile_policy, should_apply};
use common::{Accuracy, LocationOptions};
use provider_core::PowerMode;

fn options_with_accuracy(accuracy: Option<Accuracy>) -> LocationOptions {
    LocationOptions {
        accuracy,
        ..LocationOptions::default()
    }
}

#[test]
fn empty_set_reconciles_to_inactive_defaults() {
    let policy = reconcile_policy(&[]);
    assert!(!policy.active);
    assert!(!policy.background);
    assert!(!policy.indicate_background);
    assert_eq!(policy.accuracy, Accuracy::Medium);
}

#[test]
fn single_subscription_sets_its_tier() {
    let policy = reconcile_policy(&[options_with_accuracy(Some(Accuracy::Low))]);
    assert!(policy.active);
    assert_eq!(policy.accuracy, Accuracy::Low);
}

#[test]
fn accuracy_is_the_most_precise_requested_tier() {
    let policy = reconcile_policy(&[
        options_with_accuracy(Some(Accuracy::Significant)),
        options_with_accuracy(Some(Accuracy::High)),
        options_with_accuracy(Some(Accuracy::Low)),
    ]);
    assert_eq!(policy.accuracy, Accuracy::High);
}

#[test]
fn unspecified_tiers_default_to_medium() {
    let policy = reconcile_policy(&[
        options_with_accuracy(None),
        options_with_accuracy(Some(Accuracy::Significant)),
    ]);
    assert_eq!(policy.accuracy, Accuracy::Medium);
}

#[test]
fn background_flags_are_or_over_all_subscriptions() {
    let background = LocationOptions {
        background: true,
        ..LocationOptions::default()
    };
    let indicating = LocationOptions {
        indicate_background: true,
        ..LocationOptions::default()
    };
    let policy = reconcile_policy(&[LocationOptions::default(), background, indicating]);
    assert!(policy.background);
    assert!(policy.indicate_background);

    let policy = reconcile_policy(&[LocationOptions::default(), LocationOptions::default()]);
    assert!(!policy.background);
    assert!(!policy.indicate_background);
}

#[test]
fn high_precision_tiers_derive_high_accuracy_mode() {
    let config = derive_config(&reconcile_policy(&[options_with_accuracy(Some(
        Accuracy::Best,
    ))]));
    assert!(config.active);
    assert_eq!(config.power, PowerMode::HighAccuracy);
    assert_eq!(config.distance_filter_m, 0.0);
    assert!(!config.significant_only);
}

#[test]
fn significant_tier_derives_passive_monitoring() {
    let config = derive_config(&reconcile_policy(&[options_with_accuracy(Some(
        Accuracy::Significant,
    ))]));
    assert_eq!(config.power, PowerMode::NoPower);
    assert_eq!(config.distance_filter_m, 1000.0);
    assert!(config.significant_only);
}

#[test]
fn medium_tier_derives_balanced_updates() {
    let config = derive_config(&reconcile_policy(&[options_with_accuracy(None)]));
    assert_eq!(config.power, PowerMode::Balanced);
    assert_eq!(config.distance_filter_m, 10.0);
    assert!(!config.significant_only);
}

#[test]
fn empty_set_derives_the_stop_configuration() {
    let config = derive_config(&reconcile_policy(&[]));
    assert!(!config.active);
}

#[test]
fn differ_applies_on_first_configuration() {
    let config = derive_config(&reconcile_policy(&[LocationOptions::default()]));
    assert!(should_apply(&config, None));
}

#[test]
fn differ_suppresses_identical_configuration() {
    let config = derive_config(&reconcile_policy(&[LocationOptions::default()]));
    assert!(!should_apply(&config, Some(&config.clone())));
}

#[test]
fn differ_applies_on_any_single_field_change() {
    let config = derive_config(&reconcile_policy(&[LocationOptions::default()]));

    let mut changed = config.clone();
    changed.active = false;
    assert!(should_apply(&changed, Some(&config)));

    let mut changed = config.clone();
    changed.background = true;
    assert!(should_apply(&changed, Some(&config)));

    let mut changed = config.clone();
    changed.distance_filter_m = 100.0;
    assert!(should_apply(&changed, Some(&config)));

    let mut changed = config.clone();
    changed.power = PowerMode::HighAccuracy;
    assert!(should_apply(&changed, Some(&config)));
}
