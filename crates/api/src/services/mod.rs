//! External service integrations and the provisioning workflow.

pub mod email;
pub mod notifier;
pub mod paypal;
pub mod provisioning;

#[allow(unused_imports)] // Used in routes
pub use email::EmailService;
#[allow(unused_imports)] // Used in app wiring
pub use notifier::PlatformNotifier;
#[allow(unused_imports)] // Used in app wiring
pub use paypal::PayPalGateway;
#[allow(unused_imports)] // Used in routes
pub use provisioning::{ProvisionOutcome, ProvisioningService};
