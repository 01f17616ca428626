//! Late deployment: the started-event trigger and the bridge into the
//! host deployment manager.
//!
//! Data flow: started event → [`DeploymentTrigger`] fires once → the
//! resolver scans the configured directory → [`LateDeploymentRegistrar`]
//! submits each deployable to the host's manager.

mod provider;
mod registrar;
mod report;
mod trigger;


pub use provider::LateDeployProvider;
pub use registrar::LateDeploymentRegistrar;
pub use report::{DeploymentReport, PassOutcome, SubmissionFailure};
pub use trigger::DeploymentTrigger;
