// Services module
pub mod clock;
pub mod gateways;
pub mod payments;
pub mod retry;
pub mod routing;
pub mod validation;
