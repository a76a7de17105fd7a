// Identity, onboarding, and the identity-provider webhook.

pub mod accounts;
pub mod auth;
pub mod catalog;
pub mod handlers;
pub mod onboarding;
pub mod webhook;
