//! Zalo HTTP Client module
//!
//! This module contains the ZaloClient transport and its builder.

mod zalo_client;
pub use zalo_client::ZaloClient;

mod builder;
pub use builder::ZaloClientBuilder;
