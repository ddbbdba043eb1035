mod analytics;
mod client_ip;
mod health;
mod redirect;
mod shorten;

pub use analytics::analytics_handler;
pub use client_ip::ClientIp;
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
