pub mod display;
pub mod feed;
pub mod http_client;
pub mod portal_fetch;
pub mod state;
