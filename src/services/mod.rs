pub mod acquisition;
pub mod classifier;
pub mod data_url;
pub mod dispatcher;
pub mod host;
pub mod image_store;
pub mod permission_gate;
pub mod pipeline;
pub mod presenter;
pub mod screen;
#[cfg(feature = "app")]
pub mod tauri_host;

#[cfg(test)]
pub(crate) mod test_support;
