#[cfg(feature = "app")]
mod commands;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "app")]
use commands::screen::ScreenHandle;
#[cfg(feature = "app")]
use models::config_types::AppConfig;
#[cfg(feature = "app")]
use services::classifier::model_manager::ModelManager;
#[cfg(feature = "app")]
use services::image_store::FsImageStore;
#[cfg(feature = "app")]
use services::screen::{BoxedClassifier, Screen};
#[cfg(feature = "app")]
use services::tauri_host::TauriHost;
#[cfg(feature = "app")]
use tauri::Manager;

#[cfg(feature = "app")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .setup(|app| {
            let config_dir = app.path().app_config_dir()?;
            let app_data_dir = app.path().app_data_dir()?;
            let resource_dir = app.path().resource_dir()?;

            let config = AppConfig::load(&config_dir)?;
            let model_manager = ModelManager::new(
                config.resolve_model_dir(&resource_dir),
                config.intra_threads,
            );

            // A missing model leaves the screen usable; classification reports it.
            let (classifier, model_error) = match model_manager.load() {
                Ok(classifier) => (Some(Box::new(classifier) as BoxedClassifier), None),
                Err(e) => {
                    log::error!("Failed to load model from {}: {}", model_manager.model_dir.display(), e);
                    (None, Some(e.message))
                }
            };

            let store = FsImageStore::new(config.resolve_save_dir(&app_data_dir));
            log::info!("Saving images to {}", store.root().display());

            let host = TauriHost::new(app.handle().clone());
            app.manage(ScreenHandle::new(Screen::new(host, store, classifier), model_error));

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::screen::capture_image,
            commands::screen::load_image,
            commands::screen::download_image,
            commands::screen::deliver_permission_result,
            commands::screen::deliver_camera_frame,
            commands::screen::get_screen_state,
            commands::screen::get_model_status,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
