use crate::error::AppError;
use crate::models::activity_types::{ActivityResult, RequestToken};
use crate::models::classify_types::ModelStatus;
use crate::models::screen_types::ScreenState;
use crate::services::data_url;
use crate::services::image_store::FsImageStore;
use crate::services::screen::Screen;
use crate::services::tauri_host::TauriHost;
use std::sync::Mutex;
use tauri::{AppHandle, Manager, State};

pub type AppScreen = Screen<TauriHost, FsImageStore>;

pub struct ScreenHandle {
    screen: Mutex<AppScreen>,
    model_error: Option<String>,
}

impl ScreenHandle {
    pub fn new(screen: AppScreen, model_error: Option<String>) -> Self {
        Self {
            screen: Mutex::new(screen),
            model_error,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut AppScreen) -> Result<R, AppError>) -> Result<R, AppError> {
        let mut screen = self
            .screen
            .lock()
            .map_err(|_| AppError::from("Screen state poisoned"))?;
        f(&mut screen)
    }
}

/// Routes a native dialog's answer back into the screen.
pub fn deliver(app: &AppHandle, token: RequestToken, result: ActivityResult) {
    let handle = app.state::<ScreenHandle>();
    if let Err(e) = handle.with(|screen| screen.on_activity_result(token, result)) {
        log::error!("Handling result {} failed: {}", token, e);
    }
}

#[tauri::command]
pub fn capture_image(screen: State<'_, ScreenHandle>) -> Result<(), AppError> {
    screen.with(|s| {
        s.on_capture_clicked();
        Ok(())
    })
}

#[tauri::command]
pub fn load_image(screen: State<'_, ScreenHandle>) -> Result<(), AppError> {
    screen.with(|s| {
        s.on_load_clicked();
        Ok(())
    })
}

#[tauri::command]
pub fn download_image(screen: State<'_, ScreenHandle>) -> Result<(), AppError> {
    screen.with(|s| {
        s.on_download_clicked();
        Ok(())
    })
}

#[tauri::command]
pub fn deliver_permission_result(
    screen: State<'_, ScreenHandle>,
    token: RequestToken,
    granted: bool,
) -> Result<(), AppError> {
    screen.with(|s| {
        if s.host_mut().resolve_permission(token, granted).is_none() {
            log::warn!("Permission answer for unknown prompt {}", token);
        }
        s.on_activity_result(token, ActivityResult::Permission { granted })
    })
}

/// `frame` is the preview snapshot as a data URL, or `None` when cancelled.
#[tauri::command]
pub fn deliver_camera_frame(
    screen: State<'_, ScreenHandle>,
    token: RequestToken,
    frame: Option<String>,
) -> Result<(), AppError> {
    let bitmap = frame.and_then(|url| match data_url::decode(&url) {
        Ok(bitmap) => Some(bitmap),
        Err(e) => {
            log::error!("Camera frame could not be decoded: {}", e);
            None
        }
    });
    screen.with(|s| s.on_activity_result(token, ActivityResult::CameraPreview(bitmap)))
}

#[tauri::command]
pub fn get_screen_state(screen: State<'_, ScreenHandle>) -> Result<ScreenState, AppError> {
    screen.with(|s| s.state())
}

#[tauri::command]
pub fn get_model_status(screen: State<'_, ScreenHandle>) -> Result<ModelStatus, AppError> {
    let error = screen.model_error.clone();
    screen.with(|s| {
        Ok(ModelStatus {
            ready: s.has_classifier(),
            error,
        })
    })
}
