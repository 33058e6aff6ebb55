use crate::commands::screen::deliver;
use crate::models::activity_types::{
    ActivityResult, ConfirmDialog, ContentUri, GalleryRequest, RequestToken, ResultCode,
};
use crate::models::permission_types::{Permission, PermissionState};
use crate::models::screen_types::{Notice, ScreenState};
use crate::services::data_url;
use crate::services::host::Host;
use image::DynamicImage;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tauri::{AppHandle, Emitter};
use tauri_plugin_dialog::{DialogExt, FilePath, MessageDialogButtons, MessageDialogKind};

#[derive(Debug, Serialize, Clone)]
struct PermissionPrompt {
    token: RequestToken,
    permission: Permission,
}

#[derive(Debug, Serialize, Clone)]
struct CameraRequest {
    token: RequestToken,
}

/// Host backed by the Tauri webview and native dialogs.
///
/// Permission prompts and the camera preview live in the webview, which
/// answers through the `deliver_*` commands. The gallery picker and the
/// confirm dialog are native and answer through [`deliver`].
pub struct TauriHost {
    app: AppHandle,
    granted: HashSet<Permission>,
    prompts: HashMap<RequestToken, Permission>,
}

impl TauriHost {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            granted: HashSet::new(),
            prompts: HashMap::new(),
        }
    }

    /// Records the user's answer to a prompt issued under `token`.
    pub fn resolve_permission(&mut self, token: RequestToken, granted: bool) -> Option<Permission> {
        let permission = self.prompts.remove(&token)?;
        if granted {
            self.granted.insert(permission);
        } else {
            self.granted.remove(&permission);
        }
        Some(permission)
    }

    fn emit<S: Serialize + Clone>(&self, event: &str, payload: S) {
        if let Err(e) = self.app.emit(event, payload) {
            log::error!("Failed to emit {}: {}", event, e);
        }
    }
}

impl Host for TauriHost {
    fn check_permission(&self, permission: Permission) -> PermissionState {
        self.granted.contains(&permission).into()
    }

    fn request_permission(&mut self, permission: Permission, token: RequestToken) {
        self.prompts.insert(token, permission);
        self.emit("permission-requested", PermissionPrompt { token, permission });
    }

    fn launch_camera_preview(&mut self, token: RequestToken) {
        self.emit("camera-requested", CameraRequest { token });
    }

    fn launch_gallery(&mut self, request: &GalleryRequest, token: RequestToken) {
        let app = self.app.clone();
        let extensions = request.extensions();
        self.app
            .dialog()
            .file()
            .add_filter("Images", &extensions)
            .pick_file(move |picked: Option<FilePath>| {
                let result = match picked.map(|p| p.into_path()) {
                    Some(Ok(path)) => ActivityResult::Gallery {
                        code: ResultCode::Ok,
                        data: ContentUri::from_file_path(&path),
                    },
                    Some(Err(e)) => {
                        log::error!("Picker returned an unusable path: {}", e);
                        ActivityResult::Gallery {
                            code: ResultCode::Failed,
                            data: None,
                        }
                    }
                    None => ActivityResult::Gallery {
                        code: ResultCode::Canceled,
                        data: None,
                    },
                };
                deliver(&app, token, result);
            });
    }

    fn confirm(&mut self, dialog: &ConfirmDialog, token: RequestToken) {
        let app = self.app.clone();
        self.app
            .dialog()
            .message(dialog.message.clone())
            .title(dialog.title.clone())
            .kind(MessageDialogKind::Info)
            .buttons(MessageDialogButtons::OkCancelCustom(
                dialog.positive.clone(),
                dialog.negative.clone(),
            ))
            .show(move |confirmed| {
                deliver(&app, token, ActivityResult::Confirm { confirmed });
            });
    }

    fn show_notice(&mut self, notice: Notice) {
        log::info!("Notice: {}", notice.text);
        self.emit("notice", notice);
    }

    fn render(&mut self, image: Option<&DynamicImage>, output_text: &str) {
        let image = match image.map(data_url::encode_png).transpose() {
            Ok(image) => image,
            Err(e) => {
                log::error!("Failed to encode image for display: {}", e);
                None
            }
        };
        self.emit(
            "screen-updated",
            ScreenState {
                output_text: output_text.to_string(),
                image,
            },
        );
    }
}
