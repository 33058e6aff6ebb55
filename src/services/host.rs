use crate::models::activity_types::{ConfirmDialog, GalleryRequest, RequestToken};
use crate::models::permission_types::{Permission, PermissionState};
use crate::models::screen_types::Notice;
use image::DynamicImage;

/// The platform the screen runs in.
///
/// Every `launch_*`, `request_*` and `confirm` call returns immediately. The
/// platform answers later by handing an `ActivityResult` for the same token
/// back to `Screen::on_activity_result`.
pub trait Host {
    fn check_permission(&self, permission: Permission) -> PermissionState;

    fn request_permission(&mut self, permission: Permission, token: RequestToken);

    fn launch_camera_preview(&mut self, token: RequestToken);

    fn launch_gallery(&mut self, request: &GalleryRequest, token: RequestToken);

    fn confirm(&mut self, dialog: &ConfirmDialog, token: RequestToken);

    fn show_notice(&mut self, notice: Notice);

    /// Redraws the screen with the current bitmap and output text.
    fn render(&mut self, image: Option<&DynamicImage>, output_text: &str);
}
