use image::{DynamicImage, Rgba, RgbaImage};
use mushroom_lens_lib::error::AppError;
use mushroom_lens_lib::models::activity_types::{
    ActivityResult, ConfirmDialog, ContentUri, GalleryRequest, RequestToken, ResultCode,
};
use mushroom_lens_lib::models::classify_types::Category;
use mushroom_lens_lib::models::permission_types::{Permission, PermissionState};
use mushroom_lens_lib::models::screen_types::Notice;
use mushroom_lens_lib::services::classifier::inference::{ImageClassifier, InputSpec, TensorImage};
use mushroom_lens_lib::services::host::Host;
use mushroom_lens_lib::services::image_store::FsImageStore;
use mushroom_lens_lib::services::screen::Screen;

/// Scores by mean red intensity so different photos get different labels.
struct RednessClassifier {
    spec: InputSpec,
}

impl ImageClassifier for RednessClassifier {
    fn input_spec(&self) -> &InputSpec {
        &self.spec
    }

    fn process(&mut self, image: &TensorImage) -> Result<Vec<Category>, AppError> {
        let red = image.tensor.index_axis(ndarray::Axis(1), 0).mean().unwrap_or(0.0);
        // Red plane normalized with mean 0, std 1 so `red` is in [0, 1].
        Ok(vec![
            Category::new("Fly agaric", red),
            Category::new("Puffball", 1.0 - red),
        ])
    }
}

#[derive(Default)]
struct WebviewHost {
    granted: Vec<Permission>,
    tokens: Vec<RequestToken>,
    prompts: Vec<Permission>,
    notices: Vec<Notice>,
    gallery_mimes: Vec<String>,
}

impl Host for WebviewHost {
    fn check_permission(&self, permission: Permission) -> PermissionState {
        self.granted.contains(&permission).into()
    }

    fn request_permission(&mut self, permission: Permission, token: RequestToken) {
        self.prompts.push(permission);
        self.tokens.push(token);
    }

    fn launch_camera_preview(&mut self, token: RequestToken) {
        self.tokens.push(token);
    }

    fn launch_gallery(&mut self, request: &GalleryRequest, token: RequestToken) {
        self.gallery_mimes = request.mime_types.clone();
        self.tokens.push(token);
    }

    fn confirm(&mut self, _dialog: &ConfirmDialog, token: RequestToken) {
        self.tokens.push(token);
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn render(&mut self, _image: Option<&DynamicImage>, _output_text: &str) {}
}

fn solid(r: u8) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 30, Rgba([r, 10, 10, 255])))
}

fn new_screen(dir: &tempfile::TempDir) -> Screen<WebviewHost, FsImageStore> {
    let classifier = RednessClassifier {
        spec: InputSpec {
            size: 16,
            mean: [0.0; 3],
            std: [1.0; 3],
        },
    };
    Screen::new(
        WebviewHost::default(),
        FsImageStore::new(dir.path().join("Pictures")),
        Some(Box::new(classifier)),
    )
}

fn last_token(screen: &Screen<WebviewHost, FsImageStore>) -> RequestToken {
    *screen.host().tokens.last().expect("host saw a request")
}

#[test]
fn load_prompts_then_classifies_picked_file() {
    let dir = tempfile::tempdir().unwrap();
    let picked = dir.path().join("red.png");
    solid(250).save(&picked).unwrap();

    let mut screen = new_screen(&dir);
    screen.on_load_clicked();
    assert_eq!(screen.host().prompts, vec![Permission::ReadMediaImages]);

    let token = last_token(&screen);
    screen
        .on_activity_result(token, ActivityResult::Permission { granted: true })
        .unwrap();
    assert_eq!(
        screen.host().gallery_mimes,
        vec!["image/jpeg", "image/png", "image/jpg"]
    );

    let token = last_token(&screen);
    screen
        .on_activity_result(
            token,
            ActivityResult::Gallery {
                code: ResultCode::Ok,
                data: ContentUri::from_file_path(&picked),
            },
        )
        .unwrap();
    assert_eq!(screen.output_text(), "Fly agaric");
}

#[test]
fn second_capture_replaces_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = new_screen(&dir);
    screen.host_mut().granted.push(Permission::Camera);

    screen.on_capture_clicked();
    let token = last_token(&screen);
    screen
        .on_activity_result(token, ActivityResult::CameraPreview(Some(solid(255))))
        .unwrap();
    assert_eq!(screen.output_text(), "Fly agaric");

    screen.on_capture_clicked();
    let token = last_token(&screen);
    screen
        .on_activity_result(token, ActivityResult::CameraPreview(Some(solid(0))))
        .unwrap();
    assert_eq!(screen.output_text(), "Puffball");
}

#[test]
fn failed_pick_does_not_classify() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = new_screen(&dir);
    screen.host_mut().granted.push(Permission::ReadMediaImages);

    screen.on_load_clicked();
    let token = last_token(&screen);
    screen
        .on_activity_result(
            token,
            ActivityResult::Gallery {
                code: ResultCode::Failed,
                data: None,
            },
        )
        .unwrap();

    assert!(screen.image().is_none());
    assert_eq!(screen.output_text(), "");
    assert!(screen.host().notices.is_empty());
}

#[test]
fn declined_download_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = new_screen(&dir);
    screen
        .host_mut()
        .granted
        .extend([Permission::Camera, Permission::WriteMediaImages]);

    screen.on_capture_clicked();
    let token = last_token(&screen);
    screen
        .on_activity_result(token, ActivityResult::CameraPreview(Some(solid(90))))
        .unwrap();

    screen.on_download_clicked();
    let token = last_token(&screen);
    screen
        .on_activity_result(token, ActivityResult::Confirm { confirmed: false })
        .unwrap();

    assert!(!screen.store().root().exists());
    assert!(screen.host().notices.is_empty());
}

#[test]
fn confirmed_download_lands_in_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = new_screen(&dir);
    screen
        .host_mut()
        .granted
        .extend([Permission::Camera, Permission::WriteMediaImages]);

    screen.on_capture_clicked();
    let token = last_token(&screen);
    screen
        .on_activity_result(token, ActivityResult::CameraPreview(Some(solid(90))))
        .unwrap();

    screen.on_download_clicked();
    let token = last_token(&screen);
    screen
        .on_activity_result(token, ActivityResult::Confirm { confirmed: true })
        .unwrap();

    let entries: Vec<_> = std::fs::read_dir(screen.store().root()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(screen.host().notices, vec![Notice::long("Image Saved")]);
}
