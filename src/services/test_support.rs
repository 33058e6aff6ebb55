use crate::error::AppError;
use crate::models::activity_types::{ConfirmDialog, ContentUri, GalleryRequest, RequestToken};
use crate::models::classify_types::Category;
use crate::models::permission_types::{Permission, PermissionState};
use crate::models::screen_types::Notice;
use crate::services::classifier::inference::{ImageClassifier, InputSpec, TensorImage};
use crate::services::host::Host;
use crate::services::image_store::ContentResolver;
use image::DynamicImage;
use std::collections::HashSet;
use std::io::{Read, Write};

pub struct FakeClassifier {
    spec: InputSpec,
    categories: Vec<Category>,
    fail: bool,
    pub calls: usize,
    pub last_shape: Option<Vec<usize>>,
}

impl FakeClassifier {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            spec: InputSpec::default(),
            categories,
            fail: false,
            calls: 0,
            last_shape: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }
}

impl ImageClassifier for FakeClassifier {
    fn input_spec(&self) -> &InputSpec {
        &self.spec
    }

    fn process(&mut self, image: &TensorImage) -> Result<Vec<Category>, AppError> {
        self.calls += 1;
        self.last_shape = Some(image.shape().to_vec());
        if self.fail {
            return Err(AppError::model("Inference failed: fake"));
        }
        Ok(self.categories.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    RequestPermission(Permission, RequestToken),
    LaunchCamera(RequestToken),
    LaunchGallery(RequestToken),
    Confirm(RequestToken),
}

#[derive(Default)]
pub struct FakeHost {
    pub granted: HashSet<Permission>,
    pub calls: Vec<HostCall>,
    pub notices: Vec<Notice>,
    pub renders: usize,
    pub last_text: Option<String>,
}

impl FakeHost {
    pub fn granting(permissions: &[Permission]) -> Self {
        Self {
            granted: permissions.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn last_token(&self) -> RequestToken {
        match self.calls.last() {
            Some(HostCall::RequestPermission(_, t))
            | Some(HostCall::LaunchCamera(t))
            | Some(HostCall::LaunchGallery(t))
            | Some(HostCall::Confirm(t)) => *t,
            None => panic!("no host call recorded"),
        }
    }
}

impl Host for FakeHost {
    fn check_permission(&self, permission: Permission) -> PermissionState {
        self.granted.contains(&permission).into()
    }

    fn request_permission(&mut self, permission: Permission, token: RequestToken) {
        self.calls.push(HostCall::RequestPermission(permission, token));
    }

    fn launch_camera_preview(&mut self, token: RequestToken) {
        self.calls.push(HostCall::LaunchCamera(token));
    }

    fn launch_gallery(&mut self, _request: &GalleryRequest, token: RequestToken) {
        self.calls.push(HostCall::LaunchGallery(token));
    }

    fn confirm(&mut self, _dialog: &ConfirmDialog, token: RequestToken) {
        self.calls.push(HostCall::Confirm(token));
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn render(&mut self, _image: Option<&DynamicImage>, output_text: &str) {
        self.renders += 1;
        self.last_text = Some(output_text.to_string());
    }
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("device full"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Accepts new entries but fails every write to them.
pub struct FailingStore {
    pub deleted: Vec<ContentUri>,
    dir: tempfile::TempDir,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            deleted: Vec::new(),
            dir: tempfile::tempdir().unwrap(),
        }
    }
}

impl ContentResolver for FailingStore {
    fn open_input(&self, _uri: &ContentUri) -> Result<Option<Box<dyn Read>>, AppError> {
        Ok(None)
    }

    fn insert(&mut self, display_name: &str, _mime_type: &str) -> Result<Option<ContentUri>, AppError> {
        Ok(ContentUri::from_file_path(&self.dir.path().join(display_name)))
    }

    fn open_output(&mut self, _uri: &ContentUri) -> Result<Box<dyn Write>, AppError> {
        Ok(Box::new(FailingWriter))
    }

    fn delete(&mut self, uri: &ContentUri) -> Result<(), AppError> {
        self.deleted.push(uri.clone());
        Ok(())
    }
}
