use crate::error::AppError;
use crate::models::activity_types::{ActivityResult, ConfirmDialog, RequestToken};
use crate::models::permission_types::Permission;
use crate::models::screen_types::{Notice, ScreenState};
use crate::services::acquisition::{CameraSource, GallerySource, ImageSource};
use crate::services::classifier::inference::ImageClassifier;
use crate::services::data_url;
use crate::services::dispatcher::{Action, Continuation, ResultDispatcher};
use crate::services::host::Host;
use crate::services::image_store::{self, ContentResolver};
use crate::services::permission_gate::{self, GateOutcome};
use crate::services::pipeline;
use image::DynamicImage;

pub const MODEL_UNAVAILABLE_NOTICE: &str = "Model unavailable";
pub const CLASSIFICATION_FAILED_NOTICE: &str = "Classification failed";
pub const NO_IMAGE_NOTICE: &str = "No image to download";
pub const IMAGE_SAVED_NOTICE: &str = "Image Saved";

pub type BoxedClassifier = Box<dyn ImageClassifier + Send>;

/// The single screen: shown bitmap, output text, and every handler.
pub struct Screen<H: Host, S: ContentResolver> {
    host: H,
    store: S,
    classifier: Option<BoxedClassifier>,
    dispatcher: ResultDispatcher,
    camera: CameraSource,
    gallery: GallerySource,
    image: Option<DynamicImage>,
    output_text: String,
}

impl<H: Host, S: ContentResolver> Screen<H, S> {
    pub fn new(host: H, store: S, classifier: Option<BoxedClassifier>) -> Self {
        Self {
            host,
            store,
            classifier,
            dispatcher: ResultDispatcher::new(),
            camera: CameraSource,
            gallery: GallerySource::default(),
            image: None,
            output_text: String::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn output_text(&self) -> &str {
        &self.output_text
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn pending_requests(&self) -> usize {
        self.dispatcher.pending()
    }

    pub fn state(&self) -> Result<ScreenState, AppError> {
        let image = self.image.as_ref().map(data_url::encode_png).transpose()?;
        Ok(ScreenState {
            output_text: self.output_text.clone(),
            image,
        })
    }

    pub fn on_capture_clicked(&mut self) {
        self.gated(Permission::Camera, Action::Capture);
    }

    pub fn on_load_clicked(&mut self) {
        self.gated(Permission::ReadMediaImages, Action::Load);
    }

    pub fn on_download_clicked(&mut self) {
        if self.image.is_none() {
            self.host.show_notice(Notice::short(NO_IMAGE_NOTICE));
            return;
        }
        self.gated(Permission::WriteMediaImages, Action::Download);
    }

    /// Entry point for every asynchronous host answer.
    ///
    /// Only a failed save produces an error; everything else is handled here.
    pub fn on_activity_result(&mut self, token: RequestToken, result: ActivityResult) -> Result<(), AppError> {
        let Some(continuation) = self.dispatcher.take(token) else {
            return Ok(());
        };

        match (continuation, result) {
            (Continuation::Permission { permission, then }, ActivityResult::Permission { granted }) => {
                if permission_gate::on_result(&mut self.host, permission, granted) {
                    self.run_action(then);
                }
            }
            (Continuation::CameraPreview, result) => {
                if let Some(bitmap) = self.camera.accept(result, &self.store) {
                    self.show_and_classify(bitmap);
                }
            }
            (Continuation::GalleryPick, result) => {
                if let Some(bitmap) = self.gallery.accept(result, &self.store) {
                    self.show_and_classify(bitmap);
                }
            }
            (Continuation::ConfirmSave, ActivityResult::Confirm { confirmed }) => {
                if confirmed {
                    self.save_displayed_image()?;
                } else {
                    log::debug!("Download declined");
                }
            }
            (continuation, result) => {
                log::warn!("Dropping {} result for {:?}", result.name(), continuation);
            }
        }
        Ok(())
    }

    fn gated(&mut self, permission: Permission, action: Action) {
        match permission_gate::ensure(&mut self.host, &mut self.dispatcher, permission, action) {
            GateOutcome::Granted => self.run_action(action),
            GateOutcome::Requested(_) => {}
        }
    }

    fn run_action(&mut self, action: Action) {
        match action {
            Action::Capture => {
                let token = self.dispatcher.register(self.camera.continuation());
                self.camera.launch(&mut self.host, token);
            }
            Action::Load => {
                let token = self.dispatcher.register(self.gallery.continuation());
                self.gallery.launch(&mut self.host, token);
            }
            Action::Download => {
                let token = self.dispatcher.register(Continuation::ConfirmSave);
                self.host.confirm(&ConfirmDialog::download_image(), token);
            }
        }
    }

    fn show_and_classify(&mut self, bitmap: DynamicImage) {
        self.image = Some(bitmap);
        self.host.render(self.image.as_ref(), &self.output_text);

        let (Some(classifier), Some(bitmap)) = (self.classifier.as_mut(), self.image.as_ref()) else {
            log::error!("No model loaded, skipping classification");
            self.host.show_notice(Notice::short(MODEL_UNAVAILABLE_NOTICE));
            return;
        };

        match pipeline::run(&mut **classifier, bitmap) {
            Ok(outcome) => {
                self.output_text = outcome.display_text().to_string();
                self.host.render(self.image.as_ref(), &self.output_text);
            }
            Err(e) => {
                log::error!("Classification failed: {}", e);
                self.host.show_notice(Notice::short(CLASSIFICATION_FAILED_NOTICE));
            }
        }
    }

    fn save_displayed_image(&mut self) -> Result<(), AppError> {
        let Some(bitmap) = self.image.as_ref() else {
            self.host.show_notice(Notice::short(NO_IMAGE_NOTICE));
            return Ok(());
        };

        let timestamp = chrono::Utc::now().timestamp();
        if image_store::save_bitmap(&mut self.store, bitmap, timestamp)?.is_some() {
            self.host.show_notice(Notice::long(IMAGE_SAVED_NOTICE));
        }
        Ok(())
    }
}
