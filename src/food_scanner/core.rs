use crate::config::Config;
use crate::device_display::interface::UiEvent;
use crate::image_classifier::interface::{ModelInfo, Prediction};
use crate::image_source::frame::{Frame, FrameOrigin};
use crate::nutrition::local_table::{NutritionRecord, NutritionTable, Resolution};
use crate::nutrition_lookup::error::LookupError;
use crate::nutrition_lookup::interface::RemoteNutrients;
use crate::prediction::confidence_gate::sanitize_threshold;
use crate::prediction::pipeline::{evaluate, PipelineOutcome};
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierStatus {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    None,
    Camera,
    Image { id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    AwaitingFrame,
    Capturing,
    Classifying,
}

/// Only `Running` schedules ticks. Results that arrive in any other state, or
/// from an earlier camera session, are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderLoop {
    Idle,
    Starting,
    Running(FrameStep),
}

/// What the camera hardware is doing. At most one start or stop runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraDevice {
    Stopped,
    Starting,
    Started,
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Prediction,
    Camera,
    Capture,
    Upload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Readout {
    Waiting,
    Prediction(PipelineOutcome),
    Failed(Failure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NutritionCard {
    Empty,
    NoData,
    Local {
        label: String,
        record: NutritionRecord,
    },
    NotFound {
        label: String,
    },
    Searching {
        label: String,
    },
    Remote {
        label: String,
        nutrients: RemoteNutrients,
    },
    RemoteNoData {
        label: String,
    },
    RemoteFailed {
        label: String,
    },
    RemoteNotConfigured,
}

impl NutritionCard {
    /// Remote cards survive new predictions for the label they describe.
    fn remote_label(&self) -> Option<&str> {
        match self {
            NutritionCard::Searching { label }
            | NutritionCard::Remote { label, .. }
            | NutritionCard::RemoteNoData { label }
            | NutritionCard::RemoteFailed { label } => Some(label),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub classifier: ClassifierStatus,
    pub source: ActiveSource,
    pub render_loop: RenderLoop,
    pub camera_device: CameraDevice,
    pub camera_session: u64,
    pub threshold: f32,
    pub readout: Readout,
    pub nutrition: NutritionCard,
    pub last_top_label: Option<String>,
    pub notice: Option<String>,
    pub preview: Option<Arc<DynamicImage>>,
    pub lookup_in_flight: bool,
    pub next_upload_id: u64,
    pub quitting: bool,
}

impl Model {
    fn reset_session(self) -> Self {
        Self {
            readout: Readout::Waiting,
            nutrition: NutritionCard::Empty,
            last_top_label: None,
            preview: None,
            ..self
        }
    }
}

#[derive(Debug)]
pub enum Event {
    ModelLoadDone(Result<ModelInfo, Box<dyn std::error::Error + Send + Sync>>),
    Ui(UiEvent),
    CameraStartDone(Result<(), Box<dyn std::error::Error + Send + Sync>>),
    CameraStopDone(Result<(), Box<dyn std::error::Error + Send + Sync>>),
    FrameRequested {
        session: u64,
    },
    FrameCaptureDone {
        session: u64,
        result: Result<Frame, Box<dyn std::error::Error + Send + Sync>>,
    },
    UploadLoadDone {
        id: u64,
        result: Result<Frame, Box<dyn std::error::Error + Send + Sync>>,
    },
    ClassifyDone {
        origin: FrameOrigin,
        result: Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>>,
    },
    RemoteLookupDone {
        label: String,
        result: Result<Option<RemoteNutrients>, LookupError>,
    },
}

fn frame_summary(frame: &Frame) -> String {
    format!("Frame({:?}, {}x{})", frame.origin, frame.width(), frame.height())
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::FrameCaptureDone {
                session,
                result: Ok(frame),
            } => format!(
                "FrameCaptureDone {{ session: {}, {} }}",
                session,
                frame_summary(frame)
            ),
            Event::UploadLoadDone {
                id,
                result: Ok(frame),
            } => format!("UploadLoadDone {{ id: {}, {} }}", id, frame_summary(frame)),
            event => format!("{:?}", event),
        }
    }

    /// Successful steps of the camera loop.
    pub fn is_per_frame(&self) -> bool {
        matches!(
            self,
            Event::FrameRequested { .. }
                | Event::FrameCaptureDone { result: Ok(_), .. }
                | Event::ClassifyDone {
                    origin: FrameOrigin::Camera { .. },
                    result: Ok(_),
                }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadModel,
    SubscribeToUiEvents,
    StartCamera,
    StopCamera,
    RequestFrame { session: u64 },
    CaptureFrame { session: u64 },
    LoadUpload { id: u64, path: PathBuf },
    Classify { frame: Frame },
    RemoteLookup { label: String },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::Classify { frame } => format!("Classify {{ {} }}", frame_summary(frame)),
            effect => format!("{:?}", effect),
        }
    }

    /// Effects that repeat on every camera tick.
    pub fn is_per_frame(&self) -> bool {
        matches!(
            self,
            Effect::RequestFrame { .. }
                | Effect::CaptureFrame { .. }
                | Effect::Classify {
                    frame: Frame {
                        origin: FrameOrigin::Camera { .. },
                        ..
                    }
                }
        )
    }
}

pub fn init(config: &Config) -> (Model, Vec<Effect>) {
    (
        Model {
            classifier: ClassifierStatus::Loading,
            source: ActiveSource::None,
            render_loop: RenderLoop::Idle,
            camera_device: CameraDevice::Stopped,
            camera_session: 0,
            threshold: sanitize_threshold(config.confidence_threshold).unwrap_or(0.5),
            readout: Readout::Waiting,
            nutrition: NutritionCard::Empty,
            last_top_label: None,
            notice: None,
            preview: None,
            lookup_in_flight: false,
            next_upload_id: 0,
            quitting: false,
        },
        vec![Effect::LoadModel, Effect::SubscribeToUiEvents],
    )
}

/// Quitting waits for the camera to be released.
pub fn is_done(model: &Model) -> bool {
    model.quitting && model.camera_device == CameraDevice::Stopped
}

pub fn transition(
    config: &Config,
    table: &NutritionTable,
    model: Model,
    event: Event,
) -> (Model, Vec<Effect>) {
    let (model, effects) = apply_event(config, table, model, event);
    sync_camera_device(model, effects)
}

/// Brings the device in line with the render loop, one start or stop at a time.
fn sync_camera_device(model: Model, mut effects: Vec<Effect>) -> (Model, Vec<Effect>) {
    match (model.camera_device, model.render_loop) {
        (CameraDevice::Stopped, RenderLoop::Starting) => {
            effects.push(Effect::StartCamera);
            (
                Model {
                    camera_device: CameraDevice::Starting,
                    ..model
                },
                effects,
            )
        }
        (CameraDevice::Started, RenderLoop::Idle) => {
            effects.push(Effect::StopCamera);
            (
                Model {
                    camera_device: CameraDevice::Stopping,
                    ..model
                },
                effects,
            )
        }
        _ => (model, effects),
    }
}

fn is_current_frame_step(model: &Model, session: u64, step: FrameStep) -> bool {
    session == model.camera_session && model.render_loop == RenderLoop::Running(step)
}

fn apply_event(
    config: &Config,
    table: &NutritionTable,
    model: Model,
    event: Event,
) -> (Model, Vec<Effect>) {
    match event {
        Event::ModelLoadDone(result) => {
            let classifier = match result {
                Ok(_) => ClassifierStatus::Ready,
                Err(_) => ClassifierStatus::Failed,
            };
            (Model { classifier, ..model }, vec![])
        }

        Event::Ui(ui_event) => on_ui_event(config, Model { notice: None, ..model }, ui_event),

        Event::CameraStartDone(result) => {
            let camera_device = match result {
                Ok(()) => CameraDevice::Started,
                Err(_) => CameraDevice::Stopped,
            };
            let model = Model {
                camera_device,
                ..model
            };
            match (model.render_loop, camera_device) {
                (RenderLoop::Starting, CameraDevice::Started) => {
                    let session = model.camera_session;
                    (
                        Model {
                            render_loop: RenderLoop::Running(FrameStep::AwaitingFrame),
                            ..model
                        },
                        vec![Effect::RequestFrame { session }],
                    )
                }
                (RenderLoop::Starting, _) => (
                    Model {
                        render_loop: RenderLoop::Idle,
                        source: ActiveSource::None,
                        readout: Readout::Failed(Failure::Camera),
                        ..model
                    },
                    vec![],
                ),
                _ => (model, vec![]),
            }
        }

        Event::CameraStopDone(_) => (
            Model {
                camera_device: CameraDevice::Stopped,
                ..model
            },
            vec![],
        ),

        Event::FrameRequested { session } => {
            if !is_current_frame_step(&model, session, FrameStep::AwaitingFrame) {
                return (model, vec![]);
            }
            (
                Model {
                    render_loop: RenderLoop::Running(FrameStep::Capturing),
                    ..model
                },
                vec![Effect::CaptureFrame { session }],
            )
        }

        Event::FrameCaptureDone { session, result } => {
            if !is_current_frame_step(&model, session, FrameStep::Capturing) {
                return (model, vec![]);
            }
            match result {
                Ok(frame) => (
                    Model {
                        render_loop: RenderLoop::Running(FrameStep::Classifying),
                        preview: Some(Arc::new(frame.image.clone())),
                        ..model
                    },
                    vec![Effect::Classify { frame }],
                ),
                Err(_) => (
                    Model {
                        render_loop: RenderLoop::Idle,
                        source: ActiveSource::None,
                        readout: Readout::Failed(Failure::Capture),
                        ..model
                    },
                    vec![],
                ),
            }
        }

        Event::UploadLoadDone { id, result } => {
            if model.source != (ActiveSource::Image { id }) {
                return (model, vec![]);
            }
            match result {
                Ok(frame) => (
                    Model {
                        preview: Some(Arc::new(frame.image.clone())),
                        ..model
                    },
                    vec![Effect::Classify { frame }],
                ),
                Err(_) => (
                    Model {
                        readout: Readout::Failed(Failure::Upload),
                        ..model
                    },
                    vec![],
                ),
            }
        }

        Event::ClassifyDone { origin, result } => match origin {
            FrameOrigin::Camera { session } => {
                if !is_current_frame_step(&model, session, FrameStep::Classifying) {
                    return (model, vec![]);
                }
                let model = apply_predictions(
                    config,
                    table,
                    Model {
                        render_loop: RenderLoop::Running(FrameStep::AwaitingFrame),
                        ..model
                    },
                    result,
                );
                (model, vec![Effect::RequestFrame { session }])
            }
            FrameOrigin::Upload { id } => {
                if model.source != (ActiveSource::Image { id }) {
                    return (model, vec![]);
                }
                (apply_predictions(config, table, model, result), vec![])
            }
        },

        Event::RemoteLookupDone { label, result } => {
            let model = Model {
                lookup_in_flight: false,
                ..model
            };
            if model.last_top_label.as_deref() != Some(label.as_str()) {
                return (model, vec![]);
            }
            let nutrition = match result {
                Ok(Some(nutrients)) => NutritionCard::Remote { label, nutrients },
                Ok(None) => NutritionCard::RemoteNoData { label },
                Err(LookupError::NotConfigured) => NutritionCard::RemoteNotConfigured,
                Err(_) => NutritionCard::RemoteFailed { label },
            };
            (Model { nutrition, ..model }, vec![])
        }
    }
}

fn on_ui_event(config: &Config, model: Model, ui_event: UiEvent) -> (Model, Vec<Effect>) {
    if model.quitting {
        return (model, vec![]);
    }

    match ui_event {
        UiEvent::StartCamera => {
            if model.classifier != ClassifierStatus::Ready {
                return with_notice(model, "Model not loaded yet");
            }
            if model.render_loop != RenderLoop::Idle {
                return (model, vec![]);
            }
            (
                Model {
                    source: ActiveSource::Camera,
                    render_loop: RenderLoop::Starting,
                    camera_session: model.camera_session + 1,
                    ..model.reset_session()
                },
                vec![],
            )
        }

        UiEvent::StopCamera => {
            if model.render_loop == RenderLoop::Idle {
                return (model, vec![]);
            }
            (
                Model {
                    source: ActiveSource::None,
                    render_loop: RenderLoop::Idle,
                    ..model.reset_session()
                },
                vec![],
            )
        }

        UiEvent::Upload(path) => {
            if model.classifier != ClassifierStatus::Ready {
                return with_notice(model, "Model not loaded yet");
            }
            let id = model.next_upload_id;
            (
                Model {
                    source: ActiveSource::Image { id },
                    render_loop: RenderLoop::Idle,
                    next_upload_id: id + 1,
                    ..model.reset_session()
                },
                vec![Effect::LoadUpload { id, path }],
            )
        }

        UiEvent::ThresholdChanged(value) => match sanitize_threshold(value) {
            Some(threshold) => (Model { threshold, ..model }, vec![]),
            None => (model, vec![]),
        },

        UiEvent::RemoteLookup => {
            if model.lookup_in_flight {
                return (model, vec![]);
            }
            let label = match &model.last_top_label {
                Some(label) => label.clone(),
                None => return with_notice(model, "No top label to lookup"),
            };
            if config.nutrition_lookup.endpoint.is_none() {
                return (
                    Model {
                        nutrition: NutritionCard::RemoteNotConfigured,
                        ..model
                    },
                    vec![],
                );
            }
            (
                Model {
                    nutrition: NutritionCard::Searching {
                        label: label.clone(),
                    },
                    lookup_in_flight: true,
                    ..model
                },
                vec![Effect::RemoteLookup { label }],
            )
        }

        UiEvent::Quit => (
            Model {
                quitting: true,
                render_loop: RenderLoop::Idle,
                ..model
            },
            vec![],
        ),
    }
}

fn with_notice(model: Model, notice: &str) -> (Model, Vec<Effect>) {
    (
        Model {
            notice: Some(notice.to_string()),
            ..model
        },
        vec![],
    )
}

fn apply_predictions(
    config: &Config,
    table: &NutritionTable,
    model: Model,
    result: Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>>,
) -> Model {
    let ranked = match result {
        Ok(ranked) => ranked,
        Err(_) => {
            return Model {
                readout: Readout::Failed(Failure::Prediction),
                ..model
            }
        }
    };

    let outcome = evaluate(&ranked, model.threshold, config.top_n);
    let top_label = outcome.top_label().map(str::to_string);

    match top_label {
        Some(label) => {
            let keep_remote = model.nutrition.remote_label() == Some(label.as_str());
            let nutrition = if keep_remote {
                model.nutrition
            } else {
                match table.resolve(&label) {
                    Resolution::Local { label, record } => NutritionCard::Local { label, record },
                    Resolution::NotFound { label } => NutritionCard::NotFound { label },
                }
            };
            Model {
                readout: Readout::Prediction(outcome),
                nutrition,
                last_top_label: Some(label),
                ..model
            }
        }
        None => Model {
            readout: Readout::Prediction(outcome),
            nutrition: NutritionCard::NoData,
            last_top_label: None,
            ..model
        },
    }
}
