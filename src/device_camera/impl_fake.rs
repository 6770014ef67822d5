use crate::config::CameraConfig;
use crate::device_camera::interface::DeviceCamera;
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageBuffer, Rgb};
use rand::Rng;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Stands in for a webcam. Replays the images of `fake_frames_dir` in order, or
/// produces noise frames when no directory is configured.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    config: CameraConfig,
    frames: Vec<DynamicImage>,
    next_frame: AtomicUsize,
    started: AtomicBool,
}

impl DeviceCameraFake {
    pub fn new(
        config: CameraConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let frames = match &config.fake_frames_dir {
            Some(dir) => load_frames(dir)?,
            None => vec![],
        };

        Ok(Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            config,
            frames,
            next_frame: AtomicUsize::new(0),
            started: AtomicBool::new(false),
        })
    }

    #[cfg(test)]
    pub fn with_frames(
        config: CameraConfig,
        frames: Vec<DynamicImage>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            config,
            frames,
            next_frame: AtomicUsize::new(0),
            started: AtomicBool::new(false),
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    fn noise_frame(&self) -> DynamicImage {
        let mut rng = rand::rng();
        let img = ImageBuffer::from_fn(self.config.width, self.config.height, |_, _| {
            Rgb([rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>()])
        });
        DynamicImage::ImageRgb8(img)
    }
}

fn load_frames(
    dir: &Path,
) -> Result<Vec<DynamicImage>, Box<dyn std::error::Error + Send + Sync>> {
    let mut paths = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect::<Vec<_>>();
    paths.sort();

    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        frames.push(image::open(&path)?);
    }

    if frames.is_empty() {
        return Err(format!("No frames found in {}", dir.display()).into());
    }

    Ok(frames)
}

impl DeviceCamera for DeviceCameraFake {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Starting camera...")?;
        std::thread::sleep(self.config.fake_delay);
        self.started.store(true, Ordering::SeqCst);
        self.logger.info("Camera started")?;
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Stopping camera...")?;
        self.started.store(false, Ordering::SeqCst);
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn capture_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        if !self.is_started() {
            return Err("Camera is not started".into());
        }

        std::thread::sleep(self.config.fake_delay);

        let image = if self.frames.is_empty() {
            self.noise_frame()
        } else {
            let index = self.next_frame.fetch_add(1, Ordering::SeqCst) % self.frames.len();
            self.frames[index].clone()
        };

        if self.config.flip_horizontal {
            Ok(image.fliph())
        } else {
            Ok(image)
        }
    }
}
