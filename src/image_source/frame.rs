use image::DynamicImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOrigin {
    Camera { session: u64 },
    Upload { id: u64 },
}

/// A single still image handed to the classifier, whatever produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub image: DynamicImage,
    pub origin: FrameOrigin,
}

impl Frame {
    pub fn from_camera(session: u64, image: DynamicImage) -> Self {
        Self {
            image,
            origin: FrameOrigin::Camera { session },
        }
    }

    pub fn from_upload(id: u64, image: DynamicImage) -> Self {
        Self {
            image,
            origin: FrameOrigin::Upload { id },
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
