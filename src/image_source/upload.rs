use crate::image_source::frame::Frame;
use std::path::Path;

pub fn load_upload(
    id: u64,
    path: &Path,
) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
    if !path.is_file() {
        return Err(format!("No image file at {}", path.display()).into());
    }

    let image = image::open(path)?;

    Ok(Frame::from_upload(id, image))
}
