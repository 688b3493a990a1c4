// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame acquisition from cameras and still-image sequences.
//!
//! Every source yields RGBA frames of a fixed size for the whole session.
//! Sources release their device when dropped, so every exit path of the
//! application gives the camera back exactly once.

use crate::error::FretcamError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// An RGBA video frame.
pub type Frame = image::RgbaImage;

/// Anything that produces frames for the per-frame loop.
pub trait FrameSource {
    /// Frame size in pixels (width, height), constant for the session.
    fn dimensions(&self) -> (u32, u32);

    /// Read the next frame. `Ok(None)` means the source has ended.
    fn read(&mut self) -> Result<Option<Frame>>;
}

/// Flip a frame horizontally in place so the preview behaves like a mirror.
pub fn mirror(frame: &mut Frame) {
    image::imageops::flip_horizontal_in_place(frame);
}

/// A decoded still image.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Load an image file as RGBA pixels.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();
    Ok(LoadedImage {
        width: img.width(),
        height: img.height(),
        pixels: img.into_raw(),
    })
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

/// Plays a directory of still images, in file-name order, as a video.
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next: usize,
    dimensions: (u32, u32),
    looping: bool,
}

impl ImageSequence {
    /// Open a directory of images. Fails if it holds no readable image.
    pub fn open(dir: &Path, looping: bool) -> Result<Self> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read frame directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let first = paths.first().ok_or_else(|| {
            FretcamError::CameraUnavailable(format!("no images found in {}", dir.display()))
        })?;
        let first = load_image(first)?;

        log::info!(
            "Opened image sequence {} ({} frames, {}x{})",
            dir.display(),
            paths.len(),
            first.width,
            first.height
        );

        Ok(Self {
            paths,
            next: 0,
            dimensions: (first.width, first.height),
            looping,
        })
    }
}

impl FrameSource for ImageSequence {
    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn read(&mut self) -> Result<Option<Frame>> {
        if self.next >= self.paths.len() {
            if !self.looping {
                return Ok(None);
            }
            self.next = 0;
        }
        let path = &self.paths[self.next];
        self.next += 1;

        let loaded = load_image(path)?;
        if (loaded.width, loaded.height) != self.dimensions {
            anyhow::bail!(
                "Frame {} is {}x{}, expected {}x{}",
                path.display(),
                loaded.width,
                loaded.height,
                self.dimensions.0,
                self.dimensions.1
            );
        }
        let frame = Frame::from_raw(loaded.width, loaded.height, loaded.pixels)
            .context("Decoded frame has an unexpected buffer size")?;
        Ok(Some(frame))
    }
}

/// Live camera capture through OpenCV.
#[cfg(feature = "video-opencv")]
pub struct Camera {
    capture: opencv::videoio::VideoCapture,
    dimensions: (u32, u32),
}

#[cfg(feature = "video-opencv")]
impl Camera {
    /// Open camera `index`. Fails with [`FretcamError::CameraUnavailable`].
    pub fn open(index: i32) -> Result<Self> {
        use opencv::prelude::*;
        use opencv::videoio::{self, VideoCapture};

        let capture = VideoCapture::new(index, videoio::CAP_ANY)
            .map_err(|e| FretcamError::CameraUnavailable(format!("camera {}: {}", index, e)))?;
        if !capture.is_opened()? {
            return Err(FretcamError::CameraUnavailable(format!("camera {} could not be opened", index)).into());
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        log::info!("Opened camera {} ({}x{})", index, width, height);

        Ok(Self {
            capture,
            dimensions: (width, height),
        })
    }
}

#[cfg(feature = "video-opencv")]
impl FrameSource for Camera {
    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn read(&mut self) -> Result<Option<Frame>> {
        use opencv::core::Mat;
        use opencv::imgproc;
        use opencv::prelude::*;

        let mut bgr = Mat::default();
        if !self.capture.read(&mut bgr)? || bgr.empty() {
            return Ok(None);
        }

        let mut rgba = Mat::default();
        imgproc::cvt_color(&bgr, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;

        let (width, height) = (rgba.cols() as u32, rgba.rows() as u32);
        let pixels = rgba.data_bytes()?.to_vec();
        let frame = Frame::from_raw(width, height, pixels)
            .context("Camera frame has an unexpected buffer size")?;
        Ok(Some(frame))
    }
}

#[cfg(feature = "video-opencv")]
impl Drop for Camera {
    fn drop(&mut self) {
        use opencv::prelude::*;

        if let Err(e) = self.capture.release() {
            log::warn!("Failed to release camera: {}", e);
        } else {
            log::info!("Camera released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_frame(dir: &Path, name: &str, width: u32, height: u32, shade: u8) {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([shade, 0, 0, 255]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_image_sequence_plays_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "b.png", 4, 3, 20);
        write_frame(dir.path(), "a.png", 4, 3, 10);
        std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

        let mut seq = ImageSequence::open(dir.path(), false).unwrap();
        assert_eq!(seq.paths.len(), 2);
        assert_eq!(seq.dimensions(), (4, 3));

        let first = seq.read().unwrap().unwrap();
        assert_eq!(first.get_pixel(0, 0)[0], 10);
        let second = seq.read().unwrap().unwrap();
        assert_eq!(second.get_pixel(0, 0)[0], 20);
        assert!(seq.read().unwrap().is_none());
    }

    #[test]
    fn test_image_sequence_loops() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "only.png", 2, 2, 7);

        let mut seq = ImageSequence::open(dir.path(), true).unwrap();
        for _ in 0..3 {
            assert!(seq.read().unwrap().is_some());
        }
    }

    #[test]
    fn test_image_sequence_rejects_size_change() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "a.png", 4, 3, 1);
        write_frame(dir.path(), "b.png", 5, 3, 1);

        let mut seq = ImageSequence::open(dir.path(), false).unwrap();
        assert!(seq.read().is_ok());
        assert!(seq.read().is_err());
    }

    #[test]
    fn test_empty_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = match ImageSequence::open(dir.path(), false) {
            Err(e) => e,
            Ok(_) => panic!("empty directory should not open"),
        };
        assert!(matches!(
            err.downcast_ref::<FretcamError>(),
            Some(FretcamError::CameraUnavailable(_))
        ));
    }

    #[test]
    fn test_mirror() {
        let mut frame = Frame::new(2, 1);
        frame.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        mirror(&mut frame);
        assert_eq!(frame.get_pixel(1, 0)[0], 255);
        assert_eq!(frame.get_pixel(0, 0)[0], 0);
    }
}
