//! Scene file loading.
//!
//! A scene file is the JSON handoff from the capture side: the camera state
//! at the moment of capture plus whatever the on-device recognizer found in
//! the frame. Commands load one scene and drive the engine with it.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use skylens::capture::{CaptureError, CaptureMetadata, FrameSize};
use skylens::geo::GeoPoint;
use skylens::sources::{RecognizedObject, VisionSource};

use crate::error::CliError;

/// One captured scene: camera state plus recognizer output.
#[derive(Debug, Deserialize)]
pub struct Scene {
    /// Camera sensor state at capture time.
    pub camera: CameraFrame,
    /// Objects the recognizer found in the frame.
    #[serde(default)]
    pub recognized: Vec<RecognizedObject>,
}

/// Camera state as recorded by the capture device.
#[derive(Debug, Deserialize)]
pub struct CameraFrame {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude_m: f64,
    pub heading_deg: f64,
    #[serde(default)]
    pub pitch_deg: f64,
    #[serde(default)]
    pub roll_deg: f64,
    pub fov_deg: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default = "default_accuracy_m")]
    pub accuracy_m: f64,
    pub frame_width: u32,
    pub frame_height: u32,
}

fn default_zoom() -> f64 {
    1.0
}

fn default_accuracy_m() -> f64 {
    10.0
}

impl Scene {
    /// Load a scene from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let data = fs::read_to_string(path).map_err(|e| CliError::Scene {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&data).map_err(|e| CliError::Scene {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Camera state as validated capture metadata.
    pub fn metadata(&self) -> Result<CaptureMetadata, CliError> {
        let position = GeoPoint::new(self.camera.latitude, self.camera.longitude)
            .map_err(CaptureError::from)?;

        let metadata = CaptureMetadata::new(
            position,
            self.camera.altitude_m,
            self.camera.heading_deg,
            self.camera.pitch_deg,
            self.camera.roll_deg,
            self.camera.fov_deg,
            self.camera.zoom,
            self.camera.accuracy_m,
            FrameSize::new(self.camera.frame_width, self.camera.frame_height),
        )?;

        Ok(metadata)
    }

    /// Vision source over the scene's recognized objects, if it found any.
    pub fn vision_source(&self) -> Option<VisionSource> {
        if self.recognized.is_empty() {
            None
        } else {
            Some(VisionSource::new(self.recognized.clone()))
        }
    }
}
