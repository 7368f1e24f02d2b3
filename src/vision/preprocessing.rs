// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the disease classifiers
//!
//! Uploads are resized directly to the model's declared spatial size. Aspect
//! ratio is not preserved, so a non-square photo is stretched.

use image::{imageops::FilterType, DynamicImage, RgbImage};
use ndarray::Array4;
use serde::{Deserialize, Serialize};

use crate::inference::PredictionError;

/// Position of the channel axis in the model input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// `[N, H, W, C]` (Keras export default)
    ChannelsLast,
    /// `[N, C, H, W]`
    ChannelsFirst,
}

/// Pixel scaling applied when building the input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// pixel / 255.0
    #[default]
    Unit,
    /// pixel as-is, 0.0..=255.0
    Raw,
}

/// Target size and layout derived from a model's declared input shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub height: u32,
    pub width: u32,
    pub layout: ChannelLayout,
}

impl InputSpec {
    /// Derive the spatial target from a declared input shape
    ///
    /// Accepts `[N, H, W, 3]` and `[N, 3, H, W]` with static, positive H and W.
    /// Anything else fails with `UnsupportedModelDimensions` rather than guessing.
    pub fn from_shape(shape: &[i64]) -> Result<Self, PredictionError> {
        let unsupported = || PredictionError::UnsupportedModelDimensions {
            shape: shape.to_vec(),
        };

        if shape.len() != 4 {
            return Err(unsupported());
        }

        let (height, width, layout) = if shape[3] == 3 {
            (shape[1], shape[2], ChannelLayout::ChannelsLast)
        } else if shape[1] == 3 {
            (shape[2], shape[3], ChannelLayout::ChannelsFirst)
        } else {
            return Err(unsupported());
        };

        let height = u32::try_from(height).ok().filter(|h| *h > 0);
        let width = u32::try_from(width).ok().filter(|w| *w > 0);

        match (height, width) {
            (Some(height), Some(width)) => Ok(Self {
                height,
                width,
                layout,
            }),
            _ => Err(unsupported()),
        }
    }
}

/// Resize an image to exactly `height` x `width` as 3-channel RGB
///
/// Alpha and grayscale channels are converted away.
pub fn prepare_image(image: &DynamicImage, height: u32, width: u32) -> RgbImage {
    image
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgb8()
}

/// Build a single-image batch tensor from a prepared RGB image
pub fn image_to_tensor(
    rgb: &RgbImage,
    layout: ChannelLayout,
    normalization: Normalization,
) -> Array4<f32> {
    let (width, height) = rgb.dimensions();
    let (h, w) = (height as usize, width as usize);

    let mut tensor = match layout {
        ChannelLayout::ChannelsLast => Array4::zeros((1, h, w, 3)),
        ChannelLayout::ChannelsFirst => Array4::zeros((1, 3, h, w)),
    };

    let scale = match normalization {
        Normalization::Unit => 1.0 / 255.0,
        Normalization::Raw => 1.0,
    };

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for c in 0..3 {
            let value = pixel[c] as f32 * scale;
            match layout {
                ChannelLayout::ChannelsLast => tensor[[0, y, x, c]] = value,
                ChannelLayout::ChannelsFirst => tensor[[0, c, y, x]] = value,
            }
        }
    }

    tensor
}

/// Prepare an upload for a model with the given declared input shape
pub fn preprocess_for_model(
    image: &DynamicImage,
    input_shape: &[i64],
    normalization: Normalization,
) -> Result<Array4<f32>, PredictionError> {
    let spec = InputSpec::from_shape(input_shape)?;
    let rgb = prepare_image(image, spec.height, spec.width);
    Ok(image_to_tensor(&rgb, spec.layout, normalization))
}
